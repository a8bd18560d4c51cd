use crate::io::{BufMut, Encode};
use crate::mysql::protocol::{command, Capabilities};

/// `COM_INIT_DB`: switches the default schema for the session.
#[derive(Debug)]
pub struct ComInitDb<'a> {
    pub schema: &'a str,
}

impl Encode for ComInitDb<'_> {
    fn encode(&self, buf: &mut Vec<u8>, _capabilities: Capabilities) {
        buf.put_u8(command::COM_INIT_DB);
        buf.put_str(self.schema);
    }
}
