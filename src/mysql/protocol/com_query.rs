use crate::io::{BufMut, Encode};
use crate::mysql::protocol::{command, Capabilities};

/// `COM_QUERY`: issues a SQL statement through the text protocol.
#[derive(Debug)]
pub struct ComQuery<'a> {
    pub sql: &'a str,
}

impl Encode for ComQuery<'_> {
    fn encode(&self, buf: &mut Vec<u8>, _capabilities: Capabilities) {
        buf.put_u8(command::COM_QUERY);
        buf.put_str(self.sql);
    }
}
