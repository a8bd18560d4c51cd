use crate::io::{BufMut, Encode};
use crate::mysql::protocol::{command, Capabilities};

/// `COM_STMT_PREPARE`.
#[derive(Debug)]
pub struct ComStmtPrepare<'a> {
    pub sql: &'a str,
}

impl Encode for ComStmtPrepare<'_> {
    fn encode(&self, buf: &mut Vec<u8>, _capabilities: Capabilities) {
        buf.put_u8(command::COM_STMT_PREPARE);
        buf.put_str(self.sql);
    }
}
