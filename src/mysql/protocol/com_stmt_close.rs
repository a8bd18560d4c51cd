use byteorder::LittleEndian;

use crate::io::{BufMut, Encode};
use crate::mysql::protocol::{command, Capabilities};

/// `COM_STMT_CLOSE`: no response is sent by the
/// server.
#[derive(Debug)]
pub struct ComStmtClose {
    pub statement_id: u32,
}

impl Encode for ComStmtClose {
    fn encode(&self, buf: &mut Vec<u8>, _capabilities: Capabilities) {
        buf.put_u8(command::COM_STMT_CLOSE);
        buf.put_u32::<LittleEndian>(self.statement_id);
    }
}
