use byteorder::LittleEndian;

use crate::io::{BufMut, Encode};
use crate::mysql::protocol::{command, Capabilities};

/// `COM_STMT_RESET`: clears any buffered long-data params and cursor state for a
/// prepared statement without closing it.
#[derive(Debug)]
pub struct ComStmtReset {
    pub statement_id: u32,
}

impl Encode for ComStmtReset {
    fn encode(&self, buf: &mut Vec<u8>, _capabilities: Capabilities) {
        buf.put_u8(command::COM_STMT_RESET);
        buf.put_u32::<LittleEndian>(self.statement_id);
    }
}
