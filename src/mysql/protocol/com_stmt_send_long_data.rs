use byteorder::LittleEndian;

use crate::io::{BufMut, Encode};
use crate::mysql::protocol::{command, Capabilities};

/// `COM_STMT_SEND_LONG_DATA`: appends `data` to the
/// pending buffer for parameter `param_id`, to be sent before `COM_STMT_EXECUTE`. The server
/// never replies to this command, even on error -- a malformed send here only surfaces once
/// `COM_STMT_EXECUTE` runs.
#[derive(Debug)]
pub struct ComStmtSendLongData<'a> {
    pub statement_id: u32,
    pub param_id: u16,
    pub data: &'a [u8],
}

impl Encode for ComStmtSendLongData<'_> {
    fn encode(&self, buf: &mut Vec<u8>, _capabilities: Capabilities) {
        buf.put_u8(command::COM_STMT_SEND_LONG_DATA);
        buf.put_u32::<LittleEndian>(self.statement_id);
        buf.put_u16::<LittleEndian>(self.param_id);
        buf.put_bytes(self.data);
    }
}
