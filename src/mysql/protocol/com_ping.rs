use crate::io::{BufMut, Encode};
use crate::mysql::protocol::{command, Capabilities};

/// `COM_PING`: round-trips without touching session state.
#[derive(Debug)]
pub struct ComPing;

impl Encode for ComPing {
    fn encode(&self, buf: &mut Vec<u8>, _capabilities: Capabilities) {
        buf.put_u8(command::COM_PING);
    }
}
