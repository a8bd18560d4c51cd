use crate::io::BufMut;
use crate::mysql::protocol::Capabilities;

/// Implemented by every wire packet the client sends. `capabilities` is the negotiated set
/// from the handshake, since several packets (e.g. `HandshakeResponse41`, `ComStmtExecute`)
/// change shape based on which capabilities are active.
pub trait Encode {
    fn encode(&self, buf: &mut Vec<u8>, capabilities: Capabilities);
}

impl Encode for &'_ [u8] {
    fn encode(&self, buf: &mut Vec<u8>, _capabilities: Capabilities) {
        buf.put_bytes(self);
    }
}
