use byteorder::LittleEndian;

use crate::io::{BufMut, Encode};
use crate::mysql::protocol::Capabilities;

/// `SSLRequest`: sent in place of `HandshakeResponse41` when upgrading to TLS mid-handshake
///. Identical layout to the head of `HandshakeResponse41` with the
/// username/auth/database/plugin tail omitted.
#[derive(Debug)]
pub struct SslRequest {
    pub max_packet_size: u32,
    pub collation: u8,
}

impl Encode for SslRequest {
    fn encode(&self, buf: &mut Vec<u8>, capabilities: Capabilities) {
        debug_assert!(capabilities.contains(Capabilities::SSL));

        buf.put_u32::<LittleEndian>(capabilities.bits() as u32);
        buf.put_u32::<LittleEndian>(self.max_packet_size);
        buf.put_u8(self.collation);

        // reserved
        buf.put_bytes(&[0; 23]);
    }
}
