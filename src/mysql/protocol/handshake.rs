use byteorder::LittleEndian;

use crate::error::{Error, Result};
use crate::io::{Buf, Decode};
use crate::mysql::protocol::{AuthPlugin, Capabilities, Status};

/// `HandshakeV10`: the server's greeting.
///
/// <https://dev.mysql.com/doc/dev/mysql-server/latest/page_protocol_connection_phase_packets_protocol_handshake_v10.html>
#[derive(Debug)]
pub struct HandshakeV10 {
    pub protocol_version: u8,
    pub server_version: Box<str>,
    pub connection_id: u32,
    pub server_capabilities: Capabilities,
    pub server_default_collation: u8,
    pub status: Status,
    /// 20+ bytes, reassembled from the two auth-plugin-data parts.
    pub auth_plugin_data: Box<[u8]>,
    pub auth_plugin: Option<AuthPlugin>,
}

impl<'de> Decode<'de> for HandshakeV10 {
    fn decode(mut buf: &'de [u8]) -> Result<Self> {
        let protocol_version = buf.get_u8()?;

        if protocol_version != 10 {
            return Err(Error::protocol(format!(
                "unsupported handshake protocol version {protocol_version}, expected 10"
            )));
        }

        let server_version = buf.get_str_nul()?.into();
        let connection_id = buf.get_u32::<LittleEndian>()?;

        let mut scramble = Vec::with_capacity(20);
        scramble.extend_from_slice(buf.get_bytes(8)?);

        // filler
        buf.advance(1);

        let capabilities_1 = buf.get_u16::<LittleEndian>()?;
        let mut capabilities = Capabilities::from_bits_truncate(capabilities_1 as u64);

        let char_set = buf.get_u8()?;
        let status = Status::from_bits_truncate(buf.get_u16::<LittleEndian>()?);

        let capabilities_2 = buf.get_u16::<LittleEndian>()?;
        capabilities |= Capabilities::from_bits_truncate(((capabilities_2 as u32) << 16) as u64);

        let auth_plugin_data_len = if capabilities.contains(Capabilities::PLUGIN_AUTH) {
            buf.get_u8()?
        } else {
            buf.advance(1);
            0
        };

        // reserved
        buf.advance(6);

        if capabilities.contains(Capabilities::MYSQL) {
            buf.advance(4);
        } else {
            let capabilities_3 = buf.get_u32::<LittleEndian>()?;
            capabilities |= Capabilities::from_bits_truncate((capabilities_3 as u64) << 32);
        }

        if capabilities.contains(Capabilities::SECURE_CONNECTION) {
            let len = (auth_plugin_data_len as i32 - 9).max(12) as usize;
            scramble.extend_from_slice(buf.get_bytes(len)?);
            buf.advance(1);
        }

        let auth_plugin = if capabilities.contains(Capabilities::PLUGIN_AUTH) {
            let name = buf.get_str_nul()?;
            Some(AuthPlugin::from_name(name)?)
        } else {
            None
        };

        Ok(Self {
            protocol_version,
            server_version,
            connection_id,
            server_capabilities: capabilities,
            server_default_collation: char_set,
            status,
            auth_plugin_data: scramble.into_boxed_slice(),
            auth_plugin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HANDSHAKE_MYSQL_8_0_18: &[u8] = b"\n8.0.18\x00\x19\x00\x00\x00\x114aB0c\x06g\x00\xff\xff\xff\x02\x00\xff\xc7\x15\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00tL\x03s\x0f[4\rl4. \x00caching_sha2_password\x00";

    #[test]
    fn it_reads_handshake_v10() {
        let p = HandshakeV10::decode(HANDSHAKE_MYSQL_8_0_18).unwrap();

        assert_eq!(p.protocol_version, 10);
        assert_eq!(&*p.server_version, "8.0.18");
        assert_eq!(p.server_default_collation, 255);
        assert!(p.status.contains(Status::SERVER_STATUS_AUTOCOMMIT));
        assert_eq!(p.auth_plugin, Some(AuthPlugin::CachingSha2Password));
        assert_eq!(p.auth_plugin_data.len(), 20);
    }
}
