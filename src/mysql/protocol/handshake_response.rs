use byteorder::LittleEndian;

use crate::io::{BufMut, Encode};
use crate::mysql::protocol::Capabilities;

/// `HandshakeResponse41`.
///
/// <https://dev.mysql.com/doc/dev/mysql-server/latest/page_protocol_connection_phase_packets_protocol_handshake_response.html>
#[derive(Debug)]
pub struct HandshakeResponse41<'a> {
    pub max_packet_size: u32,
    pub collation: u8,
    pub username: &'a str,
    pub database: Option<&'a str>,
    pub auth_plugin_name: Option<&'a str>,
    pub auth_response: &'a [u8],
    /// `CLIENT_CONNECT_ATTRS` key/value pairs (e.g. `_client_name`, `_client_version`, `_os`),
    /// sent only when the server negotiates `CLIENT_CONNECT_ATTRS`.
    pub connection_attrs: &'a [(String, String)],
}

impl Encode for HandshakeResponse41<'_> {
    fn encode(&self, buf: &mut Vec<u8>, capabilities: Capabilities) {
        buf.put_u32::<LittleEndian>(capabilities.bits() as u32);
        buf.put_u32::<LittleEndian>(self.max_packet_size);
        buf.put_u8(self.collation);

        // reserved
        buf.put_bytes(&[0; 19]);

        if capabilities.contains(Capabilities::MYSQL) {
            buf.put_bytes(&[0; 4]);
        } else {
            buf.put_u32::<LittleEndian>((capabilities.bits() >> 32) as u32);
        }

        buf.put_str_nul(self.username);

        if capabilities.contains(Capabilities::PLUGIN_AUTH_LENENC_DATA) {
            buf.put_bytes_lenenc::<LittleEndian>(self.auth_response);
        } else if capabilities.contains(Capabilities::SECURE_CONNECTION) {
            buf.put_u8(self.auth_response.len() as u8);
            buf.put_bytes(self.auth_response);
        } else {
            buf.put_u8(0);
        }

        if capabilities.contains(Capabilities::CONNECT_WITH_DB) {
            if let Some(database) = self.database {
                buf.put_str_nul(database);
            }
        }

        if capabilities.contains(Capabilities::PLUGIN_AUTH) {
            buf.put_str_nul(self.auth_plugin_name.unwrap_or("mysql_native_password"));
        }

        if capabilities.contains(Capabilities::CONNECT_ATTRS) {
            let mut attrs_buf = Vec::new();

            for (key, value) in self.connection_attrs {
                attrs_buf.put_str_lenenc::<LittleEndian>(key);
                attrs_buf.put_str_lenenc::<LittleEndian>(value);
            }

            buf.put_uint_lenenc::<LittleEndian>(Some(attrs_buf.len() as u64));
            buf.put_bytes(&attrs_buf);
        }
    }
}
