use byteorder::LittleEndian;

use crate::io::{BufMut, Encode};
use crate::mysql::protocol::{command, Capabilities};

/// `COM_CHANGE_USER`: re-runs the auth sub-protocol on the open
/// socket and resets session state without reconnecting at the transport layer.
#[derive(Debug)]
pub struct ComChangeUser<'a> {
    pub username: &'a str,
    pub auth_response: &'a [u8],
    pub database: Option<&'a str>,
    pub collation: u8,
    pub auth_plugin_name: &'a str,
}

impl Encode for ComChangeUser<'_> {
    fn encode(&self, buf: &mut Vec<u8>, capabilities: Capabilities) {
        buf.put_u8(command::COM_CHANGE_USER);
        buf.put_str_nul(self.username);

        if capabilities.contains(Capabilities::SECURE_CONNECTION) {
            buf.put_u8(self.auth_response.len() as u8);
            buf.put_bytes(self.auth_response);
        } else {
            buf.put_str_nul(std::str::from_utf8(self.auth_response).unwrap_or(""));
        }

        buf.put_str_nul(self.database.unwrap_or(""));
        buf.put_u16::<LittleEndian>(self.collation as u16);

        if capabilities.contains(Capabilities::PLUGIN_AUTH) {
            buf.put_str_nul(self.auth_plugin_name);
        }
    }
}
