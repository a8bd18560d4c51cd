use crate::error::{Error, Result};
use crate::io::{Buf, BufMut, Decode, Encode};
use crate::mysql::protocol::{AuthPlugin, Capabilities};

/// `AuthSwitchRequest` (0xFE) — the server asks the client to restart authentication with a
/// different plugin and a fresh scramble.
#[derive(Debug)]
pub struct AuthSwitchRequest {
    pub auth_plugin: AuthPlugin,
    pub auth_plugin_data: Box<[u8]>,
}

impl<'de> Decode<'de> for AuthSwitchRequest {
    fn decode(mut buf: &'de [u8]) -> Result<Self> {
        let header = buf.get_u8()?;

        if header != 0xfe {
            return Err(Error::protocol(format!(
                "expected AuthSwitchRequest (0xFE); received 0x{header:X}"
            )));
        }

        let name = buf.get_str_nul()?;
        let auth_plugin = AuthPlugin::from_name(name)?;

        // Trailing NUL on the scramble is optional and plugin-dependent; strip it if present.
        let mut data = buf.get_bytes(buf.len())?;
        if data.last() == Some(&0) {
            data = &data[..data.len() - 1];
        }

        Ok(Self {
            auth_plugin,
            auth_plugin_data: data.to_vec().into_boxed_slice(),
        })
    }
}

/// `AuthSwitchResponse` — the recomputed scramble sent in reply to an `AuthSwitchRequest`.
#[derive(Debug)]
pub struct AuthSwitchResponse<'a>(pub &'a [u8]);

impl Encode for AuthSwitchResponse<'_> {
    fn encode(&self, buf: &mut Vec<u8>, _capabilities: Capabilities) {
        buf.put_bytes(self.0);
    }
}
