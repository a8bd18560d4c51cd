use crate::io::{BufMut, Encode};
use crate::mysql::protocol::{command, Capabilities};

/// `COM_RESET_CONNECTION`: clears session variables, temporary
/// tables, prepared statements, and transaction state without a fresh TCP connection or
/// re-authentication. Preferred over the text-SQL reset fallback when the server supports it.
#[derive(Debug)]
pub struct ComResetConnection;

impl Encode for ComResetConnection {
    fn encode(&self, buf: &mut Vec<u8>, _capabilities: Capabilities) {
        buf.put_u8(command::COM_RESET_CONNECTION);
    }
}
