use byteorder::LittleEndian;

use crate::error::{Error, Result};
use crate::io::{Buf, Decode};

/// `ERR_Packet`. Carried verbatim into [`crate::mysql::error::MySqlDatabaseError`].
#[derive(Debug, Clone)]
pub struct ErrPacket {
    pub error_code: u16,
    pub sql_state: Box<str>,
    pub error_message: Box<str>,
}

impl<'de> Decode<'de> for ErrPacket {
    fn decode(mut buf: &'de [u8]) -> Result<Self> {
        let header = buf.get_u8()?;

        if header != 0xff {
            return Err(Error::protocol(format!(
                "expected ERR (0xFF); received 0x{header:X}"
            )));
        }

        let error_code = buf.get_u16::<LittleEndian>()?;

        // SQL state marker + 5-byte SQLSTATE are only present with CLIENT_PROTOCOL_41, which
        // this client always requires, so we always expect them
        // here except during the handshake phase before negotiation completes -- callers that
        // need the pre-41 shape decode manually.
        let (sql_state, error_message) = if buf.first() == Some(&b'#') {
            buf.advance(1);
            let sql_state = buf.get_str(5)?.into();
            let error_message = buf.get_str(buf.len())?.into();
            (sql_state, error_message)
        } else {
            ("HY000".into(), buf.get_str(buf.len())?.into())
        };

        Ok(Self {
            error_code,
            sql_state,
            error_message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERR_HANDSHAKE_UNKNOWN_DB: &[u8] = b"\xff\x19\x04#42000Unknown database 'unknown'";

    #[test]
    fn it_decodes_err_packet() {
        let p = ErrPacket::decode(ERR_HANDSHAKE_UNKNOWN_DB).unwrap();

        assert_eq!(p.error_code, 1049);
        assert_eq!(&*p.sql_state, "42000");
        assert_eq!(&*p.error_message, "Unknown database 'unknown'");
    }
}
