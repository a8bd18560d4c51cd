use byteorder::LittleEndian;

use crate::error::{Error, Result};
use crate::io::Buf;
use crate::mysql::protocol::{Capabilities, Status};

/// `OK_Packet`, covering both the classic `0x00` header and the `DEPRECATE_EOF` short form
/// that reuses `0xFE`.
#[derive(Debug, Clone)]
pub struct OkPacket {
    pub affected_rows: u64,
    pub last_insert_id: u64,
    pub status: Status,
    pub warnings: u16,
    pub info: Box<str>,
}

impl OkPacket {
    /// `true` if `header`/`payload_len` could be this packet's `DEPRECATE_EOF`-era disguise as
    /// an EOF.
    pub fn looks_like_eof(header: u8, payload_len: usize, capabilities: Capabilities) -> bool {
        header == 0xfe
            && payload_len < 9
            && capabilities.contains(Capabilities::DEPRECATE_EOF)
    }

    pub fn read(mut buf: &[u8], capabilities: Capabilities) -> Result<Self> {
        let header = buf.get_u8()?;

        if header != 0x00 && header != 0xfe {
            return Err(Error::protocol(format!(
                "expected OK (0x00 or 0xFE); received 0x{header:X}"
            )));
        }

        let affected_rows = buf.get_uint_lenenc::<LittleEndian>()?.unwrap_or(0);
        let last_insert_id = buf.get_uint_lenenc::<LittleEndian>()?.unwrap_or(0);

        let status;
        let warnings;

        if capabilities.contains(Capabilities::PROTOCOL_41) {
            status = Status::from_bits_truncate(buf.get_u16::<LittleEndian>()?);
            warnings = buf.get_u16::<LittleEndian>()?;
        } else if capabilities.contains(Capabilities::TRANSACTIONS) {
            status = Status::from_bits_truncate(buf.get_u16::<LittleEndian>()?);
            warnings = 0;
        } else {
            status = Status::empty();
            warnings = 0;
        }

        let info = if !buf.is_empty() {
            buf.get_str(buf.len())?.into()
        } else {
            "".into()
        };

        Ok(Self {
            affected_rows,
            last_insert_id,
            status,
            warnings,
            info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_HANDSHAKE: &[u8] = b"\x00\x00\x00\x02@\x00\x00";

    #[test]
    fn it_decodes_ok_handshake() {
        let p = OkPacket::read(OK_HANDSHAKE, Capabilities::PROTOCOL_41).unwrap();

        assert_eq!(p.affected_rows, 0);
        assert_eq!(p.last_insert_id, 0);
        assert_eq!(p.warnings, 0);
        assert!(p.status.contains(Status::SERVER_STATUS_AUTOCOMMIT));
        assert!(p.info.is_empty());
    }
}
