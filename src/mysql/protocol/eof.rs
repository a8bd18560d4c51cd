use byteorder::LittleEndian;

use crate::error::{Error, Result};
use crate::io::{Buf, Decode};
use crate::mysql::protocol::Status;

/// `EOF_Packet` (0xFE), used only when `DEPRECATE_EOF` is not negotiated.
#[derive(Debug, Clone, Copy)]
pub struct EofPacket {
    pub warnings: u16,
    pub status: Status,
}

impl<'de> Decode<'de> for EofPacket {
    fn decode(mut buf: &'de [u8]) -> Result<Self> {
        let header = buf.get_u8()?;

        if header != 0xfe {
            return Err(Error::protocol(format!(
                "expected EOF (0xFE); received 0x{header:X}"
            )));
        }

        let warnings = buf.get_u16::<LittleEndian>()?;
        let status = Status::from_bits_truncate(buf.get_u16::<LittleEndian>()?);

        Ok(Self { warnings, status })
    }
}
