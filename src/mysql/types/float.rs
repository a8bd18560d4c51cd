use byteorder::LittleEndian;

use crate::io::Buf;
use crate::mysql::protocol::TypeId;
use crate::mysql::value::{BoxDynError, Decode, Encode, MySqlValueFormat, MySqlValueRef};

impl<'r> Decode<'r> for f32 {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, BoxDynError> {
        let bytes = value.bytes()?;

        match value.format() {
            MySqlValueFormat::Text => Ok(std::str::from_utf8(bytes)?.parse()?),
            MySqlValueFormat::Binary => {
                let mut buf = bytes;
                Ok(buf.get_f32::<LittleEndian>()?)
            }
        }
    }
}

impl Encode for f32 {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_le_bytes());
    }

    fn type_id(&self) -> TypeId {
        TypeId::FLOAT
    }
}

impl<'r> Decode<'r> for f64 {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, BoxDynError> {
        let bytes = value.bytes()?;

        match value.format() {
            MySqlValueFormat::Text => Ok(std::str::from_utf8(bytes)?.parse()?),
            MySqlValueFormat::Binary => {
                let mut buf = bytes;
                Ok(buf.get_f64::<LittleEndian>()?)
            }
        }
    }
}

impl Encode for f64 {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_le_bytes());
    }

    fn type_id(&self) -> TypeId {
        TypeId::DOUBLE
    }
}
