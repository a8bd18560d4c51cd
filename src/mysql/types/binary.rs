use byteorder::LittleEndian;

use crate::io::BufMut;
use crate::mysql::protocol::TypeId;
use crate::mysql::value::{BoxDynError, Decode, Encode, MySqlValueRef};

/// `BINARY`/`VARBINARY`/`BLOB` families: no charset interpretation, raw bytes.
impl<'r> Decode<'r> for Vec<u8> {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, BoxDynError> {
        Ok(value.variable_length_bytes()?.to_vec())
    }
}

impl Encode for Vec<u8> {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.put_bytes_lenenc::<LittleEndian>(self);
    }

    fn type_id(&self) -> TypeId {
        TypeId::BLOB
    }
}

impl Encode for [u8] {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.put_bytes_lenenc::<LittleEndian>(self);
    }

    fn type_id(&self) -> TypeId {
        TypeId::BLOB
    }
}
