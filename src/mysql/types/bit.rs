use bit_vec::BitVec;
use byteorder::LittleEndian;

use crate::io::BufMut;
use crate::mysql::protocol::TypeId;
use crate::mysql::value::{BoxDynError, Decode, Encode, MySqlValueRef};

/// `BIT(M)`: big-endian packed bits, wire-encoded the same (length-prefixed)
/// shape as a binary string.
impl<'r> Decode<'r> for BitVec {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, BoxDynError> {
        let bytes = value.variable_length_bytes()?;
        Ok(BitVec::from_bytes(bytes))
    }
}

impl Encode for BitVec {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.put_bytes_lenenc::<LittleEndian>(&self.to_bytes());
    }

    fn type_id(&self) -> TypeId {
        TypeId::BIT
    }
}
