use crate::mysql::protocol::TypeId;
use crate::mysql::value::{BoxDynError, Decode, Encode, MySqlValueRef};

/// MySQL has no native boolean column type; `BOOL`/`BOOLEAN` are aliases for `TINYINT(1)`.
impl<'r> Decode<'r> for bool {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, BoxDynError> {
        Ok(i8::decode(value)? != 0)
    }
}

impl Encode for bool {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(*self as u8);
    }

    fn type_id(&self) -> TypeId {
        TypeId::TINY
    }
}
