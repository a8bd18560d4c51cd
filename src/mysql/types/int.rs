use byteorder::LittleEndian;

use crate::io::Buf;
use crate::mysql::protocol::TypeId;
use crate::mysql::value::{BoxDynError, Decode, Encode, MySqlValueFormat, MySqlValueRef};

macro_rules! impl_signed_int {
    ($ty:ty, $type_id:expr, $get:ident) => {
        impl<'r> Decode<'r> for $ty {
            fn decode(value: MySqlValueRef<'r>) -> Result<Self, BoxDynError> {
                let bytes = value.bytes()?;

                match value.format() {
                    MySqlValueFormat::Text => {
                        let s = std::str::from_utf8(bytes)?;
                        Ok(s.parse()?)
                    }
                    MySqlValueFormat::Binary => {
                        let mut buf = bytes;
                        Ok(buf.$get::<LittleEndian>()?)
                    }
                }
            }
        }

        impl Encode for $ty {
            fn encode(&self, buf: &mut Vec<u8>) {
                buf.extend_from_slice(&self.to_le_bytes());
            }

            fn type_id(&self) -> TypeId {
                $type_id
            }
        }
    };
}

impl<'r> Decode<'r> for i8 {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, BoxDynError> {
        let bytes = value.bytes()?;

        match value.format() {
            MySqlValueFormat::Text => Ok(std::str::from_utf8(bytes)?.parse()?),
            MySqlValueFormat::Binary => Ok(bytes[0] as i8),
        }
    }
}

impl Encode for i8 {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(*self as u8);
    }

    fn type_id(&self) -> TypeId {
        TypeId::TINY
    }
}

impl_signed_int!(i16, TypeId::SHORT, get_i16);
impl_signed_int!(i32, TypeId::LONG, get_i32);
impl_signed_int!(i64, TypeId::LONGLONG, get_i64);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mysql::column::MySqlColumn;
    use crate::mysql::protocol::{ColumnDefinition41, FieldFlags};

    fn column(type_id: TypeId) -> MySqlColumn {
        MySqlColumn::from_definition(
            0,
            ColumnDefinition41 {
                catalog: "def".into(),
                schema: "".into(),
                table: "".into(),
                org_table: "".into(),
                name: "n".into(),
                org_name: "".into(),
                char_set: 63,
                column_length: 11,
                column_type: type_id,
                flags: FieldFlags::empty(),
                decimals: 0,
            },
        )
    }

    #[test]
    fn it_decodes_text_i32() {
        let col = column(TypeId::LONG);
        let value = MySqlValueRef {
            format: MySqlValueFormat::Text,
            column: &col,
            bytes: Some(b"-42"),
        };

        assert_eq!(i32::decode(value).unwrap(), -42);
    }

    #[test]
    fn it_decodes_binary_i64() {
        let col = column(TypeId::LONGLONG);
        let bytes = (-1234567890123i64).to_le_bytes();
        let value = MySqlValueRef {
            format: MySqlValueFormat::Binary,
            column: &col,
            bytes: Some(&bytes),
        };

        assert_eq!(i64::decode(value).unwrap(), -1234567890123);
    }
}
