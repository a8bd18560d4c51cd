use byteorder::LittleEndian;

use crate::io::Buf;
use crate::mysql::protocol::TypeId;
use crate::mysql::value::{BoxDynError, Decode, Encode, MySqlValueFormat, MySqlValueRef};

macro_rules! impl_unsigned_int {
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

            fn is_unsigned(&self) -> bool {
                true
            }
        }
    };
}

impl<'r> Decode<'r> for u8 {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, BoxDynError> {
        let bytes = value.bytes()?;

        match value.format() {
            MySqlValueFormat::Text => Ok(std::str::from_utf8(bytes)?.parse()?),
            MySqlValueFormat::Binary => Ok(bytes[0]),
        }
    }
}

impl Encode for u8 {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(*self);
    }

    fn type_id(&self) -> TypeId {
        TypeId::TINY
    }

    fn is_unsigned(&self) -> bool {
        true
    }
}

impl_unsigned_int!(u16, TypeId::SHORT, get_u16);
impl_unsigned_int!(u32, TypeId::LONG, get_u32);
impl_unsigned_int!(u64, TypeId::LONGLONG, get_u64);

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
                column_length: 10,
                column_type: type_id,
                flags: FieldFlags::UNSIGNED,
                decimals: 0,
            },
        )
    }

    #[test]
    fn it_decodes_text_u64() {
        let col = column(TypeId::LONGLONG);
        let value = MySqlValueRef {
            format: MySqlValueFormat::Text,
            column: &col,
            bytes: Some(b"18446744073709551615"),
        };

        assert_eq!(u64::decode(value).unwrap(), u64::MAX);
    }
}
