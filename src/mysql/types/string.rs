use byteorder::LittleEndian;

use crate::io::BufMut;
use crate::mysql::protocol::TypeId;
use crate::mysql::value::{BoxDynError, Decode, Encode, MySqlValueRef};

/// `CHAR`/`VARCHAR`/`TEXT` families, `ENUM`, `SET`, and `JSON` all decode to `String`:
/// charset-aware in principle, but this crate only has `utf8`/`utf8mb4` tables
/// to work against, so non-UTF-8 charsets fall back to a lossy decode with a logged warning
/// rather than failing the whole row.
impl<'r> Decode<'r> for String {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, BoxDynError> {
        let bytes = value.variable_length_bytes()?;

        match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_owned()),
            Err(_) => {
                log::warn!(
                    "column {:?} (charset {}) contained non-UTF-8 bytes; decoding lossily",
                    value.column().name(),
                    value.column().char_set(),
                );
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

impl Encode for String {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.put_str_lenenc::<LittleEndian>(self);
    }

    fn type_id(&self) -> TypeId {
        TypeId::VAR_STRING
    }
}

impl Encode for str {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.put_str_lenenc::<LittleEndian>(self);
    }

    fn type_id(&self) -> TypeId {
        TypeId::VAR_STRING
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mysql::column::MySqlColumn;
    use crate::mysql::protocol::{ColumnDefinition41, FieldFlags};
    use crate::mysql::value::MySqlValueFormat;

    #[test]
    fn it_decodes_unicode_text() {
        let col = MySqlColumn::from_definition(
            0,
            ColumnDefinition41 {
                catalog: "def".into(),
                schema: "".into(),
                table: "".into(),
                org_table: "".into(),
                name: "n".into(),
                org_name: "".into(),
                char_set: 45,
                column_length: 40,
                column_type: TypeId::VAR_STRING,
                flags: FieldFlags::empty(),
                decimals: 0,
            },
        );

        let bytes = "Kabul \u{1F3D4}".as_bytes();
        let value = MySqlValueRef {
            format: MySqlValueFormat::Text,
            column: &col,
            bytes: Some(bytes),
        };

        assert_eq!(String::decode(value).unwrap(), "Kabul \u{1F3D4}");
    }
}
