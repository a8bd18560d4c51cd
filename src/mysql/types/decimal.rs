use std::ops::Deref;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use byteorder::LittleEndian;

use crate::io::BufMut;
use crate::mysql::protocol::TypeId;
use crate::mysql::value::{BoxDynError, Decode, Encode, MySqlValueRef};

/// `DECIMAL`/`NEWDECIMAL`: arbitrary-precision, wire-encoded as an ASCII string
/// in both the text and binary protocols -- there is no fixed-width binary form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MySqlDecimal(pub BigDecimal);

impl Deref for MySqlDecimal {
    type Target = BigDecimal;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<BigDecimal> for MySqlDecimal {
    fn from(value: BigDecimal) -> Self {
        MySqlDecimal(value)
    }
}

impl<'r> Decode<'r> for MySqlDecimal {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, BoxDynError> {
        let bytes = value.variable_length_bytes()?;
        let s = std::str::from_utf8(bytes)?;

        Ok(MySqlDecimal(BigDecimal::from_str(s)?))
    }
}

impl Encode for MySqlDecimal {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.put_str_lenenc::<LittleEndian>(&self.0.to_string());
    }

    fn type_id(&self) -> TypeId {
        TypeId::NEWDECIMAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mysql::column::MySqlColumn;
    use crate::mysql::protocol::{ColumnDefinition41, FieldFlags};
    use crate::mysql::value::MySqlValueFormat;

    #[test]
    fn it_decodes_a_fractional_decimal() {
        let col = MySqlColumn::from_definition(
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
                column_type: TypeId::NEWDECIMAL,
                flags: FieldFlags::empty(),
                decimals: 2,
            },
        );

        let value = MySqlValueRef {
            format: MySqlValueFormat::Text,
            column: &col,
            bytes: Some(b"1234.56"),
        };

        let decimal = MySqlDecimal::decode(value).unwrap();
        assert_eq!(decimal.0, BigDecimal::from_str("1234.56").unwrap());
    }
}
