use byteorder::LittleEndian;

use crate::error::{Error, Result};
use crate::io::{Buf, Decode};
use crate::mysql::protocol::{FieldFlags, TypeId};

/// `ColumnDefinition41`. Survives past the row-decode dispatch as
/// [`crate::mysql::column::MySqlColumn`] metadata.
#[derive(Debug, Clone)]
pub struct ColumnDefinition41 {
    pub catalog: Box<str>,
    pub schema: Box<str>,
    pub table: Box<str>,
    pub org_table: Box<str>,
    pub name: Box<str>,
    pub org_name: Box<str>,
    pub char_set: u16,
    pub column_length: u32,
    pub column_type: TypeId,
    pub flags: FieldFlags,
    pub decimals: u8,
}

impl<'de> Decode<'de> for ColumnDefinition41 {
    fn decode(mut buf: &'de [u8]) -> Result<Self> {
        let catalog = buf
            .get_str_lenenc::<LittleEndian>()?
            .unwrap_or_default()
            .into();
        let schema = buf
            .get_str_lenenc::<LittleEndian>()?
            .unwrap_or_default()
            .into();
        let table = buf
            .get_str_lenenc::<LittleEndian>()?
            .unwrap_or_default()
            .into();
        let org_table = buf
            .get_str_lenenc::<LittleEndian>()?
            .unwrap_or_default()
            .into();
        let name = buf
            .get_str_lenenc::<LittleEndian>()?
            .unwrap_or_default()
            .into();
        let org_name = buf
            .get_str_lenenc::<LittleEndian>()?
            .unwrap_or_default()
            .into();

        let len_fixed_fields = buf.get_uint_lenenc::<LittleEndian>()?.unwrap_or(0);

        if len_fixed_fields != 0x0c {
            return Err(Error::protocol(format!(
                "expected ColumnDefinition41 fixed-length fields marker (0x0c); received {len_fixed_fields:?}"
            )));
        }

        let char_set = buf.get_u16::<LittleEndian>()?;
        let column_length = buf.get_u32::<LittleEndian>()?;
        let column_type = TypeId(buf.get_u8()?);
        let flags = FieldFlags::from_bits_truncate(buf.get_u16::<LittleEndian>()?);
        let decimals = buf.get_u8()?;

        // filler
        buf.advance(2);

        Ok(Self {
            catalog,
            schema,
            table,
            org_table,
            name,
            org_name,
            char_set,
            column_length,
            column_type,
            flags,
            decimals,
        })
    }
}
