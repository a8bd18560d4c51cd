use byteorder::LittleEndian;

use crate::error::Result;
use crate::io::{Buf, Decode};

/// The `column_count` lenenc-int leading a `COM_QUERY`/`COM_STMT_EXECUTE` result set.
#[derive(Debug)]
pub struct ColumnCount {
    pub columns: u64,
}

impl<'de> Decode<'de> for ColumnCount {
    fn decode(mut buf: &'de [u8]) -> Result<Self> {
        let columns = buf.get_uint_lenenc::<LittleEndian>()?.unwrap_or(0);

        Ok(Self { columns })
    }
}
