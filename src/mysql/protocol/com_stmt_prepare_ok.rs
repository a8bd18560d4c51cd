use byteorder::LittleEndian;

use crate::error::{Error, Result};
use crate::io::Buf;

/// The `COM_STMT_PREPARE` response header: `OK(stmt_id, num_cols, num_params,
/// warnings)`, followed by the parameter and column definitions.
#[derive(Debug)]
pub struct ComStmtPrepareOk {
    pub statement_id: u32,
    pub num_columns: u16,
    pub num_params: u16,
    pub warnings: u16,
}

impl ComStmtPrepareOk {
    pub fn read(mut buf: &[u8]) -> Result<Self> {
        let header = buf.get_u8()?;

        if header != 0x00 {
            return Err(Error::protocol(format!(
                "expected COM_STMT_PREPARE_OK (0x00); received 0x{header:X}"
            )));
        }

        let statement_id = buf.get_u32::<LittleEndian>()?;
        let num_columns = buf.get_u16::<LittleEndian>()?;
        let num_params = buf.get_u16::<LittleEndian>()?;

        // filler
        buf.advance(1);

        let warnings = buf.get_u16::<LittleEndian>()?;

        Ok(Self {
            statement_id,
            num_columns,
            num_params,
            warnings,
        })
    }
}
