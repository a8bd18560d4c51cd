use byteorder::LittleEndian;

use crate::io::{BufMut, Encode};
use crate::mysql::protocol::{command, Capabilities};

/// `COM_STMT_FETCH`: fetches the next batch of rows from a
/// cursor-backed prepared statement opened with [`super::CursorType::ReadOnly`].
#[derive(Debug)]
pub struct ComStmtFetch {
    pub statement_id: u32,
    pub rows: u32,
}

impl Encode for ComStmtFetch {
    fn encode(&self, buf: &mut Vec<u8>, _capabilities: Capabilities) {
        buf.put_u8(command::COM_STMT_FETCH);
        buf.put_u32::<LittleEndian>(self.statement_id);
        buf.put_u32::<LittleEndian>(self.rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_encodes_com_stmt_fetch() {
        let mut buf = Vec::new();

        ComStmtFetch {
            statement_id: 1,
            rows: 10,
        }
        .encode(&mut buf, Capabilities::empty());

        assert_eq!(&buf[..], b"\x1C\x01\0\0\0\x0A\0\0\0");
    }
}
