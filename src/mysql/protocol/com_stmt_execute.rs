use byteorder::LittleEndian;

use crate::io::{BufMut, Encode};
use crate::mysql::protocol::{command, Capabilities, TypeId};

bitflags::bitflags! {
    /// The cursor-type flag byte of `COM_STMT_EXECUTE`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CursorType: u8 {
        const NO_CURSOR  = 0x00;
        const READ_ONLY  = 0x01;
        const FOR_UPDATE = 0x02;
        const SCROLLABLE = 0x04;
    }
}

/// One bound parameter's wire type and unsigned-ness, used for the type tag pairs in
/// `COM_STMT_EXECUTE`.
#[derive(Debug, Clone, Copy)]
pub struct ParamType {
    pub type_id: TypeId,
    pub is_unsigned: bool,
}

/// `COM_STMT_EXECUTE`: `stmt_id, flags, iteration(1), NULL-bitmap,
/// new-params-bound-flag, [type tags, ...params]`.
#[derive(Debug)]
pub struct ComStmtExecute<'a> {
    pub statement_id: u32,
    pub cursor_type: CursorType,
    /// NULL bitmap, `⌈(n+2)/8⌉` bytes, precomputed by the
    /// caller since it depends on which bound values are `NULL`.
    pub null_bitmap: &'a [u8],
    /// `None` when this statement's params have already been sent once and are unchanged
    /// (the server caches bound types after the first execution).
    pub param_types: Option<&'a [ParamType]>,
    /// Binary-encoded parameter values, concatenated in positional order.
    pub params: &'a [u8],
}

impl Encode for ComStmtExecute<'_> {
    fn encode(&self, buf: &mut Vec<u8>, _capabilities: Capabilities) {
        buf.put_u8(command::COM_STMT_EXECUTE);
        buf.put_u32::<LittleEndian>(self.statement_id);
        buf.put_u8(self.cursor_type.bits());

        // iteration-count, always 1
        buf.put_u32::<LittleEndian>(1);

        if !self.null_bitmap.is_empty() {
            buf.put_bytes(self.null_bitmap);
        }

        match self.param_types {
            Some(types) => {
                buf.put_u8(1);

                for ty in types {
                    buf.put_u8(ty.type_id.0);
                    buf.put_u8(if ty.is_unsigned { 0x80 } else { 0x00 });
                }
            }
            None => buf.put_u8(0),
        }

        buf.put_bytes(self.params);
    }
}

/// Computes the `⌈n/8⌉`-byte NULL bitmap for `COM_STMT_EXECUTE` parameters;
/// distinct from the `⌈(n+2)/8⌉` bitmap a binary *row* carries.
pub fn null_bitmap(is_null: impl ExactSizeIterator<Item = bool>) -> Vec<u8> {
    let n = is_null.len();
    let mut bitmap = vec![0u8; (n + 7) / 8];

    for (i, null) in is_null.enumerate() {
        if null {
            bitmap[i / 8] |= 1 << (i % 8);
        }
    }

    bitmap
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_computes_null_bitmap() {
        let bitmap = null_bitmap([false, true, false, true, false, false, false, false, true].into_iter());
        assert_eq!(bitmap, vec![0b0000_1010, 0b0000_0001]);
    }
}
