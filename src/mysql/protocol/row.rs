use std::ops::Range;

use byteorder::LittleEndian;

use crate::error::Result;
use crate::io::Buf;

/// A decoded row's column slices into its owned buffer, NULL-aware.
///
/// Both the text and binary protocol variants share this shape; they differ only in how the
/// column boundaries are computed from the wire bytes.
struct RowSlices {
    buffer: Box<[u8]>,
    values: Box<[Option<Range<usize>>]>,
}

impl RowSlices {
    fn get(&self, index: usize) -> Option<&[u8]> {
        let range = self.values[index].clone()?;
        Some(&self.buffer[range])
    }

    fn len(&self) -> usize {
        self.values.len()
    }
}

/// A text-protocol row: each column is a length-encoded string, or the `0xFB` NULL sentinel.
pub struct TextRow(RowSlices);

impl TextRow {
    pub fn decode(buf: &[u8], num_columns: usize) -> Result<Self> {
        let buffer: Box<[u8]> = buf.into();
        let mut values = Vec::with_capacity(num_columns);
        let mut cursor: &[u8] = &buffer;

        for _ in 0..num_columns {
            let before = cursor.len();

            match cursor.get_uint_lenenc::<LittleEndian>()? {
                None => values.push(None),
                Some(len) => {
                    let prefix_width = before - cursor.len();
                    let start = buffer.len() - before + prefix_width;
                    let end = start + len as usize;

                    cursor.advance(len as usize);
                    values.push(Some(start..end));
                }
            }
        }

        Ok(Self(RowSlices {
            buffer,
            values: values.into_boxed_slice(),
        }))
    }

    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// A binary-protocol row: NULL bitmap of `⌈(n+2)/8⌉` bytes (offset by 2 reserved bits), then
/// per-type encoded values for non-NULL columns.
pub struct BinaryRow(RowSlices);

impl BinaryRow {
    pub fn decode(mut buf: &[u8], column_types: &[crate::mysql::protocol::TypeId]) -> Result<Self> {
        let num_columns = column_types.len();

        let header = buf.get_u8()?;
        debug_assert_eq!(header, 0x00, "binary row header must be 0x00");

        let null_bitmap_len = (num_columns + 7 + 2) / 8;
        let null_bitmap = buf.get_bytes(null_bitmap_len)?;

        let buffer: Box<[u8]> = buf.into();
        let mut values = Vec::with_capacity(num_columns);
        let mut cursor: &[u8] = &buffer;

        for (i, type_id) in column_types.iter().enumerate() {
            let bit = i + 2;
            let is_null = null_bitmap[bit / 8] & (1 << (bit % 8)) != 0;

            if is_null {
                values.push(None);
                continue;
            }

            let before = cursor.len();
            let size = binary_value_width(cursor, *type_id)?;
            let start = buffer.len() - before;

            cursor.advance(size);
            values.push(Some(start..start + size));
        }

        Ok(Self(RowSlices {
            buffer,
            values: values.into_boxed_slice(),
        }))
    }

    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Returns how many bytes in `buf` the next binary-protocol value of `type_id` occupies,
/// without copying it -- variable-length temporal types and lenenc strings/blobs need to peek
/// their own length prefix first.
fn binary_value_width(buf: &[u8], type_id: crate::mysql::protocol::TypeId) -> Result<usize> {
    use crate::mysql::protocol::TypeId as T;

    let fixed = match type_id {
        T::TINY => Some(1),
        T::SHORT | T::YEAR => Some(2),
        T::LONG | T::INT24 | T::FLOAT => Some(4),
        T::LONGLONG | T::DOUBLE => Some(8),
        T::NULL => Some(0),
        _ => None,
    };

    if let Some(n) = fixed {
        return Ok(n);
    }

    // Everything else is length-encoded: DATE/TIME/DATETIME/TIMESTAMP use a one-byte "length
    // of this value" prefix (valid lengths are all <= 11, so it never needs the wider lenenc
    // forms in practice, but decoding it as one is still correct); strings/blobs/decimal use
    // a real lenenc-string.
    let mut cursor = buf;
    let prefix_value = cursor.get_uint_lenenc::<LittleEndian>()?.unwrap_or(0) as usize;
    let prefix_width = buf.len() - cursor.len();

    Ok(prefix_width + prefix_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_decodes_text_row_with_null() {
        // columns: "1", NULL, "hello"
        let mut buf = Vec::new();
        buf.push(1);
        buf.push(b'1');
        buf.push(0xFB);
        buf.push(5);
        buf.extend_from_slice(b"hello");

        let row = TextRow::decode(&buf, 3).unwrap();
        assert_eq!(row.get(0), Some(&b"1"[..]));
        assert_eq!(row.get(1), None);
        assert_eq!(row.get(2), Some(&b"hello"[..]));
    }
}
