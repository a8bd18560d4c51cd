use byteorder::ByteOrder;
use memchr::memchr;
use std::io;
use std::str;

/// Little-endian primitive and length-encoded reads over a byte slice, consuming as it goes.
///
/// This is the read half of the packet codec: every protocol packet type decodes
/// itself against a `&[u8]` through this trait instead of hand-rolling cursor arithmetic.
pub trait Buf<'a> {
    fn advance(&mut self, cnt: usize);

    fn get_uint<T: ByteOrder>(&mut self, n: usize) -> io::Result<u64>;

    fn get_i8(&mut self) -> io::Result<i8>;
    fn get_u8(&mut self) -> io::Result<u8>;

    fn get_u16<T: ByteOrder>(&mut self) -> io::Result<u16>;
    fn get_i16<T: ByteOrder>(&mut self) -> io::Result<i16>;

    fn get_u24<T: ByteOrder>(&mut self) -> io::Result<u32>;

    fn get_u32<T: ByteOrder>(&mut self) -> io::Result<u32>;
    fn get_i32<T: ByteOrder>(&mut self) -> io::Result<i32>;

    fn get_u64<T: ByteOrder>(&mut self) -> io::Result<u64>;
    fn get_i64<T: ByteOrder>(&mut self) -> io::Result<i64>;

    fn get_f32<T: ByteOrder>(&mut self) -> io::Result<f32>;
    fn get_f64<T: ByteOrder>(&mut self) -> io::Result<f64>;

    fn get_str(&mut self, len: usize) -> io::Result<&'a str>;
    fn get_str_nul(&mut self) -> io::Result<&'a str>;

    fn get_bytes(&mut self, len: usize) -> io::Result<&'a [u8]>;
    fn get_bytes_nul(&mut self) -> io::Result<&'a [u8]>;

    /// MySQL length-encoded integer.
    ///
    /// `0x00..=0xFA` is the value itself; `0xFB` is NULL (row contexts only); `0xFC`/`0xFD`/`0xFE`
    /// flag a 2/3/8-byte little-endian value follows.
    fn get_uint_lenenc<T: ByteOrder>(&mut self) -> io::Result<Option<u64>>;

    fn get_str_lenenc<T: ByteOrder>(&mut self) -> io::Result<Option<&'a str>>;
    fn get_bytes_lenenc<T: ByteOrder>(&mut self) -> io::Result<Option<&'a [u8]>>;
}

fn eof() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "unexpected EOF decoding a MySQL packet")
}

impl<'a> Buf<'a> for &'a [u8] {
    fn advance(&mut self, cnt: usize) {
        *self = &self[cnt..];
    }

    fn get_uint<T: ByteOrder>(&mut self, n: usize) -> io::Result<u64> {
        if self.len() < n {
            return Err(eof());
        }

        let val = T::read_uint(self, n);
        self.advance(n);

        Ok(val)
    }

    fn get_i8(&mut self) -> io::Result<i8> {
        Ok(self.get_u8()? as i8)
    }

    fn get_u8(&mut self) -> io::Result<u8> {
        if self.is_empty() {
            return Err(eof());
        }

        let val = self[0];
        self.advance(1);

        Ok(val)
    }

    fn get_u16<T: ByteOrder>(&mut self) -> io::Result<u16> {
        if self.len() < 2 {
            return Err(eof());
        }

        let val = T::read_u16(self);
        self.advance(2);

        Ok(val)
    }

    fn get_i16<T: ByteOrder>(&mut self) -> io::Result<i16> {
        Ok(self.get_u16::<T>()? as i16)
    }

    fn get_u24<T: ByteOrder>(&mut self) -> io::Result<u32> {
        Ok(self.get_uint::<T>(3)? as u32)
    }

    fn get_u32<T: ByteOrder>(&mut self) -> io::Result<u32> {
        if self.len() < 4 {
            return Err(eof());
        }

        let val = T::read_u32(self);
        self.advance(4);

        Ok(val)
    }

    fn get_i32<T: ByteOrder>(&mut self) -> io::Result<i32> {
        Ok(self.get_u32::<T>()? as i32)
    }

    fn get_u64<T: ByteOrder>(&mut self) -> io::Result<u64> {
        if self.len() < 8 {
            return Err(eof());
        }

        let val = T::read_u64(self);
        self.advance(8);

        Ok(val)
    }

    fn get_i64<T: ByteOrder>(&mut self) -> io::Result<i64> {
        Ok(self.get_u64::<T>()? as i64)
    }

    fn get_f32<T: ByteOrder>(&mut self) -> io::Result<f32> {
        if self.len() < 4 {
            return Err(eof());
        }

        let val = T::read_f32(self);
        self.advance(4);

        Ok(val)
    }

    fn get_f64<T: ByteOrder>(&mut self) -> io::Result<f64> {
        if self.len() < 8 {
            return Err(eof());
        }

        let val = T::read_f64(self);
        self.advance(8);

        Ok(val)
    }

    fn get_str(&mut self, len: usize) -> io::Result<&'a str> {
        let bytes = self.get_bytes(len)?;

        str::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn get_str_nul(&mut self) -> io::Result<&'a str> {
        let bytes = self.get_bytes_nul()?;

        str::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn get_bytes(&mut self, len: usize) -> io::Result<&'a [u8]> {
        if self.len() < len {
            return Err(eof());
        }

        let bytes = &self[..len];
        self.advance(len);

        Ok(bytes)
    }

    fn get_bytes_nul(&mut self) -> io::Result<&'a [u8]> {
        let nul = memchr(b'\0', self).ok_or_else(eof)?;
        let bytes = &self[..nul];
        self.advance(nul + 1);

        Ok(bytes)
    }

    fn get_uint_lenenc<T: ByteOrder>(&mut self) -> io::Result<Option<u64>> {
        Ok(match self.get_u8()? {
            0xFB => None,
            0xFC => Some(u64::from(self.get_u16::<T>()?)),
            0xFD => Some(u64::from(self.get_u24::<T>()?)),
            0xFE => Some(self.get_u64::<T>()?),
            value => Some(u64::from(value)),
        })
    }

    fn get_str_lenenc<T: ByteOrder>(&mut self) -> io::Result<Option<&'a str>> {
        self.get_uint_lenenc::<T>()?
            .map(move |len| self.get_str(len as usize))
            .transpose()
    }

    fn get_bytes_lenenc<T: ByteOrder>(&mut self) -> io::Result<Option<&'a [u8]>> {
        self.get_uint_lenenc::<T>()?
            .map(move |len| self.get_bytes(len as usize))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::LittleEndian;

    #[test]
    fn it_reads_lenenc_boundaries() {
        let mut buf: &[u8] = &[0xFA];
        assert_eq!(buf.get_uint_lenenc::<LittleEndian>().unwrap(), Some(250));

        let mut buf: &[u8] = &[0xFB];
        assert_eq!(buf.get_uint_lenenc::<LittleEndian>().unwrap(), None);

        let mut buf: &[u8] = &[0xFC, 0x00, 0x01];
        assert_eq!(buf.get_uint_lenenc::<LittleEndian>().unwrap(), Some(256));

        let mut buf: &[u8] = &[0xFD, 0x00, 0x00, 0x01];
        assert_eq!(buf.get_uint_lenenc::<LittleEndian>().unwrap(), Some(65536));

        let mut buf: &[u8] = &[0xFE, 1, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(buf.get_uint_lenenc::<LittleEndian>().unwrap(), Some(1));
    }

    #[test]
    fn it_reads_nul_terminated_strings() {
        let mut buf: &[u8] = b"hello\0world";
        assert_eq!(buf.get_str_nul().unwrap(), "hello");
        assert_eq!(buf.get_str(5).unwrap(), "world");
    }
}
