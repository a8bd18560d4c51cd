use byteorder::ByteOrder;

/// The write half of the packet codec: every outgoing packet encodes itself
/// against a `Vec<u8>` through this trait.
pub trait BufMut {
    fn put_u8(&mut self, val: u8);
    fn put_i8(&mut self, val: i8);

    fn put_u16<T: ByteOrder>(&mut self, val: u16);
    fn put_i16<T: ByteOrder>(&mut self, val: i16);

    fn put_u24<T: ByteOrder>(&mut self, val: u32);

    fn put_u32<T: ByteOrder>(&mut self, val: u32);
    fn put_i32<T: ByteOrder>(&mut self, val: i32);

    fn put_u64<T: ByteOrder>(&mut self, val: u64);
    fn put_i64<T: ByteOrder>(&mut self, val: i64);

    fn put_f32<T: ByteOrder>(&mut self, val: f32);
    fn put_f64<T: ByteOrder>(&mut self, val: f64);

    fn put_bytes(&mut self, val: &[u8]);
    fn put_str(&mut self, val: &str);
    fn put_str_nul(&mut self, val: &str);

    /// MySQL length-encoded integer.
    fn put_uint_lenenc<T: ByteOrder>(&mut self, val: Option<u64>);
    fn put_str_lenenc<T: ByteOrder>(&mut self, val: &str);
    fn put_bytes_lenenc<T: ByteOrder>(&mut self, val: &[u8]);
}

impl BufMut for Vec<u8> {
    fn put_u8(&mut self, val: u8) {
        self.push(val);
    }

    fn put_i8(&mut self, val: i8) {
        self.push(val as u8);
    }

    fn put_u16<T: ByteOrder>(&mut self, val: u16) {
        let mut buf = [0; 2];
        T::write_u16(&mut buf, val);
        self.extend_from_slice(&buf);
    }

    fn put_i16<T: ByteOrder>(&mut self, val: i16) {
        self.put_u16::<T>(val as u16);
    }

    fn put_u24<T: ByteOrder>(&mut self, val: u32) {
        let mut buf = [0; 3];
        T::write_u24(&mut buf, val);
        self.extend_from_slice(&buf);
    }

    fn put_u32<T: ByteOrder>(&mut self, val: u32) {
        let mut buf = [0; 4];
        T::write_u32(&mut buf, val);
        self.extend_from_slice(&buf);
    }

    fn put_i32<T: ByteOrder>(&mut self, val: i32) {
        self.put_u32::<T>(val as u32);
    }

    fn put_u64<T: ByteOrder>(&mut self, val: u64) {
        let mut buf = [0; 8];
        T::write_u64(&mut buf, val);
        self.extend_from_slice(&buf);
    }

    fn put_i64<T: ByteOrder>(&mut self, val: i64) {
        self.put_u64::<T>(val as u64);
    }

    fn put_f32<T: ByteOrder>(&mut self, val: f32) {
        let mut buf = [0; 4];
        T::write_f32(&mut buf, val);
        self.extend_from_slice(&buf);
    }

    fn put_f64<T: ByteOrder>(&mut self, val: f64) {
        let mut buf = [0; 8];
        T::write_f64(&mut buf, val);
        self.extend_from_slice(&buf);
    }

    fn put_bytes(&mut self, val: &[u8]) {
        self.extend_from_slice(val);
    }

    fn put_str(&mut self, val: &str) {
        self.extend_from_slice(val.as_bytes());
    }

    fn put_str_nul(&mut self, val: &str) {
        self.extend_from_slice(val.as_bytes());
        self.push(0);
    }

    fn put_uint_lenenc<T: ByteOrder>(&mut self, val: Option<u64>) {
        match val {
            None => self.put_u8(0xFB),
            Some(val) if val <= 250 => self.put_u8(val as u8),
            Some(val) if val <= 0xFFFF => {
                self.put_u8(0xFC);
                self.put_u16::<T>(val as u16);
            }
            Some(val) if val <= 0xFF_FFFF => {
                self.put_u8(0xFD);
                self.put_u24::<T>(val as u32);
            }
            Some(val) => {
                self.put_u8(0xFE);
                self.put_u64::<T>(val);
            }
        }
    }

    fn put_str_lenenc<T: ByteOrder>(&mut self, val: &str) {
        self.put_bytes_lenenc::<T>(val.as_bytes());
    }

    fn put_bytes_lenenc<T: ByteOrder>(&mut self, val: &[u8]) {
        self.put_uint_lenenc::<T>(Some(val.len() as u64));
        self.put_bytes(val);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Buf;
    use byteorder::LittleEndian;

    #[test]
    fn it_round_trips_lenenc() {
        for &val in &[0u64, 1, 250, 251, 65535, 65536, 0xFF_FFFF, 0xFF_FFFF + 1, u64::MAX] {
            let mut buf = Vec::new();
            buf.put_uint_lenenc::<LittleEndian>(Some(val));

            let mut read: &[u8] = &buf;
            assert_eq!(read.get_uint_lenenc::<LittleEndian>().unwrap(), Some(val));
        }
    }

    #[test]
    fn it_round_trips_lenenc_string() {
        let mut buf = Vec::new();
        buf.put_str_lenenc::<LittleEndian>("hello world");

        let mut read: &[u8] = &buf;
        assert_eq!(
            read.get_str_lenenc::<LittleEndian>().unwrap(),
            Some("hello world")
        );
    }
}
