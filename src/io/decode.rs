use crate::error::Result;

/// Implemented by every wire packet that decodes from a received payload with no extra
/// context. Packets whose framing depends on negotiated capabilities (column definitions,
/// `ERR` packets, `EOF` vs. `OK`) use an inherent `decode_with(..)` instead — see
/// `mysql::protocol`.
pub trait Decode<'de>: Sized {
    fn decode(buf: &'de [u8]) -> Result<Self>;
}
