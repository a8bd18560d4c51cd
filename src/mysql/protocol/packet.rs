//! Packet framing constants.

/// 3-byte length + 1-byte sequence number.
pub const PACKET_HEADER_LEN: usize = 4;

/// `2^24 - 1`. Payloads at or above this size are split into chunks of exactly this many
/// bytes, terminated by a final (possibly empty) short packet.
pub const MAX_PACKET_SIZE: usize = 0xFF_FFFF;
