//! Byte-level primitives shared by the packet codec and the typed value codec.

mod buf;
mod buf_mut;
mod decode;
mod encode;

pub use buf::Buf;
pub use buf_mut::BufMut;
pub use decode::Decode;
pub use encode::Encode;
