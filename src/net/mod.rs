//! Transport: a TCP socket, optionally upgraded to TLS mid-handshake.

mod socket;
pub mod tls;

pub use socket::MaybeTlsStream;
pub use tls::{CertificateInput, TlsConfig, TlsParams};
