use std::net::Shutdown;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;

use crate::error::Error;
use crate::net::tls::TlsConfig;

/// A TCP socket, optionally upgraded to TLS mid-stream.
///
/// Upgrading replaces `Plain` with `Tls` in place; there is no third "upgrading" state
/// visible to callers because the upgrade is only ever attempted synchronously right after
/// the SSL request packet, before any username bytes are sent.
pub enum MaybeTlsStream {
    Plain(TcpStream),
    Tls(Box<TlsStream<TcpStream>>),
}

impl MaybeTlsStream {
    pub async fn connect(host: &str, port: u16) -> Result<Self, Error> {
        let stream = TcpStream::connect((host, port)).await?;
        stream.set_nodelay(true)?;

        Ok(MaybeTlsStream::Plain(stream))
    }

    pub fn is_tls(&self) -> bool {
        matches!(self, MaybeTlsStream::Tls(_))
    }

    /// Sets `SO_KEEPALIVE` plus the keepalive idle time via `socket2`, since
    /// `tokio::net::TcpStream` exposes no setter of its own. Called right after the plain TCP
    /// connect, before any TLS upgrade.
    pub fn set_keepalive(&self, keepalive: Option<std::time::Duration>) -> std::io::Result<()> {
        let Some(idle) = keepalive else { return Ok(()) };

        let raw = match self {
            MaybeTlsStream::Plain(stream) => socket2::SockRef::from(stream),
            MaybeTlsStream::Tls(stream) => socket2::SockRef::from(stream.get_ref().0),
        };

        raw.set_tcp_keepalive(&socket2::TcpKeepalive::new().with_time(idle))
    }

    /// Upgrade a plain connection to TLS. Only valid immediately after the SSL request packet,
    /// before any further bytes are sent.
    pub async fn upgrade(
        self,
        host: &str,
        server_name: Option<&str>,
        tls_config: &TlsConfig,
    ) -> Result<Self, Error> {
        let plain = match self {
            MaybeTlsStream::Plain(stream) => stream,
            MaybeTlsStream::Tls(_) => {
                return Err(Error::protocol("TLS upgrade attempted on an already-upgraded stream"))
            }
        };

        let client_config = super::tls::client_config(tls_config).await?;
        let connector = TlsConnector::from(client_config);

        let name = server_name.unwrap_or(host);
        let server_name = rustls::pki_types::ServerName::try_from(name.to_string())
            .map_err(|e| Error::tls(e))?;

        let stream = connector
            .connect(server_name, plain)
            .await
            .map_err(Error::Io)?;

        Ok(MaybeTlsStream::Tls(Box::new(stream)))
    }

    pub fn shutdown(&self) -> std::io::Result<()> {
        match self {
            MaybeTlsStream::Plain(stream) => stream.shutdown(Shutdown::Both),
            MaybeTlsStream::Tls(stream) => stream.get_ref().0.shutdown(Shutdown::Both),
        }
    }
}

impl AsyncRead for MaybeTlsStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            MaybeTlsStream::Plain(stream) => Pin::new(stream).poll_read(cx, buf),
            MaybeTlsStream::Tls(stream) => Pin::new(stream.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for MaybeTlsStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        match self.get_mut() {
            MaybeTlsStream::Plain(stream) => Pin::new(stream).poll_write(cx, buf),
            MaybeTlsStream::Tls(stream) => Pin::new(stream.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            MaybeTlsStream::Plain(stream) => Pin::new(stream).poll_flush(cx),
            MaybeTlsStream::Tls(stream) => Pin::new(stream.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            MaybeTlsStream::Plain(stream) => Pin::new(stream).poll_shutdown(cx),
            MaybeTlsStream::Tls(stream) => Pin::new(stream.as_mut()).poll_shutdown(cx),
        }
    }
}
