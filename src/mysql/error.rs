//! The server-reported half of the error taxonomy.

use std::fmt;

use crate::mysql::protocol::ErrPacket;

/// An `ERR` packet, carried verbatim as [`crate::error::Error::Database`].
///
/// Recoverable: receiving one does not poison the connection.
#[derive(Debug, Clone)]
pub struct MySqlDatabaseError {
    pub(crate) code: u16,
    pub(crate) sqlstate: Box<str>,
    pub(crate) message: Box<str>,
}

impl MySqlDatabaseError {
    pub(crate) fn from_err_packet(packet: ErrPacket) -> Self {
        Self {
            code: packet.error_code,
            sqlstate: packet.sql_state,
            message: packet.error_message,
        }
    }

    /// The numeric `vendor_code`, e.g. `1045` for access-denied.
    pub fn vendor_code(&self) -> u16 {
        self.code
    }

    /// The five-character SQLSTATE, e.g. `"42000"`.
    pub fn sqlstate(&self) -> &str {
        &self.sqlstate
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// `true` for the handful of SQLSTATE classes that are transient (e.g. deadlock victim,
    /// lock wait timeout) -- informational only, the session layer still never retries on its
    /// own.
    pub fn is_deadlock(&self) -> bool {
        self.code == 1213 || self.code == 1205
    }
}

impl fmt::Display for MySqlDatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.code, self.sqlstate, self.message)
    }
}

impl std::error::Error for MySqlDatabaseError {}
