//! The MySQL/MariaDB protocol implementation: wire codec, authentication,
//! session/connection state machine, prepared statements, and the typed value codec.

pub mod protocol;

mod arguments;
mod auth;
mod column;
mod connection;
mod error;
mod options;
mod row;
mod statement;
mod stream;
mod transaction;
mod types;
mod value;

pub use arguments::MySqlArguments;
pub use column::MySqlColumn;
pub use connection::{connect, MySqlConnection, MySqlResultSet, MySqlResultStep};
pub use error::MySqlDatabaseError;
pub use options::{IsolationLevel, MySqlConnectOptions, SslMode};
pub use row::MySqlRow;
pub use statement::MySqlStatement;
pub use transaction::Savepoint;
pub use value::{Decode, Encode, MySqlValueFormat, MySqlValueRef};
