//! Wire types for the MySQL/MariaDB client/server protocol.
//!
//! Packets that can be decoded with no extra context implement [`crate::io::Decode`].
//! A few (`OkPacket`, column definitions under `DEPRECATE_EOF`) need the negotiated
//! [`Capabilities`] or the first header byte to disambiguate, so they expose an inherent
//! `read`/`decode_with` instead.

mod capabilities;
mod field;
mod status;
mod type_id;

pub use capabilities::Capabilities;
pub use field::FieldFlags;
pub use status::Status;
pub use type_id::TypeId;

mod auth_plugin;
mod auth_switch;
mod column_count;
mod column_def;
mod com_change_user;
mod com_init_db;
mod com_ping;
mod com_query;
mod com_quit;
mod com_reset_connection;
mod com_set_option;
mod com_stmt_close;
mod com_stmt_execute;
mod com_stmt_fetch;
mod com_stmt_prepare;
mod com_stmt_prepare_ok;
mod com_stmt_reset;
mod com_stmt_send_long_data;
mod eof;
mod err;
mod handshake;
mod handshake_response;
mod ok;
mod packet;
mod row;
mod ssl_request;

pub use auth_plugin::AuthPlugin;
pub use auth_switch::AuthSwitchRequest;
pub use column_count::ColumnCount;
pub use column_def::ColumnDefinition41;
pub use com_change_user::ComChangeUser;
pub use com_init_db::ComInitDb;
pub use com_ping::ComPing;
pub use com_query::ComQuery;
pub use com_quit::ComQuit;
pub use com_reset_connection::ComResetConnection;
pub use com_set_option::{ComSetOption, SetOption};
pub use com_stmt_close::ComStmtClose;
pub use com_stmt_execute::{null_bitmap, ComStmtExecute, CursorType, ParamType};
pub use com_stmt_fetch::ComStmtFetch;
pub use com_stmt_prepare::ComStmtPrepare;
pub use com_stmt_prepare_ok::ComStmtPrepareOk;
pub use com_stmt_reset::ComStmtReset;
pub use com_stmt_send_long_data::ComStmtSendLongData;
pub use eof::EofPacket;
pub use err::ErrPacket;
pub use handshake::HandshakeV10;
pub use handshake_response::HandshakeResponse41;
pub use ok::OkPacket;
pub use packet::{MAX_PACKET_SIZE, PACKET_HEADER_LEN};
pub use row::{BinaryRow, TextRow};
pub use ssl_request::SslRequest;

/// Command byte prefixes for `COM_*` packets.
pub mod command {
    pub const COM_QUIT: u8 = 0x01;
    pub const COM_INIT_DB: u8 = 0x02;
    pub const COM_QUERY: u8 = 0x03;
    pub const COM_PING: u8 = 0x0e;
    pub const COM_CHANGE_USER: u8 = 0x11;
    pub const COM_RESET_CONNECTION: u8 = 0x1f;
    pub const COM_STMT_PREPARE: u8 = 0x16;
    pub const COM_STMT_EXECUTE: u8 = 0x17;
    pub const COM_STMT_SEND_LONG_DATA: u8 = 0x18;
    pub const COM_STMT_CLOSE: u8 = 0x19;
    pub const COM_STMT_RESET: u8 = 0x1a;
    pub const COM_SET_OPTION: u8 = 0x1b;
    pub const COM_STMT_FETCH: u8 = 0x1c;

    pub const OK: u8 = 0x00;
    pub const ERR: u8 = 0xff;
    pub const EOF: u8 = 0xfe;
    pub const LOCAL_INFILE: u8 = 0xfb;
}
