bitflags::bitflags! {
    /// `CapabilityFlags`: negotiated bitwise AND of client-requested and server-advertised
    /// flags. https://dev.mysql.com/doc/dev/mysql-server/latest/group__group__cs__capabilities__flags.html
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Capabilities: u64 {
        const LONG_PASSWORD                  = 1;
        const FOUND_ROWS                     = 1 << 1;
        const LONG_FLAG                      = 1 << 2;
        const CONNECT_WITH_DB                = 1 << 3;
        const NO_SCHEMA                      = 1 << 4;
        const COMPRESS                       = 1 << 5;
        const ODBC                           = 1 << 6;
        const LOCAL_FILES                    = 1 << 7;
        const IGNORE_SPACE                   = 1 << 8;
        const PROTOCOL_41                    = 1 << 9;
        const INTERACTIVE                    = 1 << 10;
        const SSL                            = 1 << 11;
        const IGNORE_SIGPIPE                 = 1 << 12;
        const TRANSACTIONS                   = 1 << 13;
        const RESERVED                       = 1 << 14;
        const SECURE_CONNECTION              = 1 << 15;
        const MULTI_STATEMENTS               = 1 << 16;
        const MULTI_RESULTS                  = 1 << 17;
        const PS_MULTI_RESULTS               = 1 << 18;
        const PLUGIN_AUTH                    = 1 << 19;
        const CONNECT_ATTRS                  = 1 << 20;
        const PLUGIN_AUTH_LENENC_DATA        = 1 << 21;
        const CAN_HANDLE_EXPIRED_PASSWORDS   = 1 << 22;
        const SESSION_TRACK                  = 1 << 23;
        const DEPRECATE_EOF                  = 1 << 24;
        const OPTIONAL_RESULTSET_METADATA    = 1 << 25;
        const ZSTD_COMPRESSION_ALGORITHM     = 1 << 26;
        const CLIENT_QUERY_ATTRIBUTES        = 1 << 27;
        const MULTI_FACTOR_AUTHENTICATION    = 1 << 28;
        const CAPABILITY_EXTENSION           = 1 << 29;
        const SSL_VERIFY_SERVER_CERT         = 1 << 30;
        const REMEMBER_OPTIONS                = 1 << 31;
        // MariaDB-only, seen set in the upper (capability_flags_3) word on some servers.
        const MYSQL                           = 1 << 32;
    }
}

impl Capabilities {
    /// The flags this client always asks for, independent of
    /// what an individual connection additionally wants (e.g. `CONNECT_WITH_DB`, `SSL`).
    pub fn required() -> Capabilities {
        Capabilities::PROTOCOL_41
            | Capabilities::SECURE_CONNECTION
            | Capabilities::PLUGIN_AUTH
            | Capabilities::DEPRECATE_EOF
            | Capabilities::LONG_PASSWORD
            | Capabilities::LONG_FLAG
            | Capabilities::TRANSACTIONS
            | Capabilities::MULTI_RESULTS
    }
}
