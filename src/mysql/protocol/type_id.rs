/// The MySQL binary-protocol column type byte.
///
/// https://dev.mysql.com/doc/dev/mysql-server/latest/page_protocol_basic_dt_integers.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub u8);

impl TypeId {
    pub const DECIMAL: TypeId = TypeId(0x00);
    pub const TINY: TypeId = TypeId(0x01);
    pub const SHORT: TypeId = TypeId(0x02);
    pub const LONG: TypeId = TypeId(0x03);
    pub const FLOAT: TypeId = TypeId(0x04);
    pub const DOUBLE: TypeId = TypeId(0x05);
    pub const NULL: TypeId = TypeId(0x06);
    pub const TIMESTAMP: TypeId = TypeId(0x07);
    pub const LONGLONG: TypeId = TypeId(0x08);
    pub const INT24: TypeId = TypeId(0x09);
    pub const DATE: TypeId = TypeId(0x0a);
    pub const TIME: TypeId = TypeId(0x0b);
    pub const DATETIME: TypeId = TypeId(0x0c);
    pub const YEAR: TypeId = TypeId(0x0d);
    pub const NEWDATE: TypeId = TypeId(0x0e);
    pub const VARCHAR: TypeId = TypeId(0x0f);
    pub const BIT: TypeId = TypeId(0x10);
    pub const TIMESTAMP2: TypeId = TypeId(0x11);
    pub const DATETIME2: TypeId = TypeId(0x12);
    pub const TIME2: TypeId = TypeId(0x13);
    pub const JSON: TypeId = TypeId(0xf5);
    pub const NEWDECIMAL: TypeId = TypeId(0xf6);
    pub const ENUM: TypeId = TypeId(0xf7);
    pub const SET: TypeId = TypeId(0xf8);
    pub const TINY_BLOB: TypeId = TypeId(0xf9);
    pub const MEDIUM_BLOB: TypeId = TypeId(0xfa);
    pub const LONG_BLOB: TypeId = TypeId(0xfb);
    pub const BLOB: TypeId = TypeId(0xfc);
    pub const VAR_STRING: TypeId = TypeId(0xfd);
    pub const STRING: TypeId = TypeId(0xfe);
    pub const GEOMETRY: TypeId = TypeId(0xff);

    pub fn name(self) -> &'static str {
        match self {
            Self::DECIMAL | Self::NEWDECIMAL => "DECIMAL",
            Self::TINY => "TINYINT",
            Self::SHORT => "SMALLINT",
            Self::LONG => "INT",
            Self::FLOAT => "FLOAT",
            Self::DOUBLE => "DOUBLE",
            Self::NULL => "NULL",
            Self::TIMESTAMP | Self::TIMESTAMP2 => "TIMESTAMP",
            Self::LONGLONG => "BIGINT",
            Self::INT24 => "MEDIUMINT",
            Self::DATE | Self::NEWDATE => "DATE",
            Self::TIME | Self::TIME2 => "TIME",
            Self::DATETIME | Self::DATETIME2 => "DATETIME",
            Self::YEAR => "YEAR",
            Self::VARCHAR | Self::VAR_STRING => "VARCHAR",
            Self::BIT => "BIT",
            Self::JSON => "JSON",
            Self::ENUM => "ENUM",
            Self::SET => "SET",
            Self::TINY_BLOB => "TINYBLOB",
            Self::MEDIUM_BLOB => "MEDIUMBLOB",
            Self::LONG_BLOB => "LONGBLOB",
            Self::BLOB => "BLOB",
            Self::STRING => "CHAR",
            Self::GEOMETRY => "GEOMETRY",
            _ => "UNKNOWN",
        }
    }
}
