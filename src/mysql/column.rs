//! Result-set column metadata surviving past row-decode dispatch.

use crate::mysql::protocol::{ColumnDefinition41, FieldFlags, TypeId};

/// One column of a result set's metadata, derived from the wire
/// [`ColumnDefinition41`](crate::mysql::protocol::ColumnDefinition41).
#[derive(Debug, Clone)]
pub struct MySqlColumn {
    pub(crate) ordinal: usize,
    pub(crate) name: Box<str>,
    pub(crate) type_id: TypeId,
    pub(crate) flags: FieldFlags,
    pub(crate) char_set: u16,
    pub(crate) column_length: u32,
    pub(crate) decimals: u8,
}

impl MySqlColumn {
    pub(crate) fn from_definition(ordinal: usize, def: ColumnDefinition41) -> Self {
        Self {
            ordinal,
            name: def.name,
            type_id: def.column_type,
            flags: def.flags,
            char_set: def.char_set,
            column_length: def.column_length,
            decimals: def.decimals,
        }
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn column_type_name(&self) -> &'static str {
        self.type_id.name()
    }

    pub fn is_nullable(&self) -> bool {
        !self.flags.contains(FieldFlags::NOT_NULL)
    }

    pub fn is_unsigned(&self) -> bool {
        self.flags.contains(FieldFlags::UNSIGNED)
    }

    pub fn is_primary_key(&self) -> bool {
        self.flags.contains(FieldFlags::PRIMARY_KEY)
    }

    pub fn is_auto_increment(&self) -> bool {
        self.flags.contains(FieldFlags::AUTO_INCREMENT)
    }

    /// `63` is the binary/"unknown" charset used for `BINARY`/`VARBINARY`/`BLOB` columns;
    /// everything else is text and should honour the charset when decoding to a Rust
    /// `String`.
    pub fn is_binary(&self) -> bool {
        self.char_set == 63
    }

    pub fn char_set(&self) -> u16 {
        self.char_set
    }

    pub fn column_length(&self) -> u32 {
        self.column_length
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }
}
