//! The typed value codec: a closed pair of tagged-variant codec tables keyed
//! by the MySQL column-type byte. This crate is MySQL-only, so the codec traits are concrete
//! rather than generic over a `Database` associated type the way a multi-backend client would
//! need.

use std::fmt;

use crate::error::Error;
use crate::mysql::column::MySqlColumn;
use crate::mysql::protocol::TypeId;

/// Whether a value arrived through the text protocol (`COM_QUERY` rows: length-encoded
/// strings) or the binary protocol (`COM_STMT_EXECUTE` rows: per-type wire encoding).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MySqlValueFormat {
    Text,
    Binary,
}

/// A borrowed reference to one column's raw wire bytes plus enough metadata to decode it.
#[derive(Clone, Copy)]
pub struct MySqlValueRef<'r> {
    pub(crate) format: MySqlValueFormat,
    pub(crate) column: &'r MySqlColumn,
    pub(crate) bytes: Option<&'r [u8]>,
}

impl<'r> MySqlValueRef<'r> {
    pub fn format(&self) -> MySqlValueFormat {
        self.format
    }

    /// For the binary protocol, variable-length columns (strings, blobs, `DECIMAL`, temporal
    /// types) carry their own length prefix inside the row's byte range.
    /// This strips that prefix so type decoders see only the payload, in both formats alike.
    pub(crate) fn variable_length_bytes(&self) -> Result<&'r [u8], BoxDynError> {
        let bytes = self.bytes()?;

        match self.format {
            MySqlValueFormat::Text => Ok(bytes),
            MySqlValueFormat::Binary => {
                use byteorder::LittleEndian;
                use crate::io::Buf;

                let mut cursor = bytes;
                let len = cursor.get_uint_lenenc::<LittleEndian>()?.unwrap_or(0) as usize;
                Ok(cursor.get_bytes(len)?)
            }
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.column.type_id()
    }

    pub fn column(&self) -> &MySqlColumn {
        self.column
    }

    pub fn is_null(&self) -> bool {
        self.bytes.is_none()
    }

    /// The raw bytes backing this value, or an error if it is `NULL`
    /// ([`Decode`] impls for `Option<T>` handle the null case themselves instead of calling
    /// this).
    pub fn bytes(&self) -> crate::error::Result<&'r [u8]> {
        self.bytes.ok_or_else(|| {
            Error::ColumnDecode {
                index: self.column.name().into(),
                source: Box::new(UnexpectedNullError),
            }
        })
    }
}

#[derive(Debug)]
pub(crate) struct UnexpectedNullError;

impl fmt::Display for UnexpectedNullError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unexpected NULL; try decoding as an `Option`")
    }
}

impl std::error::Error for UnexpectedNullError {}

pub type BoxDynError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Decodes one column's wire bytes into an application value.
pub trait Decode<'r>: Sized {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, BoxDynError>;
}

impl<'r, T> Decode<'r> for Option<T>
where
    T: Decode<'r>,
{
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, BoxDynError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::decode(value).map(Some)
        }
    }
}

/// Encodes a bound parameter value for `COM_STMT_EXECUTE`.
///
/// `encode` writes the binary-protocol representation and returns the wire type byte and
/// unsigned-ness used in the parameter type-tag pair; `NULL` values never call `encode` -- the
/// caller sets the bit in the NULL bitmap instead and skips the value entirely.
pub trait Encode {
    fn encode(&self, buf: &mut Vec<u8>);

    fn type_id(&self) -> TypeId;

    fn is_unsigned(&self) -> bool {
        false
    }

    fn is_null(&self) -> bool {
        false
    }
}

impl<T> Encode for Option<T>
where
    T: Encode,
{
    fn encode(&self, buf: &mut Vec<u8>) {
        if let Some(value) = self {
            value.encode(buf);
        }
    }

    fn type_id(&self) -> TypeId {
        match self {
            Some(value) => value.type_id(),
            None => TypeId::NULL,
        }
    }

    fn is_unsigned(&self) -> bool {
        self.as_ref().map(Encode::is_unsigned).unwrap_or(false)
    }

    fn is_null(&self) -> bool {
        self.is_none()
    }
}

impl<T> Encode for &T
where
    T: Encode,
{
    fn encode(&self, buf: &mut Vec<u8>) {
        (*self).encode(buf)
    }

    fn type_id(&self) -> TypeId {
        (*self).type_id()
    }

    fn is_unsigned(&self) -> bool {
        (*self).is_unsigned()
    }

    fn is_null(&self) -> bool {
        (*self).is_null()
    }
}
