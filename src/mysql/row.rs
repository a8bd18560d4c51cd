//! `Row`: a decoded row's column slices, exposed through a cursor-free accessor
//! API.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::mysql::column::MySqlColumn;
use crate::mysql::protocol::{BinaryRow, TextRow, TypeId};
use crate::mysql::value::{Decode, MySqlValueFormat, MySqlValueRef};

enum RowData {
    Text(TextRow),
    Binary(BinaryRow),
}

/// One decoded row: either the text-protocol or binary-protocol shape,
/// decoded on demand and discarded when the result set is closed.
pub struct MySqlRow {
    data: RowData,
    columns: Arc<[MySqlColumn]>,
}

impl MySqlRow {
    pub(crate) fn from_text(buf: &[u8], columns: Arc<[MySqlColumn]>) -> Result<Self> {
        let row = TextRow::decode(buf, columns.len())?;
        Ok(Self {
            data: RowData::Text(row),
            columns,
        })
    }

    pub(crate) fn from_binary(buf: &[u8], columns: Arc<[MySqlColumn]>, types: &[TypeId]) -> Result<Self> {
        let row = BinaryRow::decode(buf, types)?;
        Ok(Self {
            data: RowData::Binary(row),
            columns,
        })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[MySqlColumn] {
        &self.columns
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| Error::ColumnNotFound(name.into()))
    }

    fn raw_at(&self, index: usize) -> Result<MySqlValueRef<'_>> {
        if index >= self.columns.len() {
            return Err(Error::ColumnIndexOutOfBounds {
                index,
                len: self.columns.len(),
            });
        }

        let (bytes, format) = match &self.data {
            RowData::Text(row) => (row.get(index), MySqlValueFormat::Text),
            RowData::Binary(row) => (row.get(index), MySqlValueFormat::Binary),
        };

        Ok(MySqlValueRef {
            format,
            column: &self.columns[index],
            bytes,
        })
    }

    /// `was_null()` is exposed indirectly: decoding into `Option<T>` is how callers observe
    /// NULL-ness per column; this is the zero-indexed
    /// raw accessor every typed getter funnels through.
    pub fn is_null(&self, index: usize) -> Result<bool> {
        Ok(self.raw_at(index)?.is_null())
    }

    /// Decodes column `index` (0-based) as `T`.
    pub fn try_get<'r, T>(&'r self, index: usize) -> Result<T>
    where
        T: Decode<'r>,
    {
        let raw = self.raw_at(index)?;
        let column_name = raw.column().name().to_owned();

        T::decode(raw).map_err(|source| Error::ColumnDecode {
            index: column_name.into_boxed_str(),
            source,
        })
    }

    /// Decodes the column named `name`.
    pub fn try_get_by_name<'r, T>(&'r self, name: &str) -> Result<T>
    where
        T: Decode<'r>,
    {
        self.try_get(self.index_of(name)?)
    }

    /// Panicking convenience wrapper over [`Self::try_get`] for callers that want to `unwrap`
    /// at the call site instead of threading `?` through.
    pub fn get<'r, T>(&'r self, index: usize) -> T
    where
        T: Decode<'r>,
    {
        self.try_get(index).unwrap_or_else(|e| panic!("{e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mysql::protocol::{ColumnDefinition41, FieldFlags};

    fn columns() -> Arc<[MySqlColumn]> {
        let def = ColumnDefinition41 {
            catalog: "def".into(),
            schema: "".into(),
            table: "city".into(),
            org_table: "city".into(),
            name: "Name".into(),
            org_name: "Name".into(),
            char_set: 45,
            column_length: 35,
            column_type: TypeId::VAR_STRING,
            flags: FieldFlags::empty(),
            decimals: 0,
        };

        Arc::from(vec![MySqlColumn::from_definition(0, def)])
    }

    #[test]
    fn it_decodes_a_text_row_by_name() {
        let columns = columns();
        let mut buf = Vec::new();
        buf.push(5);
        buf.extend_from_slice(b"Kabul");

        let row = MySqlRow::from_text(&buf, columns).unwrap();
        let name: String = row.try_get_by_name("Name").unwrap();
        assert_eq!(name, "Kabul");
    }

    #[test]
    fn it_reports_column_not_found() {
        let columns = columns();
        let buf = vec![0xFB];
        let row = MySqlRow::from_text(&buf, columns).unwrap();

        assert!(matches!(
            row.try_get_by_name::<String>("Missing"),
            Err(Error::ColumnNotFound(_))
        ));
    }
}
