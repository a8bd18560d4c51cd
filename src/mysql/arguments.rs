//! The parameter-binding buffer shared by the text and binary execution paths.

use crate::mysql::protocol::{null_bitmap, ParamType, TypeId};
use crate::mysql::value::Encode;

pub(crate) struct BoundValue {
    pub(crate) type_id: TypeId,
    pub(crate) is_unsigned: bool,
    pub(crate) is_null: bool,
    pub(crate) bytes: Vec<u8>,
    /// `true` once this position has been streamed via `COM_STMT_SEND_LONG_DATA`: the value
    /// still gets a type tag (if types are being sent) and a clear NULL bit, but its bytes are
    /// already on the server and must not also be inlined into `COM_STMT_EXECUTE`'s parameter
    /// buffer.
    pub(crate) long_data: bool,
}

/// One execution's worth of bound parameters.
///
/// Parameters are positional and 1-based at the public API, matching JDBC-style prepared
/// statement binding; internally everything is stored 0-based.
#[derive(Default)]
pub struct MySqlArguments {
    pub(crate) values: Vec<Option<BoundValue>>,
}

impl MySqlArguments {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_len(&mut self, index: usize) {
        if self.values.len() <= index {
            self.values.resize_with(index + 1, || None);
        }
    }

    /// `set_<type>(index1based, value)`: `index` here is 1-based, matching the
    /// public contract.
    pub fn set<T: Encode>(&mut self, index1based: usize, value: T) {
        assert!(index1based >= 1, "parameter indices are 1-based");
        let index = index1based - 1;
        self.ensure_len(index);

        if value.is_null() {
            self.values[index] = Some(BoundValue {
                type_id: TypeId::NULL,
                is_unsigned: false,
                is_null: true,
                bytes: Vec::new(),
                long_data: false,
            });
            return;
        }

        let mut bytes = Vec::new();
        value.encode(&mut bytes);

        self.values[index] = Some(BoundValue {
            type_id: value.type_id(),
            is_unsigned: value.is_unsigned(),
            is_null: false,
            bytes,
            long_data: false,
        });
    }

    pub fn set_null(&mut self, index1based: usize) {
        assert!(index1based >= 1, "parameter indices are 1-based");
        let index = index1based - 1;
        self.ensure_len(index);

        self.values[index] = Some(BoundValue {
            type_id: TypeId::NULL,
            is_unsigned: false,
            is_null: true,
            bytes: Vec::new(),
            long_data: false,
        });
    }

    /// Marks parameter `index1based` as supplied out-of-band via `COM_STMT_SEND_LONG_DATA`:
    /// it still gets a `type_id` tag and a clear NULL bit, but contributes no bytes of its own
    /// to [`Self::encode_for_execute`]'s parameter buffer.
    pub(crate) fn mark_long_data(&mut self, index1based: usize, type_id: TypeId) {
        assert!(index1based >= 1, "parameter indices are 1-based");
        let index = index1based - 1;
        self.ensure_len(index);

        self.values[index] = Some(BoundValue {
            type_id,
            is_unsigned: false,
            is_null: false,
            bytes: Vec::new(),
            long_data: true,
        });
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Computes the NULL bitmap, parameter type tags (if `send_types`), and the concatenated
    /// parameter value bytes for `COM_STMT_EXECUTE`.
    pub(crate) fn encode_for_execute(&self, send_types: bool) -> (Vec<u8>, Option<Vec<ParamType>>, Vec<u8>) {
        let bitmap = null_bitmap(
            self.values.iter().map(|v| v.as_ref().map(|b| b.is_null).unwrap_or(true)),
        );

        let param_types = send_types.then(|| {
            self.values
                .iter()
                .map(|v| match v {
                    Some(b) => ParamType {
                        type_id: b.type_id,
                        is_unsigned: b.is_unsigned,
                    },
                    None => ParamType {
                        type_id: TypeId::NULL,
                        is_unsigned: false,
                    },
                })
                .collect()
        });

        let mut params = Vec::new();
        for value in self.values.iter().flatten() {
            if !value.is_null && !value.long_data {
                params.extend_from_slice(&value.bytes);
            }
        }

        (bitmap, param_types, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_data_params_contribute_a_type_tag_but_no_inline_bytes() {
        let mut args = MySqlArguments::new();
        args.set(1, 7i32);
        args.mark_long_data(2, TypeId::BLOB);

        let (bitmap, param_types, params) = args.encode_for_execute(true);

        assert_eq!(bitmap, vec![0b0000_0000]);
        let types = param_types.unwrap();
        assert_eq!(types[1].type_id, TypeId::BLOB);
        assert_eq!(params, 7i32.to_le_bytes());
    }

    #[test]
    fn string_params_are_length_encoded_on_the_wire() {
        let mut args = MySqlArguments::new();
        args.set(1, "hello".to_string());

        let (_bitmap, _param_types, params) = args.encode_for_execute(true);

        let mut expected = vec![5u8];
        expected.extend_from_slice(b"hello");
        assert_eq!(params, expected);
    }

    #[test]
    fn blob_params_are_length_encoded_on_the_wire() {
        let mut args = MySqlArguments::new();
        args.set(1, vec![0xDEu8, 0xAD, 0xBE, 0xEF]);

        let (_bitmap, _param_types, params) = args.encode_for_execute(true);

        let mut expected = vec![4u8];
        expected.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(params, expected);
    }
}
