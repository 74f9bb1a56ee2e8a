use crate::Key;

/// Errors produced while building or indexing a tree.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The input cannot be represented with nulls, strings and arrays.
    #[error("cannot build a tree node from a value of type `{type_name}`")]
    UnsupportedType {
        /// Name of the rejected input type.
        type_name: &'static str,
    },
    /// Only non-negative integer positions can address array members.
    #[error("unsupported index `{key}`; arrays are indexed by integer position only")]
    UnsupportedIndex {
        /// The offending key.
        key: Key,
    },
    /// Writing at `index` would need an array longer than memory allows.
    #[error("cannot grow an array to hold position {index}")]
    CapacityOverflow {
        /// The position that was written.
        index: usize,
    },
    /// An indexed write tried to replace the root value itself.
    #[error("the root value cannot be replaced by indexed assignment")]
    RootNotIndexable,
}
