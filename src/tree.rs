use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use log::debug;

use crate::raw::{Location, RawTree};
use crate::{Error, IntoValue, Key, Value};

mod cursor;

pub use cursor::{Children, Cursor, CursorMut};

/// Builds a tree from `input`.
///
/// Arrays become a [`Tree`] holding a deep copy of the input. Top-level nulls
/// and strings are returned as plain values: only containers have positions
/// that can grow.
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] if `input` contains anything other than
/// nulls, strings and ordered collections.
///
/// # Examples
///
/// ```
/// use autoviv::{Root, create};
///
/// assert_eq!(create(()).unwrap(), Root::Null);
/// assert_eq!(create("test").unwrap(), "test");
///
/// let tree = create(vec![Some("a"), None]).unwrap().into_tree().unwrap();
/// assert_eq!(tree.to_string(), r#"["a", null]"#);
/// ```
pub fn create(input: impl IntoValue) -> Result<Root, Error> {
    Ok(match input.into_value()? {
        Value::Null => Root::Null,
        Value::String(text) => Root::String(text),
        Value::Array(items) => {
            debug!("creating tree with {} top-level item(s)", items.len());
            Root::Array(Tree {
                raw: RawTree::from_items(items),
            })
        }
    })
}

/// What [`create`] returns: a bare primitive or an indexable tree.
#[derive(Clone, Eq, PartialEq)]
pub enum Root {
    /// A top-level null.
    Null,
    /// A top-level string.
    String(String),
    /// A top-level array, the only root that can be indexed.
    Array(Tree),
}

impl Root {
    /// `true` if the root is a null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Root::Null)
    }

    /// The string, if the root is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Root::String(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// The tree, if the root is an array.
    ///
    /// ```
    /// use autoviv::create;
    ///
    /// assert_eq!(create(["a"]).unwrap().as_tree().map(|tree| tree.len()), Some(1));
    /// assert!(create("a").unwrap().as_tree().is_none());
    /// ```
    #[must_use]
    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Root::Array(tree) => Some(tree),
            _ => None,
        }
    }

    /// Mutable access to the tree, if the root is an array.
    #[must_use]
    pub fn as_tree_mut(&mut self) -> Option<&mut Tree> {
        match self {
            Root::Array(tree) => Some(tree),
            _ => None,
        }
    }

    /// Unwraps the tree, if the root is an array.
    #[must_use]
    pub fn into_tree(self) -> Option<Tree> {
        match self {
            Root::Array(tree) => Some(tree),
            _ => None,
        }
    }

    /// Reads `self[key]`. See [`Tree::get`].
    ///
    /// # Errors
    ///
    /// [`Error::RootNotIndexable`] if the root is a null or a string, otherwise
    /// as [`Tree::get`].
    pub fn get(&self, key: impl Into<Key>) -> Result<Cursor<'_>, Error> {
        self.as_tree().ok_or(Error::RootNotIndexable)?.get(key)
    }

    /// Writes `self[key] = value`. See [`Tree::set`].
    ///
    /// # Errors
    ///
    /// [`Error::RootNotIndexable`] if the root is a null or a string: its shape
    /// is fixed at creation. Otherwise as [`Tree::set`].
    pub fn set(&mut self, key: impl Into<Key>, value: impl IntoValue) -> Result<(), Error> {
        self.as_tree_mut().ok_or(Error::RootNotIndexable)?.set(key, value)
    }
}

impl fmt::Debug for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Root::Null => f.write_str("null"),
            Root::String(text) => write!(f, "{text:?}"),
            Root::Array(tree) => fmt::Debug::fmt(tree, f),
        }
    }
}

impl PartialEq<str> for Root {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Root {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl IntoValue for &Root {
    fn into_value(self) -> Result<Value, Error> {
        Ok(match self {
            Root::Null => Value::Null,
            Root::String(text) => Value::String(text.clone()),
            Root::Array(tree) => tree.to_value(),
        })
    }
}

/// The kind of location a cursor points at.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Kind {
    /// A stored null.
    Null,
    /// A stored string.
    String,
    /// A nested array, or the root.
    Array,
    /// Nothing is stored here yet.
    Placeholder,
}

/// A mutable, auto-vivifying array tree.
///
/// Reading past the end of an array yields a placeholder cursor and leaves the
/// tree alone. Writing through a placeholder creates every missing array on
/// its path, null-padding each array it extends.
///
/// # Examples
///
/// ```
/// use autoviv::create;
///
/// let mut tree = create(Vec::<String>::new()).unwrap().into_tree().unwrap();
/// tree.get_mut(1)?.get(0)?.set(2, "deep")?;
/// assert_eq!(tree.to_string(), r#"[null, [[null, null, "deep"]]]"#);
///
/// // Reads never grow the tree.
/// assert!(tree.get(9)?.get(9)?.is_placeholder());
/// assert_eq!(tree.len(), 2);
/// # Ok::<(), autoviv::Error>(())
/// ```
#[derive(Clone)]
pub struct Tree {
    raw: RawTree,
}

impl Tree {
    /// Number of members of the root array.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.node(self.raw.root()).len()
    }

    /// `true` if the root array has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cursor at the root array.
    #[must_use]
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.raw, Location::Array(self.raw.root()))
    }

    /// Writable cursor at the root array.
    pub fn cursor_mut(&mut self) -> CursorMut<'_> {
        let root = self.raw.root();
        CursorMut::new(&mut self.raw, Location::Array(root))
    }

    /// Reads `self[key]` without modifying the tree.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedIndex`] if `key` is not an integer position.
    pub fn get(&self, key: impl Into<Key>) -> Result<Cursor<'_>, Error> {
        self.cursor().get(key)
    }

    /// Like [`get`](Self::get), but the resulting cursor can write.
    ///
    /// Obtaining the cursor does not modify the tree; only writes through it do.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedIndex`] if `key` is not an integer position.
    pub fn get_mut(&mut self, key: impl Into<Key>) -> Result<CursorMut<'_>, Error> {
        self.cursor_mut().get(key)
    }

    /// Writes a deep copy of `value` at `self[key]`, padding with nulls.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedType`] if `value` cannot be represented,
    /// [`Error::UnsupportedIndex`] if `key` is not an integer position and
    /// [`Error::CapacityOverflow`] if the root array cannot grow to hold `key`.
    /// The tree is unchanged on error.
    ///
    /// ```
    /// use autoviv::{Error, create};
    ///
    /// let mut tree = create(["a"])?.into_tree().unwrap();
    /// assert_eq!(tree.set(usize::MAX, "b"), Err(Error::CapacityOverflow { index: usize::MAX }));
    /// assert_eq!(tree.to_string(), r#"["a"]"#);
    /// # Ok::<(), autoviv::Error>(())
    /// ```
    pub fn set(&mut self, key: impl Into<Key>, value: impl IntoValue) -> Result<(), Error> {
        self.cursor_mut().set(key, value)
    }

    /// Cursors over the root array's members.
    pub fn iter(&self) -> Children<'_> {
        self.cursor().iter()
    }

    /// Deep copy of the tree as a [`Value`].
    #[must_use]
    pub fn to_value(&self) -> Value {
        self.raw.array_value(self.raw.root())
    }

    #[cfg(test)]
    pub(crate) fn raw(&self) -> &RawTree {
        &self.raw
    }
}

/// Renders the bracketed form, e.g. `["a", [], null]`.
impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.raw.write_array(self.raw.root(), f)
    }
}

/// Renders the tree as the call that recreates it, e.g.
/// `autoviv::create(["a", [], null])`.
impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "autoviv::create({self})")
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.raw.array_eq(self.raw.root(), &other.raw, other.raw.root())
    }
}

impl Eq for Tree {}

impl PartialEq<Value> for Tree {
    fn eq(&self, other: &Value) -> bool {
        self.to_value() == *other
    }
}

impl IntoValue for &Tree {
    fn into_value(self) -> Result<Value, Error> {
        Ok(self.to_value())
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = Cursor<'a>;
    type IntoIter = Children<'a>;

    fn into_iter(self) -> Children<'a> {
        self.iter()
    }
}

impl TryFrom<Value> for Tree {
    type Error = Error;

    /// Wraps an array value. Any other value is a root primitive, which cannot
    /// be indexed.
    fn try_from(value: Value) -> Result<Self, Error> {
        create(value)?.into_tree().ok_or(Error::RootNotIndexable)
    }
}

impl From<Tree> for Vec<Value> {
    fn from(tree: Tree) -> Self {
        match tree.to_value() {
            Value::Array(items) => items,
            Value::Null | Value::String(_) => unreachable!("a tree root is always an array"),
        }
    }
}
