use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

use super::Kind;
use crate::raw::{Handle, Location, RawTree, Slot};
use crate::{Error, IntoValue, Key, Value};

fn slot_location(parent: Handle, key: usize, slot: &Slot) -> Location {
    match *slot {
        Slot::Array(handle) => Location::Array(handle),
        Slot::Null | Slot::String(_) => Location::Leaf { parent, key },
    }
}

/// A read-only position in a [`Tree`](crate::Tree).
///
/// The position may be a placeholder: a path that does not exist yet. Reading
/// through a placeholder yields deeper placeholders; nothing is ever created.
#[derive(Clone)]
pub struct Cursor<'a> {
    raw: &'a RawTree,
    location: Location,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(raw: &'a RawTree, location: Location) -> Self {
        Self { raw, location }
    }

    /// Reads `self[key]`.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedIndex`] if this cursor is at an array and `key` is
    /// not an integer position. Keys below leaves and placeholders are only
    /// checked when something is written through them.
    pub fn get(&self, key: impl Into<Key>) -> Result<Cursor<'a>, Error> {
        let location = self.location.clone().child(self.raw, key.into())?;
        Ok(Cursor::new(self.raw, location))
    }

    fn slot(&self) -> Option<&'a Slot> {
        match self.location {
            Location::Leaf { parent, key } => self.raw.node(parent).child(key),
            Location::Array(_) | Location::Vacant { .. } => None,
        }
    }

    /// What is stored here, or [`Kind::Placeholder`] if nothing is yet.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match (&self.location, self.slot()) {
            (Location::Array(_), _) => Kind::Array,
            (Location::Vacant { .. }, _) => Kind::Placeholder,
            (Location::Leaf { .. }, Some(Slot::String(_))) => Kind::String,
            (Location::Leaf { .. }, _) => Kind::Null,
        }
    }

    /// `true` for a stored null. A placeholder is not null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.kind() == Kind::Null
    }

    /// `true` for a stored array, the root included.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.kind() == Kind::Array
    }

    /// `true` if nothing exists at this location yet.
    ///
    /// ```
    /// use autoviv::create;
    ///
    /// let tree = create(["a"])?.into_tree().unwrap();
    /// assert!(!tree.get(0)?.is_placeholder());
    /// assert!(tree.get(1)?.is_placeholder());
    /// assert!(tree.get(0)?.get(0)?.is_placeholder());
    /// # Ok::<(), autoviv::Error>(())
    /// ```
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.kind() == Kind::Placeholder
    }

    /// The stored string, if this location holds one.
    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        match self.slot() {
            Some(Slot::String(text)) => Some(&**text),
            _ => None,
        }
    }

    /// Number of members, if this cursor is at an array.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self.location {
            Location::Array(handle) => Some(self.raw.node(handle).len()),
            _ => None,
        }
    }

    /// `true` unless this cursor is at an array with at least one member.
    ///
    /// Leaves and placeholders have no members, so they count as empty even
    /// though [`len`](Self::len) returns `None` for them.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len().is_none_or(|len| len == 0)
    }

    /// Position of this location inside its parent array, or `None` for the
    /// root and for placeholders recorded with a non-integer key.
    #[must_use]
    pub fn key(&self) -> Option<usize> {
        match &self.location {
            Location::Array(handle) => self.raw.node(*handle).link().map(|link| link.key),
            Location::Leaf { key, .. } => Some(*key),
            Location::Vacant { path, .. } => path.last().and_then(|key| key.position().ok()),
        }
    }

    /// Keys leading from the root to this location.
    #[must_use]
    pub fn path(&self) -> Vec<Key> {
        let prefix = |handle: Handle| self.raw.path_to(handle).into_iter().map(Key::Index);
        match &self.location {
            Location::Array(handle) => prefix(*handle).collect(),
            Location::Leaf { parent, key } => prefix(*parent).chain([Key::Index(*key)]).collect(),
            Location::Vacant { anchor, path } => prefix(*anchor).chain(path.iter().cloned()).collect(),
        }
    }

    /// Cursors over the members of this array. Empty for anything else.
    #[must_use]
    pub fn iter(&self) -> Children<'a> {
        match self.location {
            Location::Array(handle) => Children {
                raw: self.raw,
                parent: Some(handle),
                front: 0,
                back: self.raw.node(handle).len(),
            },
            _ => Children {
                raw: self.raw,
                parent: None,
                front: 0,
                back: 0,
            },
        }
    }

    /// Deep copy of the subtree at this location, or `None` for a placeholder.
    #[must_use]
    pub fn to_value(&self) -> Option<Value> {
        match &self.location {
            Location::Array(handle) => Some(self.raw.array_value(*handle)),
            Location::Leaf { .. } => self.slot().map(|slot| self.raw.slot_value(slot)),
            Location::Vacant { .. } => None,
        }
    }

    fn is_root(&self) -> bool {
        matches!(self.location, Location::Array(handle) if self.raw.node(handle).link().is_none())
    }
}

/// Renders the location's contents; placeholders render as `undefined`.
impl fmt::Display for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.location, self.slot()) {
            (Location::Array(handle), _) => self.raw.write_array(*handle, f),
            (Location::Leaf { .. }, Some(slot)) => self.raw.write_slot(slot, f),
            (Location::Leaf { .. } | Location::Vacant { .. }, _) => f.write_str("undefined"),
        }
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "autoviv::create({self})")
        } else {
            fmt::Display::fmt(self, f)
        }
    }
}

impl IntoValue for Cursor<'_> {
    fn into_value(self) -> Result<Value, Error> {
        (&self).into_value()
    }
}

impl IntoValue for &Cursor<'_> {
    fn into_value(self) -> Result<Value, Error> {
        self.to_value().ok_or(Error::UnsupportedType { type_name: "placeholder" })
    }
}

/// Iterator over the members of an array, yielded as [`Cursor`]s.
#[derive(Clone)]
pub struct Children<'a> {
    raw: &'a RawTree,
    parent: Option<Handle>,
    front: usize,
    back: usize,
}

impl<'a> Children<'a> {
    fn cursor_at(&self, key: usize) -> Option<Cursor<'a>> {
        let parent = self.parent?;
        let slot = self.raw.node(parent).child(key)?;
        Some(Cursor::new(self.raw, slot_location(parent, key, slot)))
    }
}

impl<'a> Iterator for Children<'a> {
    type Item = Cursor<'a>;

    fn next(&mut self) -> Option<Cursor<'a>> {
        if self.front == self.back {
            return None;
        }
        let cursor = self.cursor_at(self.front);
        self.front += 1;
        cursor
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        self.cursor_at(self.back)
    }
}

impl ExactSizeIterator for Children<'_> {}

impl FusedIterator for Children<'_> {}

impl fmt::Debug for Children<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Children").field("remaining", &(self.back - self.front)).finish()
    }
}

/// A writable position in a [`Tree`](crate::Tree).
///
/// Moving the cursor with [`get`](Self::get) is a pure read. Writing with
/// [`set`](Self::set) or [`assign`](Self::assign) first turns the cursor's
/// location into a real array, creating every missing level.
pub struct CursorMut<'a> {
    raw: &'a mut RawTree,
    location: Location,
}

impl<'a> CursorMut<'a> {
    pub(crate) fn new(raw: &'a mut RawTree, location: Location) -> Self {
        Self { raw, location }
    }

    /// Moves to `self[key]` without modifying the tree.
    ///
    /// # Errors
    ///
    /// As [`Cursor::get`].
    pub fn get(self, key: impl Into<Key>) -> Result<CursorMut<'a>, Error> {
        let CursorMut { raw, location } = self;
        let location = location.child(raw, key.into())?;
        Ok(CursorMut::new(raw, location))
    }

    /// Writes a deep copy of `value` at `self[key]`.
    ///
    /// A placeholder location is materialized level by level, and a leaf
    /// location is replaced by an empty array, before the write. Arrays that
    /// are extended are padded with nulls.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedType`] for an unrepresentable `value`.
    /// - [`Error::UnsupportedIndex`] if `key`, or any key recorded on the way
    ///   here, is not an integer position.
    /// - [`Error::CapacityOverflow`] if an array would have to grow past what
    ///   can be allocated, e.g. for `key == usize::MAX`.
    ///
    /// The tree is unchanged on error.
    pub fn set(&mut self, key: impl Into<Key>, value: impl IntoValue) -> Result<(), Error> {
        let value = value.into_value()?;
        let index = key.into().position()?;
        let handle = self.location.set(self.raw, index, value)?;
        self.location = Location::Array(handle);
        Ok(())
    }

    /// Replaces whatever is at this location with a deep copy of `value`.
    ///
    /// # Errors
    ///
    /// [`Error::RootNotIndexable`] at the root array, which cannot be replaced
    /// by indexed assignment. Otherwise as [`set`](Self::set); the tree is
    /// unchanged on error.
    pub fn assign(&mut self, value: impl IntoValue) -> Result<(), Error> {
        let value = value.into_value()?;
        self.location = self.location.assign(self.raw, value)?;
        Ok(())
    }

    /// A read-only view of the same location.
    #[must_use]
    pub fn as_cursor(&self) -> Cursor<'_> {
        Cursor::new(&*self.raw, self.location.clone())
    }

    /// As [`Cursor::kind`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.as_cursor().kind()
    }
}

impl fmt::Display for CursorMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_cursor(), f)
    }
}

impl fmt::Debug for CursorMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.as_cursor(), f)
    }
}
