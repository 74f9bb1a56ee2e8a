use alloc::boxed::Box;

use smallvec::SmallVec;

use super::handle::Handle;
use crate::Error;

#[cfg(test)]
pub(crate) const INLINE_CHILDREN: usize = 2;
#[cfg(not(test))]
pub(crate) const INLINE_CHILDREN: usize = 4;

pub(crate) type Children = SmallVec<[Slot; INLINE_CHILDREN]>;

/// Where a nested array lives: the array that owns it and its position there.
///
/// This is a back-link only. Ownership always flows from parent to child
/// through `Slot::Array`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Link {
    pub(crate) parent: Handle,
    pub(crate) key: usize,
}

/// One position inside an array.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Slot {
    Null,
    String(Box<str>),
    Array(Handle),
}

#[derive(Clone, Debug)]
pub(crate) struct ArrayNode {
    // `None` only for the root array.
    link: Option<Link>,
    children: Children,
}

impl ArrayNode {
    pub(crate) fn new(link: Option<Link>, capacity: usize) -> Self {
        Self {
            link,
            children: SmallVec::with_capacity(capacity),
        }
    }

    pub(crate) fn link(&self) -> Option<Link> {
        self.link
    }

    pub(crate) fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> Option<&Slot> {
        self.children.get(index)
    }

    pub(crate) fn children(&self) -> &[Slot] {
        &self.children
    }

    pub(crate) fn push(&mut self, slot: Slot) {
        self.children.push(slot);
    }

    /// Appends nulls until `index` is a valid position. Returns how many
    /// positions were added.
    ///
    /// Fails without touching the array if the new length cannot be
    /// allocated.
    pub(crate) fn pad_to(&mut self, index: usize) -> Result<usize, Error> {
        let len = self.children.len();
        if index < len {
            return Ok(0);
        }
        let new_len = index.checked_add(1).ok_or(Error::CapacityOverflow { index })?;
        self.children
            .try_reserve_exact(new_len - len)
            .map_err(|_| Error::CapacityOverflow { index })?;
        self.children.resize(new_len, Slot::Null);
        Ok(new_len - len)
    }

    /// Swaps `slot` into an existing position, returning the previous occupant.
    pub(crate) fn replace(&mut self, index: usize, slot: Slot) -> Slot {
        core::mem::replace(&mut self.children[index], slot)
    }
}
