use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use log::trace;
use smallvec::{SmallVec, smallvec};

use super::arena::Arena;
use super::handle::Handle;
use super::node::{ArrayNode, Link, Slot};
use crate::{Error, Value};

/// The arena-backed storage behind a `Tree`.
///
/// The root is always an array. Every other array is reachable from it through
/// exactly one `Slot::Array`, and carries a `Link` naming that slot.
#[derive(Clone, Debug)]
pub(crate) struct RawTree {
    arrays: Arena<ArrayNode>,
    root: Handle,
}

impl RawTree {
    /// Builds a tree whose root array holds a deep copy of `items`.
    pub(crate) fn from_items(items: Vec<Value>) -> Self {
        let mut arrays = Arena::new();
        let root = arrays.insert(ArrayNode::new(None, items.len()));
        let mut tree = Self { arrays, root };
        for (key, item) in items.into_iter().enumerate() {
            let slot = tree.build(item, root, key);
            tree.arrays.get_mut(root).push(slot);
        }
        tree
    }

    pub(crate) fn root(&self) -> Handle {
        self.root
    }

    pub(crate) fn node(&self, handle: Handle) -> &ArrayNode {
        self.arrays.get(handle)
    }

    /// Number of arrays currently allocated, root included.
    #[cfg(test)]
    pub(crate) fn array_count(&self) -> usize {
        self.arrays.len()
    }

    /// Turns a value into the slot stored at `parent[key]`, allocating arrays
    /// for every nested level.
    fn build(&mut self, value: Value, parent: Handle, key: usize) -> Slot {
        match value {
            Value::Null => Slot::Null,
            Value::String(text) => Slot::String(text.into_boxed_str()),
            Value::Array(items) => {
                let handle = self.arrays.insert(ArrayNode::new(Some(Link { parent, key }), items.len()));
                for (index, item) in items.into_iter().enumerate() {
                    let slot = self.build(item, handle, index);
                    self.arrays.get_mut(handle).push(slot);
                }
                Slot::Array(handle)
            }
        }
    }

    /// Returns the arrays owned by `slot` to the arena.
    fn release(&mut self, slot: Slot) {
        let Slot::Array(handle) = slot else {
            return;
        };
        let mut pending: SmallVec<[Handle; 8]> = smallvec![handle];
        while let Some(handle) = pending.pop() {
            let node = self.arrays.remove(handle);
            pending.extend(node.children().iter().filter_map(|child| match *child {
                Slot::Array(nested) => Some(nested),
                Slot::Null | Slot::String(_) => None,
            }));
        }
    }

    /// Null-pads `parent` so that `key` is a valid position in it.
    fn pad(&mut self, parent: Handle, key: usize) -> Result<(), Error> {
        let padded = self.arrays.get_mut(parent).pad_to(key)?;
        if padded > 0 {
            trace!("padded {parent} with {padded} null(s) up to position {key}");
        }
        Ok(())
    }

    /// Puts `slot` at the existing position `parent[key]`, dropping whatever was there.
    fn store(&mut self, parent: Handle, key: usize, slot: Slot) {
        let old = self.arrays.get_mut(parent).replace(key, slot);
        self.release(old);
    }

    /// Writes a deep copy of `value` at `parent[key]`, null-padding the array
    /// if `key` is past its end. Whatever was stored there before is dropped.
    ///
    /// On error the tree is unchanged.
    pub(crate) fn set(&mut self, parent: Handle, key: usize, value: Value) -> Result<(), Error> {
        self.pad(parent, key)?;
        let slot = self.build(value, parent, key);
        self.store(parent, key, slot);
        Ok(())
    }

    /// Writes a deep copy of `value` at `anchor[levels[0]]..[levels[n]][key]`,
    /// with a fresh empty array at each of `levels`, and returns the array that
    /// now holds `value`.
    ///
    /// Whatever `anchor[levels[0]]` held is replaced. The new arrays are built
    /// detached and hung from `anchor` last, so on error the tree is unchanged.
    pub(crate) fn set_path(&mut self, anchor: Handle, levels: &[usize], key: usize, value: Value) -> Result<Handle, Error> {
        let Some((&first, below)) = levels.split_first() else {
            self.set(anchor, key, value)?;
            return Ok(anchor);
        };

        let top = self.arrays.insert(ArrayNode::new(Some(Link { parent: anchor, key: first }), 0));
        let built = match self.hang_levels(top, below, key, value) {
            Ok(holder) => self.pad(anchor, first).map(|()| holder),
            Err(error) => Err(error),
        };
        match built {
            Ok(holder) => {
                self.store(anchor, first, Slot::Array(top));
                trace!("materialized {top} at position {first} of {anchor}");
                Ok(holder)
            }
            Err(error) => {
                self.release(Slot::Array(top));
                Err(error)
            }
        }
    }

    /// Hangs one empty array per entry of `levels` below `parent`, each inside
    /// the previous one, then writes `value` at `key` in the deepest.
    fn hang_levels(&mut self, mut parent: Handle, levels: &[usize], key: usize, value: Value) -> Result<Handle, Error> {
        for &level in levels {
            self.pad(parent, level)?;
            let child = self.arrays.insert(ArrayNode::new(Some(Link { parent, key: level }), 0));
            self.store(parent, level, Slot::Array(child));
            trace!("materialized {child} at position {level} of {parent}");
            parent = child;
        }
        self.set(parent, key, value)?;
        Ok(parent)
    }

    /// Collects the positions leading from the root down to `handle`.
    pub(crate) fn path_to(&self, mut handle: Handle) -> SmallVec<[usize; 8]> {
        let mut path = SmallVec::new();
        while let Some(link) = self.node(handle).link() {
            path.push(link.key);
            handle = link.parent;
        }
        path.reverse();
        path
    }

    pub(crate) fn slot_value(&self, slot: &Slot) -> Value {
        match slot {
            Slot::Null => Value::Null,
            Slot::String(text) => Value::String(String::from(&**text)),
            Slot::Array(handle) => self.array_value(*handle),
        }
    }

    pub(crate) fn array_value(&self, handle: Handle) -> Value {
        Value::Array(self.node(handle).children().iter().map(|slot| self.slot_value(slot)).collect())
    }

    pub(crate) fn write_slot(&self, slot: &Slot, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match slot {
            Slot::Null => f.write_str("null"),
            Slot::String(text) => write!(f, "{text:?}"),
            Slot::Array(handle) => self.write_array(*handle, f),
        }
    }

    pub(crate) fn write_array(&self, handle: Handle, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, slot) in self.node(handle).children().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            self.write_slot(slot, f)?;
        }
        f.write_str("]")
    }

    /// Structural equality of two arrays, possibly from different trees.
    pub(crate) fn array_eq(&self, handle: Handle, other: &RawTree, other_handle: Handle) -> bool {
        let lhs = self.node(handle).children();
        let rhs = other.node(other_handle).children();
        lhs.len() == rhs.len()
            && lhs.iter().zip(rhs).all(|pair| match pair {
                (Slot::Null, Slot::Null) => true,
                (Slot::String(a), Slot::String(b)) => a == b,
                (Slot::Array(a), Slot::Array(b)) => self.array_eq(*a, other, *b),
                _ => false,
            })
    }

    /// Checks every parent link and that the arena holds no unreachable arrays.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        fn walk(tree: &RawTree, handle: Handle) -> usize {
            let mut count = 1;
            for (key, slot) in tree.node(handle).children().iter().enumerate() {
                if let Slot::Array(child) = *slot {
                    assert_eq!(tree.node(child).link(), Some(Link { parent: handle, key }));
                    count += walk(tree, child);
                }
            }
            count
        }

        assert_eq!(self.node(self.root).link(), None);
        assert_eq!(walk(self, self.root), self.arrays.len());
    }
}
