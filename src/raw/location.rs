use smallvec::{SmallVec, smallvec};

use super::handle::Handle;
use super::node::Slot;
use super::raw_tree::RawTree;
use crate::{Error, Key, Value};

/// Keys recorded by a placeholder below its nearest real array.
pub(crate) type Path = SmallVec<[Key; 4]>;

/// Validated positions of the levels a write has to create.
type Positions = SmallVec<[usize; 4]>;

/// A position reached by indexing, real or not.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Location {
    /// An array stored in the tree.
    Array(Handle),
    /// A null or string stored at `parent[key]`.
    Leaf { parent: Handle, key: usize },
    /// A placeholder: `path` does not exist yet below the real array `anchor`.
    Vacant { anchor: Handle, path: Path },
}

impl Location {
    /// Location of `self[key]`. Never touches the tree's structure.
    ///
    /// Only a real array checks `key` right away; leaves and placeholders
    /// record it and leave validation to the next write.
    pub(crate) fn child(self, tree: &RawTree, key: Key) -> Result<Location, Error> {
        match self {
            Location::Array(handle) => {
                let index = key.position()?;
                Ok(match tree.node(handle).child(index) {
                    None => Location::Vacant {
                        anchor: handle,
                        path: smallvec![Key::Index(index)],
                    },
                    Some(Slot::Array(child)) => Location::Array(*child),
                    Some(Slot::Null | Slot::String(_)) => Location::Leaf {
                        parent: handle,
                        key: index,
                    },
                })
            }
            // A leaf has no children; indexing it addresses its own slot as if
            // that slot were empty.
            Location::Leaf { parent, key: own } => Ok(Location::Vacant {
                anchor: parent,
                path: smallvec![Key::Index(own), key],
            }),
            Location::Vacant { anchor, mut path } => {
                path.push(key);
                Ok(Location::Vacant { anchor, path })
            }
        }
    }

    /// The real array this location hangs from, the positions of the arrays
    /// missing below it, and the location's own position in the last of them.
    ///
    /// Every recorded key is checked here, before anything is written.
    fn slot(&self, tree: &RawTree) -> Result<(Handle, Positions, usize), Error> {
        match self {
            Location::Array(handle) => match tree.node(*handle).link() {
                Some(link) => Ok((link.parent, Positions::new(), link.key)),
                None => Err(Error::RootNotIndexable),
            },
            Location::Leaf { parent, key } => Ok((*parent, Positions::new(), *key)),
            Location::Vacant { anchor, path } => {
                let mut levels = path.iter().map(Key::position).collect::<Result<Positions, _>>()?;
                let key = levels.pop().expect("`Location::Vacant` - `path` is never empty");
                Ok((*anchor, levels, key))
            }
        }
    }

    /// Writes `value` at `self[key]`, first turning this location into a real
    /// array: a leaf is replaced by an empty array and a placeholder gets every
    /// missing level. Returns that array.
    ///
    /// On error the tree is unchanged.
    pub(crate) fn set(&self, tree: &mut RawTree, key: usize, value: Value) -> Result<Handle, Error> {
        match self {
            Location::Array(handle) => tree.set_path(*handle, &[], key, value),
            Location::Leaf { .. } | Location::Vacant { .. } => {
                let (anchor, mut levels, own) = self.slot(tree)?;
                levels.push(own);
                tree.set_path(anchor, &levels, key, value)
            }
        }
    }

    /// Replaces whatever is at this location with `value` and returns where
    /// the value now lives.
    ///
    /// On error the tree is unchanged.
    pub(crate) fn assign(&self, tree: &mut RawTree, value: Value) -> Result<Location, Error> {
        let (anchor, levels, key) = self.slot(tree)?;
        let holder = tree.set_path(anchor, &levels, key, value)?;
        Location::Array(holder).child(tree, Key::Index(key))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn tree() -> RawTree {
        RawTree::from_items(vec![Value::from("leaf"), Value::Array(vec![Value::Null])])
    }

    #[test]
    fn reading_past_the_end_is_vacant() {
        let tree = tree();
        let root = Location::Array(tree.root());
        let location = root.child(&tree, Key::Index(5)).unwrap();
        assert_eq!(location, Location::Vacant { anchor: tree.root(), path: smallvec![Key::Index(5)] });
    }

    #[test]
    fn indexing_a_leaf_addresses_its_slot() {
        let tree = tree();
        let leaf = Location::Array(tree.root()).child(&tree, Key::Index(0)).unwrap();
        assert_eq!(leaf, Location::Leaf { parent: tree.root(), key: 0 });

        let below = leaf.child(&tree, Key::Index(2)).unwrap();
        assert_eq!(
            below,
            Location::Vacant { anchor: tree.root(), path: smallvec![Key::Index(0), Key::Index(2)] }
        );
    }

    #[test]
    fn array_rejects_non_positions_immediately() {
        let tree = tree();
        let err = Location::Array(tree.root()).child(&tree, Key::from("x")).unwrap_err();
        assert_eq!(err, Error::UnsupportedIndex { key: Key::from("x") });
    }

    #[test]
    fn invalid_recorded_key_fails_without_writing() {
        let mut tree = tree();
        let vacant = Location::Array(tree.root())
            .child(&tree, Key::Index(4))
            .and_then(|location| location.child(&tree, Key::from("name")))
            .unwrap();

        let before = tree.array_value(tree.root());
        assert_eq!(
            vacant.set(&mut tree, 0, Value::Null),
            Err(Error::UnsupportedIndex { key: Key::from("name") })
        );
        assert_eq!(tree.array_value(tree.root()), before);
    }

    #[test]
    fn writing_through_a_chain_creates_each_level() {
        let mut tree = tree();
        let vacant = Location::Array(tree.root())
            .child(&tree, Key::Index(1))
            .and_then(|location| location.child(&tree, Key::Index(0)))
            .and_then(|location| location.child(&tree, Key::Index(1)))
            .unwrap();

        let handle = vacant.set(&mut tree, 0, Value::from("x")).unwrap();
        assert_eq!(tree.path_to(handle).as_slice(), &[1, 0, 1]);
        assert_eq!(
            tree.array_value(tree.root()),
            Value::Array(vec![
                Value::from("leaf"),
                Value::Array(vec![Value::Array(vec![Value::Null, Value::Array(vec![Value::from("x")])])]),
            ])
        );
        tree.assert_consistent();
    }

    #[test]
    fn oversized_positions_fail_without_writing() {
        let mut tree = tree();
        let arrays = tree.array_count();
        let before = tree.array_value(tree.root());

        let far = Location::Array(tree.root()).child(&tree, Key::Index(usize::MAX)).unwrap();
        assert_eq!(far.assign(&mut tree, Value::from("x")), Err(Error::CapacityOverflow { index: usize::MAX }));
        assert_eq!(
            far.set(&mut tree, 0, Value::from("x")),
            Err(Error::CapacityOverflow { index: usize::MAX })
        );

        let leaf = Location::Array(tree.root()).child(&tree, Key::Index(0)).unwrap();
        assert_eq!(
            leaf.set(&mut tree, usize::MAX, Value::Null),
            Err(Error::CapacityOverflow { index: usize::MAX })
        );

        assert_eq!(tree.array_value(tree.root()), before);
        assert_eq!(tree.array_count(), arrays);
        tree.assert_consistent();
    }

    #[test]
    fn assign_reports_where_the_value_landed() {
        let mut tree = tree();
        let leaf = Location::Array(tree.root()).child(&tree, Key::Index(0)).unwrap();
        let landed = leaf.assign(&mut tree, Value::from(["nested"])).unwrap();

        assert!(matches!(landed, Location::Array(handle) if tree.path_to(handle).as_slice() == [0]));
        tree.assert_consistent();
    }

    #[test]
    fn root_has_no_parent_slot() {
        let mut tree = tree();
        let root = Location::Array(tree.root());
        assert_eq!(root.assign(&mut tree, Value::Null), Err(Error::RootNotIndexable));
    }

    fn path_strategy() -> impl Strategy<Value = Vec<usize>> {
        prop::collection::vec(0..4_usize, 0..4)
    }

    proptest! {
        /// Writes through locations reached by arbitrary reads keep every link
        /// and the arena in step with the tree.
        #[test]
        fn writes_keep_links_consistent(writes in prop::collection::vec((path_strategy(), 0..4_usize), 0..24)) {
            let mut tree = RawTree::from_items(vec![]);
            for (path, key) in writes {
                let mut location = Location::Array(tree.root());
                for &index in &path {
                    location = location.child(&tree, Key::Index(index)).unwrap();
                }
                let holder = location.set(&mut tree, key, Value::from("v")).unwrap();
                let holder_path = tree.path_to(holder);
                prop_assert_eq!(holder_path.as_slice(), path.as_slice());
                tree.assert_consistent();
            }
        }
    }
}
