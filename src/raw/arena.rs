use alloc::vec::Vec;

use super::handle::Handle;

/// Slot storage for the array nodes of one tree.
///
/// Released slots are recycled, so a handle stays valid exactly as long as the
/// node it names is reachable from the root.
#[derive(Clone, Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    vacant: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            vacant: Vec::new(),
        }
    }

    /// Number of live nodes.
    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.vacant.len())
    }

    pub(crate) fn insert(&mut self, element: T) -> Handle {
        if let Some(handle) = self.vacant.pop() {
            self.slots[handle.slot()] = Some(element);
            return handle;
        }

        let Some(handle) = Handle::for_slot(self.slots.len()) else {
            panic!("`Arena::insert()` - arena is at maximum capacity ({})", Handle::CAPACITY);
        };
        self.slots.push(Some(element));
        handle
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.slot()].as_ref().expect("`Arena::get()` - `handle` is vacant!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.slot()].as_mut().expect("`Arena::get_mut()` - `handle` is vacant!")
    }

    /// Removes the node at `handle` and recycles the slot.
    pub(crate) fn remove(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.slot()].take().expect("`Arena::remove()` - `handle` is vacant!");
        self.vacant.push(handle);
        element
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn removed_slot_is_reused() {
        let mut arena = Arena::new();
        let first = arena.insert('a');
        let second = arena.insert('b');
        assert_eq!(arena.remove(first), 'a');
        assert_eq!(arena.len(), 1);

        let third = arena.insert('c');
        assert_eq!(third, first);
        assert_eq!(*arena.get(second), 'b');
        assert_eq!(*arena.get(third), 'c');
    }

    #[test]
    #[should_panic(expected = "`Arena::get()` - `handle` is vacant!")]
    fn vacant_handle_panics() {
        let mut arena = Arena::new();
        let handle = arena.insert(1_u8);
        arena.remove(handle);
        let _ = arena.get(handle);
    }

    #[test]
    #[should_panic(expected = "`Arena::insert()` - arena is at maximum capacity")]
    fn full_arena_panics() {
        let mut arena = Arena::new();
        for _ in 0..=Handle::CAPACITY {
            arena.insert(());
        }
    }

    proptest! {
        #[test]
        fn arena_tracks_live_nodes(operations in prop::collection::vec(strategy(), 0..256)) {
            let mut live: Vec<(Handle, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::new();

            for operation in operations {
                match operation {
                    Operation::Insert(value) => {
                        let handle = arena.insert(value);
                        prop_assert!(live.iter().all(|&(other, _)| other != handle));
                        live.push((handle, value));
                    }
                    Operation::Overwrite(which, value) if !live.is_empty() => {
                        let index = which % live.len();
                        *arena.get_mut(live[index].0) = value;
                        live[index].1 = value;
                    }
                    Operation::Remove(which) if !live.is_empty() => {
                        let index = which % live.len();
                        let (handle, value) = live.swap_remove(index);
                        prop_assert_eq!(arena.remove(handle), value);
                    }
                    Operation::Overwrite(..) | Operation::Remove(_) => {}
                }

                prop_assert_eq!(arena.len(), live.len());
                for &(handle, value) in &live {
                    prop_assert_eq!(*arena.get(handle), value);
                }
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Insert(u32),
        Overwrite(usize, u32),
        Remove(usize),
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            10 => any::<u32>().prop_map(Operation::Insert),
            4 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Operation::Overwrite(which, value)),
            5 => any::<usize>().prop_map(Operation::Remove),
        ]
    }
}
