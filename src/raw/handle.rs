use core::fmt;
use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Names one array of a tree by its arena slot.
///
/// The slot is stored off by one so that an absent parent link
/// (`Option<Handle>`) takes no extra space.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    /// Number of arrays a single tree can hold at once.
    pub(crate) const CAPACITY: usize = RawHandle::MAX as usize;

    /// The handle naming arena slot `slot`, or `None` once a tree is full.
    #[inline]
    pub(crate) const fn for_slot(slot: usize) -> Option<Self> {
        if slot >= Self::CAPACITY {
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        match NonZero::new((slot + 1) as RawHandle) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

/// Short form used in log messages, e.g. `array#3`.
impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "array#{}", self.slot())
    }
}
