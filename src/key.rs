use alloc::string::String;
use core::fmt;
use core::ops::{Bound, Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

use crate::Error;

/// An index handed to one of the tree's indexed operations.
///
/// Only [`Key::Index`] addresses anything. The other variants exist so that
/// callers holding a name, a negative offset or a range get a
/// [`Error::UnsupportedIndex`] instead of a type error, mirroring how the
/// tree would be driven from dynamically typed input.
///
/// # Examples
///
/// ```
/// use autoviv::Key;
///
/// assert_eq!(Key::from(3), Key::Index(3));
/// assert_eq!(Key::from("name"), Key::Name("name".into()));
/// assert!(Key::from(1_usize..4).position().is_err());
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Key {
    /// A zero-based array position.
    Index(usize),
    /// A negative integer.
    Offset(i64),
    /// An object-style member name.
    Name(String),
    /// A slice range.
    Slice(Bound<usize>, Bound<usize>),
}

impl Key {
    /// Returns the array position this key names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedIndex`] for anything other than
    /// [`Key::Index`].
    pub fn position(&self) -> Result<usize, Error> {
        match *self {
            Key::Index(index) => Ok(index),
            _ => Err(Error::UnsupportedIndex { key: self.clone() }),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(index) => write!(f, "{index}"),
            Key::Offset(offset) => write!(f, "{offset}"),
            Key::Name(name) => write!(f, "{name:?}"),
            Key::Slice(start, end) => {
                if let Bound::Included(start) | Bound::Excluded(start) = start {
                    write!(f, "{start}")?;
                }
                match end {
                    Bound::Included(end) => write!(f, "..={end}"),
                    Bound::Excluded(end) => write!(f, "..{end}"),
                    Bound::Unbounded => f.write_str(".."),
                }
            }
        }
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl From<u32> for Key {
    fn from(index: u32) -> Self {
        Key::Index(index as usize)
    }
}

impl From<i64> for Key {
    fn from(index: i64) -> Self {
        match usize::try_from(index) {
            Ok(index) => Key::Index(index),
            Err(_) => Key::Offset(index),
        }
    }
}

impl From<i32> for Key {
    fn from(index: i32) -> Self {
        Key::from(i64::from(index))
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.into())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<Range<usize>> for Key {
    fn from(range: Range<usize>) -> Self {
        Key::Slice(Bound::Included(range.start), Bound::Excluded(range.end))
    }
}

impl From<RangeInclusive<usize>> for Key {
    fn from(range: RangeInclusive<usize>) -> Self {
        let (start, end) = range.into_inner();
        Key::Slice(Bound::Included(start), Bound::Included(end))
    }
}

impl From<RangeFrom<usize>> for Key {
    fn from(range: RangeFrom<usize>) -> Self {
        Key::Slice(Bound::Included(range.start), Bound::Unbounded)
    }
}

impl From<RangeTo<usize>> for Key {
    fn from(range: RangeTo<usize>) -> Self {
        Key::Slice(Bound::Unbounded, Bound::Excluded(range.end))
    }
}

impl From<RangeToInclusive<usize>> for Key {
    fn from(range: RangeToInclusive<usize>) -> Self {
        Key::Slice(Bound::Unbounded, Bound::Included(range.end))
    }
}

impl From<RangeFull> for Key {
    fn from(_: RangeFull) -> Self {
        Key::Slice(Bound::Unbounded, Bound::Unbounded)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use proptest::prelude::*;

    #[test]
    fn integer_literals_become_positions() {
        assert_eq!(Key::from(0), Key::Index(0));
        assert_eq!(Key::from(7_usize).position(), Ok(7));
        assert_eq!(Key::from(-1), Key::Offset(-1));
    }

    #[test]
    fn non_positions_are_rejected() {
        for key in [Key::from(-2), Key::from("a"), Key::from(1_usize..3), Key::from(..)] {
            assert_eq!(key.position(), Err(Error::UnsupportedIndex { key: key.clone() }));
        }
    }

    #[test]
    fn keys_display_like_index_expressions() {
        assert_eq!(Key::from(4).to_string(), "4");
        assert_eq!(Key::from(-4).to_string(), "-4");
        assert_eq!(Key::from("id").to_string(), "\"id\"");
        assert_eq!(Key::from(1_usize..3).to_string(), "1..3");
        assert_eq!(Key::from(1_usize..=3).to_string(), "1..=3");
        assert_eq!(Key::from(2_usize..).to_string(), "2..");
        assert_eq!(Key::from(..5_usize).to_string(), "..5");
        assert_eq!(Key::from(..).to_string(), "..");
    }

    proptest! {
        #[test]
        fn non_negative_i64_is_a_position(index in 0..i64::from(u32::MAX)) {
            prop_assert_eq!(Key::from(index).position(), Ok(usize::try_from(index).unwrap()));
        }

        #[test]
        fn negative_i64_is_rejected(offset in i64::MIN..0) {
            prop_assert!(Key::from(offset).position().is_err());
        }
    }
}
