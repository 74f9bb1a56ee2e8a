//! Auto-vivifying null/string/array trees for Rust.
//!
//! [`create`] turns nested input into a [`Tree`] whose arrays grow on demand:
//! writing through a path that does not exist yet creates every missing array
//! along it, padding short arrays with nulls.
//!
//! # Example
//!
//! ```
//! use autoviv::create;
//!
//! let mut x = create(Vec::<&str>::new())?.into_tree().unwrap();
//!
//! // x[1][1] = "deep"
//! x.get_mut(1)?.get(1)?.set(1, "deep")?;
//! assert_eq!(x.to_string(), r#"[null, [null, [null, "deep"]]]"#);
//!
//! // x[3] = "three"; x[5] = "five"
//! x.set(3, "three")?;
//! x.set(5, "five")?;
//! assert_eq!(x.len(), 6);
//!
//! // Reads never modify the tree.
//! assert!(x.get(9)?.get(0)?.is_placeholder());
//! assert_eq!(x.len(), 6);
//!
//! // The debug form is the call that recreates the tree.
//! assert_eq!(
//!     format!("{x:?}"),
//!     r#"autoviv::create([null, [null, [null, "deep"]], null, "three", null, "five"])"#
//! );
//! # Ok::<(), autoviv::Error>(())
//! ```
//!
//! # Model
//!
//! - **Null, string, array only** - anything else is rejected with
//!   [`Error::UnsupportedType`] when the tree is built.
//! - **Integer indices only** - names, negative offsets and ranges fail with
//!   [`Error::UnsupportedIndex`].
//! - **Placeholders** - reading past the end of an array yields a cursor at a
//!   location that does not exist yet. It is materialized only if something is
//!   written through it.
//! - **Deep copies** - every value written into a tree is copied; no part of a
//!   tree is shared with the caller or with another part of the tree.
//!
//! # Implementation
//!
//! Arrays live in an arena and are addressed by handle. Each nested array keeps
//! a non-owning link to the array and position that own it, so a tree has no
//! reference cycles and can be cloned with a plain copy of its arena.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod key;
mod raw;
mod tree;
mod value;

pub use error::Error;
pub use key::Key;
pub use tree::{Children, Cursor, CursorMut, Kind, Root, Tree, create};
pub use value::{IntoValue, NULL, Value};
