mod arena;
mod handle;
mod location;
mod node;
mod raw_tree;

pub(crate) use handle::Handle;
pub(crate) use location::Location;
pub(crate) use node::Slot;
pub(crate) use raw_tree::RawTree;
