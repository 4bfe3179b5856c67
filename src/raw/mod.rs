mod arena;
mod handle;
mod height;
mod node;
mod raw_avl_map;

pub(crate) use handle::{Handle, Link};
pub(crate) use raw_avl_map::{HandleStack, RawAvlMap};
