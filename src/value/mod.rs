//! Path-addressed access to JSON value trees
//!
//! Everything the editor stores is a `serde_json::Value` tree. This module
//! provides the path type used to address locations inside that tree and
//! the get/set/delete primitives over it.

pub mod path;
pub mod tree;

pub use path::{Path, PathError, Segment};
pub use tree::{delete_path, get_path, get_path_mut, set_path};
