//! The normalized tree every grammar is lowered into.
//!
//! A [`Tree`] has no fixed schema: nodes carry an ordered list of named
//! fields, each of which may be another node, a sequence, a plain record, a
//! primitive, or a hole. The walker in [`walk`] inspects every field.

pub mod classify;
pub mod node;
pub mod walk;

pub use classify::{category, is_block_like, is_string_like, BLOCK, STRING};
pub use node::{Fields, Leaf, Node, Raw, Tree, CHILDREN};
pub use walk::{filter, map, traverse};
