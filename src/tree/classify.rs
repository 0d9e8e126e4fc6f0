//! Semantic categories shared by every grammar.
//!
//! Grammars disagree on how they tag literals and braces; the editing
//! commands only care about two categories. Classification looks at the
//! node's tag, never at where the node sits.

use crate::tree::node::Node;

/// Normalized kind for string and template literals.
pub const STRING: &str = "string";

/// Normalized kind for brace-delimited blocks and object literals.
pub const BLOCK: &str = "block";

// `string` also covers directive prologues ("use strict") and JSON strings.
const STRING_TAGS: &[&str] = &["string", "template_string"];

// `object` is both the JS/TS object literal and the JSON object.
const BLOCK_TAGS: &[&str] = &["statement_block", "object"];

pub fn is_string_like(node: &Node) -> bool {
    node.kind == STRING || STRING_TAGS.contains(&node.native_kind())
}

pub fn is_block_like(node: &Node) -> bool {
    node.kind == BLOCK || BLOCK_TAGS.contains(&node.native_kind())
}

/// The normalized category of a node, if it has one.
pub fn category(node: &Node) -> Option<&'static str> {
    if is_string_like(node) {
        Some(STRING)
    } else if is_block_like(node) {
        Some(BLOCK)
    } else {
        None
    }
}
