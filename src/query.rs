//! Cursor queries over a normalized tree.
//!
//! Matches come back in pre-order, so an enclosing construct always precedes
//! the constructs nested inside it. [`Pick`] states which end of that list a
//! caller wants. Enclosing strings are resolved outermost-first: nested
//! strings only occur through template substitutions, and the outer
//! template is the construct users mean. Nested blocks are common, and
//! outermost is the default there as well.

use crate::span::{contains_strictly, covers, touches};
use crate::tree::{filter, is_block_like, is_string_like, Node, Tree};
use clap::ValueEnum;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// Which of several nested matches to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Pick {
    /// First match in pre-order
    #[default]
    Outermost,
    /// Last match in pre-order
    Innermost,
}

impl Pick {
    pub fn choose<'a>(self, matches: &[&'a Node]) -> Option<&'a Node> {
        match self {
            Pick::Outermost => matches.first().copied(),
            Pick::Innermost => matches.last().copied(),
        }
    }
}

/// Every node with usable offsets that satisfies `predicate`, in pre-order.
///
/// Nodes without offsets are dropped here rather than surfaced as errors;
/// most trees have a few.
pub fn find_all<'a, P>(tree: &'a Tree, mut predicate: P) -> Vec<&'a Node>
where
    P: FnMut(&Node) -> bool,
{
    let mut skipped = 0usize;
    let matches = filter(tree, |node| {
        if node.span().is_none() {
            skipped += 1;
            return false;
        }
        predicate(node)
    });

    if skipped > 0 {
        debug!("skipped {skipped} node(s) without usable offsets");
    }
    matches
}

/// The string-like node under `cursor`.
///
/// A cursor on the opening quote selects the string; one right after the
/// closing quote (a `,` or `:` following it, say) does not.
pub fn enclosing_string(tree: &Tree, cursor: usize, pick: Pick) -> Option<&Node> {
    let matches = find_all(tree, |node| is_string_like(node) && covers(cursor, node));
    trace!("{} string(s) touch offset {cursor}", matches.len());
    pick.choose(&matches)
}

/// The block-like node whose braces surround `cursor`.
///
/// A cursor on the opening brace, or just past the closing one, is outside
/// the block.
pub fn enclosing_block(tree: &Tree, cursor: usize, pick: Pick) -> Option<&Node> {
    let matches = find_all(tree, |node| is_block_like(node) && contains_strictly(cursor, node));
    trace!("{} block(s) surround offset {cursor}", matches.len());
    pick.choose(&matches)
}

/// Every node touching `cursor`, outermost first.
pub fn nodes_at(tree: &Tree, cursor: usize) -> Vec<&Node> {
    find_all(tree, |node| touches(cursor, node))
}
