//! Cursor containment and boundary arithmetic.
//!
//! Offsets are UTF-16 code units, the unit editors report cursors in.

use crate::tree::Node;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An editable range detached from the node it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Boundary {
    /// Starting offset (inclusive)
    pub start: usize,
    /// Ending offset (exclusive)
    pub end: usize,
}

impl Boundary {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `other` lies entirely within this boundary.
    pub fn contains_boundary(&self, other: &Boundary) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoundaryError {
    #[error("boundary [{start}, {end}) is narrower than two characters and cannot be shrunk")]
    InvalidBoundary { start: usize, end: usize },
}

/// `start < cursor < end`: the cursor is past the opening delimiter and
/// before the closing one.
pub fn contains_strictly(cursor: usize, node: &Node) -> bool {
    match node.span() {
        Some((start, end)) => start < cursor && cursor < end,
        None => false,
    }
}

/// `start <= cursor <= end`: a cursor sitting on either edge counts.
pub fn touches(cursor: usize, node: &Node) -> bool {
    match node.span() {
        Some((start, end)) => start <= cursor && cursor <= end,
        None => false,
    }
}

/// `start <= cursor < end`: the cursor sits on a character of the node.
/// A cursor just past the last character is outside.
pub fn covers(cursor: usize, node: &Node) -> bool {
    match node.span() {
        Some((start, end)) => start <= cursor && cursor < end,
        None => false,
    }
}

/// Project a node onto its offsets. `None` if either is missing.
pub fn boundary_of(node: &Node) -> Option<Boundary> {
    node.span().map(|(start, end)| Boundary::new(start, end))
}

/// Strip one delimiter character from each side.
///
/// Callers must not pass a boundary narrower than two characters; doing so
/// is reported as [`BoundaryError::InvalidBoundary`].
pub fn shrink(boundary: Boundary) -> Result<Boundary, BoundaryError> {
    match boundary.end.checked_sub(boundary.start) {
        Some(width) if width >= 2 => Ok(Boundary::new(boundary.start + 1, boundary.end - 1)),
        _ => Err(BoundaryError::InvalidBoundary {
            start: boundary.start,
            end: boundary.end,
        }),
    }
}
