use crate::span::Boundary;
use crate::text::OffsetMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// What a modification does to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Insert,
    Delete,
    Replace,
}

/// One edit over UTF-16 offsets, applied by the editor as part of a batch.
///
/// A batch is all-or-nothing: [`apply`] validates every modification before
/// touching the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use = "Modification does nothing until applied"]
pub struct Modification {
    pub operation: Operation,
    /// Range replaced; zero-width for inserts
    pub target: Boundary,
    /// Text written into the target; absent for deletes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Modification {
    pub fn delete(target: Boundary) -> Self {
        Self {
            operation: Operation::Delete,
            target,
            value: None,
        }
    }

    pub fn replace(target: Boundary, value: impl Into<String>) -> Self {
        Self {
            operation: Operation::Replace,
            target,
            value: Some(value.into()),
        }
    }

    fn replacement(&self) -> Result<&str, EditError> {
        match self.operation {
            Operation::Delete => Ok(""),
            Operation::Insert | Operation::Replace => {
                self.value.as_deref().ok_or(EditError::MissingValue {
                    operation: self.operation,
                })
            }
        }
    }

    /// Validate the modification against a text of `len` UTF-16 units.
    fn validate(&self, len: usize) -> Result<(), EditError> {
        let Boundary { start, end } = self.target;
        if start > end || end > len {
            return Err(EditError::InvalidRange { start, end, len });
        }
        if self.operation == Operation::Insert && !self.target.is_empty() {
            return Err(EditError::InsertNotEmpty { start, end });
        }
        self.replacement().map(|_| ())
    }
}

#[derive(Error, Debug)]
pub enum EditError {
    #[error("Invalid range: [{start}, {end}) in text of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("Insert target must be empty, got [{start}, {end})")]
    InsertNotEmpty { start: usize, end: usize },

    #[error("{operation:?} modification has no value")]
    MissingValue { operation: Operation },

    #[error(
        "Overlapping modifications: [{}, {}) and [{}, {})",
        .first.start, .first.end, .second.start, .second.end
    )]
    Overlap { first: Boundary, second: Boundary },

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Apply a batch of modifications to `text`.
///
/// Targets are validated and checked for overlap first, then applied
/// bottom-to-top so that earlier offsets stay valid. Inserts at the same
/// offset land in list order.
pub fn apply(text: &str, modifications: &[Modification]) -> Result<String, EditError> {
    let offsets = OffsetMap::new(text);
    let len = offsets.len_utf16();

    for modification in modifications {
        modification.validate(len)?;
    }

    // Descending by start, then by end, then by list position
    let mut ordered: Vec<(usize, &Modification)> = modifications.iter().enumerate().collect();
    ordered.sort_by(|(ia, a), (ib, b)| {
        b.target
            .start
            .cmp(&a.target.start)
            .then(b.target.end.cmp(&a.target.end))
            .then(ib.cmp(ia))
    });

    // For non-overlapping regions: earlier edit's end <= later edit's start
    for window in ordered.windows(2) {
        let (later, earlier) = (&window[0].1.target, &window[1].1.target);
        if earlier.end > later.start {
            return Err(EditError::Overlap {
                first: *earlier,
                second: *later,
            });
        }
    }

    let mut result = text.to_string();
    for (_, modification) in ordered {
        let start = offsets.to_byte(modification.target.start);
        let end = offsets.to_byte(modification.target.end);
        result.replace_range(start..end, modification.replacement()?);
    }

    Ok(result)
}

/// Apply a batch of modifications to a file in a single atomic write.
///
/// Returns the new contents. The file is left untouched when the batch does
/// not change it.
pub fn apply_to_file(path: &Path, modifications: &[Modification]) -> Result<String, EditError> {
    let original = fs::read_to_string(path)?;
    let updated = apply(&original, modifications)?;

    if updated != original {
        atomic_write(path, updated.as_bytes())?;

        // Editors watching the file key reloads off mtime
        let now = filetime::FileTime::now();
        filetime::set_file_mtime(path, now)?;
    }

    Ok(updated)
}

/// Atomic file write: tempfile + fsync + rename.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), EditError> {
    // Create tempfile in same directory to ensure same filesystem
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        Some(_) => Path::new("."),
        None => {
            return Err(EditError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no parent directory",
            )))
        }
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
