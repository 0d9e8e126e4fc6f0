//! tbx: cursor-driven syntax queries for editor integrations
//!
//! Given a source text, a language identifier and a cursor offset, tbx
//! answers questions like "what string is the cursor inside?" or "what
//! block surrounds it?" and turns the answer into edit ranges.
//!
//! # Architecture
//!
//! Every grammar is lowered into one generic [`Tree`] whose nodes carry a
//! type tag, UTF-16 `start`/`end` offsets and an ordered list of fields.
//! Queries are pre-order walks over that tree ([`tree::walk`]); language
//! differences are absorbed by per-family adapters ([`lang`]) that place
//! offsets where the walker expects them and rewrite string-like and
//! block-like node types into the shared `string` and `block` categories.
//!
//! Each call parses from scratch. Nothing is cached between calls.
//!
//! # Example
//!
//! ```no_run
//! use tbx::{Boundary, Engine};
//!
//! let engine = Engine::default();
//! let contents = engine
//!     .string_contents("(\"String contents\")", "javascript", 5)
//!     .unwrap();
//! assert_eq!(contents, Some(Boundary::new(2, 17)));
//! ```

pub mod commands;
pub mod config;
pub mod edit;
pub mod lang;
pub mod query;
pub mod span;
pub mod text;
pub mod tree;

// Re-exports
pub use commands::{CommandError, Engine, NodeSummary};
pub use config::{load_from_path, load_from_str, ConfigError, EngineConfig};
pub use edit::{apply, apply_to_file, EditError, Modification, Operation};
pub use lang::{parse, DispatchError, Family, Grammar, LanguageTable, ParseError};
pub use query::{enclosing_block, enclosing_string, Pick};
pub use span::{
    boundary_of, contains_strictly, covers, shrink, touches, Boundary, BoundaryError,
};
pub use tree::{filter, map, traverse, Leaf, Node, Tree};
