//! Language dispatch and normalization.
//!
//! A language identifier is classified into a [`Family`], the matching
//! tree-sitter grammar parses the source, and the family's [`Adapter`]
//! turns the native tree into the normalized [`Tree`](crate::tree::Tree).

pub mod adapter;
pub mod data;
pub mod dispatch;
pub mod errors;
pub mod family;
pub mod parser;
pub mod script;

pub use adapter::{adapter_for, Adapter, LowerContext};
pub use dispatch::{normalize, parse, parse_with_grammar};
pub use errors::{DispatchError, ParseError};
pub use family::{Family, Grammar, LanguageTable};
pub use parser::{ParsedSource, SourceParser};
