//! Editor-facing commands.
//!
//! Each call runs the whole pipeline for one invocation: parse the current
//! text, query the fresh tree, project the chosen node to a [`Boundary`],
//! and, for editing commands, build the [`Modification`] batch. Nothing is
//! kept between calls. Finding no enclosing construct is not an error; it
//! yields `None` or an empty batch.
//!
//! The `*_at` variants take every cursor of a multi-cursor selection and
//! return a single batch for all of them.

use crate::config::EngineConfig;
use crate::edit::Modification;
use crate::lang::{self, DispatchError, LanguageTable};
use crate::query::{self, Pick};
use crate::span::{boundary_of, shrink, Boundary, BoundaryError};
use crate::tree::{Node, Tree};
use log::debug;
use serde::Serialize;
use std::cmp::Reverse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Boundary(#[from] BoundaryError),
}

/// A node detached from its tree, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSummary {
    pub kind: String,
    pub native_kind: String,
    pub boundary: Boundary,
}

impl NodeSummary {
    fn from_node(node: &Node) -> Option<Self> {
        Some(Self {
            kind: node.kind.clone(),
            native_kind: node.native_kind().to_string(),
            boundary: boundary_of(node)?,
        })
    }
}

/// Entry point for the editor integration.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    languages: LanguageTable,
}

impl Engine {
    pub fn new(languages: LanguageTable) -> Self {
        Self { languages }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.language_table())
    }

    /// Parse and normalize `source`.
    pub fn parse(&self, source: &str, language: &str) -> Result<Tree, DispatchError> {
        lang::parse(source, language, &self.languages)
    }

    /// Quote-to-quote boundary of the string under `cursor`.
    pub fn string_boundary(
        &self,
        source: &str,
        language: &str,
        cursor: usize,
    ) -> Result<Option<Boundary>, CommandError> {
        let tree = self.parse(source, language)?;
        let boundary = query::enclosing_string(&tree, cursor, Pick::Outermost).and_then(boundary_of);
        debug!("string at {cursor}: {boundary:?}");
        Ok(boundary)
    }

    /// Boundary of the string's contents, quotes excluded.
    pub fn string_contents(
        &self,
        source: &str,
        language: &str,
        cursor: usize,
    ) -> Result<Option<Boundary>, CommandError> {
        self.string_boundary(source, language, cursor)?
            .map(shrink)
            .transpose()
            .map_err(CommandError::from)
    }

    /// Brace-to-brace boundary of the block surrounding `cursor`.
    pub fn block_boundary(
        &self,
        source: &str,
        language: &str,
        cursor: usize,
        pick: Pick,
    ) -> Result<Option<Boundary>, CommandError> {
        let tree = self.parse(source, language)?;
        let boundary = query::enclosing_block(&tree, cursor, pick).and_then(boundary_of);
        debug!("{pick:?} block at {cursor}: {boundary:?}");
        Ok(boundary)
    }

    /// Boundary of the block's contents, braces excluded.
    pub fn block_contents(
        &self,
        source: &str,
        language: &str,
        cursor: usize,
        pick: Pick,
    ) -> Result<Option<Boundary>, CommandError> {
        self.block_boundary(source, language, cursor, pick)?
            .map(shrink)
            .transpose()
            .map_err(CommandError::from)
    }

    /// Empty the string under `cursor`, keeping its quotes.
    pub fn delete_string_contents(
        &self,
        source: &str,
        language: &str,
        cursor: usize,
    ) -> Result<Vec<Modification>, CommandError> {
        self.delete_string_contents_at(source, language, &[cursor])
    }

    /// Empty the string under each cursor, in one batch.
    pub fn delete_string_contents_at(
        &self,
        source: &str,
        language: &str,
        cursors: &[usize],
    ) -> Result<Vec<Modification>, CommandError> {
        let targets = self.string_targets(source, language, cursors)?;
        Ok(targets.into_iter().map(Modification::delete).collect())
    }

    /// Replace the contents of the string under `cursor`.
    pub fn replace_string_contents(
        &self,
        source: &str,
        language: &str,
        cursor: usize,
        value: &str,
    ) -> Result<Vec<Modification>, CommandError> {
        self.replace_string_contents_at(source, language, &[cursor], value)
    }

    /// Replace the contents of the string under each cursor, in one batch.
    pub fn replace_string_contents_at(
        &self,
        source: &str,
        language: &str,
        cursors: &[usize],
        value: &str,
    ) -> Result<Vec<Modification>, CommandError> {
        let targets = self.string_targets(source, language, cursors)?;
        Ok(targets
            .into_iter()
            .map(|boundary| Modification::replace(boundary, value))
            .collect())
    }

    /// Remove the block surrounding `cursor`, braces included.
    pub fn delete_block(
        &self,
        source: &str,
        language: &str,
        cursor: usize,
        pick: Pick,
    ) -> Result<Vec<Modification>, CommandError> {
        self.delete_block_at(source, language, &[cursor], pick)
    }

    /// Remove the block surrounding each cursor, in one batch.
    pub fn delete_block_at(
        &self,
        source: &str,
        language: &str,
        cursors: &[usize],
        pick: Pick,
    ) -> Result<Vec<Modification>, CommandError> {
        let targets = self.block_targets(source, language, cursors, pick, false)?;
        Ok(targets.into_iter().map(Modification::delete).collect())
    }

    /// Empty the block surrounding `cursor`, keeping its braces.
    pub fn delete_block_contents(
        &self,
        source: &str,
        language: &str,
        cursor: usize,
        pick: Pick,
    ) -> Result<Vec<Modification>, CommandError> {
        self.delete_block_contents_at(source, language, &[cursor], pick)
    }

    /// Empty the block surrounding each cursor, in one batch.
    pub fn delete_block_contents_at(
        &self,
        source: &str,
        language: &str,
        cursors: &[usize],
        pick: Pick,
    ) -> Result<Vec<Modification>, CommandError> {
        let targets = self.block_targets(source, language, cursors, pick, true)?;
        Ok(targets.into_iter().map(Modification::delete).collect())
    }

    /// Contents of the string under each cursor. One parse serves all
    /// cursors.
    fn string_targets(
        &self,
        source: &str,
        language: &str,
        cursors: &[usize],
    ) -> Result<Vec<Boundary>, CommandError> {
        let tree = self.parse(source, language)?;
        let strings = cursors.iter().filter_map(|&cursor| {
            query::enclosing_string(&tree, cursor, Pick::Outermost).and_then(boundary_of)
        });
        let contents = strings.map(shrink).collect::<Result<Vec<_>, _>>()?;
        Ok(merge_targets(contents))
    }

    fn block_targets(
        &self,
        source: &str,
        language: &str,
        cursors: &[usize],
        pick: Pick,
        contents: bool,
    ) -> Result<Vec<Boundary>, CommandError> {
        let tree = self.parse(source, language)?;
        let blocks = cursors.iter().filter_map(|&cursor| {
            query::enclosing_block(&tree, cursor, pick).and_then(boundary_of)
        });
        let targets = if contents {
            blocks.map(shrink).collect::<Result<Vec<_>, _>>()?
        } else {
            blocks.collect()
        };
        Ok(merge_targets(targets))
    }

    /// Every node touching `cursor`, outermost first.
    pub fn nodes_at(
        &self,
        source: &str,
        language: &str,
        cursor: usize,
    ) -> Result<Vec<NodeSummary>, DispatchError> {
        let tree = self.parse(source, language)?;
        Ok(query::nodes_at(&tree, cursor)
            .into_iter()
            .filter_map(NodeSummary::from_node)
            .collect())
    }
}

/// Collapse the targets of several cursors into a batch `edit::apply`
/// accepts: duplicates go, and a target nested in another is dropped in
/// favour of the outer one. The result is ordered by start.
fn merge_targets(mut targets: Vec<Boundary>) -> Vec<Boundary> {
    targets.sort_by_key(|boundary| (boundary.start, Reverse(boundary.end)));

    let mut merged: Vec<Boundary> = Vec::with_capacity(targets.len());
    for target in targets {
        match merged.last() {
            Some(outer) if outer.contains_boundary(&target) => {
                debug!("dropping {target:?}, already covered by {outer:?}");
            }
            _ => merged.push(target),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::apply;
    use crate::lang::Family;

    #[test]
    fn string_contents_exclude_quotes() {
        let engine = Engine::default();
        let source = "(\"String contents\")";
        assert_eq!(
            engine.string_boundary(source, "javascript", 5).unwrap(),
            Some(Boundary::new(1, 18))
        );
        assert_eq!(
            engine.string_contents(source, "javascript", 5).unwrap(),
            Some(Boundary::new(2, 17))
        );
    }

    #[test]
    fn delete_string_contents_keeps_quotes() {
        let engine = Engine::default();
        let source = "const s = 'hello';";
        let batch = engine.delete_string_contents(source, "javascript", 12).unwrap();
        assert_eq!(apply(source, &batch).unwrap(), "const s = '';");
    }

    #[test]
    fn replace_string_contents() {
        let engine = Engine::default();
        let source = "{\"a\": \"x\"}";
        let batch = engine.replace_string_contents(source, "json", 7, "yz").unwrap();
        assert_eq!(apply(source, &batch).unwrap(), "{\"a\": \"yz\"}");
    }

    #[test]
    fn empty_string_has_empty_contents() {
        let engine = Engine::default();
        let batch = engine.delete_string_contents("f('')", "javascript", 3).unwrap();
        assert_eq!(batch, vec![Modification::delete(Boundary::new(3, 3))]);
    }

    #[test]
    fn delete_block_variants() {
        let engine = Engine::default();
        let source = "if (a) { if (b) { c(); } }";

        let outer = engine.delete_block(source, "javascript", 19, Pick::Outermost).unwrap();
        assert_eq!(apply(source, &outer).unwrap(), "if (a) ");

        let inner = engine
            .delete_block_contents(source, "javascript", 19, Pick::Innermost)
            .unwrap();
        assert_eq!(apply(source, &inner).unwrap(), "if (a) { if (b) {} }");
    }

    #[test]
    fn nothing_enclosing_is_empty() {
        let engine = Engine::default();
        assert!(engine
            .delete_string_contents("let x = 1;", "javascript", 4)
            .unwrap()
            .is_empty());
        assert_eq!(
            engine.block_boundary("let x = 1;", "javascript", 4, Pick::Outermost).unwrap(),
            None
        );
    }

    #[test]
    fn failures_surface_as_dispatch_errors() {
        let engine = Engine::default();
        assert!(matches!(
            engine.string_boundary("x", "ruby", 0),
            Err(CommandError::Dispatch(DispatchError::UnsupportedLanguage { .. }))
        ));
        assert!(matches!(
            engine.string_boundary("not valid js +++", "javascript", 0),
            Err(CommandError::Dispatch(DispatchError::ParseFailure { .. }))
        ));
    }

    #[test]
    fn cursors_in_two_strings_make_one_batch() {
        let engine = Engine::default();
        let source = "f('ab', 'cd');";
        let batch = engine
            .replace_string_contents_at(source, "javascript", &[10, 3], "x")
            .unwrap();

        assert_eq!(
            batch,
            vec![
                Modification::replace(Boundary::new(3, 5), "x"),
                Modification::replace(Boundary::new(9, 11), "x"),
            ]
        );
        assert_eq!(apply(source, &batch).unwrap(), "f('x', 'x');");
    }

    #[test]
    fn cursors_in_the_same_string_share_a_target() {
        let engine = Engine::default();
        let source = "f('abcd');";
        let batch = engine
            .delete_string_contents_at(source, "javascript", &[3, 5, 2])
            .unwrap();

        assert_eq!(batch, vec![Modification::delete(Boundary::new(3, 7))]);
        assert_eq!(apply(source, &batch).unwrap(), "f('');");
    }

    #[test]
    fn nested_block_targets_collapse_into_the_outer_one() {
        let engine = Engine::default();
        let source = "if (a) { if (b) { c(); } }";
        let batch = engine
            .delete_block_contents_at(source, "javascript", &[19, 9], Pick::Innermost)
            .unwrap();

        assert_eq!(batch, vec![Modification::delete(Boundary::new(8, 25))]);
        assert_eq!(apply(source, &batch).unwrap(), "if (a) {}");
    }

    #[test]
    fn cursors_outside_any_construct_are_skipped() {
        let engine = Engine::default();
        let source = "x; { y; } z;";
        let batch = engine
            .delete_block_at(source, "javascript", &[0, 5, 11], Pick::Outermost)
            .unwrap();
        assert_eq!(batch, vec![Modification::delete(Boundary::new(3, 9))]);
    }

    #[test]
    fn merge_keeps_disjoint_targets_sorted() {
        let merged = merge_targets(vec![
            Boundary::new(10, 12),
            Boundary::new(0, 8),
            Boundary::new(2, 4),
            Boundary::new(10, 12),
        ]);
        assert_eq!(merged, vec![Boundary::new(0, 8), Boundary::new(10, 12)]);
    }

    #[test]
    fn engine_uses_configured_languages() {
        let engine = Engine::new(LanguageTable::builtin().with_prefix("mjs", Family::Script));
        assert!(engine.string_boundary("'a'", "mjs", 1).unwrap().is_some());
    }

    #[test]
    fn nodes_at_reports_summaries() {
        let engine = Engine::default();
        let nodes = engine.nodes_at("f('ab');", "javascript", 3).unwrap();
        let string = nodes.iter().find(|n| n.kind == "string").unwrap();
        assert_eq!(string.native_kind, "string");
        assert_eq!(string.boundary, Boundary::new(2, 6));
    }
}
