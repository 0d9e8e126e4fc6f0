use crate::lang::adapter::{adapter_for, lower, normalize_with, LowerContext};
use crate::lang::errors::{DispatchError, ParseError};
use crate::lang::family::{Family, Grammar, LanguageTable};
use crate::lang::parser::SourceParser;
use crate::text::OffsetMap;
use crate::tree::Tree;
use log::debug;

/// Parse `source` as `language_id` and normalize the result.
///
/// The identifier is classified by prefix against `table`. Unrecognized
/// identifiers fail before any grammar runs; sources with any syntax error
/// fail as a whole.
pub fn parse(source: &str, language_id: &str, table: &LanguageTable) -> Result<Tree, DispatchError> {
    let Some(family) = table.classify(language_id) else {
        debug!("no language family for '{language_id}'");
        return Err(DispatchError::UnsupportedLanguage {
            language: language_id.to_string(),
            suggestion: table.suggest(language_id).map(str::to_string),
        });
    };

    let grammar = Grammar::select(family, language_id);
    debug!(
        "parsing {} bytes of '{language_id}' with the {} grammar",
        source.len(),
        grammar.name()
    );

    parse_with_grammar(source, grammar).map_err(|source| {
        debug!("parse of '{language_id}' failed: {source}");
        DispatchError::ParseFailure {
            language: language_id.to_string(),
            source,
        }
    })
}

/// Parse with an explicit grammar, skipping classification.
pub fn parse_with_grammar(source: &str, grammar: Grammar) -> Result<Tree, ParseError> {
    let mut parser = SourceParser::new(grammar)?;
    let parsed = parser.parse(source)?;

    let offsets = OffsetMap::new(source);
    parsed.ensure_complete(&offsets)?;

    let ctx = LowerContext {
        source,
        offsets: &offsets,
        grammar: parsed.grammar,
    };
    let adapter = adapter_for(parsed.grammar.family());
    let lowered = lower(parsed.root_node(), &ctx, adapter);

    Ok(normalize_with(lowered, adapter))
}

/// Normalize a tree lowered from a grammar of `family`. Running it again on
/// its own output is a no-op.
pub fn normalize(tree: Tree, family: Family) -> Tree {
    normalize_with(tree, adapter_for(family))
}
