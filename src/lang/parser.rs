use crate::lang::errors::ParseError;
use crate::lang::family::Grammar;
use crate::text::OffsetMap;
use ast_grep_language::LanguageExt;
use tree_sitter::{Parser, Tree};

/// Tree-sitter parser wrapper for one grammar.
///
/// The grammars are already as lenient as a fragment needs: there is no
/// module-versus-script mode, `return` and `await` are accepted at the top
/// level, `import`/`export` are ordinary statements that may appear in any
/// block, and `super` is a plain expression. Nothing has to be switched off.
pub struct SourceParser {
    parser: Parser,
    grammar: Grammar,
}

impl SourceParser {
    /// Create a parser for the given grammar.
    pub fn new(grammar: Grammar) -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        let ts_lang = grammar.support_lang().get_ts_language();
        parser
            .set_language(&ts_lang)
            .map_err(|_| ParseError::LanguageSet {
                grammar: grammar.name(),
            })?;

        Ok(Self { parser, grammar })
    }

    /// Parse source code and return the tree along with the source.
    pub fn parse<'a>(&mut self, source: &'a str) -> Result<ParsedSource<'a>, ParseError> {
        let tree = self.parser.parse(source, None).ok_or(ParseError::Aborted)?;
        Ok(ParsedSource {
            source,
            tree,
            grammar: self.grammar,
        })
    }
}

/// A parsed source text with its tree-sitter tree.
pub struct ParsedSource<'a> {
    pub source: &'a str,
    pub tree: Tree,
    pub grammar: Grammar,
}

impl<'a> ParsedSource<'a> {
    /// Get the root node of the tree.
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Check if the tree contains any ERROR or MISSING nodes.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Get all ERROR and MISSING nodes in the tree, in document order.
    pub fn error_nodes(&self) -> Vec<ErrorNode> {
        let mut errors = Vec::new();
        collect_error_nodes(self.tree.root_node(), &mut errors);
        errors
    }

    /// Reject a tree containing any error: either the whole source parsed or
    /// nothing did.
    pub fn ensure_complete(&self, offsets: &OffsetMap) -> Result<(), ParseError> {
        if !self.has_errors() {
            return Ok(());
        }

        let errors = self.error_nodes();
        let first = errors.first().map(|e| (e.byte_start, e.start_point, e.missing));
        let (byte, point, missing) =
            first.unwrap_or((0, tree_sitter::Point { row: 0, column: 0 }, false));
        let offset = offsets.to_utf16(byte);
        let line_start = offsets.to_utf16(byte - point.column.min(byte));

        Err(ParseError::Syntax {
            line: point.row + 1,
            column: offset - line_start + 1,
            offset,
            count: errors.len().max(1),
            missing,
        })
    }
}

/// Information about an ERROR or MISSING node in the parse tree.
#[derive(Debug, Clone)]
pub struct ErrorNode {
    pub byte_start: usize,
    pub start_point: tree_sitter::Point,
    /// The parser inserted a token the source lacks
    pub missing: bool,
}

fn collect_error_nodes(node: tree_sitter::Node<'_>, errors: &mut Vec<ErrorNode>) {
    if node.is_error() || node.is_missing() {
        errors.push(ErrorNode {
            byte_start: node.start_byte(),
            start_point: node.start_position(),
            missing: node.is_missing(),
        });
    }

    if !node.has_error() {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(grammar: Grammar, source: &str) -> Result<(), ParseError> {
        let mut parser = SourceParser::new(grammar).unwrap();
        let parsed = parser.parse(source)?;
        parsed.ensure_complete(&OffsetMap::new(source))
    }

    #[test]
    fn parse_valid_javascript() {
        let mut parser = SourceParser::new(Grammar::JavaScript).unwrap();
        let parsed = parser.parse("(\"String contents\")").unwrap();

        assert!(!parsed.has_errors());
        assert_eq!(parsed.root_node().kind(), "program");
    }

    #[test]
    fn parse_invalid_javascript() {
        let mut parser = SourceParser::new(Grammar::JavaScript).unwrap();
        let parsed = parser.parse("not valid js +++").unwrap();

        assert!(parsed.has_errors());
        assert!(!parsed.error_nodes().is_empty());
    }

    #[test]
    fn fragments_parse_leniently() {
        assert!(parse(Grammar::JavaScript, "return 42;").is_ok());
        assert!(parse(Grammar::JavaScript, "await fetchThing();").is_ok());
        assert!(parse(Grammar::JavaScript, "super.method();").is_ok());
        assert!(parse(Grammar::JavaScript, "import a from 'a';\nreturn a;").is_ok());
        assert!(parse(Grammar::TypeScript, "const x: number = await f();").is_ok());
    }

    #[test]
    fn jsx_parses_with_script_and_tsx_grammars() {
        assert!(parse(Grammar::JavaScript, "const el = <div className=\"a\" />;").is_ok());
        assert!(parse(Grammar::Tsx, "const el: JSX.Element = <div />;").is_ok());
    }

    #[test]
    fn error_kind_follows_first_error_node() {
        for source in ["f(1", "let = ;", "{ a: }"] {
            let err = parse(Grammar::JavaScript, source).unwrap_err();
            let ParseError::Syntax { missing, .. } = err else {
                panic!("unexpected error: {err:?}");
            };
            let expected = if missing { "missing token" } else { "syntax error" };
            assert!(err.to_string().starts_with(expected), "{source}: {err}");
        }
    }

    #[test]
    fn syntax_error_reports_position() {
        let err = parse(Grammar::Json, "{\n  \"a\": }").unwrap_err();
        match err {
            ParseError::Syntax {
                line,
                column,
                count,
                ..
            } => {
                assert!((1..=2).contains(&line));
                assert!(column >= 1);
                assert!(count >= 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
