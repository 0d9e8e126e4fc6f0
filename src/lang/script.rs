use crate::lang::adapter::{categorize, Adapter, LowerContext};
use crate::tree::Node;

/// Adapter for the JavaScript and TypeScript grammars.
///
/// Offsets live on the node itself, so shaping converts them to UTF-16 and
/// normalization only has to assign categories.
pub struct ScriptAdapter;

impl Adapter for ScriptAdapter {
    fn shape(&self, native: tree_sitter::Node<'_>, ctx: &LowerContext<'_>) -> Node {
        Node::with_span(
            native.kind(),
            ctx.offsets.to_utf16(native.start_byte()),
            ctx.offsets.to_utf16(native.end_byte()),
        )
        .with_raw(native.kind(), ctx.grammar.name())
    }

    fn normalize(&self, node: Node) -> Node {
        categorize(node)
    }
}
