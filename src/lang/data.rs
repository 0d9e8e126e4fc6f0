use crate::lang::adapter::{categorize, int_leaf, Adapter, LowerContext};
use crate::tree::{Node, Tree};
use tree_sitter::Point;

/// Field holding a data node's location record.
pub const LOC: &str = "loc";

/// Adapter for the JSON grammar.
///
/// Data nodes keep their position in a nested location record
/// (`loc.start.offset`, `loc.end.offset`, plus 1-based `line`/`column`)
/// instead of inline offsets. Normalization has to lift the offsets out of
/// that record for every node; a node whose record lacks a numeric offset
/// ends up without one and is skipped by cursor queries.
pub struct DataAdapter;

impl Adapter for DataAdapter {
    fn shape(&self, native: tree_sitter::Node<'_>, ctx: &LowerContext<'_>) -> Node {
        let range = native.range();
        let loc = Tree::Record(vec![
            (
                "start".to_string(),
                position(ctx, range.start_byte, range.start_point),
            ),
            (
                "end".to_string(),
                position(ctx, range.end_byte, range.end_point),
            ),
        ]);

        Node::new(native.kind())
            .with_raw(native.kind(), ctx.grammar.name())
            .with_field(LOC, loc)
    }

    fn normalize(&self, mut node: Node) -> Node {
        node.start = location_offset(&node, "start");
        node.end = location_offset(&node, "end");
        categorize(node)
    }
}

fn position(ctx: &LowerContext<'_>, byte: usize, point: Point) -> Tree {
    let offset = ctx.offsets.to_utf16(byte);
    let line_start = ctx.offsets.to_utf16(byte - point.column.min(byte));
    Tree::Record(vec![
        ("line".to_string(), int_leaf(point.row + 1)),
        ("column".to_string(), int_leaf(offset - line_start + 1)),
        ("offset".to_string(), int_leaf(offset)),
    ])
}

/// `loc.<edge>.offset` as an offset, if present and numeric.
fn location_offset(node: &Node, edge: &str) -> Option<usize> {
    node.field(LOC)
        .and_then(|loc| loc.get(edge))
        .and_then(|position| position.get("offset"))
        .and_then(Tree::as_offset)
}
