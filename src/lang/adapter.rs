//! Lowering of native tree-sitter trees into [`Tree`] values.
//!
//! Lowering is shared: every named native node becomes a [`Node`], labelled
//! children go under their field name, unlabelled ones under
//! [`CHILDREN`], anonymous tokens with a field label become string leaves,
//! and other anonymous tokens (punctuation) are dropped. Named nodes with no
//! named children carry their source text in a `text` leaf.
//!
//! What differs per family is the record shape and how it is normalized,
//! which is the job of an [`Adapter`].

use crate::lang::data::DataAdapter;
use crate::lang::family::{Family, Grammar};
use crate::lang::script::ScriptAdapter;
use crate::text::OffsetMap;
use crate::tree::{self, Fields, Leaf, Node, Tree, CHILDREN};

/// Field holding a named leaf's source text.
pub const TEXT: &str = "text";

/// Everything an adapter needs to shape one native node.
pub struct LowerContext<'a> {
    pub source: &'a str,
    pub offsets: &'a OffsetMap,
    pub grammar: Grammar,
}

/// Per-family conversion from a grammar's native shape to the Node Model.
pub trait Adapter: Sync {
    /// Build the record for one named native node, without its children.
    fn shape(&self, native: tree_sitter::Node<'_>, ctx: &LowerContext<'_>) -> Node;

    /// Turn a shaped record into a Node Model node. Applying it to its own
    /// output must change nothing.
    fn normalize(&self, node: Node) -> Node;
}

static SCRIPT: ScriptAdapter = ScriptAdapter;
static DATA: DataAdapter = DataAdapter;

/// The adapter for a language family. Script and typed-script grammars
/// share one native shape.
pub fn adapter_for(family: Family) -> &'static dyn Adapter {
    match family {
        Family::Script | Family::TypedScript => &SCRIPT,
        Family::Data => &DATA,
    }
}

/// Lower a native subtree.
pub fn lower(native: tree_sitter::Node<'_>, ctx: &LowerContext<'_>, adapter: &dyn Adapter) -> Tree {
    Tree::from(lower_node(native, ctx, adapter))
}

fn lower_node(native: tree_sitter::Node<'_>, ctx: &LowerContext<'_>, adapter: &dyn Adapter) -> Node {
    let mut node = adapter.shape(native, ctx);

    let mut cursor = native.walk();
    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            let field = cursor.field_name();

            if child.is_named() {
                let lowered = Tree::from(lower_node(child, ctx, adapter));
                push_field(&mut node.fields, field.unwrap_or(CHILDREN), lowered);
            } else if let Some(field) = field {
                push_field(&mut node.fields, field, Tree::from(child.kind()));
            }

            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }

    if native.named_child_count() == 0 {
        let text = &ctx.source[native.byte_range()];
        node.fields
            .push((TEXT.to_string(), Tree::Leaf(Leaf::Str(text.to_string()))));
    }

    node
}

/// Append to a field. `children` is always a sequence; any other field
/// becomes one the second time it is seen.
fn push_field(fields: &mut Fields, name: &str, value: Tree) {
    match fields.iter_mut().find(|(field, _)| field == name) {
        Some((_, Tree::Seq(items))) => items.push(value),
        Some((_, existing)) => {
            let first = std::mem::take(existing);
            *existing = Tree::Seq(vec![first, value]);
        }
        None if name == CHILDREN => fields.push((name.to_string(), Tree::Seq(vec![value]))),
        None => fields.push((name.to_string(), value)),
    }
}

/// Run an adapter's normalization over every node of a lowered tree.
pub fn normalize_with(tree: Tree, adapter: &dyn Adapter) -> Tree {
    tree::map(tree, |node| adapter.normalize(node))
}

/// Rewrite `kind` to the node's normalized category, if it has one.
pub(crate) fn categorize(mut node: Node) -> Node {
    if let Some(category) = tree::category(&node) {
        node.kind = category.to_string();
    }
    node
}

/// Clamp a `usize` into an integer leaf.
pub(crate) fn int_leaf(n: usize) -> Tree {
    Tree::from(i64::try_from(n).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_fields_become_sequences() {
        let mut fields = Vec::new();
        push_field(&mut fields, "decorator", Tree::from("a"));
        push_field(&mut fields, "decorator", Tree::from("b"));
        push_field(&mut fields, "decorator", Tree::from("c"));
        assert_eq!(
            fields,
            vec![(
                "decorator".to_string(),
                Tree::Seq(vec![Tree::from("a"), Tree::from("b"), Tree::from("c")])
            )]
        );
    }

    #[test]
    fn children_is_always_a_sequence() {
        let mut fields = Vec::new();
        push_field(&mut fields, CHILDREN, Tree::from(Node::new("x")));
        assert!(matches!(&fields[0].1, Tree::Seq(items) if items.len() == 1));
    }

    #[test]
    fn categorize_is_idempotent() {
        let node = Node::with_span("template_string", 0, 4).with_raw("template_string", "javascript");
        let once = categorize(node);
        assert_eq!(once.kind, "string");
        assert_eq!(categorize(once.clone()), once);
    }
}
