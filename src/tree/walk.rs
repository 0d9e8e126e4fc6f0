//! Schema-free traversal over [`Tree`] values.
//!
//! All three passes share one order: pre-order, depth-first, left to right
//! over sequence elements and over a record's fields in the order they were
//! inserted. Only [`Tree::Node`] values are handed to callbacks; sequences
//! and plain records are descended without being visited. Leaves and
//! [`Tree::Absent`] end the descent.
//!
//! Because a parent is visited before its children, [`filter`] yields an
//! enclosing node before the nodes nested inside it. Take the first match
//! for the outermost construct and the last match for the innermost one.

use crate::tree::node::{Fields, Node, Tree};

/// Call `visit` on every node in pre-order.
pub fn traverse<'a, F>(tree: &'a Tree, mut visit: F)
where
    F: FnMut(&'a Node),
{
    traverse_tree(tree, &mut visit);
}

fn traverse_tree<'a, F>(tree: &'a Tree, visit: &mut F)
where
    F: FnMut(&'a Node),
{
    match tree {
        Tree::Node(node) => {
            visit(node);
            traverse_fields(&node.fields, visit);
        }
        Tree::Record(fields) => traverse_fields(fields, visit),
        Tree::Seq(items) => {
            for item in items {
                traverse_tree(item, visit);
            }
        }
        Tree::Leaf(_) | Tree::Absent => {}
    }
}

fn traverse_fields<'a, F>(fields: &'a Fields, visit: &mut F)
where
    F: FnMut(&'a Node),
{
    for (_, value) in fields {
        traverse_tree(value, visit);
    }
}

/// Every node satisfying `predicate`, in pre-order.
pub fn filter<'a, P>(tree: &'a Tree, mut predicate: P) -> Vec<&'a Node>
where
    P: FnMut(&Node) -> bool,
{
    let mut matches = Vec::new();
    traverse(tree, |node| {
        if predicate(node) {
            matches.push(node);
        }
    });
    matches
}

/// Rebuild the tree, replacing each node with `transform(node)` before its
/// fields are descended.
///
/// The transform sees the node with its original fields; whatever fields it
/// returns are the ones walked next.
pub fn map<F>(tree: Tree, mut transform: F) -> Tree
where
    F: FnMut(Node) -> Node,
{
    map_tree(tree, &mut transform)
}

fn map_tree<F>(tree: Tree, transform: &mut F) -> Tree
where
    F: FnMut(Node) -> Node,
{
    match tree {
        Tree::Node(node) => {
            let mut node = transform(*node);
            node.fields = map_fields(std::mem::take(&mut node.fields), transform);
            Tree::Node(Box::new(node))
        }
        Tree::Record(fields) => Tree::Record(map_fields(fields, transform)),
        Tree::Seq(items) => Tree::Seq(
            items
                .into_iter()
                .map(|item| map_tree(item, transform))
                .collect(),
        ),
        other => other,
    }
}

fn map_fields<F>(fields: Fields, transform: &mut F) -> Fields
where
    F: FnMut(Node) -> Node,
{
    fields
        .into_iter()
        .map(|(name, value)| (name, map_tree(value, transform)))
        .collect()
}
