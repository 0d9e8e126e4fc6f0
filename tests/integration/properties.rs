use proptest::prelude::*;
use tbx::{
    contains_strictly, covers, filter, map, shrink, touches, traverse, Boundary, Engine, Node,
    Tree,
};

fn kind() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("string".to_string()),
        Just("block".to_string()),
        Just("identifier".to_string()),
    ]
}

fn arb_tree() -> impl Strategy<Value = Tree> {
    let leaf = prop_oneof![
        Just(Tree::Absent),
        any::<i64>().prop_map(Tree::from),
        "[a-z]{0,3}".prop_map(|s| Tree::from(s.as_str())),
        (kind(), 0usize..64, 0usize..64)
            .prop_map(|(k, a, b)| Tree::from(Node::with_span(k, a.min(b), a.max(b)))),
    ];

    leaf.prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Tree::from),
            prop::collection::vec(("[a-c]", inner.clone()), 0..3).prop_map(Tree::Record),
            (kind(), prop::collection::vec(("[a-c]", inner), 0..3)).prop_map(
                |(k, fields)| {
                    let node = fields
                        .into_iter()
                        .fold(Node::new(k), |node, (name, value)| node.with_field(name, value));
                    Tree::from(node)
                }
            ),
        ]
    })
}

proptest! {
    #[test]
    fn filter_is_a_subsequence_of_traversal(tree in arb_tree()) {
        let mut order: Vec<&Node> = Vec::new();
        traverse(&tree, |node| order.push(node));
        let matches = filter(&tree, |node| node.kind == "string");

        prop_assert!(matches.iter().all(|node| node.kind == "string"));

        let mut rest = order.iter();
        for node in &matches {
            prop_assert!(rest.any(|visited| std::ptr::eq(*visited, *node)));
        }

        let expected = order.iter().filter(|node| node.kind == "string").count();
        prop_assert_eq!(matches.len(), expected);
    }

    #[test]
    fn identity_map_preserves_tree(tree in arb_tree()) {
        prop_assert_eq!(map(tree.clone(), |node| node), tree);
    }

    #[test]
    fn containment_and_touch(start in 0usize..1000, width in 1usize..100, cursor in 0usize..1200) {
        let end = start + width;
        let node = Node::with_span("block", start, end);

        prop_assert_eq!(contains_strictly(cursor, &node), start < cursor && cursor < end);
        prop_assert_eq!(touches(cursor, &node), start <= cursor && cursor <= end);
        prop_assert_eq!(covers(cursor, &node), start <= cursor && cursor < end);
        prop_assert!(!contains_strictly(start, &node));
        prop_assert!(!contains_strictly(end, &node));
        prop_assert!(touches(start, &node) && touches(end, &node));
    }

    #[test]
    fn shrink_strips_one_unit_per_side(start in 0usize..1000, width in 0usize..100) {
        let boundary = Boundary::new(start, start + width);
        match shrink(boundary) {
            Ok(inner) => {
                prop_assert!(width >= 2);
                prop_assert_eq!(inner, Boundary::new(start + 1, start + width - 1));
            }
            Err(_) => prop_assert!(width < 2),
        }
    }

    #[test]
    fn string_contents_cover_the_literal(contents in "[a-zA-Z0-9 ]{0,12}", at in 0usize..14) {
        let source = format!("f(\"{contents}\");");
        let end = 3 + contents.len();
        // anywhere from the opening quote to the closing one
        let cursor = 2 + at.min(contents.len() + 1);

        let engine = Engine::default();
        let boundary = engine.string_contents(&source, "javascript", cursor).unwrap();
        prop_assert_eq!(boundary, Some(Boundary::new(3, end)));
    }
}
