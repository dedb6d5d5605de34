use parchment_core::{DocumentTree, ListTag, NodeId, NodeKind, TreeValue, ValueNode};
use parchment_lists::{indent_list_items, list_item_depth, nearest_list_item};
use pretty_assertions::assert_eq;

fn load(root: ValueNode) -> DocumentTree {
    DocumentTree::from_value(&TreeValue::from_root(root))
}

fn leaf(text: &str) -> ValueNode {
    ValueNode::item(vec![ValueNode::text(text)])
}

fn wrapper(tag: ListTag, children: Vec<ValueNode>) -> ValueNode {
    ValueNode::item(vec![ValueNode::list(tag, children)])
}

fn text_node(tree: &DocumentTree, needle: &str) -> NodeId {
    fn walk(tree: &DocumentTree, id: NodeId, needle: &str) -> Option<NodeId> {
        if let Some(NodeKind::Text { text }) = tree.kind(id) {
            if text == needle {
                return Some(id);
            }
        }
        for &child in tree.children(id) {
            if let Some(found) = walk(tree, child, needle) {
                return Some(found);
            }
        }
        None
    }
    walk(tree, tree.root(), needle).unwrap_or_else(|| panic!("no text node {needle:?}"))
}

fn item_of(tree: &DocumentTree, needle: &str) -> NodeId {
    nearest_list_item(tree, text_node(tree, needle)).expect("text is not inside a list item")
}

#[test]
fn indent_synthesizes_a_wrapper_when_no_neighbor_is_nested() {
    let mut tree = load(ValueNode::root(vec![ValueNode::list(
        ListTag::Bulleted,
        vec![leaf("a"), leaf("b"), leaf("c")],
    )]));
    let b = item_of(&tree, "b");
    assert_eq!(list_item_depth(&tree, b), 1);

    indent_list_items(&mut tree, &[b]);

    assert_eq!(
        tree.to_value().root,
        ValueNode::root(vec![ValueNode::list(
            ListTag::Bulleted,
            vec![
                leaf("a"),
                wrapper(ListTag::Bulleted, vec![leaf("b")]),
                leaf("c"),
            ],
        )]),
    );
    assert_eq!(list_item_depth(&tree, b), 2);
}

#[test]
fn indent_places_the_wrapper_before_the_next_sibling_for_a_first_item() {
    let mut tree = load(ValueNode::root(vec![ValueNode::list(
        ListTag::Bulleted,
        vec![leaf("a"), leaf("b")],
    )]));
    let a = item_of(&tree, "a");

    indent_list_items(&mut tree, &[a]);

    assert_eq!(
        tree.to_value().root,
        ValueNode::root(vec![ValueNode::list(
            ListTag::Bulleted,
            vec![wrapper(ListTag::Bulleted, vec![leaf("a")]), leaf("b")],
        )]),
    );
}

#[test]
fn indent_keeps_an_only_child_in_its_parent() {
    let mut tree = load(ValueNode::root(vec![ValueNode::list(
        ListTag::Bulleted,
        vec![leaf("only")],
    )]));
    let only = item_of(&tree, "only");

    indent_list_items(&mut tree, &[only]);

    assert_eq!(
        tree.to_value().root,
        ValueNode::root(vec![ValueNode::list(
            ListTag::Bulleted,
            vec![wrapper(ListTag::Bulleted, vec![leaf("only")])],
        )]),
    );
}

#[test]
fn indent_copies_the_parent_list_tag_into_the_new_wrapper() {
    let mut tree = load(ValueNode::root(vec![ValueNode::list(
        ListTag::Ordered,
        vec![leaf("a"), leaf("b")],
    )]));
    let b = item_of(&tree, "b");

    indent_list_items(&mut tree, &[b]);

    assert_eq!(
        tree.to_value().root,
        ValueNode::root(vec![ValueNode::list(
            ListTag::Ordered,
            vec![leaf("a"), wrapper(ListTag::Ordered, vec![leaf("b")])],
        )]),
    );
}

#[test]
fn indent_appends_into_a_nested_list_on_the_previous_side() {
    let mut tree = load(ValueNode::root(vec![ValueNode::list(
        ListTag::Bulleted,
        vec![
            wrapper(ListTag::Bulleted, vec![leaf("a1"), leaf("a2")]),
            leaf("b"),
        ],
    )]));
    let b = item_of(&tree, "b");

    indent_list_items(&mut tree, &[b]);

    assert_eq!(
        tree.to_value().root,
        ValueNode::root(vec![ValueNode::list(
            ListTag::Bulleted,
            vec![wrapper(
                ListTag::Bulleted,
                vec![leaf("a1"), leaf("a2"), leaf("b")],
            )],
        )]),
    );
}

#[test]
fn indent_prepends_into_a_nested_list_on_the_next_side() {
    let mut tree = load(ValueNode::root(vec![ValueNode::list(
        ListTag::Bulleted,
        vec![leaf("b"), wrapper(ListTag::Bulleted, vec![leaf("c1")])],
    )]));
    let b = item_of(&tree, "b");

    indent_list_items(&mut tree, &[b]);

    assert_eq!(
        tree.to_value().root,
        ValueNode::root(vec![ValueNode::list(
            ListTag::Bulleted,
            vec![wrapper(ListTag::Bulleted, vec![leaf("b"), leaf("c1")])],
        )]),
    );
}

#[test]
fn indent_merges_nested_lists_on_both_sides_and_drops_the_drained_wrapper() {
    let mut tree = load(ValueNode::root(vec![ValueNode::list(
        ListTag::Bulleted,
        vec![
            wrapper(ListTag::Bulleted, vec![leaf("a1")]),
            leaf("b"),
            wrapper(ListTag::Bulleted, vec![leaf("c1")]),
        ],
    )]));
    let b = item_of(&tree, "b");

    indent_list_items(&mut tree, &[b]);

    // One inner list [a1, b, c1]; the second wrapper is gone entirely.
    assert_eq!(
        tree.to_value().root,
        ValueNode::root(vec![ValueNode::list(
            ListTag::Bulleted,
            vec![wrapper(
                ListTag::Bulleted,
                vec![leaf("a1"), leaf("b"), leaf("c1")],
            )],
        )]),
    );
}

#[test]
fn indent_skips_nested_wrapper_items() {
    let before = ValueNode::root(vec![ValueNode::list(
        ListTag::Bulleted,
        vec![wrapper(ListTag::Bulleted, vec![leaf("inner")]), leaf("b")],
    )]);
    let mut tree = load(before.clone());
    let wrapper_item = tree
        .children(tree.children(tree.root())[0])
        .first()
        .copied()
        .expect("wrapper item");

    indent_list_items(&mut tree, &[wrapper_item]);

    assert_eq!(tree.to_value().root, before);
}

#[test]
fn indenting_twice_nests_twice() {
    let mut tree = load(ValueNode::root(vec![ValueNode::list(
        ListTag::Bulleted,
        vec![leaf("a"), leaf("b")],
    )]));
    let b = item_of(&tree, "b");

    indent_list_items(&mut tree, &[b]);
    indent_list_items(&mut tree, &[b]);

    assert_eq!(list_item_depth(&tree, b), 3);
    assert_eq!(
        tree.to_value().root,
        ValueNode::root(vec![ValueNode::list(
            ListTag::Bulleted,
            vec![
                leaf("a"),
                wrapper(
                    ListTag::Bulleted,
                    vec![wrapper(ListTag::Bulleted, vec![leaf("b")])],
                ),
            ],
        )]),
    );
}

#[test]
fn later_targets_observe_earlier_transforms_in_the_same_batch() {
    let mut tree = load(ValueNode::root(vec![ValueNode::list(
        ListTag::Bulleted,
        vec![leaf("a"), leaf("b"), leaf("c")],
    )]));
    let b = item_of(&tree, "b");
    let c = item_of(&tree, "c");

    indent_list_items(&mut tree, &[b, c]);

    // c joins the nested list created for b instead of growing its own.
    assert_eq!(
        tree.to_value().root,
        ValueNode::root(vec![ValueNode::list(
            ListTag::Bulleted,
            vec![
                leaf("a"),
                wrapper(ListTag::Bulleted, vec![leaf("b"), leaf("c")]),
            ],
        )]),
    );
}

#[test]
fn indent_marks_the_restructured_lists_dirty() {
    let mut tree = load(ValueNode::root(vec![ValueNode::list(
        ListTag::Bulleted,
        vec![leaf("a"), leaf("b"), leaf("c")],
    )]));
    let a = item_of(&tree, "a");
    let b = item_of(&tree, "b");
    let c = item_of(&tree, "c");
    tree.take_dirty();

    indent_list_items(&mut tree, &[b]);

    let dirty = tree.take_dirty();
    let new_wrapper = tree.next_sibling(a).expect("wrapper item");
    assert!(dirty.contains(&b));
    assert!(dirty.contains(&a));
    assert!(dirty.contains(&c));
    assert!(dirty.contains(&new_wrapper));
}
