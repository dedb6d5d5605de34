use std::collections::HashSet;

use parchment_core::{DocumentTree, NodeId, NodeKind, Selection};

/// True iff `node` names a live List container.
pub fn is_list(tree: &DocumentTree, node: Option<NodeId>) -> bool {
    node.and_then(|id| tree.kind(id))
        .is_some_and(NodeKind::is_list)
}

/// True iff `node` names a live ListItem.
pub fn is_list_item(tree: &DocumentTree, node: Option<NodeId>) -> bool {
    node.and_then(|id| tree.kind(id))
        .is_some_and(NodeKind::is_list_item)
}

/// True iff `node` is a ListItem whose first child is a List, i.e. an item
/// whose structural role is wrapping one extra nesting level.
pub fn is_nested_list_item(tree: &DocumentTree, node: Option<NodeId>) -> bool {
    let Some(id) = node else {
        return false;
    };
    is_list_item(tree, Some(id)) && is_list(tree, tree.first_child(id))
}

/// Walk the ancestor chain (inclusive of `node` itself) and return the
/// nearest enclosing ListItem, or `None` when the root is reached first.
pub fn nearest_list_item(tree: &DocumentTree, node: NodeId) -> Option<NodeId> {
    let mut current = Some(node);
    while let Some(id) = current {
        if is_list_item(tree, Some(id)) {
            return Some(id);
        }
        current = tree.parent(id);
    }
    None
}

/// Structural nesting depth of a list item: the number of List ancestors
/// enclosing it. A top-level item sits at depth 1; indent/outdent move an
/// item by exactly one depth level.
pub fn list_item_depth(tree: &DocumentTree, item: NodeId) -> usize {
    let mut depth = 0;
    let mut current = tree.parent(item);
    while let Some(id) = current {
        if is_list(tree, Some(id)) {
            depth += 1;
        }
        current = tree.parent(id);
    }
    depth
}

/// Resolve the current selection to the unique ListItems a single command
/// applies to, in first-occurrence order.
///
/// An empty node set falls back to the anchor node. A single candidate is
/// resolved through the ancestor walk (the caret usually sits inside an
/// item's content, not on the item itself). Multiple candidates keep only
/// the nodes that are themselves ListItems, deduplicated by node identity.
pub fn selected_list_items(tree: &DocumentTree, selection: Option<&Selection>) -> Vec<NodeId> {
    let Some(selection) = selection else {
        return Vec::new();
    };
    let nodes = selection.nodes();

    if nodes.len() <= 1 {
        let candidate = nodes
            .first()
            .copied()
            .unwrap_or_else(|| selection.anchor_node());
        return nearest_list_item(tree, candidate).into_iter().collect();
    }

    let mut seen = HashSet::new();
    let mut items = Vec::new();
    for &node in nodes {
        if is_list_item(tree, Some(node)) && seen.insert(node) {
            items.push(node);
        }
    }
    items
}
