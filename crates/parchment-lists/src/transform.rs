use parchment_core::{DocumentTree, NodeId, NodeKind, TreeError};

use crate::query::{is_list, is_list_item, is_nested_list_item};

/// Indent each target one nesting level, in caller order. Each target's
/// transform (dirty marking included) completes before the next begins, so
/// later targets observe the tree left by earlier ones. A target the tree
/// cannot indent degrades to a no-op; the batch never aborts.
pub fn indent_list_items(tree: &mut DocumentTree, targets: &[NodeId]) {
    for &target in targets {
        let _ = indent_one(tree, target);
    }
}

/// Outdent each target one nesting level, with the same per-target
/// best-effort policy as [`indent_list_items`].
pub fn outdent_list_items(tree: &mut DocumentTree, targets: &[NodeId]) {
    for &target in targets {
        let _ = outdent_one(tree, target);
    }
}

fn indent_one(tree: &mut DocumentTree, item: NodeId) -> Result<(), TreeError> {
    // Wrapper items carry nesting structure, not content; there is nothing
    // to indent at this granularity.
    if !is_list_item(tree, Some(item)) || is_nested_list_item(tree, Some(item)) {
        return Ok(());
    }
    let Some(parent) = tree.parent(item) else {
        return Ok(());
    };
    if !is_list(tree, Some(parent)) {
        // An item outside a list cannot be nested further; leave it where it is.
        return Ok(());
    }

    let prev = tree.prev_sibling(item);
    let next = tree.next_sibling(item);

    match (wrapped_list(tree, prev), wrapped_list(tree, next)) {
        (Some(prev_inner), Some(next_inner)) => {
            // Nested lists on both sides: fold all three into the previous
            // sibling's inner list, then drop the drained next wrapper.
            tree.append_child(prev_inner, item)?;
            for child in tree.children(next_inner).to_vec() {
                tree.append_child(prev_inner, child)?;
            }
            if let Some(next) = next {
                tree.remove(next)?;
            }
            mark_children_dirty(tree, prev_inner);
        }
        (None, Some(next_inner)) => {
            match tree.first_child(next_inner) {
                Some(first) => tree.insert_before(first, item)?,
                None => tree.append_child(next_inner, item)?,
            }
            mark_children_dirty(tree, next_inner);
        }
        (Some(prev_inner), None) => {
            tree.append_child(prev_inner, item)?;
            mark_children_dirty(tree, prev_inner);
        }
        (None, None) => {
            // No nested list to join: synthesize a wrapper item around a new
            // list carrying the parent's tag, at the item's old position.
            let Some(NodeKind::List { tag }) = tree.kind(parent) else {
                return Ok(());
            };
            let tag = *tag;
            let wrapper = tree.create_list_item();
            let inner = tree.create_list(tag);
            tree.append_child(wrapper, inner)?;
            tree.append_child(inner, item)?;
            if let Some(prev) = prev {
                tree.insert_after(prev, wrapper)?;
            } else if let Some(next) = next {
                tree.insert_before(next, wrapper)?;
            } else {
                tree.append_child(parent, wrapper)?;
            }
            mark_children_dirty(tree, inner);
        }
    }

    mark_children_dirty(tree, parent);
    Ok(())
}

fn outdent_one(tree: &mut DocumentTree, item: NodeId) -> Result<(), TreeError> {
    if !is_list_item(tree, Some(item)) || is_nested_list_item(tree, Some(item)) {
        return Ok(());
    }
    // The item is only actually indented when its ancestry reads
    // List -> ListItem -> List; anything else is a no-op.
    let Some(parent_list) = tree.parent(item).filter(|&p| is_list(tree, Some(p))) else {
        return Ok(());
    };
    let Some(grandparent_item) = tree
        .parent(parent_list)
        .filter(|&g| is_list_item(tree, Some(g)))
    else {
        return Ok(());
    };
    let Some(outer_list) = tree
        .parent(grandparent_item)
        .filter(|&o| is_list(tree, Some(o)))
    else {
        return Ok(());
    };

    if tree.first_child(parent_list) == Some(item) {
        tree.insert_before(grandparent_item, item)?;
        if tree.is_empty(parent_list) {
            tree.remove(grandparent_item)?;
        }
    } else if tree.last_child(parent_list) == Some(item) {
        tree.insert_after(grandparent_item, item)?;
        if tree.is_empty(parent_list) {
            tree.remove(grandparent_item)?;
        }
    } else {
        // Interior item: split the surrounding siblings into two wrapper
        // lists on either side of the grandparent, then let the item take
        // over the grandparent's position. Both halves must be captured
        // before any relocation mutates the sibling lists.
        let before = tree.preceding_siblings(item);
        let after = tree.following_siblings(item);
        let Some(NodeKind::List { tag }) = tree.kind(parent_list) else {
            return Ok(());
        };
        let tag = *tag;

        let before_wrapper = tree.create_list_item();
        let before_list = tree.create_list(tag);
        tree.append_child(before_wrapper, before_list)?;
        for sibling in before {
            tree.append_child(before_list, sibling)?;
        }

        let after_wrapper = tree.create_list_item();
        let after_list = tree.create_list(tag);
        tree.append_child(after_wrapper, after_list)?;
        for sibling in after {
            tree.append_child(after_list, sibling)?;
        }

        tree.insert_before(grandparent_item, before_wrapper)?;
        tree.insert_after(grandparent_item, after_wrapper)?;
        tree.replace_with(grandparent_item, item)?;

        mark_children_dirty(tree, before_list);
        mark_children_dirty(tree, after_list);
    }

    mark_children_dirty(tree, parent_list);
    mark_children_dirty(tree, outer_list);
    Ok(())
}

/// The inner List of a nested-list wrapper item, if `item` is one.
fn wrapped_list(tree: &DocumentTree, item: Option<NodeId>) -> Option<NodeId> {
    if is_nested_list_item(tree, item) {
        tree.first_child(item?)
    } else {
        None
    }
}

fn mark_children_dirty(tree: &mut DocumentTree, parent: NodeId) {
    for child in tree.children(parent).to_vec() {
        tree.mark_dirty(child);
    }
}
