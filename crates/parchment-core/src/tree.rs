use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a node for the lifetime of its tree. Ids are assigned
/// at creation and never change while the node is attached or detached;
/// slots are only recycled after the node is freed by `remove`/`replace_with`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Semantic kind of a list container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListTag {
    Bulleted,
    Ordered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum NodeKind {
    /// The document container. Exactly one per tree, always at the top.
    Root,
    /// Ordered container of list items.
    List { tag: ListTag },
    /// One list entry: either plain content or a wrapper around a nested list.
    ListItem,
    /// Plain content leaf.
    Text { text: String },
}

impl NodeKind {
    pub fn is_list(&self) -> bool {
        matches!(self, NodeKind::List { .. })
    }

    pub fn is_list_item(&self) -> bool {
        matches!(self, NodeKind::ListItem)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The id does not name a live node of this tree.
    StaleNode(NodeId),
    /// The document root cannot be relocated, removed, or replaced.
    RootMutation,
    /// Attaching `node` under `into` would make a node its own ancestor.
    CycleAttach { node: NodeId, into: NodeId },
    /// The sibling-relative insert anchor is not attached to any parent.
    DetachedAnchor(NodeId),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::StaleNode(id) => write!(f, "node {id} is not part of this tree"),
            TreeError::RootMutation => write!(f, "the document root cannot be moved or removed"),
            TreeError::CycleAttach { node, into } => {
                write!(f, "attaching {node} under {into} would create a cycle")
            }
            TreeError::DetachedAnchor(id) => write!(f, "anchor {id} has no parent"),
        }
    }
}

impl std::error::Error for TreeError {}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed document tree. Each node is owned by exactly one parent's
/// child sequence; every relocation primitive detaches from the current
/// owner before inserting into the new one, as a single call.
#[derive(Debug, Clone)]
pub struct DocumentTree {
    slots: Vec<Option<NodeData>>,
    free: Vec<u32>,
    root: NodeId,
    dirty: HashSet<NodeId>,
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTree {
    pub fn new() -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId(0),
            dirty: HashSet::new(),
        };
        tree.root = tree.alloc(NodeKind::Root);
        tree
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let data = NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        };
        match self.free.pop() {
            Some(ix) => {
                self.slots[ix as usize] = Some(data);
                NodeId(ix)
            }
            None => {
                self.slots.push(Some(data));
                NodeId((self.slots.len() - 1) as u32)
            }
        }
    }

    pub fn create_list(&mut self, tag: ListTag) -> NodeId {
        self.alloc(NodeKind::List { tag })
    }

    pub fn create_list_item(&mut self) -> NodeId {
        self.alloc(NodeKind::ListItem)
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text { text: text.into() })
    }

    fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.slots.get(id.index())?.as_ref()
    }

    fn data_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.data(id).is_some()
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.data(id).map(|d| &d.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id)?.parent
    }

    /// Ordered child sequence; empty for leaves and stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.data(id).map(|d| d.children.as_slice()).unwrap_or(&[])
    }

    pub fn is_empty(&self, id: NodeId) -> bool {
        self.children(id).is_empty()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    fn position_in_parent(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id)?;
        let ix = self.children(parent).iter().position(|&c| c == id)?;
        Some((parent, ix))
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, ix) = self.position_in_parent(id)?;
        ix.checked_sub(1)
            .and_then(|prev| self.children(parent).get(prev).copied())
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, ix) = self.position_in_parent(id)?;
        self.children(parent).get(ix + 1).copied()
    }

    /// Siblings before `id` in document order; empty when detached.
    pub fn preceding_siblings(&self, id: NodeId) -> Vec<NodeId> {
        match self.position_in_parent(id) {
            Some((parent, ix)) => self.children(parent)[..ix].to_vec(),
            None => Vec::new(),
        }
    }

    /// Siblings after `id` in document order; empty when detached.
    pub fn following_siblings(&self, id: NodeId) -> Vec<NodeId> {
        match self.position_in_parent(id) {
            Some((parent, ix)) => self.children(parent)[ix + 1..].to_vec(),
            None => Vec::new(),
        }
    }

    pub fn is_ancestor(&self, maybe_ancestor: NodeId, of: NodeId) -> bool {
        let mut current = Some(of);
        while let Some(id) = current {
            if id == maybe_ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn ensure_live(&self, id: NodeId) -> Result<(), TreeError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(TreeError::StaleNode(id))
        }
    }

    fn check_attach(&self, node: NodeId, into: NodeId) -> Result<(), TreeError> {
        self.ensure_live(node)?;
        self.ensure_live(into)?;
        if node == self.root {
            return Err(TreeError::RootMutation);
        }
        if self.is_ancestor(node, into) {
            return Err(TreeError::CycleAttach { node, into });
        }
        Ok(())
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.data(id).and_then(|d| d.parent) else {
            return;
        };
        if let Some(data) = self.data_mut(parent) {
            data.children.retain(|&c| c != id);
        }
        if let Some(data) = self.data_mut(id) {
            data.parent = None;
        }
    }

    fn attach_at(&mut self, parent: NodeId, ix: usize, child: NodeId) {
        if let Some(data) = self.data_mut(parent) {
            let ix = ix.min(data.children.len());
            data.children.insert(ix, child);
        }
        if let Some(data) = self.data_mut(child) {
            data.parent = Some(parent);
        }
    }

    /// Relocate `child` to the end of `parent`'s sequence.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check_attach(child, parent)?;
        self.detach(child);
        let ix = self.children(parent).len();
        self.attach_at(parent, ix, child);
        Ok(())
    }

    /// Relocate `node` to sit immediately before `anchor` under the anchor's parent.
    pub fn insert_before(&mut self, anchor: NodeId, node: NodeId) -> Result<(), TreeError> {
        self.insert_relative(anchor, node, 0)
    }

    /// Relocate `node` to sit immediately after `anchor` under the anchor's parent.
    pub fn insert_after(&mut self, anchor: NodeId, node: NodeId) -> Result<(), TreeError> {
        self.insert_relative(anchor, node, 1)
    }

    fn insert_relative(
        &mut self,
        anchor: NodeId,
        node: NodeId,
        offset: usize,
    ) -> Result<(), TreeError> {
        self.ensure_live(anchor)?;
        let (parent, _) = self
            .position_in_parent(anchor)
            .ok_or(TreeError::DetachedAnchor(anchor))?;
        self.check_attach(node, parent)?;
        self.detach(node);
        // Detaching may have shifted the anchor's index within the same parent.
        let ix = self
            .children(parent)
            .iter()
            .position(|&c| c == anchor)
            .ok_or(TreeError::DetachedAnchor(anchor))?;
        self.attach_at(parent, ix + offset, node);
        Ok(())
    }

    /// Detach `id` and free its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.ensure_live(id)?;
        if id == self.root {
            return Err(TreeError::RootMutation);
        }
        self.detach(id);
        self.free_subtree(id);
        Ok(())
    }

    /// Install `new` at `old`'s position and free `old`'s remaining subtree.
    /// `new` may live inside `old`'s subtree; it is detached before the free.
    pub fn replace_with(&mut self, old: NodeId, new: NodeId) -> Result<(), TreeError> {
        self.ensure_live(old)?;
        if old == self.root {
            return Err(TreeError::RootMutation);
        }
        if old == new {
            return Ok(());
        }
        let (parent, _) = self
            .position_in_parent(old)
            .ok_or(TreeError::DetachedAnchor(old))?;
        self.check_attach(new, parent)?;
        self.detach(new);
        let Some(ix) = self.children(parent).iter().position(|&c| c == old) else {
            return Err(TreeError::DetachedAnchor(old));
        };
        self.detach(old);
        self.attach_at(parent, ix, new);
        self.free_subtree(old);
        Ok(())
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(data) = self
                .slots
                .get_mut(current.index())
                .and_then(|slot| slot.take())
            {
                stack.extend(data.children);
                self.free.push(current.0);
            }
            self.dirty.remove(&current);
        }
    }

    /// Flag a node for the rendering layer. No-op for stale ids.
    pub fn mark_dirty(&mut self, id: NodeId) {
        if self.contains(id) {
            self.dirty.insert(id);
        }
    }

    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.dirty.contains(&id)
    }

    /// Drain the dirty set, in id order.
    pub fn take_dirty(&mut self) -> Vec<NodeId> {
        let mut drained: Vec<NodeId> = self.dirty.drain().collect();
        drained.sort();
        drained
    }
}
