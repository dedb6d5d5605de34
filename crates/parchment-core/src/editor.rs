use crate::commands::{CommandBus, CommandKind, Priority, Subscription};
use crate::tree::{DocumentTree, NodeId};
use crate::value::TreeValue;

/// The host selection as seen by editing code: the set of selected nodes
/// (possibly empty) plus the anchor node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    nodes: Vec<NodeId>,
    anchor: NodeId,
}

impl Selection {
    pub fn new(nodes: Vec<NodeId>, anchor: NodeId) -> Self {
        Self { nodes, anchor }
    }

    /// A collapsed selection: no node set, only an anchor.
    pub fn caret(anchor: NodeId) -> Self {
        Self {
            nodes: Vec::new(),
            anchor,
        }
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn anchor_node(&self) -> NodeId {
        self.anchor
    }
}

pub struct Editor {
    tree: DocumentTree,
    selection: Option<Selection>,
    commands: CommandBus,
}

impl Editor {
    pub fn new(tree: DocumentTree) -> Self {
        Self {
            tree,
            selection: None,
            commands: CommandBus::default(),
        }
    }

    pub fn from_value(value: &TreeValue) -> Self {
        Self::new(DocumentTree::from_value(value))
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DocumentTree {
        &mut self.tree
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn commands(&self) -> &CommandBus {
        &self.commands
    }

    pub fn register_command_listener(
        &self,
        kind: CommandKind,
        priority: Priority,
        handler: impl Fn(&mut Editor, CommandKind) -> bool + 'static,
    ) -> Subscription {
        self.commands.register(kind, priority, handler)
    }

    /// Run the listeners for `kind` in priority order; true means handled.
    pub fn dispatch(&mut self, kind: CommandKind) -> bool {
        let handlers = self.commands.handlers_for(kind);
        for handler in handlers {
            if handler(self, kind) {
                return true;
            }
        }
        false
    }
}
