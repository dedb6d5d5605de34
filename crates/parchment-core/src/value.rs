use serde::{Deserialize, Serialize};

use crate::tree::{DocumentTree, ListTag, NodeId, NodeKind};

const DEFAULT_SCHEMA: &str = "parchment";
const DEFAULT_VERSION: u32 = 1;

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

fn default_version() -> u32 {
    DEFAULT_VERSION
}

/// Serialized form of a document tree, with a schema/version envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeValue {
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default = "default_version")]
    pub version: u32,
    pub root: ValueNode,
}

impl TreeValue {
    pub fn from_root(root: ValueNode) -> Self {
        Self {
            schema: default_schema(),
            version: default_version(),
            root,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Nested, id-free rendition of the tree. Also the structural-equality
/// witness used by tests: two trees are equivalent iff their values match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum ValueNode {
    Root {
        #[serde(default)]
        children: Vec<ValueNode>,
    },
    List {
        tag: ListTag,
        #[serde(default)]
        children: Vec<ValueNode>,
    },
    ListItem {
        #[serde(default)]
        children: Vec<ValueNode>,
    },
    Text {
        text: String,
    },
}

impl ValueNode {
    pub fn root(children: Vec<ValueNode>) -> Self {
        ValueNode::Root { children }
    }

    pub fn list(tag: ListTag, children: Vec<ValueNode>) -> Self {
        ValueNode::List { tag, children }
    }

    pub fn item(children: Vec<ValueNode>) -> Self {
        ValueNode::ListItem { children }
    }

    pub fn text(text: impl Into<String>) -> Self {
        ValueNode::Text { text: text.into() }
    }
}

impl DocumentTree {
    pub fn to_value(&self) -> TreeValue {
        TreeValue::from_root(self.value_of(self.root()))
    }

    pub fn value_of(&self, id: NodeId) -> ValueNode {
        match self.kind(id) {
            Some(NodeKind::Root) => ValueNode::Root {
                children: self.child_values(id),
            },
            Some(NodeKind::List { tag }) => ValueNode::List {
                tag: *tag,
                children: self.child_values(id),
            },
            Some(NodeKind::ListItem) => ValueNode::ListItem {
                children: self.child_values(id),
            },
            Some(NodeKind::Text { text }) => ValueNode::Text { text: text.clone() },
            None => ValueNode::Text {
                text: String::new(),
            },
        }
    }

    fn child_values(&self, id: NodeId) -> Vec<ValueNode> {
        self.children(id)
            .iter()
            .map(|&child| self.value_of(child))
            .collect()
    }

    pub fn from_value(value: &TreeValue) -> Self {
        let mut tree = Self::new();
        let root = tree.root();
        build_node(&mut tree, root, &value.root);
        tree
    }
}

fn build_node(tree: &mut DocumentTree, parent: NodeId, value: &ValueNode) {
    match value {
        // Root values contribute their children; nested roots are flattened.
        ValueNode::Root { children } => {
            for child in children {
                build_node(tree, parent, child);
            }
        }
        ValueNode::List { tag, children } => {
            let id = tree.create_list(*tag);
            let _ = tree.append_child(parent, id);
            for child in children {
                build_node(tree, id, child);
            }
        }
        ValueNode::ListItem { children } => {
            let id = tree.create_list_item();
            let _ = tree.append_child(parent, id);
            for child in children {
                build_node(tree, id, child);
            }
        }
        ValueNode::Text { text } => {
            let id = tree.create_text(text.clone());
            let _ = tree.append_child(parent, id);
        }
    }
}
