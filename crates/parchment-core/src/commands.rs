use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::editor::Editor;

/// Commands this editing model dispatches. Wire identifiers are the
/// host-facing string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandKind {
    IndentContent,
    OutdentContent,
}

impl CommandKind {
    pub fn wire_id(self) -> &'static str {
        match self {
            CommandKind::IndentContent => "indent-content",
            CommandKind::OutdentContent => "outdent-content",
        }
    }
}

/// Dispatch rank. Higher priorities run first; the first handler reporting
/// "handled" short-circuits the rest, so low-priority listeners act as
/// overridable defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Low,
    Normal,
    High,
}

pub type CommandHandler = Rc<dyn Fn(&mut Editor, CommandKind) -> bool>;

struct Listener {
    id: u64,
    kind: CommandKind,
    priority: Priority,
    handler: CommandHandler,
}

#[derive(Default)]
struct ListenerTable {
    next_id: u64,
    listeners: Vec<Listener>,
}

/// Ordered-list-of-handlers command dispatch. The document model
/// serializes command handling on one thread; the table lives behind
/// `Rc<RefCell<..>>` and handlers take the editor by `&mut`.
#[derive(Clone, Default)]
pub struct CommandBus {
    table: Rc<RefCell<ListenerTable>>,
}

impl CommandBus {
    /// Install a listener; the returned guard removes it again on drop.
    pub fn register(
        &self,
        kind: CommandKind,
        priority: Priority,
        handler: impl Fn(&mut Editor, CommandKind) -> bool + 'static,
    ) -> Subscription {
        let mut table = self.table.borrow_mut();
        let id = table.next_id;
        table.next_id += 1;
        table.listeners.push(Listener {
            id,
            kind,
            priority,
            handler: Rc::new(handler),
        });
        Subscription {
            table: Rc::downgrade(&self.table),
            id,
        }
    }

    /// Snapshot the matching handlers in dispatch order. Taken up front so
    /// handlers are free to register or drop listeners while running.
    pub(crate) fn handlers_for(&self, kind: CommandKind) -> Vec<CommandHandler> {
        let table = self.table.borrow();
        let mut matching: Vec<&Listener> =
            table.listeners.iter().filter(|l| l.kind == kind).collect();
        matching.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));
        matching.into_iter().map(|l| l.handler.clone()).collect()
    }

    pub fn listener_count(&self) -> usize {
        self.table.borrow().listeners.len()
    }
}

/// RAII handle for a registered command listener. Dropping it removes the
/// listener, which gives mount/unmount call sites cleanup on every exit
/// path, early returns and unwinding included.
pub struct Subscription {
    table: Weak<RefCell<ListenerTable>>,
    id: u64,
}

impl Subscription {
    /// Explicit form of dropping the guard.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            table.borrow_mut().listeners.retain(|l| l.id != self.id);
        }
    }
}
