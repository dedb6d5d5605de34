use parchment_core::{CommandKind, Editor, Priority, Subscription};

use crate::query::selected_list_items;
use crate::transform::{indent_list_items, outdent_list_items};

/// Resolve the selection and indent the targets. Returns whether the
/// command was handled; no targets means the caller should fall through.
pub fn indent_selection(editor: &mut Editor) -> bool {
    let targets = selected_list_items(editor.tree(), editor.selection());
    if targets.is_empty() {
        return false;
    }
    indent_list_items(editor.tree_mut(), &targets);
    true
}

/// Counterpart of [`indent_selection`] for decreasing the nesting level.
pub fn outdent_selection(editor: &mut Editor) -> bool {
    let targets = selected_list_items(editor.tree(), editor.selection());
    if targets.is_empty() {
        return false;
    }
    outdent_list_items(editor.tree_mut(), &targets);
    true
}

/// Live registration of the list handlers on an editor's command bus.
/// Dropping it removes both listeners, so a mounting component gets
/// cleanup on every exit path by holding this alongside its other state.
pub struct AttachedListCommands {
    _indent: Subscription,
    _outdent: Subscription,
}

/// Install low-priority listeners for the two nesting commands. Low
/// priority keeps these as overridable defaults: any higher-priority
/// handler that reports the command handled preempts them.
pub fn attach_list_commands(editor: &Editor) -> AttachedListCommands {
    let indent = editor.register_command_listener(
        CommandKind::IndentContent,
        Priority::Low,
        |editor, _kind| indent_selection(editor),
    );
    let outdent = editor.register_command_listener(
        CommandKind::OutdentContent,
        Priority::Low,
        |editor, _kind| outdent_selection(editor),
    );
    AttachedListCommands {
        _indent: indent,
        _outdent: outdent,
    }
}
