//! Text rendering of a `ListState`.

use std::fmt::Write;

use todolist_core::{ListState, TodoId};

pub fn render(state: &ListState) -> String {
    let mut out = String::from("Todos\n");
    let _ = writeln!(out, "  new: {}", state.new_draft);

    if state.loading {
        out.push_str("  Loading...\n");
        return out;
    }
    if state.todos.is_empty() {
        out.push_str("  (nothing to do)\n");
    }
    let editing = state.editing();
    for (index, todo) in state.todos.iter().enumerate() {
        let row = index + 1;
        match editing {
            Some((id, draft)) if id == todo.id => {
                let _ = writeln!(out, "{row:>3}. > {draft}  [save] [cancel]");
            }
            _ => {
                let _ = writeln!(out, "{row:>3}. {}  [edit] [delete]", todo.title);
            }
        }
    }
    out
}

/// Resolve a 1-based row number shown by `render` to the item's id.
pub fn row_id(state: &ListState, row: usize) -> Option<TodoId> {
    row.checked_sub(1)
        .and_then(|index| state.todos.get(index))
        .map(|todo| todo.id)
}
