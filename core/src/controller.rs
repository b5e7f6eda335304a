//! The list controller: in-memory view of the table plus transient edit state.
//!
//! # Design
//! State lives in one immutable `ListState` snapshot. Every transition builds
//! a new snapshot from the current one and swaps it in, so readers holding an
//! older `Rc<ListState>` never see it change underneath them.
//!
//! Remote calls suspend the calling action only. Reconciliation runs against
//! whatever snapshot is current when the response arrives, so overlapping
//! actions on the same thread compose and the last response wins for the
//! fields it touches. The `RefCell` borrow is never held across an `.await`.
//!
//! Apart from the startup load, the list is never re-fetched: each successful
//! call patches the local copy to match what the store now holds. Failed
//! calls change nothing and are handed to the `Notifier`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::notify::{Notifier, Operation};
use crate::store::TodoStore;
use crate::types::{is_meaningful, Todo, TodoId};

/// Which item, if any, is being edited.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Viewing,
    Editing { id: TodoId, draft: String },
}

/// One immutable view of everything the UI renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    /// Newest first.
    pub todos: Vec<Todo>,
    pub loading: bool,
    /// Text of the "add" input.
    pub new_draft: String,
    pub edit: EditMode,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            todos: Vec::new(),
            loading: true,
            new_draft: String::new(),
            edit: EditMode::Viewing,
        }
    }
}

impl ListState {
    fn with_loading(&self, loading: bool) -> Self {
        Self {
            loading,
            ..self.clone()
        }
    }

    fn with_loaded(&self, todos: Vec<Todo>) -> Self {
        Self {
            todos,
            loading: false,
            ..self.clone()
        }
    }

    fn with_new_draft(&self, text: String) -> Self {
        Self {
            new_draft: text,
            ..self.clone()
        }
    }

    /// Prepend the created row and clear the add input.
    fn with_created(&self, todo: Todo) -> Self {
        let mut todos = Vec::with_capacity(self.todos.len() + 1);
        todos.push(todo);
        todos.extend(self.todos.iter().cloned());
        Self {
            todos,
            new_draft: String::new(),
            ..self.clone()
        }
    }

    fn with_edit(&self, edit: EditMode) -> Self {
        Self {
            edit,
            ..self.clone()
        }
    }

    /// Replace the title of `id` and leave edit mode.
    fn with_retitled(&self, id: TodoId, title: &str) -> Self {
        let todos = self
            .todos
            .iter()
            .map(|todo| {
                if todo.id == id {
                    Todo {
                        title: title.to_string(),
                        ..todo.clone()
                    }
                } else {
                    todo.clone()
                }
            })
            .collect();
        Self {
            todos,
            edit: EditMode::Viewing,
            ..self.clone()
        }
    }

    fn without(&self, id: TodoId) -> Self {
        Self {
            todos: self.todos.iter().filter(|todo| todo.id != id).cloned().collect(),
            ..self.clone()
        }
    }

    pub fn find(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    /// The item currently being edited, with its draft.
    pub fn editing(&self) -> Option<(TodoId, &str)> {
        match &self.edit {
            EditMode::Viewing => None,
            EditMode::Editing { id, draft } => Some((*id, draft.as_str())),
        }
    }
}

/// Drives a `TodoStore` from user actions and keeps the `ListState` in sync.
pub struct ListController<S, N> {
    store: S,
    notifier: N,
    state: RefCell<Rc<ListState>>,
}

impl<S: TodoStore, N: Notifier> ListController<S, N> {
    pub fn new(store: S, notifier: N) -> Self {
        Self {
            store,
            notifier,
            state: RefCell::new(Rc::new(ListState::default())),
        }
    }

    pub fn snapshot(&self) -> Rc<ListState> {
        Rc::clone(&self.state.borrow())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    fn transition(&self, next: impl FnOnce(&ListState) -> ListState) {
        let next = next(&self.state.borrow());
        *self.state.borrow_mut() = Rc::new(next);
    }

    /// Initial load. On failure the list stays as it was (empty at startup).
    pub async fn start(&self) {
        self.transition(|s| s.with_loading(true));
        match self.store.list_all_ordered().await {
            Ok(todos) => self.transition(|s| s.with_loaded(todos)),
            Err(e) => {
                self.notifier.remote_failure(Operation::List, &e);
                self.transition(|s| s.with_loading(false));
            }
        }
    }

    pub fn set_new_draft(&self, text: impl Into<String>) {
        let text = text.into();
        self.transition(|s| s.with_new_draft(text));
    }

    /// Insert the add-input text. Whitespace-only drafts never reach the store.
    pub async fn add(&self) {
        let title = self.snapshot().new_draft.clone();
        if !is_meaningful(&title) {
            return;
        }
        match self.store.insert_one(&title).await {
            Ok(todo) => self.transition(|s| s.with_created(todo)),
            Err(e) => self.notifier.remote_failure(Operation::Insert, &e),
        }
    }

    /// Enter edit mode for `id`, seeding the draft with its current title.
    /// Ignored if `id` is not in the list.
    pub fn begin_edit(&self, id: TodoId) {
        let Some(title) = self.snapshot().find(id).map(|todo| todo.title.clone()) else {
            return;
        };
        self.transition(|s| s.with_edit(EditMode::Editing { id, draft: title }));
    }

    pub fn set_edit_draft(&self, text: impl Into<String>) {
        let Some((id, _)) = self.snapshot().editing() else {
            return;
        };
        let draft = text.into();
        self.transition(|s| s.with_edit(EditMode::Editing { id, draft }));
    }

    pub fn cancel_edit(&self) {
        self.transition(|s| s.with_edit(EditMode::Viewing));
    }

    /// Commit the edit draft. Stays in edit mode if the store call fails.
    pub async fn save_edit(&self) {
        let (id, draft) = match self.snapshot().editing() {
            Some((id, draft)) => (id, draft.to_string()),
            None => return,
        };
        if !is_meaningful(&draft) {
            return;
        }
        match self.store.update_one_by_id(id, &draft).await {
            Ok(()) => self.transition(|s| s.with_retitled(id, &draft)),
            Err(e) => self.notifier.remote_failure(Operation::Update, &e),
        }
    }

    pub async fn delete(&self, id: TodoId) {
        match self.store.delete_one_by_id(id).await {
            Ok(()) => self.transition(|s| s.without(id)),
            Err(e) => self.notifier.remote_failure(Operation::Delete, &e),
        }
    }
}
