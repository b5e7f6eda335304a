//! The interactive loop: read a line, act on the controller, redraw.
//!
//! # Design
//! Actions that talk to the store run as local tasks, so input keeps being
//! read while a request is in flight and several requests may overlap. After
//! spawning, the loop yields once so the task reads the drafts it needs
//! before the next line can change them. A finished task redraws the screen.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::{self, JoinHandle};
use tracing::debug;

use todolist_core::{ListController, ListState, Notifier, TodoStore};

use crate::command::{self, Command, HELP};
use crate::view;

/// Shared output sink. Cloned into every task that redraws.
pub struct Screen<W> {
    out: Rc<RefCell<W>>,
}

impl<W> Clone for Screen<W> {
    fn clone(&self) -> Self {
        Self {
            out: Rc::clone(&self.out),
        }
    }
}

impl<W: Write> Screen<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Rc::new(RefCell::new(out)),
        }
    }

    pub fn draw(&self, state: &ListState) {
        self.write(&view::render(state));
    }

    pub fn note(&self, message: &str) {
        self.write(&format!("{message}\n"));
    }

    fn write(&self, text: &str) {
        let mut out = self.out.borrow_mut();
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
            debug!(error = %e, "screen write failed");
        }
    }

    /// Hand back the sink once no task holds a clone.
    pub fn into_inner(self) -> Option<W> {
        Rc::try_unwrap(self.out).ok().map(RefCell::into_inner)
    }
}

/// Run until `quit` or end of input. At end of input, requests still in
/// flight are awaited; `quit` leaves immediately.
///
/// Must be called inside a `tokio::task::LocalSet`.
pub async fn run<S, N, R, W>(controller: Rc<ListController<S, N>>, input: R, screen: Screen<W>) -> io::Result<()>
where
    S: TodoStore + 'static,
    N: Notifier + 'static,
    R: AsyncBufRead + Unpin,
    W: Write + 'static,
{
    screen.draw(&controller.snapshot());
    let mut pending = vec![spawn_action(&controller, &screen, |c| async move { c.start().await })];
    task::yield_now().await;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let command = match command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                screen.note(&format!("{e}; {HELP}"));
                continue;
            }
        };
        debug!(?command, "input");

        match command {
            Command::Quit => return Ok(()),
            Command::Redraw => screen.draw(&controller.snapshot()),
            Command::NewDraft(text) => {
                controller.set_new_draft(text);
                screen.draw(&controller.snapshot());
            }
            Command::EditDraft(text) => {
                controller.set_edit_draft(text);
                screen.draw(&controller.snapshot());
            }
            Command::Edit(row) => match view::row_id(&controller.snapshot(), row) {
                Some(id) => {
                    controller.begin_edit(id);
                    screen.draw(&controller.snapshot());
                }
                None => screen.note(&format!("no row {row}")),
            },
            Command::Cancel => {
                controller.cancel_edit();
                screen.draw(&controller.snapshot());
            }
            Command::Add => {
                pending.push(spawn_action(&controller, &screen, |c| async move { c.add().await }));
                task::yield_now().await;
            }
            Command::Save => {
                pending.push(spawn_action(&controller, &screen, |c| async move { c.save_edit().await }));
                task::yield_now().await;
            }
            Command::Delete(row) => match view::row_id(&controller.snapshot(), row) {
                Some(id) => {
                    pending.push(spawn_action(&controller, &screen, move |c| async move { c.delete(id).await }));
                    task::yield_now().await;
                }
                None => screen.note(&format!("no row {row}")),
            },
        }
        pending.retain(|handle| !handle.is_finished());
    }

    for handle in pending {
        if let Err(e) = handle.await {
            debug!(error = %e, "action task did not finish");
        }
    }
    Ok(())
}

/// Spawn `action` on the local set and redraw when it completes.
fn spawn_action<S, N, W, F, Fut>(controller: &Rc<ListController<S, N>>, screen: &Screen<W>, action: F) -> JoinHandle<()>
where
    S: TodoStore + 'static,
    N: Notifier + 'static,
    W: Write + 'static,
    F: FnOnce(Rc<ListController<S, N>>) -> Fut,
    Fut: std::future::Future<Output = ()> + 'static,
{
    let controller = Rc::clone(controller);
    let screen = screen.clone();
    let work = action(Rc::clone(&controller));
    task::spawn_local(async move {
        work.await;
        screen.draw(&controller.snapshot());
    })
}
