use std::rc::Rc;

use anyhow::Context;
use tokio::io::BufReader;
use tokio::task::LocalSet;
use tracing::info;

use todolist_app::{logging, session, Screen, StoreConfig, UreqTransport};
use todolist_core::{ListController, LogNotifier, RemoteTodoStore};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let config = StoreConfig::from_env().context("remote store connection settings")?;
    info!(url = %config.url, "using todos table");

    let store = RemoteTodoStore::new(config.table(), UreqTransport::new());
    let controller = Rc::new(ListController::new(store, LogNotifier));
    let input = BufReader::new(tokio::io::stdin());
    let screen = Screen::new(std::io::stdout());

    LocalSet::new()
        .run_until(session::run(controller, input, screen))
        .await
        .context("reading input")?;
    Ok(())
}
