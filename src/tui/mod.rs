// TUI module for the interactive digest screen
mod app;
mod events;
mod layout;
mod rendering;
mod terminal;
mod timestamps;

use anyhow::Result;
pub use app::{App, SharedClient};
pub use timestamps::format_last_generated;

use self::terminal::TerminalManager;
use crate::session::Session;
use crate::storage::KeyValueStore;

/// Run the interactive TUI until the user quits
pub fn run_interactive<S: KeyValueStore>(session: Session<S>, client: SharedClient) -> Result<()> {
    let mut manager = TerminalManager::new()?;
    let mut app = App::new(session, client);
    app.run(manager.terminal_mut())
}
