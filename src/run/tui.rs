//! Terminal (TUI) mode implementation.

use std::io;
use std::path::PathBuf;

use crate::config::Config;
use crate::core::app::{EditorApp, Flow};
use crate::core::input::KeyMap;
use crate::error::Result;
use crate::terminal;

/// Run an interactive session until the user quits.
pub fn run_terminal_mode(files: &[PathBuf], config: &Config) -> Result<()> {
    let keymap = KeyMap::from_config(config);
    let mut app = EditorApp::new(config.settings(), keymap);

    let (cols, rows) = terminal::raw::size()?;
    app.resize(usize::from(rows), usize::from(cols));
    app.initialize(files);
    app.set_status("HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find");
    log::info!("session started with {} buffer(s)", app.buffers.len());

    let _raw_mode = terminal::raw::RawMode::new()?;
    let mut stdout = io::stdout();

    loop {
        terminal::render::refresh(&mut app, &mut stdout)?;
        let key = terminal::events::next_key(&mut app, &mut stdout)?;

        let flow = match app.process_key(key) {
            Flow::Prompt(request) => terminal::prompt::prompt(&mut app, request, &mut stdout)?,
            flow => flow,
        };
        if flow == Flow::Quit {
            break;
        }
    }
    Ok(())
}
