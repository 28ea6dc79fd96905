use anyhow::Result;
use loreal_chat_core::Config;

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

#[tokio::main]
async fn main() -> Result<()> {
    // Logging is best effort; the chat works without it
    match Config::config_dir() {
        Ok(dir) => {
            if let Err(e) = logging::init_logging(&dir) {
                eprintln!("Warning: logging disabled: {:#}", e);
            }
        }
        Err(e) => eprintln!("Warning: logging disabled: {:#}", e),
    }

    let config = Config::load_or_create().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not read config, using defaults");
        Config::new()
    });
    tracing::info!(endpoint = %config.endpoint, splash = config.show_splash, "starting chat");

    let mut app = App::new(&config);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app).await;
    tui::restore()?;

    tracing::info!(messages = app.controller.conversation().len(), "chat closed");
    result
}

async fn run(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new();
    let tx = events.sender();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event, &tx),
            None => break,
        }
    }

    Ok(())
}
