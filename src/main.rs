use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

mod app;
mod client;
mod config;
mod conversation;
mod handler;
mod logging;
mod message;
mod tui;
mod ui;

use app::App;
use client::QuestionClient;
use config::Config;
use conversation::{Conversation, Resolution};
use tui::{EventHandler, Tui};

// Single thread: replies are applied on the same thread that draws
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::load()?;
    logging::init(&config.log_file()?)?;

    let endpoint = config.endpoint();
    let client = QuestionClient::new(&endpoint);
    tracing::info!(url = client.url(), "starting chat session");

    let (replies_tx, replies_rx) = mpsc::unbounded_channel();
    let conversation = Conversation::new(Arc::new(client), replies_tx);
    let mut app = App::new(conversation, endpoint);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = run(&mut terminal, &mut app, replies_rx).await;

    tui::restore()?;
    tracing::info!(messages = app.conversation.len(), "chat session ended");
    result
}

async fn run(
    terminal: &mut Tui,
    app: &mut App,
    mut replies: mpsc::UnboundedReceiver<Resolution>,
) -> Result<()> {
    let mut events = EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        tokio::select! {
            Some(event) = events.next() => handler::handle_event(app, event),
            Some(resolution) = replies.recv() => app.apply_resolution(resolution),
            else => break,
        }
    }

    Ok(())
}
