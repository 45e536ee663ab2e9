use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use lingo_types::{AppEvent, LanguageCode};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::io::watch_stdin;
use crate::state::AppState;
use crate::ui::ui_loop;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_ui: kanal::bounded_async(256), // batch output bursts
            ui_to_app: kanal::bounded_async(64),  // typed input
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(
        &self,
        confirmations: AsyncReceiver<LanguageCode>,
    ) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Event loop
        tasks.spawn(event_loop(
            self.state.clone(),
            self.channels.ui_to_app.1.clone(),
            self.channels.app_to_ui.0.clone(),
        ));

        // UI loop
        tasks.spawn(ui_loop(
            self.channels.app_to_ui.1.clone(),
            self.cancel_token.child_token(),
        ));

        // Stdin watcher
        tasks.spawn(watch_stdin(
            self.cancel_token.child_token(),
            self.channels.ui_to_app.0.clone(),
        ));

        // Language backend confirmations
        let coordinator = self.state.coordinator.clone();
        let cancel = self.cancel_token.child_token();
        tasks.spawn(async move {
            coordinator.run_confirmations(confirmations, cancel).await;
            Ok(())
        });

        // Language change notifications
        tasks.spawn(announce_language_changes(
            self.state.clone(),
            self.cancel_token.child_token(),
            self.channels.app_to_ui.0.clone(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.state.debouncer.cancel();
        self.cancel_token.cancel();
    }
}

/// Forward confirmed language switches to the UI as status lines
async fn announce_language_changes(
    state: Arc<AppState>,
    cancel: CancellationToken,
    app_to_ui_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let mut changes = state.coordinator.subscribe();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            change = changes.recv() => match change {
                Ok(change) => {
                    app_to_ui_tx
                        .send(AppEvent::Status(format!(
                            "Language is now {} ({})",
                            change.language, change.code
                        )))
                        .await?;
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Missed {} language notifications", skipped);
                }
                Err(RecvError::Closed) => return Ok(()),
            }
        }
    }
}
