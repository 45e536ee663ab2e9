use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use lingo_types::AppEvent;
use tokio::task::JoinSet;

use crate::state::AppState;

pub mod command;

use command::parse_command;

/// App's main loop
pub async fn event_loop(
    state: Arc<AppState>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let mut work = JoinSet::new();

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = match ui_to_app_rx.recv().await? {
            AppEvent::TextInput(line) => parse_command(&line),
            event => event,
        };
        tracing::debug!("[EVENT_LOOP] Event received: {:?}", event);

        // Reap finished translations so the set doesn't grow unbounded
        while let Some(result) = work.try_join_next() {
            log_join(result);
        }

        if matches!(event, AppEvent::EndOfInput) {
            tracing::info!("[EVENT_LOOP] Input closed, finishing {} tasks", work.len());
            while let Some(result) = work.join_next().await {
                log_join(result);
            }
            app_to_ui_tx.send(AppEvent::EndOfInput).await?;
            return Ok(());
        }

        handle_events(&state, &mut work, &app_to_ui_tx, event).await?;
    }
}

fn log_join(result: Result<anyhow::Result<()>, tokio::task::JoinError>) {
    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("Translation task failed: {}", e),
        Err(e) => tracing::error!("Translation task panicked: {}", e),
    }
}

async fn handle_events(
    state: &Arc<AppState>,
    work: &mut JoinSet<anyhow::Result<()>>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<()> {
    match event {
        AppEvent::Translate(text) => {
            let engine = state.engine.clone();
            let target = state.coordinator.current_language();
            let tx = app_to_ui_tx.clone();

            work.spawn(async move {
                let translated = engine.translate(&text, &target).await;
                tx.send(AppEvent::ShowTranslation {
                    text: translated,
                    from_lang: engine.source_language().to_string(),
                    to_lang: target,
                })
                .await?;
                Ok(())
            });
        }
        AppEvent::LiveInput(text) => {
            let engine = state.engine.clone();
            let target = state.coordinator.current_language();
            let tx = app_to_ui_tx.clone();

            let handle = state.debouncer.schedule(async move {
                let translated = engine.translate(&text, &target).await;
                tx.send(AppEvent::ShowTranslation {
                    text: translated,
                    from_lang: engine.source_language().to_string(),
                    to_lang: target,
                })
                .await
            });

            work.spawn(async move {
                match handle.await? {
                    Some(sent) => sent?,
                    None => tracing::debug!("Live input superseded"),
                }
                Ok(())
            });
        }
        AppEvent::TranslateBatch(texts) => {
            let engine = state.engine.clone();
            let target = state.coordinator.current_language();
            let tx = app_to_ui_tx.clone();

            work.spawn(async move {
                let source = engine.source_language().to_string();
                let texts = engine.translate_many(&texts, &target, &source).await;
                tx.send(AppEvent::ShowBatch {
                    texts,
                    to_lang: target,
                })
                .await?;
                Ok(())
            });
        }
        AppEvent::SetLanguage(selection) => {
            let code = state.coordinator.set_language(selection);
            app_to_ui_tx
                .send(AppEvent::Status(format!("Switching to {}", code)))
                .await?;
        }
        AppEvent::ResetCache => {
            state.debouncer.cancel();
            state.engine.reset();
            app_to_ui_tx
                .send(AppEvent::Status("Cache cleared".to_string()))
                .await?;
        }
        AppEvent::ShowState => {
            let language = state.coordinator.state();
            let provider = state.config.read().await.provider.provider.clone();
            let status = format!(
                "language={} ({}) phase={:?} cached={} pending={} provider={} disabled={}",
                language.current_language,
                language.current_language_code,
                language.phase,
                state.engine.cache_len(),
                state.engine.pending_len(),
                provider,
                state.engine.is_disabled(),
            );
            app_to_ui_tx.send(AppEvent::Status(status)).await?;
        }
        AppEvent::ShowTranslation { .. } | AppEvent::ShowBatch { .. } | AppEvent::Status(_) => {
            // UI-only event, ignore in backend
        }
        AppEvent::TextInput(_) | AppEvent::EndOfInput => {}
    }

    Ok(())
}
