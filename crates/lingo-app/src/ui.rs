use kanal::AsyncReceiver;
use lingo_types::AppEvent;
use tokio_util::sync::CancellationToken;

/// Terminal front end: prints whatever the event loop produces
pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                // Flush what is already queued
                while let Ok(Some(event)) = app_to_ui_rx.try_recv() {
                    render(&event);
                }
                return Ok(());
            }
            event = app_to_ui_rx.recv() => {
                let event = event?;
                if matches!(event, AppEvent::EndOfInput) {
                    return Ok(());
                }
                render(&event);
            }
        }
    }
}

pub fn render(event: &AppEvent) {
    if let Some(line) = format_event(event) {
        println!("{}", line);
    }
}

pub fn format_event(event: &AppEvent) -> Option<String> {
    match event {
        AppEvent::ShowTranslation {
            text,
            from_lang,
            to_lang,
        } => Some(format!("[{} -> {}] {}", from_lang, to_lang, text)),
        AppEvent::ShowBatch { texts, to_lang } => Some(
            texts
                .iter()
                .enumerate()
                .map(|(i, text)| format!("[{} #{}] {}", to_lang, i, text))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        AppEvent::Status(status) => Some(format!("* {}", status)),
        _ => None,
    }
}
