use kanal::AsyncSender;
use lingo_types::AppEvent;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

/// Stdin watcher: every line becomes a `TextInput`
pub async fn watch_stdin(
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    tracing::info!("Starting stdin watcher");
    watch_lines(BufReader::new(tokio::io::stdin()), cancel, event_tx).await
}

pub async fn watch_lines<R>(
    reader: R,
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Input watcher stopping");
                return Ok(());
            }
            line = lines.next_line() => match line? {
                Some(line) if line.trim().is_empty() => {}
                Some(line) => event_tx.send(AppEvent::TextInput(line)).await?,
                None => {
                    tracing::info!("Input closed");
                    event_tx.send(AppEvent::EndOfInput).await?;
                    // The event loop decides when the app is done
                    cancel.cancelled().await;
                    return Ok(());
                }
            }
        }
    }
}
