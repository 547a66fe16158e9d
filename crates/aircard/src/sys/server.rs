use crate::events::AppEvent;
use async_channel::Sender;
use cardkit::protocol::{Notification, Request, SOCKET_PATH};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;
use tokio::net::unix::OwnedWriteHalf;
use tokio::sync::broadcast;

pub async fn run_server(tx: Sender<AppEvent>, notify_tx: broadcast::Sender<Notification>) {
    // Cleanup old socket if it exists
    if std::fs::metadata(SOCKET_PATH).is_ok() {
        let _ = std::fs::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };
    log::info!("Listening on {}", SOCKET_PATH);

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let tx = tx.clone();
                let notify_tx = notify_tx.clone();
                tokio::spawn(async move {
                    let (read, write) = stream.into_split();
                    let mut write = Some(write);
                    let mut lines = BufReader::new(read).lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        let event = match Request::parse(&line) {
                            Ok(Request::Show) => AppEvent::Show,
                            Ok(Request::Hide) => AppEvent::Hide,
                            Ok(Request::State { states }) => AppEvent::State(states),
                            Ok(Request::Config { config }) => AppEvent::Config(config),
                            Ok(Request::Subscribe) => {
                                if let Some(write) = write.take() {
                                    tokio::spawn(forward(write, notify_tx.subscribe()));
                                }
                                continue;
                            }
                            Err(e) => {
                                log::warn!("Ignoring socket message: {}", e);
                                continue;
                            }
                        };
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Streams notifications to one subscriber until it goes away.
async fn forward(mut write: OwnedWriteHalf, mut rx: broadcast::Receiver<Notification>) {
    loop {
        let notification = match rx.recv().await {
            Ok(n) => n,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                log::warn!("Subscriber lagging, skipped {} notifications", skipped);
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };

        let line = match notification.to_line() {
            Ok(line) => line,
            Err(e) => {
                log::error!("Failed to encode notification: {}", e);
                continue;
            }
        };
        if write.write_all(format!("{line}\n").as_bytes()).await.is_err() {
            log::debug!("Subscriber disconnected");
            break;
        }
    }
}
