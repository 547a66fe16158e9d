use crate::events::AppEvent;
use async_channel::{Receiver, Sender};
use cardkit::ServiceCall;
use cardkit::protocol::Notification;
use std::thread;
use tokio::runtime::Runtime;
use tokio::sync::broadcast;

const SUBSCRIBER_BACKLOG: usize = 64;

/// Runs the socket server and the config watcher on a tokio runtime of their
/// own. Service calls coming out of the UI are fanned out to subscribers.
pub fn start_background_services(tx: Sender<AppEvent>, calls: Receiver<ServiceCall>) {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime: {}", e);
                return;
            }
        };

        rt.block_on(async {
            let (notify_tx, _) = broadcast::channel(SUBSCRIBER_BACKLOG);

            {
                let tx = tx.clone();
                let notify_tx = notify_tx.clone();
                tokio::spawn(async move {
                    crate::sys::server::run_server(tx, notify_tx).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::run_async_watcher(tx).await;
                });
            }

            tokio::spawn(async move {
                while let Ok(call) = calls.recv().await {
                    log::info!("Service call {}.{}", call.domain, call.service);
                    if notify_tx.send(Notification::CallService(call)).is_err() {
                        log::debug!("No subscribers for service call");
                    }
                }
            });

            std::future::pending::<()>().await;
        });
    });
}
