//! Status poller: a scheduled task that keeps the panel in sync with the device.

use crate::device::DeviceClient;
use crate::model::{PanelEvent, StatusSnapshot};
use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};

#[derive(Debug, Clone)]
pub enum PollControl {
    Cancel,
}

/// Handle for a running poller task.
pub struct PollerHandle {
    ctrl_tx: UnboundedSender<PollControl>,
    handle: tokio::task::JoinHandle<()>,
}

impl PollerHandle {
    /// Stop the poll loop. Idempotent; safe to call after the task exited.
    pub fn cancel(&self) {
        let _ = self.ctrl_tx.send(PollControl::Cancel);
    }

    pub async fn join(self) {
        self.cancel();
        let _ = self.handle.await;
    }
}

/// Spawn the poll loop against the device API.
pub fn spawn_poller(
    client: DeviceClient,
    interval: Duration,
    event_tx: UnboundedSender<PanelEvent>,
) -> PollerHandle {
    spawn_poller_with(
        move || {
            let client = client.clone();
            async move { client.fetch_status().await }
        },
        interval,
        event_tx,
    )
}

/// Poll loop over an arbitrary fetch. The first poll fires immediately so the
/// panel is not blank before the first interval elapses; after that, once per
/// interval. Failures only emit a disconnected event and the loop keeps
/// running until cancelled.
fn spawn_poller_with<F, Fut>(
    mut fetch: F,
    interval: Duration,
    event_tx: UnboundedSender<PanelEvent>,
) -> PollerHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<StatusSnapshot>> + Send,
{
    let (ctrl_tx, mut ctrl_rx) = mpsc::unbounded_channel::<PollControl>();
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let ev = match fetch().await {
                        Ok(snap) => PanelEvent::Snapshot(snap),
                        Err(e) => {
                            tracing::debug!(error = %format!("{e:#}"), "status poll failed");
                            PanelEvent::Disconnected {
                                reason: format!("{e:#}"),
                            }
                        }
                    };
                    if event_tx.send(ev).is_err() {
                        // All consumers are gone.
                        break;
                    }
                }
                msg = ctrl_rx.recv() => {
                    match msg {
                        Some(PollControl::Cancel) | None => break,
                    }
                }
            }
        }
    });
    PollerHandle { ctrl_tx, handle }
}
