//! Async-side controller.
//!
//! Owns the device client, runs the status poller, and turns UI commands into
//! outbound servo commands. UI layers stay on their own thread and talk to
//! this loop over channels.

use crate::device::DeviceClient;
use crate::model::{PanelConfig, PanelEvent};
use crate::poller;
use anyhow::Result;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Commands emitted by UI layers.
#[derive(Debug, Clone)]
pub enum UiCommand {
    /// Send an angle to the actuator endpoint: a manual target or the
    /// release sentinel. Fire-and-forget; failures are logged, not surfaced.
    SendAngle(u16),
    Quit,
}

pub async fn run_controller(
    cfg: &PanelConfig,
    event_tx: UnboundedSender<PanelEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    let client = DeviceClient::new(cfg)?;
    let poller = poller::spawn_poller(client.clone(), cfg.poll_interval, event_tx);

    loop {
        match cmd_rx.recv().await {
            Some(UiCommand::SendAngle(angle)) => {
                // Commands are independent and unordered; a slow response must
                // not block the next poll or the next command.
                let client = client.clone();
                tokio::spawn(async move {
                    if let Err(e) = client.send_angle(angle).await {
                        tracing::warn!(angle, error = %format!("{e:#}"), "servo command failed");
                    }
                });
            }
            Some(UiCommand::Quit) | None => break,
        }
    }

    poller.join().await;
    Ok(())
}
