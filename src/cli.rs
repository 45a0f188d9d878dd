use crate::device::DeviceClient;
use crate::model::{clamp_angle, PanelConfig, StatusSnapshot, AUTO_RELEASE};
use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "barrier-panel",
    version,
    about = "Control panel for a parking barrier controller, with optional TUI"
)]
pub struct Cli {
    /// Base URL of the barrier controller's web API
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    pub base_url: String,

    /// Status poll interval
    #[arg(long, default_value = "1s")]
    pub poll_interval: humantime::Duration,

    /// Degrees moved per step key press
    #[arg(long, default_value_t = 5)]
    pub step: u16,

    /// Fetch one status snapshot, print JSON, and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Fetch one status snapshot, print a text summary, and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Send one manual angle command (clamped to 0-180) and exit
    #[arg(long)]
    pub set_angle: Option<i64>,

    /// Return the barrier to automatic control and exit
    #[arg(long)]
    pub auto: bool,
}

impl Cli {
    /// Whether this invocation is a one-shot scripting mode rather than the TUI.
    pub fn is_non_tui(&self) -> bool {
        self.json || self.text || self.set_angle.is_some() || self.auto
    }
}

/// Build a `PanelConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> PanelConfig {
    PanelConfig {
        base_url: args.base_url.clone(),
        poll_interval: Duration::from(args.poll_interval),
        // Bounded to the angle domain; larger values would wrap when the
        // step is negated for downward adjustments.
        step: args.step.clamp(1, 180),
        user_agent: format!("barrier-panel/{}", env!("CARGO_PKG_VERSION")),
    }
}

pub async fn run(args: Cli) -> Result<()> {
    if args.set_angle.is_some() && args.auto {
        bail!("--set-angle and --auto are mutually exclusive");
    }

    let cfg = build_config(&args);

    if let Some(target) = args.set_angle {
        return send_one(&cfg, clamp_angle(target)).await;
    }
    if args.auto {
        return send_one(&cfg, AUTO_RELEASE).await;
    }
    if args.json {
        return print_status_json(&cfg).await;
    }
    if args.text {
        return print_status_text(&cfg).await;
    }

    #[cfg(feature = "tui")]
    {
        crate::tui::run(cfg).await
    }
    #[cfg(not(feature = "tui"))]
    {
        // Fallback when built without TUI support.
        print_status_text(&cfg).await
    }
}

/// One-shot status snapshot with the time it was taken, for `--json` output.
#[derive(Serialize)]
struct StatusReport {
    timestamp_utc: String,
    #[serde(flatten)]
    status: StatusSnapshot,
}

async fn fetch_one(cfg: &PanelConfig) -> Result<StatusSnapshot> {
    let client = DeviceClient::new(cfg)?;
    client
        .fetch_status()
        .await
        .context("failed to read barrier status")
}

async fn print_status_json(cfg: &PanelConfig) -> Result<()> {
    let status = fetch_one(cfg).await?;
    let report = StatusReport {
        timestamp_utc: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "now".into()),
        status,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn print_status_text(cfg: &PanelConfig) -> Result<()> {
    let status = fetch_one(cfg).await?;
    let summary = crate::text_summary::build_text_summary(&status)?;
    for line in summary.lines {
        println!("{line}");
    }
    Ok(())
}

async fn send_one(cfg: &PanelConfig, angle: u16) -> Result<()> {
    let client = DeviceClient::new(cfg)?;
    client
        .send_angle(angle)
        .await
        .context("failed to send servo command")?;
    if angle == AUTO_RELEASE {
        eprintln!("Barrier returned to automatic control");
    } else {
        eprintln!("Servo angle set to {angle}");
    }
    Ok(())
}
