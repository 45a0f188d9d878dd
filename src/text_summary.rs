//! Text summary builder for CLI output.

use crate::model::{rotation_degrees, StatusSnapshot};
use anyhow::Result;

/// Pre-formatted lines for text mode.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

pub(crate) fn build_text_summary(snap: &StatusSnapshot) -> Result<TextSummary> {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "now".into());

    let lines = vec![
        format!("Barrier status at {timestamp}"),
        format!(
            "Car:      {}",
            if snap.car_detected { "Detected" } else { "Empty" }
        ),
        format!("Light:    {}", if snap.is_dark { "Dark" } else { "Light" }),
        format!("Releases: {}", snap.release_counter),
        format!(
            "LEDs:     red {} | green {} | white {}",
            on_off(snap.led_red),
            on_off(snap.led_green),
            on_off(snap.led_white)
        ),
        format!(
            "Servo:    {}\u{b0} (arm rotation {:+}\u{b0})",
            snap.servo_angle,
            rotation_degrees(snap.servo_angle)
        ),
    ];
    Ok(TextSummary { lines })
}

fn on_off(v: bool) -> &'static str {
    if v {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reflects_snapshot_fields() {
        let snap = StatusSnapshot {
            car_detected: true,
            is_dark: false,
            release_counter: 12,
            led_red: true,
            led_green: false,
            led_white: true,
            servo_angle: 45,
            error: None,
        };
        let summary = build_text_summary(&snap).unwrap();
        let text = summary.lines.join("\n");
        assert!(text.contains("Car:      Detected"));
        assert!(text.contains("Light:    Light"));
        assert!(text.contains("Releases: 12"));
        assert!(text.contains("red on | green off | white on"));
        assert!(text.contains("45\u{b0} (arm rotation -45\u{b0})"));
    }
}
