use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lowest commandable servo angle.
pub const ANGLE_MIN: u16 = 0;
/// Highest commandable servo angle.
pub const ANGLE_MAX: u16 = 180;
/// Out-of-range sentinel: hands the actuator back to the device's own control loop.
/// Disjoint from the manual angle domain, which clamps to [ANGLE_MIN, ANGLE_MAX].
pub const AUTO_RELEASE: u16 = 255;

/// Neutral (vertical) arm position.
pub const ANGLE_NEUTRAL: u16 = 90;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    pub base_url: String,
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    /// Degrees moved per step key press.
    pub step: u16,
    pub user_agent: String,
}

/// One status poll's worth of sensor/actuator state. Rebuilt every cycle,
/// never stored between cycles; the device is the source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub car_detected: bool,
    pub is_dark: bool,
    pub release_counter: u64,
    pub led_red: bool,
    pub led_green: bool,
    pub led_white: bool,
    pub servo_angle: u16,
    /// Server-detected fault; a snapshot carrying this is treated like a failed poll.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body for `POST /api/servo`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ServoCommand {
    pub angle: u16,
}

/// Events emitted by the poller and consumed by presentation layers.
#[derive(Debug, Clone)]
pub enum PanelEvent {
    Snapshot(StatusSnapshot),
    Disconnected { reason: String },
}

/// Clamp an arbitrary target into the commandable angle domain.
pub fn clamp_angle(v: i64) -> u16 {
    v.clamp(ANGLE_MIN as i64, ANGLE_MAX as i64) as u16
}

/// Map a servo angle (0-180) to the displayed arm rotation, where 90 is
/// vertical and 0/180 are the +-90 degree extremes.
pub fn rotation_degrees(angle: u16) -> i16 {
    angle as i16 - ANGLE_NEUTRAL as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_maps_whole_domain() {
        for a in ANGLE_MIN..=ANGLE_MAX {
            assert_eq!(rotation_degrees(a), a as i16 - 90);
        }
        assert_eq!(rotation_degrees(0), -90);
        assert_eq!(rotation_degrees(90), 0);
        assert_eq!(rotation_degrees(180), 90);
    }

    #[test]
    fn clamp_holds_at_both_bounds() {
        assert_eq!(clamp_angle(-1), 0);
        assert_eq!(clamp_angle(0), 0);
        assert_eq!(clamp_angle(90), 90);
        assert_eq!(clamp_angle(180), 180);
        assert_eq!(clamp_angle(200), 180);
        assert_eq!(clamp_angle(i64::MIN), 0);
        assert_eq!(clamp_angle(i64::MAX), 180);
    }

    #[test]
    fn sentinel_is_outside_manual_domain() {
        assert!(AUTO_RELEASE > ANGLE_MAX);
        assert_ne!(clamp_angle(AUTO_RELEASE as i64), AUTO_RELEASE);
    }

    #[test]
    fn snapshot_deserializes_without_error_field() {
        let s: StatusSnapshot = serde_json::from_str(
            r#"{"car_detected":true,"is_dark":false,"release_counter":12,
                "led_red":true,"led_green":false,"led_white":true,"servo_angle":45}"#,
        )
        .unwrap();
        assert!(s.car_detected);
        assert!(!s.is_dark);
        assert_eq!(s.release_counter, 12);
        assert_eq!(s.servo_angle, 45);
        assert!(s.error.is_none());
    }

    #[test]
    fn snapshot_carries_error_field() {
        let s: StatusSnapshot = serde_json::from_str(
            r#"{"car_detected":false,"is_dark":false,"release_counter":0,
                "led_red":false,"led_green":false,"led_white":false,
                "servo_angle":0,"error":"i2c read failed"}"#,
        )
        .unwrap();
        assert_eq!(s.error.as_deref(), Some("i2c read failed"));
    }

    #[test]
    fn servo_command_wire_format() {
        let body = serde_json::to_string(&ServoCommand { angle: 180 }).unwrap();
        assert_eq!(body, r#"{"angle":180}"#);
    }
}
