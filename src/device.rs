//! HTTP client for the barrier controller's device API.

use crate::model::{PanelConfig, ServoCommand, StatusSnapshot};
use anyhow::{bail, Context, Result};

#[derive(Clone)]
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: String,
}

impl DeviceClient {
    pub fn new(cfg: &PanelConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch one status snapshot. A snapshot carrying an `error` field is a
    /// failure, same as a transport error or a non-2xx response.
    pub async fn fetch_status(&self) -> Result<StatusSnapshot> {
        let body = self
            .http
            .get(format!("{}/api/status", self.base_url))
            .send()
            .await
            .context("status request failed")?
            .error_for_status()
            .context("status endpoint returned an error")?
            .text()
            .await
            .context("read status body")?;
        decode_status(&body)
    }

    /// Send a servo command: a manual target in 0-180, or the release
    /// sentinel. The response body is read but not interpreted.
    pub async fn send_angle(&self, angle: u16) -> Result<()> {
        let resp = self
            .http
            .post(format!("{}/api/servo", self.base_url))
            .json(&ServoCommand { angle })
            .send()
            .await
            .context("servo request failed")?
            .error_for_status()
            .context("servo endpoint returned an error")?;
        let _ = resp
            .json::<serde_json::Value>()
            .await
            .context("read servo response")?;
        Ok(())
    }
}

/// Decode a status body, surfacing a server-reported fault as an error.
fn decode_status(body: &str) -> Result<StatusSnapshot> {
    let snap: StatusSnapshot = serde_json::from_str(body).context("malformed status JSON")?;
    if let Some(err) = snap.error.as_deref() {
        bail!("device reported: {err}");
    }
    Ok(snap)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_BODY: &str = r#"{
        "car_detected": true, "is_dark": true, "release_counter": 3,
        "led_red": false, "led_green": true, "led_white": true,
        "servo_angle": 45
    }"#;

    #[test]
    fn decodes_a_healthy_snapshot() {
        let snap = decode_status(OK_BODY).unwrap();
        assert!(snap.car_detected);
        assert!(snap.is_dark);
        assert_eq!(snap.release_counter, 3);
        assert_eq!(snap.servo_angle, 45);
    }

    #[test]
    fn error_field_is_a_failure() {
        let body = r#"{
            "car_detected": false, "is_dark": false, "release_counter": 0,
            "led_red": false, "led_green": false, "led_white": false,
            "servo_angle": 0, "error": "Failed to read status"
        }"#;
        let err = decode_status(body).unwrap_err();
        assert!(err.to_string().contains("Failed to read status"));
    }

    #[test]
    fn malformed_body_is_a_failure() {
        assert!(decode_status("<html>gateway timeout</html>").is_err());
        assert!(decode_status("{}").is_err());
    }
}
