//! Mode controller and manual command dispatcher.
//!
//! `Panel` owns the auto/manual flag and the slider angle so presentation
//! layers hold a single piece of control state instead of loose variables.
//! Every method that can produce an outbound command returns the angle to
//! send; the caller applies visuals first and ships the command after
//! (local apply, then fire-and-forget remote sync).

use crate::model::{clamp_angle, rotation_degrees, ANGLE_NEUTRAL, AUTO_RELEASE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Automatic,
    Manual,
}

impl Mode {
    pub fn describe(self) -> &'static str {
        match self {
            Mode::Automatic => "The system is in automatic mode",
            Mode::Manual => "Manual control enabled",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Panel {
    mode: Mode,
    /// Slider position, always within [0, 180].
    angle: u16,
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            mode: Mode::Automatic,
            angle: ANGLE_NEUTRAL,
        }
    }
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_automatic(&self) -> bool {
        self.mode == Mode::Automatic
    }

    pub fn angle(&self) -> u16 {
        self.angle
    }

    /// Displayed rotation of the slider position.
    pub fn rotation(&self) -> i16 {
        rotation_degrees(self.angle)
    }

    /// Flip between automatic and manual. Entering automatic yields the
    /// release sentinel to send; entering manual sends nothing and leaves
    /// the device at its last position until the operator acts.
    pub fn toggle_mode(&mut self) -> Option<u16> {
        match self.mode {
            Mode::Automatic => {
                self.mode = Mode::Manual;
                None
            }
            Mode::Manual => {
                self.mode = Mode::Automatic;
                Some(AUTO_RELEASE)
            }
        }
    }

    /// Relative step (step buttons). Clamps at both bounds; returns the
    /// angle to send, or `None` while automatic.
    pub fn step(&mut self, delta: i16) -> Option<u16> {
        if self.is_automatic() {
            return None;
        }
        self.angle = clamp_angle(self.angle as i64 + delta as i64);
        Some(self.angle)
    }

    /// Absolute set (preset buttons). Clamps out-of-range targets; returns
    /// the angle to send, or `None` while automatic.
    pub fn set(&mut self, angle: i64) -> Option<u16> {
        if self.is_automatic() {
            return None;
        }
        self.angle = clamp_angle(angle);
        Some(self.angle)
    }

    /// Slider drag: moves the slider and its readout locally without
    /// sending anything. Returns whether the slider moved.
    pub fn drag(&mut self, delta: i16) -> bool {
        if self.is_automatic() {
            return false;
        }
        let next = clamp_angle(self.angle as i64 + delta as i64);
        let moved = next != self.angle;
        self.angle = next;
        moved
    }

    /// Slider commit: sends the current slider position. `None` while automatic.
    pub fn commit(&mut self) -> Option<u16> {
        if self.is_automatic() {
            return None;
        }
        Some(self.angle)
    }

    /// Reconcile the slider with a polled angle. Only automatic mode follows
    /// the device; in manual mode the slider stays under operator control.
    /// Returns whether the slider was synchronized.
    pub fn sync_from_poll(&mut self, servo_angle: u16) -> bool {
        if !self.is_automatic() {
            return false;
        }
        self.angle = clamp_angle(servo_angle as i64);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ANGLE_MAX, ANGLE_MIN, AUTO_RELEASE};

    fn manual_panel() -> Panel {
        let mut p = Panel::new();
        assert_eq!(p.toggle_mode(), None);
        assert_eq!(p.mode(), Mode::Manual);
        p
    }

    #[test]
    fn starts_automatic_at_neutral() {
        let p = Panel::new();
        assert!(p.is_automatic());
        assert_eq!(p.angle(), 90);
        assert_eq!(p.rotation(), 0);
    }

    #[test]
    fn toggle_to_automatic_sends_sentinel_exactly_once() {
        let mut p = manual_panel();
        assert_eq!(p.toggle_mode(), Some(AUTO_RELEASE));
        assert!(p.is_automatic());
        // Toggling again enters manual without a command.
        assert_eq!(p.toggle_mode(), None);
    }

    #[test]
    fn toggle_to_automatic_sends_sentinel_regardless_of_pending_angle() {
        let mut p = manual_panel();
        p.set(175);
        assert_eq!(p.toggle_mode(), Some(AUTO_RELEASE));
    }

    #[test]
    fn manual_entry_points_are_inert_while_automatic() {
        let mut p = Panel::new();
        assert_eq!(p.step(10), None);
        assert_eq!(p.set(45), None);
        assert!(!p.drag(5));
        assert_eq!(p.commit(), None);
        assert_eq!(p.angle(), 90);
    }

    #[test]
    fn step_clamps_at_upper_bound() {
        let mut p = manual_panel();
        p.set(175);
        assert_eq!(p.step(10), Some(ANGLE_MAX));
        assert_eq!(p.step(10), Some(ANGLE_MAX));
        assert_eq!(p.angle(), 180);
    }

    #[test]
    fn step_clamps_at_lower_bound() {
        let mut p = manual_panel();
        p.set(5);
        assert_eq!(p.step(-10), Some(ANGLE_MIN));
        assert_eq!(p.step(-10), Some(ANGLE_MIN));
    }

    #[test]
    fn step_never_leaves_domain() {
        for start in [0i64, 1, 90, 179, 180] {
            for delta in [-360i16, -10, -1, 0, 1, 10, 360] {
                let mut p = manual_panel();
                p.set(start);
                let sent = p.step(delta).unwrap();
                assert!(sent <= ANGLE_MAX);
                assert_eq!(sent, p.angle());
            }
        }
    }

    #[test]
    fn absolute_set_clamps_out_of_range() {
        let mut p = manual_panel();
        assert_eq!(p.set(200), Some(180));
        assert_eq!(p.set(-20), Some(0));
        assert_eq!(p.set(45), Some(45));
        assert_eq!(p.rotation(), -45);
    }

    #[test]
    fn drag_moves_locally_and_commit_sends() {
        let mut p = manual_panel();
        p.set(90);
        assert!(p.drag(3));
        assert_eq!(p.angle(), 93);
        assert_eq!(p.commit(), Some(93));
        // Drag at the bound reports no movement.
        p.set(180);
        assert!(!p.drag(1));
    }

    #[test]
    fn poll_sync_follows_device_only_in_automatic() {
        let mut p = Panel::new();
        assert!(p.sync_from_poll(45));
        assert_eq!(p.angle(), 45);
        assert_eq!(p.rotation(), -45);

        p.toggle_mode();
        p.set(120);
        assert!(!p.sync_from_poll(30));
        assert_eq!(p.angle(), 120);
    }
}
