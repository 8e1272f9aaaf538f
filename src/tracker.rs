/// Extractor session state for MailClip
///
/// The content script owns one `TrackerState` per page session. The guard and
/// throttle keep the capture button from flickering or doubling up during DOM
/// churn; they are UI hygiene, not a safety mechanism.

/// Minimum interval between two button injections
pub const INJECTION_THROTTLE_MS: f64 = 1000.0;
/// Debounce window applied to mutation bursts before re-injecting
pub const MUTATION_DEBOUNCE_MS: i32 = 200;
/// Poll interval for pushState URL changes
pub const URL_POLL_INTERVAL_MS: i32 = 1000;
/// Settle delay before re-injecting after a navigation
pub const REINJECT_DELAY_MS: i32 = 500;
/// Poll interval while waiting for the webmail UI to appear
pub const STARTUP_POLL_INTERVAL_MS: i32 = 1000;

#[derive(Debug, Default)]
pub struct TrackerState {
    current_view: Option<String>,
    injecting: bool,
    last_injection_ms: f64,
}

impl TrackerState {
    pub fn new() -> TrackerState {
        TrackerState::default()
    }

    /// Record the view identifier seen by the latest mutation.
    /// Returns true when it differs from the previous one.
    pub fn note_view(&mut self, view_id: &str) -> bool {
        if self.current_view.as_deref() == Some(view_id) {
            return false;
        }
        self.current_view = Some(view_id.to_string());
        true
    }

    /// Forget the current view, e.g. after a navigation
    pub fn reset_view(&mut self) {
        self.current_view = None;
    }

    /// True while an injection attempt is in flight
    pub fn is_injecting(&self) -> bool {
        self.injecting
    }

    /// Claim the injection slot if the guard and throttle allow it.
    /// The caller must pair a successful claim with `finish_injection`.
    pub fn try_begin_injection(&mut self, now_ms: f64) -> bool {
        if self.injecting || now_ms - self.last_injection_ms < INJECTION_THROTTLE_MS {
            return false;
        }
        self.injecting = true;
        self.last_injection_ms = now_ms;
        true
    }

    /// Claim the slot ignoring the throttle. Used for the initial injection
    /// and post-navigation re-injection, where staleness is already handled
    /// by the settle delay.
    pub fn begin_injection(&mut self, now_ms: f64) -> bool {
        if self.injecting {
            return false;
        }
        self.injecting = true;
        self.last_injection_ms = now_ms;
        true
    }

    pub fn finish_injection(&mut self) {
        self.injecting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_view_detects_changes() {
        let mut state = TrackerState::new();

        assert!(state.note_view("msg-1"));
        assert!(!state.note_view("msg-1"));
        assert!(state.note_view("msg-2"));
    }

    #[test]
    fn test_reset_view_forces_next_change() {
        let mut state = TrackerState::new();
        state.note_view("msg-1");

        state.reset_view();

        assert!(state.note_view("msg-1"));
    }

    #[test]
    fn test_injection_guard_blocks_concurrent_attempts() {
        let mut state = TrackerState::new();

        assert!(state.try_begin_injection(2000.0));
        assert!(state.is_injecting());
        assert!(!state.try_begin_injection(10_000.0));

        state.finish_injection();
        assert!(!state.is_injecting());
    }

    #[test]
    fn test_injection_throttle() {
        let mut state = TrackerState::new();

        assert!(state.try_begin_injection(2000.0));
        state.finish_injection();

        // Inside the minimum interval
        assert!(!state.try_begin_injection(2500.0));
        // Past it
        assert!(state.try_begin_injection(3100.0));
    }

    #[test]
    fn test_begin_injection_ignores_throttle_but_not_guard() {
        let mut state = TrackerState::new();

        assert!(state.try_begin_injection(2000.0));
        state.finish_injection();

        assert!(state.begin_injection(2100.0));
        assert!(!state.begin_injection(2200.0));
    }
}
