//! Autosave state machine.
//!
//! The timer itself lives with the caller; this only decides what a tick
//! does and what the status indicator shows.
//!
//! ```text
//! Disabled <-> Armed --tick--> Saving --1s--> Saved --2s--> Armed
//!                         \--> Error  --2s--> Armed
//! ```

use web_time::{Duration, Instant};

use crate::config::PlaygroundConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutosaveState {
    Disabled,
    Armed,
    Saving,
    Saved,
    Error,
}

/// Result of one autosave tick.
#[derive(Debug, PartialEq, Eq)]
pub enum TickOutcome<E> {
    /// Autosave is off, nothing was written.
    Skipped,
    Saved,
    Failed(E),
}

#[derive(Debug, Clone)]
pub struct Autosave {
    state: AutosaveState,
    entered: Option<Instant>,
    interval: Duration,
    saving_for: Duration,
    saved_for: Duration,
}

impl Autosave {
    pub fn new(enabled: bool, config: &PlaygroundConfig) -> Self {
        Self {
            state: if enabled {
                AutosaveState::Armed
            } else {
                AutosaveState::Disabled
            },
            entered: None,
            interval: config.autosave_interval(),
            saving_for: config.saving_display(),
            saved_for: config.saved_display(),
        }
    }

    pub fn state(&self) -> AutosaveState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state != AutosaveState::Disabled
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn enable(&mut self) {
        if self.state == AutosaveState::Disabled {
            self.transition(AutosaveState::Armed, None);
        }
    }

    pub fn disable(&mut self) {
        self.transition(AutosaveState::Disabled, None);
    }

    /// Flip the enabled flag, returning the new value.
    pub fn toggle(&mut self) -> bool {
        if self.is_enabled() {
            self.disable();
        } else {
            self.enable();
        }
        self.is_enabled()
    }

    /// Run one timer tick. `save` is only called when autosave is enabled.
    pub fn tick<E>(&mut self, now: Instant, save: impl FnOnce() -> Result<(), E>) -> TickOutcome<E> {
        if !self.is_enabled() {
            return TickOutcome::Skipped;
        }
        match save() {
            Ok(()) => {
                self.transition(AutosaveState::Saving, Some(now));
                TickOutcome::Saved
            }
            Err(e) => {
                self.transition(AutosaveState::Error, Some(now));
                TickOutcome::Failed(e)
            }
        }
    }

    /// Advance out of timed display states whose window has passed.
    pub fn settle(&mut self, now: Instant) -> AutosaveState {
        while let Some(entered) = self.entered {
            let Some(window) = self.window() else { break };
            let until = entered + window;
            if now < until {
                break;
            }
            let next = match self.state {
                AutosaveState::Saving => AutosaveState::Saved,
                _ => AutosaveState::Armed,
            };
            let entered = (next == AutosaveState::Saved).then_some(until);
            self.transition(next, entered);
        }
        self.state
    }

    /// Time until the current display state should settle.
    pub fn next_settle(&self, now: Instant) -> Option<Duration> {
        let until = self.entered? + self.window()?;
        Some(until.saturating_duration_since(now))
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_enabled() {
            "Auto Save ON"
        } else {
            "Auto Save OFF"
        }
    }

    pub fn status_title(&self) -> &'static str {
        if self.is_enabled() {
            "Auto-save is ON. Click to disable."
        } else {
            "Auto-save is OFF. Click to enable."
        }
    }

    /// CSS class for the status indicator.
    pub fn status_class(&self) -> &'static str {
        match self.state {
            AutosaveState::Disabled => "off",
            AutosaveState::Armed => "",
            AutosaveState::Saving => "saving",
            AutosaveState::Saved => "saved",
            AutosaveState::Error => "error",
        }
    }

    fn window(&self) -> Option<Duration> {
        match self.state {
            AutosaveState::Saving => Some(self.saving_for),
            AutosaveState::Saved | AutosaveState::Error => Some(self.saved_for),
            AutosaveState::Disabled | AutosaveState::Armed => None,
        }
    }

    fn transition(&mut self, state: AutosaveState, entered: Option<Instant>) {
        if self.state != state {
            tracing::trace!(from = ?self.state, to = ?state, "autosave state");
        }
        self.state = state;
        self.entered = entered;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armed() -> Autosave {
        Autosave::new(true, &PlaygroundConfig::default())
    }

    #[test]
    fn test_disabled_tick_is_noop() {
        let mut autosave = Autosave::new(false, &PlaygroundConfig::default());
        let mut called = false;
        let outcome = autosave.tick(Instant::now(), || {
            called = true;
            Ok::<(), ()>(())
        });
        assert_eq!(outcome, TickOutcome::Skipped);
        assert!(!called);
        assert_eq!(autosave.state(), AutosaveState::Disabled);
    }

    #[test]
    fn test_successful_tick_cycle() {
        let mut autosave = armed();
        let t0 = Instant::now();
        assert_eq!(autosave.tick(t0, || Ok::<(), ()>(())), TickOutcome::Saved);
        assert_eq!(autosave.state(), AutosaveState::Saving);
        assert_eq!(autosave.next_settle(t0), Some(Duration::from_secs(1)));

        assert_eq!(autosave.settle(t0 + Duration::from_millis(500)), AutosaveState::Saving);
        assert_eq!(autosave.settle(t0 + Duration::from_secs(1)), AutosaveState::Saved);
        assert_eq!(
            autosave.next_settle(t0 + Duration::from_secs(1)),
            Some(Duration::from_secs(2))
        );
        assert_eq!(autosave.settle(t0 + Duration::from_secs(3)), AutosaveState::Armed);
        assert_eq!(autosave.next_settle(t0 + Duration::from_secs(3)), None);
    }

    #[test]
    fn test_late_settle_skips_through() {
        let mut autosave = armed();
        let t0 = Instant::now();
        autosave.tick(t0, || Ok::<(), ()>(()));
        assert_eq!(autosave.settle(t0 + Duration::from_secs(10)), AutosaveState::Armed);
    }

    #[test]
    fn test_failure_keeps_scheduler_running() {
        let mut autosave = armed();
        let t0 = Instant::now();
        assert_eq!(autosave.tick(t0, || Err("quota")), TickOutcome::Failed("quota"));
        assert_eq!(autosave.status_class(), "error");
        assert_eq!(autosave.settle(t0 + Duration::from_secs(2)), AutosaveState::Armed);
        assert_eq!(autosave.tick(t0, || Ok::<(), &str>(())), TickOutcome::Saved);
    }

    #[test]
    fn test_toggle_and_labels() {
        let mut autosave = armed();
        assert_eq!(autosave.status_label(), "Auto Save ON");
        assert!(!autosave.toggle());
        assert_eq!(autosave.status_label(), "Auto Save OFF");
        assert_eq!(autosave.status_class(), "off");
        assert!(autosave.toggle());
        assert_eq!(autosave.state(), AutosaveState::Armed);
    }

    #[test]
    fn test_disable_during_display_window() {
        let mut autosave = armed();
        let t0 = Instant::now();
        autosave.tick(t0, || Ok::<(), ()>(()));
        autosave.disable();
        assert_eq!(autosave.settle(t0 + Duration::from_secs(5)), AutosaveState::Disabled);
    }
}
