//! One-shot welcome overlay
//!
//! The overlay blocks the chat until the user activates its confirm control.
//! Confirming starts a short fade; once the fade has elapsed the overlay is
//! removed and focus moves to the message input. Nothing else dismisses it.

use std::time::{Duration, Instant};

/// How long the fade runs before the overlay is removed.
pub const TRANSITION: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashPhase {
    Visible,
    Fading { since: Instant },
    Removed,
}

/// What the caller should do after feeding the gate a clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashOutcome {
    Unchanged,
    /// The overlay is gone; focus the message input.
    FocusInput,
}

#[derive(Debug, Clone)]
pub struct SplashGate {
    phase: Option<SplashPhase>,
}

impl SplashGate {
    pub fn shown() -> Self {
        Self { phase: Some(SplashPhase::Visible) }
    }

    /// A gate with no overlay. Every operation is a no-op.
    pub fn absent() -> Self {
        Self { phase: None }
    }

    pub fn from_config(show_splash: bool) -> Self {
        if show_splash { Self::shown() } else { Self::absent() }
    }

    pub fn phase(&self) -> Option<SplashPhase> {
        self.phase
    }

    pub fn is_present(&self) -> bool {
        matches!(self.phase, Some(SplashPhase::Visible | SplashPhase::Fading { .. }))
    }

    /// True while the overlay should swallow input meant for the chat.
    pub fn blocks_input(&self) -> bool {
        self.is_present()
    }

    pub fn is_fading(&self) -> bool {
        matches!(self.phase, Some(SplashPhase::Fading { .. }))
    }

    /// The designated confirm control was activated.
    pub fn confirm(&mut self, now: Instant) {
        if self.phase == Some(SplashPhase::Visible) {
            tracing::debug!("splash dismissed");
            self.phase = Some(SplashPhase::Fading { since: now });
        }
    }

    /// Advance the fade. Time alone never leaves `Visible`.
    pub fn tick(&mut self, now: Instant) -> SplashOutcome {
        match self.phase {
            Some(SplashPhase::Fading { since }) if now.saturating_duration_since(since) >= TRANSITION => {
                self.phase = Some(SplashPhase::Removed);
                SplashOutcome::FocusInput
            }
            _ => SplashOutcome::Unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_alone_never_dismisses() {
        let mut gate = SplashGate::shown();
        let start = Instant::now();
        for secs in [0, 1, 60, 3600] {
            assert_eq!(gate.tick(start + Duration::from_secs(secs)), SplashOutcome::Unchanged);
        }
        assert_eq!(gate.phase(), Some(SplashPhase::Visible));
        assert!(gate.blocks_input());
    }

    #[test]
    fn test_confirm_fades_then_removes() {
        let mut gate = SplashGate::shown();
        let start = Instant::now();
        gate.confirm(start);

        assert!(gate.is_fading());
        assert!(gate.blocks_input());
        assert_eq!(gate.tick(start + Duration::from_millis(300)), SplashOutcome::Unchanged);

        assert_eq!(gate.tick(start + TRANSITION), SplashOutcome::FocusInput);
        assert_eq!(gate.phase(), Some(SplashPhase::Removed));
        assert!(!gate.blocks_input());

        // Removal is reported once.
        assert_eq!(gate.tick(start + TRANSITION * 2), SplashOutcome::Unchanged);
    }

    #[test]
    fn test_second_confirm_does_not_restart_fade() {
        let mut gate = SplashGate::shown();
        let start = Instant::now();
        gate.confirm(start);
        gate.confirm(start + Duration::from_millis(500));
        assert_eq!(gate.tick(start + TRANSITION), SplashOutcome::FocusInput);
    }

    #[test]
    fn test_absent_gate_is_noop() {
        let mut gate = SplashGate::absent();
        let now = Instant::now();
        gate.confirm(now);
        assert_eq!(gate.tick(now + TRANSITION), SplashOutcome::Unchanged);
        assert_eq!(gate.phase(), None);
        assert!(!gate.blocks_input());
    }
}
