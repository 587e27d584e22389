//! Per-question countdown.
//!
//! A `Countdown` holds at most one active deadline. It has no notion of wall time:
//! the owner calls [`Countdown::tick`] once per second while it is running.

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The countdown is not running; nothing happened.
    Idle,
    /// One second elapsed and time remains.
    Running { remaining_secs: u32 },
    /// This tick consumed the last second. Emitted once per arm cycle.
    Expired,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining_secs: u32,
    running: bool,
    cycle: u64,
}

impl Countdown {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh deadline of `limit_secs`, replacing any running one.
    pub fn arm(&mut self, limit_secs: u32) {
        self.running = true;
        self.remaining_secs = limit_secs;
        self.cycle = self.cycle.wrapping_add(1);
    }

    /// Restart from whatever time was left when the countdown was last stopped.
    ///
    /// Returns `false` (and stays stopped) when no time is left.
    pub fn resume(&mut self) -> bool {
        if self.running {
            return true;
        }
        if self.remaining_secs == 0 {
            return false;
        }
        self.running = true;
        self.cycle = self.cycle.wrapping_add(1);
        true
    }

    /// Stop without expiring. Returns whether a deadline was active.
    pub fn disarm(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::Idle;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.running = false;
            Tick::Expired
        } else {
            Tick::Running {
                remaining_secs: self.remaining_secs,
            }
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds left; kept after `disarm` so the value can be shown or resumed.
    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Number of times the countdown has been (re)started.
    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_exactly_once_at_zero() {
        let mut countdown = Countdown::new();
        countdown.arm(3);

        assert_eq!(countdown.tick(), Tick::Running { remaining_secs: 2 });
        assert_eq!(countdown.tick(), Tick::Running { remaining_secs: 1 });
        assert_eq!(countdown.tick(), Tick::Expired);
        assert!(!countdown.is_running());
        assert_eq!(countdown.tick(), Tick::Idle);
        assert_eq!(countdown.tick(), Tick::Idle);
    }

    #[test]
    fn disarm_stops_without_expiring() {
        let mut countdown = Countdown::new();
        countdown.arm(2);
        assert!(countdown.disarm());
        assert!(!countdown.disarm());
        assert_eq!(countdown.tick(), Tick::Idle);
        assert_eq!(countdown.remaining_secs(), 2);
    }

    #[test]
    fn rearm_replaces_the_previous_deadline() {
        let mut countdown = Countdown::new();
        countdown.arm(60);
        countdown.tick();
        countdown.arm(90);

        assert_eq!(countdown.remaining_secs(), 90);
        assert_eq!(countdown.cycle(), 2);
        assert_eq!(countdown.tick(), Tick::Running { remaining_secs: 89 });
    }

    #[test]
    fn resume_continues_from_remaining_time() {
        let mut countdown = Countdown::new();
        countdown.arm(10);
        countdown.tick();
        countdown.disarm();

        assert!(countdown.resume());
        assert_eq!(countdown.cycle(), 2);
        assert_eq!(countdown.tick(), Tick::Running { remaining_secs: 8 });
    }

    #[test]
    fn resume_after_expiry_stays_stopped() {
        let mut countdown = Countdown::new();
        countdown.arm(1);
        assert_eq!(countdown.tick(), Tick::Expired);
        assert!(!countdown.resume());
        assert_eq!(countdown.tick(), Tick::Idle);
    }
}
