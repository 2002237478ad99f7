use std::time::{Duration, Instant};

/// Fixed-period schedule for position reads, driven by the event loop.
///
/// The poller owns no thread; the loop asks [`PositionPoller::due`] on every
/// iteration and the transport reads the engine when it answers true.
#[derive(Debug, Clone)]
pub struct PositionPoller {
    period: Duration,
    next_due: Option<Instant>,
}

impl PositionPoller {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            next_due: None,
        }
    }

    /// Start ticking one period after `now`. Restarting reschedules.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// True at most once per period while running.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(at) if now >= at => {
                self.next_due = Some(now + self.period);
                true
            }
            _ => false,
        }
    }
}
