use std::time::{Duration, Instant};

/// One-shot deadline for the delayed return to the home screen.
///
/// Navigation cancels it so a stale return never fires on another screen.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReturnTimer {
    deadline: Option<Instant>,
}

impl ReturnTimer {
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once, on the first call at or after the deadline.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_deadline() {
        let start = Instant::now();
        let mut timer = ReturnTimer::default();
        timer.arm(start, Duration::from_millis(2500));

        assert!(!timer.fire(start + Duration::from_millis(2499)));
        assert!(timer.fire(start + Duration::from_millis(2500)));
        assert!(!timer.fire(start + Duration::from_secs(10)));
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut timer = ReturnTimer::default();
        timer.arm(start, Duration::from_millis(10));
        timer.cancel();
        assert!(!timer.fire(start + Duration::from_secs(1)));
    }
}
