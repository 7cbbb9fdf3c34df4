use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TimerStatus {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// Accumulates the time spent in `Running` across any number of
/// pause/resume cycles.
///
/// Out-of-order calls (starting a running timer, pausing a stopped one) are
/// no-ops so that UI double clicks cannot corrupt the accumulated duration.
#[derive(Debug, Clone, Default)]
pub struct ElapsedTimer {
    status: TimerStatus,
    /// Set while `Running`; combines with `accumulated` to give the live value.
    running_anchor: Option<Instant>,
    accumulated: Duration,
}

impl ElapsedTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn is_paused(&self) -> bool {
        self.status == TimerStatus::Paused
    }

    pub fn is_stopped(&self) -> bool {
        self.status == TimerStatus::Stopped
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        if self.status == TimerStatus::Running {
            return;
        }
        self.running_anchor = Some(now);
        self.status = TimerStatus::Running;
    }

    pub fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    pub fn pause_at(&mut self, now: Instant) {
        if self.status != TimerStatus::Running {
            return;
        }
        if let Some(anchor) = self.running_anchor.take() {
            self.accumulated = self
                .accumulated
                .saturating_add(now.saturating_duration_since(anchor));
        }
        self.status = TimerStatus::Paused;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    /// Pure read: the running window is added on the fly, never stored.
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        match (self.status, self.running_anchor) {
            (TimerStatus::Running, Some(anchor)) => self
                .accumulated
                .saturating_add(now.saturating_duration_since(anchor)),
            _ => self.accumulated,
        }
    }

    /// `MM:SS`, minutes unbounded.
    pub fn formatted_short(&self) -> String {
        format_short(self.elapsed())
    }

    /// `H:MM:SS` once an hour has passed, otherwise `MM:SS`.
    pub fn formatted_long(&self) -> String {
        format_long(self.elapsed())
    }
}

pub fn format_short(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{:02}:{:02}", total / 60, total % 60)
}

pub fn format_long(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn accumulates_across_pause_resume_cycles() {
        let t0 = Instant::now();
        let mut timer = ElapsedTimer::new();

        timer.start_at(t0);
        timer.pause_at(t0 + secs(2));
        timer.start_at(t0 + secs(10));
        timer.pause_at(t0 + secs(13));

        assert_eq!(timer.status(), TimerStatus::Paused);
        assert_eq!(timer.elapsed_at(t0 + secs(100)), secs(5));
    }

    #[test]
    fn second_start_does_not_move_the_anchor() {
        let t0 = Instant::now();
        let mut timer = ElapsedTimer::new();

        timer.start_at(t0);
        timer.start_at(t0 + secs(4));

        assert_eq!(timer.elapsed_at(t0 + secs(6)), secs(6));
        timer.pause_at(t0 + secs(6));
        assert_eq!(timer.elapsed_at(t0 + secs(60)), secs(6));
    }

    #[test]
    fn pause_when_not_running_is_ignored() {
        let t0 = Instant::now();
        let mut timer = ElapsedTimer::new();

        timer.pause_at(t0);
        assert!(timer.is_stopped());
        assert_eq!(timer.elapsed_at(t0), Duration::ZERO);

        timer.start_at(t0);
        timer.pause_at(t0 + secs(3));
        timer.pause_at(t0 + secs(9));
        assert_eq!(timer.elapsed_at(t0 + secs(9)), secs(3));
    }

    #[test]
    fn elapsed_while_running_does_not_mutate() {
        let t0 = Instant::now();
        let mut timer = ElapsedTimer::new();
        timer.start_at(t0);

        assert_eq!(timer.elapsed_at(t0 + secs(7)), secs(7));
        assert_eq!(timer.elapsed_at(t0 + secs(8)), secs(8));
        timer.pause_at(t0 + secs(8));
        assert_eq!(timer.elapsed_at(t0 + secs(20)), secs(8));
    }

    #[test]
    fn reset_clears_everything() {
        let t0 = Instant::now();
        let mut timer = ElapsedTimer::new();
        timer.start_at(t0);
        timer.pause_at(t0 + secs(42));
        timer.start_at(t0 + secs(50));

        timer.reset();

        assert!(timer.is_stopped());
        assert_eq!(timer.elapsed(), Duration::ZERO);
        assert_eq!(timer.formatted_short(), "00:00");
    }

    #[test]
    fn short_format_keeps_counting_minutes() {
        assert_eq!(format_short(Duration::ZERO), "00:00");
        assert_eq!(format_short(secs(59)), "00:59");
        assert_eq!(format_short(secs(61)), "01:01");
        assert_eq!(format_short(secs(3661)), "61:01");
        assert_eq!(format_short(Duration::from_millis(1999)), "00:01");
    }

    #[test]
    fn long_format_adds_hours_only_when_needed() {
        assert_eq!(format_long(Duration::ZERO), "00:00");
        assert_eq!(format_long(secs(3599)), "59:59");
        assert_eq!(format_long(secs(3600)), "1:00:00");
        assert_eq!(format_long(secs(3661)), "1:01:01");
        assert_eq!(format_long(secs(36_000 + 5)), "10:00:05");
    }
}
