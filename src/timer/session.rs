use std::time::Instant;

use log::info;

use super::{ElapsedTimer, TimerStatus};

/// Receives the final formatted duration of every completed session.
pub trait SessionObserver: Send {
    fn on_session_completed(&mut self, formatted_duration: &str);
}

impl<F> SessionObserver for F
where
    F: FnMut(&str) + Send,
{
    fn on_session_completed(&mut self, formatted_duration: &str) {
        self(formatted_duration)
    }
}

/// Handle returned by [`PrayerSession::add_observer`], used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// One timed period of devotional practice.
///
/// The session does not guard against redundant `begin` calls: callers track
/// their own "session active" flag, and a second `begin` simply restarts the
/// clock from zero.
#[derive(Default)]
pub struct PrayerSession {
    timer: ElapsedTimer,
    observers: Vec<(ObserverId, Box<dyn SessionObserver>)>,
    next_observer_id: u64,
}

impl PrayerSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) {
        self.begin_at(Instant::now());
    }

    pub fn begin_at(&mut self, now: Instant) {
        self.timer.reset();
        self.timer.start_at(now);
        info!("Prayer session started");
    }

    pub fn suspend(&mut self) {
        self.suspend_at(Instant::now());
    }

    pub fn suspend_at(&mut self, now: Instant) {
        self.timer.pause_at(now);
    }

    pub fn resume_session(&mut self) {
        self.resume_session_at(Instant::now());
    }

    pub fn resume_session_at(&mut self, now: Instant) {
        self.timer.start_at(now);
    }

    /// Stops the clock, notifies every observer with the `H:MM:SS`/`MM:SS`
    /// duration and resets. Returns the duration that was broadcast, or `None`
    /// when no session was in progress.
    pub fn end(&mut self) -> Option<String> {
        self.end_at(Instant::now())
    }

    pub fn end_at(&mut self, now: Instant) -> Option<String> {
        if self.timer.status() == TimerStatus::Stopped {
            return None;
        }

        self.timer.pause_at(now);
        let duration = self.timer.formatted_long();

        for (_, observer) in self.observers.iter_mut() {
            observer.on_session_completed(&duration);
        }

        info!(
            "Prayer session completed after {} ({} observers notified)",
            duration,
            self.observers.len()
        );

        self.timer.reset();
        Some(duration)
    }

    pub fn current_timer(&self) -> &ElapsedTimer {
        &self.timer
    }

    pub fn add_observer(&mut self, observer: impl SessionObserver + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl FnMut(&str) + Send + 'static) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        (calls, move |duration: &str| {
            sink.lock().unwrap().push(duration.to_string());
        })
    }

    #[test]
    fn end_notifies_each_observer_exactly_once() {
        let (first_calls, first) = recorder();
        let (second_calls, second) = recorder();
        let mut session = PrayerSession::new();
        session.add_observer(first);
        session.add_observer(second);

        let t0 = Instant::now();
        session.begin_at(t0);
        let reported = session.end_at(t0 + Duration::from_secs(75));

        assert_eq!(reported.as_deref(), Some("01:15"));
        assert_eq!(*first_calls.lock().unwrap(), vec!["01:15".to_string()]);
        assert_eq!(*second_calls.lock().unwrap(), vec!["01:15".to_string()]);

        assert_eq!(session.end_at(t0 + Duration::from_secs(80)), None);
        assert_eq!(first_calls.lock().unwrap().len(), 1);
        assert_eq!(second_calls.lock().unwrap().len(), 1);
        assert!(session.current_timer().is_stopped());
    }

    #[test]
    fn end_without_begin_is_silent() {
        let (calls, observer) = recorder();
        let mut session = PrayerSession::new();
        session.add_observer(observer);

        assert_eq!(session.end(), None);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn suspended_time_is_not_counted() {
        let mut session = PrayerSession::new();
        let t0 = Instant::now();

        session.begin_at(t0);
        session.suspend_at(t0 + Duration::from_secs(30));
        assert!(session.current_timer().is_paused());
        session.resume_session_at(t0 + Duration::from_secs(600));

        let reported = session.end_at(t0 + Duration::from_secs(630));
        assert_eq!(reported.as_deref(), Some("01:00"));
    }

    #[test]
    fn ending_a_paused_session_still_notifies() {
        let (calls, observer) = recorder();
        let mut session = PrayerSession::new();
        session.add_observer(observer);
        let t0 = Instant::now();

        session.begin_at(t0);
        session.suspend_at(t0 + Duration::from_secs(3661));

        assert_eq!(
            session.end_at(t0 + Duration::from_secs(9000)).as_deref(),
            Some("1:01:01")
        );
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn begin_restarts_from_zero() {
        let mut session = PrayerSession::new();
        let t0 = Instant::now();

        session.begin_at(t0);
        session.begin_at(t0 + Duration::from_secs(100));

        assert_eq!(
            session
                .current_timer()
                .elapsed_at(t0 + Duration::from_secs(110)),
            Duration::from_secs(10)
        );
    }

    #[test]
    fn removed_observer_is_not_called() {
        let (kept_calls, kept) = recorder();
        let (removed_calls, removed) = recorder();
        let mut session = PrayerSession::new();
        session.add_observer(kept);
        let id = session.add_observer(removed);

        assert!(session.remove_observer(id));
        assert!(!session.remove_observer(id));
        assert_eq!(session.observer_count(), 1);

        session.begin();
        session.end();

        assert_eq!(kept_calls.lock().unwrap().len(), 1);
        assert!(removed_calls.lock().unwrap().is_empty());
    }
}
