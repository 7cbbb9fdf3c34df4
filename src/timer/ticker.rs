use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use log::debug;
use tokio::{sync::Mutex, task::JoinHandle, time};
use tokio_util::sync::CancellationToken;

use super::PrayerSession;

pub type SharedSession = Arc<Mutex<PrayerSession>>;

/// Periodic display poll for a running session.
///
/// Every tick reads `current_timer().formatted_short()` and hands it to the
/// callback while the timer runs. Paused and stopped sessions are polled but
/// not reported, so one ticker serves every session begun on the same
/// [`SharedSession`] until [`SessionTicker::stop`]. A late tick only delays
/// the visible update.
pub struct SessionTicker {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl SessionTicker {
    pub fn spawn<F>(session: SharedSession, tick_interval: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(String) + Send + 'static,
    {
        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            interval.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {}
                }

                let display = {
                    let guard = session.lock().await;
                    let timer = guard.current_timer();
                    if !timer.is_running() {
                        continue;
                    }
                    timer.formatted_short()
                };

                on_tick(display);
            }

            debug!("Session ticker exiting");
        });

        Self {
            handle: Some(handle),
            cancel_token: Some(cancel_token),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| handle.is_finished())
            .unwrap_or(true)
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("session ticker task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

impl Drop for SessionTicker {
    fn drop(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    #[tokio::test]
    async fn ticks_while_running_and_stops_on_request() {
        let session: SharedSession = Arc::new(Mutex::new(PrayerSession::new()));
        session.lock().await.begin();

        let seen = Arc::new(StdMutex::new(Vec::new()));
        let sink = seen.clone();
        let mut ticker = SessionTicker::spawn(session.clone(), Duration::from_millis(10), move |t| {
            sink.lock().unwrap().push(t);
        });

        time::sleep(Duration::from_millis(80)).await;
        ticker.stop().await.unwrap();

        let seen = seen.lock().unwrap();
        assert!(!seen.is_empty());
        assert!(seen.iter().all(|t| t == "00:00"));
        assert!(ticker.is_finished());
    }

    #[tokio::test]
    async fn keeps_serving_the_next_session() {
        let session: SharedSession = Arc::new(Mutex::new(PrayerSession::new()));
        session.lock().await.begin();

        let count = Arc::new(StdMutex::new(0usize));
        let sink = count.clone();
        let mut ticker = SessionTicker::spawn(session.clone(), Duration::from_millis(5), move |_| {
            *sink.lock().unwrap() += 1;
        });

        session.lock().await.end();
        time::sleep(Duration::from_millis(30)).await;
        assert!(!ticker.is_finished());
        let while_stopped = *count.lock().unwrap();

        time::sleep(Duration::from_millis(30)).await;
        assert_eq!(*count.lock().unwrap(), while_stopped);

        session.lock().await.begin();
        time::sleep(Duration::from_millis(60)).await;
        assert!(*count.lock().unwrap() > while_stopped);

        ticker.stop().await.unwrap();
        assert!(ticker.is_finished());
    }

    #[tokio::test]
    async fn paused_session_produces_no_ticks() {
        let session: SharedSession = Arc::new(Mutex::new(PrayerSession::new()));
        {
            let mut guard = session.lock().await;
            guard.begin();
            guard.suspend();
        }

        let count = Arc::new(StdMutex::new(0usize));
        let sink = count.clone();
        let mut ticker = SessionTicker::spawn(session.clone(), Duration::from_millis(5), move |_| {
            *sink.lock().unwrap() += 1;
        });

        time::sleep(Duration::from_millis(40)).await;
        ticker.stop().await.unwrap();

        assert_eq!(*count.lock().unwrap(), 0);
    }
}
