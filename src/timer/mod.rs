pub mod session;
pub mod state;
pub mod ticker;

pub use session::{ObserverId, PrayerSession, SessionObserver};
pub use state::{format_long, format_short, ElapsedTimer, TimerStatus};
pub use ticker::{SessionTicker, SharedSession};
