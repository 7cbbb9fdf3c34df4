pub mod models;
pub mod store;

pub use models::{HighlightRange, Rgb};
pub use store::HighlightStore;
