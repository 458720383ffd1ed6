pub mod types;
pub mod watermark;
pub mod normalize;
pub mod reconcile;
pub mod state;
pub mod traits;
pub mod fetcher;
pub mod parser;
pub mod sources;
pub mod digest;
pub mod notify;
pub mod config;
pub mod coordinator;

pub use types::*;
pub use watermark::{Watermark, WatermarkState, WatermarkStore};
pub use reconcile::{reconcile, Reconciliation};
pub use state::StateFile;
pub use traits::{FeedSource, Notifier};
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use sources::HttpFeedSource;
pub use notify::{EmailApiConfig, HttpEmailNotifier};
pub use coordinator::{FeedOutcome, NotificationStatus, RunCoordinator, RunReport};
