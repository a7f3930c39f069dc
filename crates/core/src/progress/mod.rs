pub mod aggregator;
pub mod event;

pub use aggregator::{short_file_name, ProgressAggregator, ProgressItem};
pub use event::{ProgressEvent, ProgressPhase};
