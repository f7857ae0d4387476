//! State module for tracking harvest progress
//!
//! # Components
//!
//! - `CrawlState`: where the orchestrator is in the alphabet walk
//! - `Checkpoint`: the durable record of completed domains and their words

mod checkpoint;
mod crawl_state;

// Re-export main types
pub use checkpoint::{Checkpoint, CHECKPOINT_VERSION};
pub use crawl_state::CrawlState;
