//! Pipeline services.
//!
//! Services orchestrate the injected clients (LLM, tag registry, geocoder)
//! and provide the high-level search operation.

mod intent;
mod search;

pub use intent::IntentResolver;
pub use search::{SearchRequest, SearchService};
