pub mod config;
pub mod dedup;
pub mod error;
pub mod metrics;
pub mod nesting;
pub mod pipeline;
pub mod profile;
pub mod types;

pub use config::Config;
pub use error::Error;
pub use metrics::PartitionSummary;
pub use pipeline::CorpusPipeline;
pub use profile::LanguageProfile;
pub use types::*;
