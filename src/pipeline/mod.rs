//! Layout pipeline orchestration.
//!
//! - [`PipelineBuilder`]: fluent builder for a configured [`Pipeline`]
//! - [`PipelineConfig`]: layout settings plus the profiling switch, loadable from JSON
//!
//! # Example
//!
//! ```ignore
//! use boxflow::PipelineBuilder;
//!
//! let mut pipeline = PipelineBuilder::new()
//!     .with_config_file("boxflow.json")?
//!     .build()?;
//!
//! let resolved = pipeline.run_file("page.json")?;
//! println!("{}", resolved.to_json()?);
//! ```

mod builder;
pub mod config;
mod orchestrator;

pub use builder::PipelineBuilder;
pub use config::PipelineConfig;
pub use orchestrator::{Pipeline, ResolvedLayout};
