// src/pipeline/builder.rs
use super::config::PipelineConfig;
use super::orchestrator::Pipeline;
use crate::error::PipelineError;
use boxflow_layout::perf::{DebugProfiler, NoOpProfiler, Profiler};
use boxflow_layout::{Extension, LayoutConfig, LayoutEngine};
use std::path::Path;

/// A builder for creating a [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: PipelineConfig,
    extensions: Vec<Box<dyn Extension>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces only the layout part of the configuration.
    pub fn with_layout_config(mut self, layout: LayoutConfig) -> Self {
        self.config.layout = layout;
        self
    }

    /// Loads the configuration from a JSON file.
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, PipelineError> {
        self.config = PipelineConfig::from_file(path)?;
        Ok(self)
    }

    pub fn with_profiling(mut self, enabled: bool) -> Self {
        self.config.profiling = enabled;
        self
    }

    /// Registers an extension. Extensions are consulted in registration order.
    pub fn with_extension(mut self, extension: impl Extension + 'static) -> Self {
        self.extensions.push(Box::new(extension));
        self
    }

    pub fn build(self) -> Result<Pipeline, PipelineError> {
        self.config.validate()?;

        let profiler: Box<dyn Profiler> = if self.config.profiling {
            Box::new(DebugProfiler::new())
        } else {
            Box::new(NoOpProfiler)
        };

        let mut engine = LayoutEngine::new(self.config.layout).with_profiler(profiler);
        for extension in self.extensions {
            engine.register(extension);
        }
        log::debug!(
            "Built layout pipeline with {} extensions (profiling: {}).",
            engine.extensions().len(),
            self.config.profiling
        );
        Ok(Pipeline::new(engine, self.config))
    }
}
