// src/pipeline/orchestrator.rs
use super::config::PipelineConfig;
use crate::error::PipelineError;
use boxflow_layout::{build_tree, LayoutEngine, LayoutResult, RenderOutput, StyledElement};
use std::fs;
use std::io;
use std::path::Path;

/// The result of one pipeline run.
#[derive(Debug, Clone)]
pub struct ResolvedLayout {
    pub output: RenderOutput,
    pub result: LayoutResult,
}

impl ResolvedLayout {
    pub fn to_json(&self) -> Result<String, PipelineError> {
        Ok(serde_json::to_string_pretty(&self.output)?)
    }
}

/// Turns styled element trees into render layout trees.
///
/// A pipeline owns one engine; sessions are numbered across successive runs.
pub struct Pipeline {
    engine: LayoutEngine,
    config: PipelineConfig,
}

impl Pipeline {
    pub(crate) fn new(engine: LayoutEngine, config: PipelineConfig) -> Self {
        Self { engine, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn run(&mut self, root: &StyledElement) -> Result<ResolvedLayout, PipelineError> {
        let mut tree = build_tree(root);
        let result = self.engine.resolve(&mut tree)?;
        let output = RenderOutput::from_tree(&tree);
        log::info!(
            "Resolved {} elements into {} render nodes ({} descriptors).",
            tree.len(),
            output.node_count(),
            result.descriptors.len()
        );
        Ok(ResolvedLayout { output, result })
    }

    /// Parses a styled element tree from JSON and runs it.
    pub fn run_json(&mut self, source: &str) -> Result<ResolvedLayout, PipelineError> {
        let root: StyledElement = serde_json::from_str(source)?;
        self.run(&root)
    }

    pub fn run_value(&mut self, value: serde_json::Value) -> Result<ResolvedLayout, PipelineError> {
        let root: StyledElement = serde_json::from_value(value)?;
        self.run(&root)
    }

    pub fn run_file<P: AsRef<Path>>(&mut self, path: P) -> Result<ResolvedLayout, PipelineError> {
        let path_ref = path.as_ref();
        let source = fs::read_to_string(path_ref).map_err(|e| {
            PipelineError::Io(io::Error::new(
                e.kind(),
                format!("Failed to read input from '{}': {}", path_ref.display(), e),
            ))
        })?;
        self.run_json(&source)
    }
}
