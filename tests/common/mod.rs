pub mod fixtures;

use boxflow::{Pipeline, PipelineBuilder, PipelineError, RenderNode, ResolvedLayout};
use serde_json::Value;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn pipeline() -> Result<Pipeline, PipelineError> {
    init_logger();
    PipelineBuilder::new().build()
}

/// Runs `input` through a default pipeline.
pub fn resolve(input: Value) -> Result<ResolvedLayout, PipelineError> {
    pipeline()?.run_value(input)
}

pub fn root(resolved: &ResolvedLayout) -> Result<&RenderNode, Box<dyn std::error::Error>> {
    resolved
        .output
        .root
        .as_ref()
        .ok_or_else(|| "render output has no root".into())
}

pub fn child_tags(node: &RenderNode) -> Vec<&str> {
    node.children.iter().map(|c| c.tag.as_str()).collect()
}

/// First node with `tag` in depth-first order.
pub fn find_tag<'a>(node: &'a RenderNode, tag: &str) -> Option<&'a RenderNode> {
    if node.tag == tag {
        return Some(node);
    }
    node.children.iter().find_map(|c| find_tag(c, tag))
}
