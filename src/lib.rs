//! Layout resolution: styled element trees in, grouped render layout trees out.
//!
//! The engine itself lives in `boxflow-layout`; this crate wires it to JSON input and
//! configuration.

pub mod error;
pub mod pipeline;

pub use error::PipelineError;
pub use pipeline::{Pipeline, PipelineBuilder, PipelineConfig, ResolvedLayout};

pub use boxflow_layout::{
    Alignment, ContainerType, Extension, ExtensionError, HookContext, LayoutConfig,
    LayoutEngine, LayoutError, LayoutResult, NodeTree, ProcessResult, RenderNode, RenderOutput,
    SessionStats, StyledElement,
};
pub use boxflow_style as style;
pub use boxflow_types as types;
