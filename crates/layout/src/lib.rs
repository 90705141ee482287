use boxflow_types::NodeId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Delegating a spacing slot of {node} to {partner} would create a cycle.")]
    DelegationCycle { node: NodeId, partner: NodeId },
    #[error("Node {0} cannot delegate a spacing slot to itself.")]
    SelfDelegation(NodeId),
    #[error("Unknown node {0}.")]
    UnknownNode(NodeId),
    #[error("Extension '{name}' failed: {message}")]
    Extension { name: String, message: String },
    #[error("Generic layout error: {0}")]
    Generic(String),
}

pub mod builder;
pub mod classify;
pub mod config;
pub mod delegation;
pub mod descriptor;
pub mod engine;
pub mod extension;
pub mod float;
pub mod linear;
pub mod margin;
pub mod node;
pub mod node_kind;
pub mod output;
pub mod perf;
pub mod scan;
pub mod session;
pub mod spacing;
pub mod tree;
pub mod util;

mod traverse;

pub use self::builder::{build_tree, StyledElement};
pub use self::classify::{classify, Classification, ClassifyRule, Traverse};
pub use self::config::LayoutConfig;
pub use self::descriptor::{Alignment, ContainerType, LayoutDescriptor, LinearData};
pub use self::engine::{LayoutEngine, LayoutResult};
pub use self::extension::{Extension, ExtensionError, ExtensionHost, HookContext, ProcessResult};
pub use self::float::{FloatBuckets, FloatOutcome, FloatPadding};
pub use self::margin::{collapse_margins, CollapseStats};
pub use self::node::{BoxNode, NodeFlags};
pub use self::node_kind::NodeKind;
pub use self::output::{RenderNode, RenderOutput};
pub use self::session::{LayoutSession, SessionStats};
pub use self::spacing::{BoxSlot, SetBoxOptions};
pub use self::tree::NodeTree;

pub use boxflow_types::{Rect, SessionId, Size};

#[cfg(test)]
mod margin_test;
#[cfg(test)]
mod test_utils;
