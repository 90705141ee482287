//! The layout engine: one `resolve` call runs a session over a node tree.

use crate::config::LayoutConfig;
use crate::descriptor::LayoutDescriptor;
use crate::extension::{Extension, ExtensionHost};
use crate::margin::collapse_margins;
use crate::perf::{NoOpProfiler, PhaseTimer, Profiler, PHASE_MARGIN_COLLAPSE, PHASE_TRAVERSE};
use crate::session::{LayoutSession, SessionStats};
use crate::traverse::Traversal;
use crate::tree::NodeTree;
use crate::LayoutError;
use boxflow_types::SessionId;

#[derive(Debug, Clone)]
pub struct LayoutResult {
    pub session: SessionId,
    pub descriptors: Vec<LayoutDescriptor>,
    pub stats: SessionStats,
}

impl LayoutResult {
    pub fn descriptor_for(&self, node: boxflow_types::NodeId) -> Option<&LayoutDescriptor> {
        self.descriptors.iter().find(|d| d.node == node)
    }
}

pub struct LayoutEngine {
    config: LayoutConfig,
    host: ExtensionHost,
    profiler: Box<dyn Profiler>,
    next_session: u64,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            host: ExtensionHost::new(),
            profiler: Box::new(NoOpProfiler),
            next_session: 0,
        }
    }

    pub fn with_extension(mut self, extension: impl Extension + 'static) -> Self {
        self.register(Box::new(extension));
        self
    }

    pub fn with_profiler(mut self, profiler: Box<dyn Profiler>) -> Self {
        self.profiler = profiler;
        self
    }

    pub fn register(&mut self, extension: Box<dyn Extension>) {
        self.host.register(extension);
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn extensions(&self) -> &ExtensionHost {
        &self.host
    }

    pub fn profiler(&self) -> &dyn Profiler {
        self.profiler.as_ref()
    }

    /// Groups, reflows and collapses `tree` in place.
    ///
    /// An extension failure abandons the session; the tree may then be partially grouped.
    pub fn resolve(&mut self, tree: &mut NodeTree) -> Result<LayoutResult, LayoutError> {
        tree.validate()?;
        self.next_session += 1;
        let mut session = LayoutSession::begin(SessionId::new(self.next_session), self.host.len());
        self.host.before_traversal(&mut session);

        let outcome = self.run_passes(tree, &mut session);
        let descriptors = match outcome {
            Ok(descriptors) => descriptors,
            Err(e) => {
                log::error!("Layout session {} abandoned: {}", session.id(), e);
                session.finish();
                return Err(e);
            }
        };

        if let Err(e) = self.host.after_traversal(&session, tree) {
            session.finish();
            return Err(e);
        }
        session.finish();
        self.profiler.count_session();

        Ok(LayoutResult {
            session: session.id(),
            descriptors,
            stats: session.stats,
        })
    }

    fn run_passes(
        &mut self,
        tree: &mut NodeTree,
        session: &mut LayoutSession,
    ) -> Result<Vec<LayoutDescriptor>, LayoutError> {
        let descriptors = {
            let _timer = PhaseTimer::start(self.profiler.as_ref(), PHASE_TRAVERSE);
            Traversal::new(tree, session, &mut self.host, &self.config).run()?
        };

        let _timer = PhaseTimer::start(self.profiler.as_ref(), PHASE_MARGIN_COLLAPSE);
        let collapse = collapse_margins(tree, &self.config)?;
        session.stats.collapsed_margins += collapse.collapsed + collapse.line_gaps;
        session.stats.hidden_elements += collapse.hidden;
        Ok(descriptors)
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}
