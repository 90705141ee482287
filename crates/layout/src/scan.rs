//! Read pass of the traversal: partitions a sibling list into runs.
//!
//! Scanning never mutates the tree. The commit pass in [`crate::traverse`] turns the
//! resulting runs into descriptors and synthesized nodes.

use crate::classify::{classify, ClassifyContext, ClassifyRule, Traverse};
use crate::config::LayoutConfig;
use crate::descriptor::{Alignment, LinearData};
use crate::tree::NodeTree;
use boxflow_types::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunAxis {
    Undetermined,
    Horizontal,
    Vertical,
}

impl RunAxis {
    fn from_traverse(traverse: Traverse) -> Self {
        match traverse {
            Traverse::Vertical => RunAxis::Vertical,
            _ => RunAxis::Horizontal,
        }
    }

    fn accepts(&self, other: RunAxis) -> bool {
        *self == RunAxis::Undetermined || *self == other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Accumulating the open run.
    Scanning,
    /// The open run closed and is being turned into a finished run.
    Emit,
    /// The last run ended in a block followed by a float and absorbs the continuation.
    Extend,
}

/// A maximal group of siblings sharing one orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub members: Vec<NodeId>,
    pub axis: RunAxis,
    pub alignment: Alignment,
    /// Index of the extendable run this continuation belongs to.
    pub extends: Option<usize>,
}

impl Run {
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }

    pub fn is_float_layout(&self) -> bool {
        self.alignment.contains(Alignment::FLOAT_LAYOUT)
    }
}

/// Partitions `members` (children of `container`, in source order) into runs.
pub fn scan_runs(
    tree: &NodeTree,
    container: NodeId,
    members: &[NodeId],
    linear: &LinearData,
    config: &LayoutConfig,
    allow_extend: bool,
) -> Vec<Run> {
    let mut scanner = Scanner {
        tree,
        ctx: ClassifyContext {
            container,
            clear_set: Some(&linear.cleared),
            config,
        },
        members,
        runs: Vec::new(),
        open: Vec::new(),
        axis: RunAxis::Undetermined,
        continuation: Vec::new(),
        float_bottom: f32::MIN,
        state: ScanState::Scanning,
        allow_extend,
    };
    scanner.run();
    scanner.runs
}

struct Scanner<'a> {
    tree: &'a NodeTree,
    ctx: ClassifyContext<'a>,
    members: &'a [NodeId],
    runs: Vec<Run>,
    open: Vec<NodeId>,
    axis: RunAxis,
    continuation: Vec<NodeId>,
    float_bottom: f32,
    state: ScanState,
    allow_extend: bool,
}

impl Scanner<'_> {
    fn run(&mut self) {
        let mut index = 0;
        // Candidate that closed the open run, carried through `Emit`.
        let mut pending: Option<(NodeId, Traverse)> = None;

        while index < self.members.len() || pending.is_some() || self.state == ScanState::Emit {
            match self.state {
                ScanState::Scanning => {
                    let Some(&candidate) = self.members.get(index) else {
                        break;
                    };
                    index += 1;
                    if self.open.is_empty() {
                        if !self.tree[candidate].line_break() {
                            self.open.push(candidate);
                        }
                        continue;
                    }
                    let result = classify(self.tree, candidate, &self.open, &self.ctx);
                    if result.rule == ClassifyRule::Ambiguous {
                        log::warn!(
                            "No alignment rule matched {} after {:?}; defaulting to horizontal.",
                            candidate,
                            self.open
                        );
                    }
                    let axis = RunAxis::from_traverse(result.traverse);
                    if result.traverse.extends_run() && self.axis.accepts(axis) {
                        self.axis = axis;
                        self.open.push(candidate);
                    } else {
                        pending = Some((candidate, result.traverse));
                        self.state = ScanState::Emit;
                    }
                }
                ScanState::Emit => {
                    let Some((candidate, traverse)) = pending.take() else {
                        self.state = ScanState::Scanning;
                        continue;
                    };
                    let extendable = self.allow_extend
                        && self.tree[candidate].floating()
                        && self
                            .open
                            .last()
                            .is_some_and(|last| self.tree[*last].block_static());
                    let mut run = self.close_open();
                    log::debug!(
                        "Run of {} closed by {:?} at {}.",
                        run.members.len(),
                        traverse,
                        candidate
                    );
                    if extendable {
                        run.alignment |= Alignment::EXTENDABLE;
                        self.runs.push(run);
                        self.continuation.push(candidate);
                        self.float_bottom = self.tree.bounds(candidate).bottom();
                        self.state = ScanState::Extend;
                    } else {
                        self.runs.push(run);
                        if traverse != Traverse::LineBreak {
                            self.open.push(candidate);
                        }
                        self.state = ScanState::Scanning;
                    }
                }
                ScanState::Extend => {
                    let Some(&candidate) = self.members.get(index) else {
                        break;
                    };
                    if self.ends_continuation(candidate, index) {
                        self.close_continuation();
                        self.state = ScanState::Scanning;
                        if self.tree[candidate].line_break() {
                            index += 1;
                        }
                        continue;
                    }
                    index += 1;
                    let node = &self.tree[candidate];
                    if node.floating() {
                        self.float_bottom = self.float_bottom.max(self.tree.bounds(candidate).bottom());
                    }
                    self.continuation.push(candidate);
                }
            }
        }

        if self.state == ScanState::Extend {
            self.close_continuation();
        }
        if !self.open.is_empty() {
            let run = self.close_open();
            self.runs.push(run);
        }
    }

    fn close_open(&mut self) -> Run {
        let members = std::mem::take(&mut self.open);
        let axis = std::mem::replace(&mut self.axis, RunAxis::Undetermined);
        let alignment = run_alignment(self.tree, &members, axis, self.ctx.config.tolerance);
        Run {
            members,
            axis,
            alignment,
            extends: None,
        }
    }

    fn ends_continuation(&self, candidate: NodeId, index: usize) -> bool {
        let node = &self.tree[candidate];
        if node.line_break() || self.ctx.clear_set.is_some_and(|set| set.contains_key(&candidate)) {
            return true;
        }
        let tol = self.ctx.config.tolerance;
        node.block_static()
            && self.tree.bounds(candidate).top() >= self.float_bottom - tol
            && !self.float_follows(index + 1)
    }

    /// A float appears before the next line break or clear boundary.
    fn float_follows(&self, from: usize) -> bool {
        for id in self.members.iter().skip(from) {
            let node = &self.tree[*id];
            if node.line_break() || self.ctx.clear_set.is_some_and(|set| set.contains_key(id)) {
                return false;
            }
            if node.floating() {
                return true;
            }
        }
        false
    }

    fn close_continuation(&mut self) {
        let members = std::mem::take(&mut self.continuation);
        self.float_bottom = f32::MIN;
        if members.is_empty() {
            return;
        }
        let anchor = self.runs.len().checked_sub(1);
        let mixed = members.iter().any(|m| !self.tree[*m].floating());
        if mixed {
            let mut alignment = Alignment::FLOAT_LAYOUT | Alignment::FLOAT;
            if members.iter().any(|m| self.tree[*m].has_percent_dimension()) {
                alignment |= Alignment::PERCENT;
            }
            log::debug!("Continuation of {} members extends run {:?}.", members.len(), anchor);
            self.runs.push(Run {
                members,
                axis: RunAxis::Undetermined,
                alignment,
                extends: anchor,
            });
        } else {
            if let Some(previous) = anchor.and_then(|i| self.runs.get_mut(i)) {
                previous.alignment.remove(Alignment::EXTENDABLE);
            }
            let alignment = run_alignment(self.tree, &members, RunAxis::Horizontal, self.ctx.config.tolerance);
            self.runs.push(Run {
                members,
                axis: RunAxis::Horizontal,
                alignment,
                extends: None,
            });
        }
    }
}

/// Alignment flags describing a finished run.
pub fn run_alignment(tree: &NodeTree, members: &[NodeId], axis: RunAxis, tolerance: f32) -> Alignment {
    let mut alignment = Alignment::UNKNOWN;
    match axis {
        RunAxis::Horizontal => alignment |= Alignment::HORIZONTAL,
        RunAxis::Vertical => alignment |= Alignment::VERTICAL,
        RunAxis::Undetermined => {}
    }
    if members.len() == 1 {
        alignment |= Alignment::SINGLE;
    }
    let floats: Vec<_> = members.iter().filter(|m| tree[**m].floating()).collect();
    if !floats.is_empty() {
        alignment |= Alignment::FLOAT;
        if floats.len() == members.len()
            && floats.iter().all(|m| tree[**m].float() == boxflow_style::Float::Right)
        {
            alignment |= Alignment::RIGHT;
        }
        if tree.is_float_mixed(members, tolerance) {
            alignment |= Alignment::FLOAT_LAYOUT;
        }
    }
    if members.iter().all(|m| tree[*m].block_static()) {
        alignment |= Alignment::BLOCK;
    } else if members.iter().all(|m| tree[*m].inline_static()) {
        alignment |= Alignment::INLINE;
    }
    if members.iter().any(|m| !tree[*m].page_flow()) {
        alignment |= Alignment::ABSOLUTE;
    }
    if members.iter().any(|m| tree[*m].has_percent_dimension()) {
        alignment |= Alignment::PERCENT;
    }
    alignment
}
