//! The sibling alignment classifier.
//!
//! Given a candidate node and the open run of siblings before it, decides whether the
//! candidate continues the run or starts a new one. Reads cached node facts only and
//! never mutates the tree.

use crate::config::LayoutConfig;
use crate::node::NodeFlags;
use crate::tree::NodeTree;
use boxflow_style::Clear;
use boxflow_types::NodeId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Traverse {
    Horizontal,
    Vertical,
    LineBreak,
    InlineWrap,
    FloatClear,
    FloatBlock,
    FloatWrap,
    FloatIntersect,
    PercentWrap,
}

impl Traverse {
    /// Only the two orientation results keep a run open.
    pub fn extends_run(&self) -> bool {
        matches!(self, Traverse::Horizontal | Traverse::Vertical)
    }
}

/// Which check produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifyRule {
    LineBreak,
    OutOfFlow,
    ClearBoundary,
    FloatPair,
    FloatIntersect,
    FloatBlock,
    InlineWrap,
    PercentWrap,
    LeadingSibling,
    /// Structural fallback with nothing contradicting it.
    Default,
    /// Structural fallback while the geometry suggests a new line.
    Ambiguous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub traverse: Traverse,
    pub rule: ClassifyRule,
}

impl Classification {
    fn new(traverse: Traverse, rule: ClassifyRule) -> Self {
        Self { traverse, rule }
    }
}

pub struct ClassifyContext<'a> {
    /// Node whose content box bounds the run.
    pub container: NodeId,
    /// Clear boundary markers for the sibling list, if the caller tracks them.
    pub clear_set: Option<&'a BTreeMap<NodeId, Clear>>,
    pub config: &'a LayoutConfig,
}

pub fn classify(
    tree: &NodeTree,
    candidate: NodeId,
    run: &[NodeId],
    ctx: &ClassifyContext<'_>,
) -> Classification {
    use ClassifyRule as Rule;

    let tol = ctx.config.tolerance;
    let node = &tree[candidate];
    let flags = node.flags();
    let rect = tree.bounds(candidate);

    // 1. Hard line break.
    if flags.contains(NodeFlags::LINE_BREAK) {
        return Classification::new(Traverse::LineBreak, Rule::LineBreak);
    }

    // 2. Out of normal flow.
    if !flags.contains(NodeFlags::PAGE_FLOW) {
        if !flags.contains(NodeFlags::AUTO_POSITION) {
            return Classification::new(Traverse::Vertical, Rule::OutOfFlow);
        }
        let nearest = run.iter().rev().find(|m| tree[**m].page_flow());
        let traverse = match nearest {
            Some(member) => {
                let cleared = ctx.clear_set.is_some_and(|set| set.contains_key(member));
                if tree[*member].block_level() || cleared {
                    Traverse::Vertical
                } else {
                    Traverse::Horizontal
                }
            }
            None => Traverse::Horizontal,
        };
        return Classification::new(traverse, Rule::OutOfFlow);
    }

    // 3. Clear boundary.
    if let Some(set) = ctx.clear_set {
        if set.contains_key(&candidate) {
            return Classification::new(Traverse::FloatClear, Rule::ClearBoundary);
        }
        for sibling in tree.siblings_leading(candidate, true) {
            if !tree[sibling].excluded {
                break;
            }
            if set.contains_key(&sibling) {
                return Classification::new(Traverse::FloatClear, Rule::ClearBoundary);
            }
        }
    }

    let Some(&last) = run.last() else {
        return Classification::new(Traverse::Horizontal, Rule::Default);
    };
    let last_rect = tree.bounds(last);
    let run_bottom = run
        .iter()
        .map(|m| tree.bounds(*m).bottom())
        .fold(f32::MIN, f32::max);
    let container_width = tree.content_box(ctx.container).width;

    // 4. Float following float.
    if node.floating() && tree[last].floating() {
        if node.float() == tree[last].float() || (rect.top() - last_rect.top()).abs() <= tol {
            return Classification::new(Traverse::Horizontal, Rule::FloatPair);
        }
        if rect.top() >= run_bottom - tol {
            let used: f32 = run.iter().map(|m| tree.linear(*m).width).sum();
            let traverse = if used + tree.linear(candidate).width <= container_width + tol {
                Traverse::Horizontal
            } else {
                Traverse::FloatWrap
            };
            return Classification::new(traverse, Rule::FloatPair);
        }
    }

    // 5. Block content crossing a mostly floated row.
    if node.block_static() && container_width > 0.0 {
        let floated: f32 = run
            .iter()
            .filter(|m| tree[**m].floating())
            .map(|m| tree.linear(*m).width)
            .sum();
        if floated > 0.0 && floated >= container_width * ctx.config.float_intersect_ratio {
            return Classification::new(Traverse::FloatIntersect, Rule::FloatIntersect);
        }
    }

    // 6. Every inline-dimensioned run member sits above the candidate.
    if run
        .iter()
        .all(|m| !tree[*m].block_static() && tree.bounds(*m).bottom() <= rect.top() + tol)
    {
        return Classification::new(Traverse::FloatBlock, Rule::FloatBlock);
    }

    // 7. New line below block-dimensioned content.
    let last_node = &tree[last];
    if rect.top() >= last_rect.bottom() - tol
        && (node.block_level()
            || last_node.block_level()
            || node.percent_width()
            || last_node.percent_width())
    {
        return Classification::new(Traverse::InlineWrap, Rule::InlineWrap);
    }

    // 8. Percentage widths overflow the row.
    if node.percent_width() {
        let accumulated: f32 = run.iter().map(|m| tree[*m].width_percent()).sum();
        if accumulated + node.width_percent() > ctx.config.percent_limit + f32::EPSILON {
            return Classification::new(Traverse::PercentWrap, Rule::PercentWrap);
        }
    }

    // 9. Structural fallback over the leading siblings.
    if node.block_static() {
        return Classification::new(Traverse::Vertical, Rule::LeadingSibling);
    }
    for sibling in tree.siblings_leading(candidate, true) {
        let leading = &tree[sibling];
        if leading.excluded {
            continue;
        }
        let leading_flags = leading.flags();
        if leading_flags.contains(NodeFlags::BLOCK_STATIC)
            || leading_flags.contains(NodeFlags::AUTO_MARGIN_CENTERED)
        {
            return Classification::new(Traverse::Vertical, Rule::LeadingSibling);
        }
        if !node.floating()
            && leading_flags.contains(NodeFlags::PLAIN_TEXT | NodeFlags::MULTILINE)
        {
            return Classification::new(Traverse::Vertical, Rule::LeadingSibling);
        }
        if leading.floating() {
            if node.style.clear.clears(leading.float()) {
                return Classification::new(Traverse::FloatBlock, Rule::LeadingSibling);
            }
            continue;
        }
        break;
    }

    let rule = if rect.top() >= last_rect.bottom() - tol && last_rect.height > 0.0 {
        Rule::Ambiguous
    } else {
        Rule::Default
    };
    Classification::new(Traverse::Horizontal, rule)
}
