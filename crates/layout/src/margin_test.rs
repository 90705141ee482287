use crate::config::LayoutConfig;
use crate::engine::LayoutEngine;
use crate::margin::collapse_margins;
use crate::node_kind::NodeKind;
use crate::spacing::BoxSlot;
use crate::test_utils::{block, inline, line_break, r, text, TreeFixture};
use crate::tree::NodeTree;
use boxflow_style::{Dimension, Position};
use boxflow_types::NodeId;

fn collapse(tree: &mut NodeTree) -> crate::margin::CollapseStats {
    collapse_margins(tree, &LayoutConfig::default()).unwrap()
}

fn spacing_snapshot(tree: &NodeTree) -> Vec<(NodeId, [f32; 4], [f32; 4], bool)> {
    tree.ids()
        .map(|id| (id, tree.box_spacing(id), tree.padding_spacing(id), tree[id].visible))
        .collect()
}

#[test]
fn test_adjacent_blocks_keep_larger_margin() {
    let mut fx = TreeFixture::new(r(0.0, 0.0, 200.0, 200.0));
    let a = fx.child(fx.root, block("p", r(0.0, 0.0, 200.0, 40.0)).margin([0.0, 0.0, 20.0, 0.0]));
    let b = fx.child(fx.root, block("p", r(0.0, 60.0, 200.0, 40.0)).margin([10.0, 0.0, 0.0, 0.0]));
    let mut tree = fx.finish();

    let stats = collapse(&mut tree);
    assert_eq!(stats.collapsed, 1);
    assert_eq!(tree.resolved(b, BoxSlot::MARGIN_TOP), 0.0);
    assert!(tree.is_locked(b, BoxSlot::MARGIN_TOP));
    assert_eq!(tree.resolved(a, BoxSlot::MARGIN_BOTTOM), 20.0);
    let gap = tree.linear(b).top() - tree.bounds(a).bottom();
    assert_eq!(gap, 20.0);
}

#[test]
fn test_smaller_previous_margin_is_reset() {
    let mut fx = TreeFixture::new(r(0.0, 0.0, 200.0, 200.0));
    let a = fx.child(fx.root, block("p", r(0.0, 0.0, 200.0, 40.0)).margin([0.0, 0.0, 5.0, 0.0]));
    let b = fx.child(fx.root, block("p", r(0.0, 60.0, 200.0, 40.0)).margin([20.0, 0.0, 0.0, 0.0]));
    let mut tree = fx.finish();

    collapse(&mut tree);
    assert_eq!(tree.resolved(a, BoxSlot::MARGIN_BOTTOM), 0.0);
    assert_eq!(tree.resolved(b, BoxSlot::MARGIN_TOP), 20.0);
}

#[test]
fn test_negative_and_mixed_margins() {
    let mut fx = TreeFixture::new(r(0.0, 0.0, 200.0, 400.0));
    let a = fx.child(fx.root, block("p", r(0.0, 0.0, 200.0, 40.0)).margin([0.0, 0.0, -20.0, 0.0]));
    let b = fx.child(fx.root, block("p", r(0.0, 40.0, 200.0, 40.0)).margin([-10.0, 0.0, 30.0, 0.0]));
    let c = fx.child(fx.root, block("p", r(0.0, 120.0, 200.0, 40.0)).margin([-5.0, 0.0, 0.0, 0.0]));
    let mut tree = fx.finish();

    collapse(&mut tree);
    // Both negative: the more negative one survives on the upper block.
    assert_eq!(tree.resolved(a, BoxSlot::MARGIN_BOTTOM), -20.0);
    assert_eq!(tree.resolved(b, BoxSlot::MARGIN_TOP), 0.0);
    // Mixed signs: positive plus negative.
    assert_eq!(tree.resolved(b, BoxSlot::MARGIN_BOTTOM), 25.0);
    assert_eq!(tree.resolved(c, BoxSlot::MARGIN_TOP), 0.0);
}

#[test]
fn test_border_blocks_collapse() {
    let mut fx = TreeFixture::new(r(0.0, 0.0, 200.0, 200.0));
    let a = fx.child(
        fx.root,
        block("p", r(0.0, 0.0, 200.0, 40.0))
            .margin([0.0, 0.0, 20.0, 0.0])
            .border([0.0, 0.0, 1.0, 0.0]),
    );
    let b = fx.child(fx.root, block("p", r(0.0, 60.0, 200.0, 40.0)).margin([10.0, 0.0, 0.0, 0.0]));
    let mut tree = fx.finish();

    let stats = collapse(&mut tree);
    assert_eq!(stats.collapsed, 0);
    assert_eq!(tree.resolved(a, BoxSlot::MARGIN_BOTTOM), 20.0);
    assert_eq!(tree.resolved(b, BoxSlot::MARGIN_TOP), 10.0);
}

#[test]
fn test_first_child_margin_travels_outward() {
    let mut fx = TreeFixture::new(r(0.0, 0.0, 200.0, 200.0));
    let section = fx.child(fx.root, block("section", r(0.0, 30.0, 200.0, 20.0)));
    let wrapper = fx.child(section, block("div", r(0.0, 30.0, 200.0, 0.0)));
    let p = fx.child(wrapper, block("p", r(0.0, 30.0, 200.0, 20.0)).margin([30.0, 0.0, 0.0, 0.0]));
    let mut tree = fx.finish();
    let root = tree.root().unwrap();

    collapse(&mut tree);
    assert_eq!(tree.resolved(p, BoxSlot::MARGIN_TOP), 0.0);
    assert_eq!(tree.resolved(wrapper, BoxSlot::MARGIN_TOP), 0.0);
    assert_eq!(tree.resolved(section, BoxSlot::MARGIN_TOP), 30.0);
    assert_eq!(tree.resolved(root, BoxSlot::MARGIN_TOP), 0.0);
    assert!(tree[wrapper].visible);
}

#[test]
fn test_padding_stops_first_child_collapse() {
    let mut fx = TreeFixture::new(r(0.0, 0.0, 200.0, 200.0));
    let div = fx.child(fx.root, block("div", r(0.0, 0.0, 200.0, 60.0)).padding([8.0, 0.0, 0.0, 0.0]));
    let p = fx.child(div, block("p", r(0.0, 8.0, 200.0, 20.0)).margin([30.0, 0.0, 0.0, 0.0]));
    let mut tree = fx.finish();

    collapse(&mut tree);
    assert_eq!(tree.resolved(p, BoxSlot::MARGIN_TOP), 30.0);
    assert_eq!(tree.resolved(div, BoxSlot::MARGIN_TOP), 0.0);
}

#[test]
fn test_last_child_collapse_needs_auto_height() {
    let mut fx = TreeFixture::new(r(0.0, 0.0, 200.0, 400.0));
    let auto = fx.child(fx.root, block("div", r(0.0, 0.0, 200.0, 20.0)));
    let inner = fx.child(auto, block("p", r(0.0, 0.0, 200.0, 20.0)).margin([0.0, 0.0, 12.0, 0.0]));
    let fixed = fx.child(
        fx.root,
        block("div", r(0.0, 100.0, 200.0, 100.0)).height(Dimension::Px(100.0)),
    );
    let kept = fx.child(fixed, block("p", r(0.0, 100.0, 200.0, 20.0)).margin([0.0, 0.0, 12.0, 0.0]));
    let mut tree = fx.finish();

    collapse(&mut tree);
    assert_eq!(tree.resolved(inner, BoxSlot::MARGIN_BOTTOM), 0.0);
    assert_eq!(tree.resolved(auto, BoxSlot::MARGIN_BOTTOM), 12.0);
    assert_eq!(tree.resolved(kept, BoxSlot::MARGIN_BOTTOM), 12.0);
    assert_eq!(tree.resolved(fixed, BoxSlot::MARGIN_BOTTOM), 0.0);
}

#[test]
fn test_inert_element_hidden_and_margin_handed_on() {
    let mut fx = TreeFixture::new(r(0.0, 0.0, 200.0, 200.0));
    let a = fx.child(fx.root, block("p", r(0.0, 0.0, 200.0, 20.0)).margin([0.0, 0.0, 10.0, 0.0]));
    let empty = fx.child(fx.root, block("div", r(0.0, 35.0, 200.0, 0.0)).margin([15.0, 0.0, 5.0, 0.0]));
    let b = fx.child(fx.root, block("p", r(0.0, 35.0, 200.0, 20.0)));
    let mut tree = fx.finish();

    let stats = collapse(&mut tree);
    assert_eq!(stats.hidden, 1);
    assert!(!tree[empty].visible);
    assert_eq!(tree.resolved(b, BoxSlot::MARGIN_TOP), 15.0);
    assert_eq!(tree.resolved(a, BoxSlot::MARGIN_BOTTOM), 0.0);
}

#[test]
fn test_inert_hiding_can_be_disabled() {
    let mut fx = TreeFixture::new(r(0.0, 0.0, 200.0, 200.0));
    let empty = fx.child(fx.root, block("div", r(0.0, 0.0, 200.0, 0.0)));
    let mut tree = fx.finish();

    let config = LayoutConfig {
        hide_inert_elements: false,
        ..LayoutConfig::default()
    };
    let stats = collapse_margins(&mut tree, &config).unwrap();
    assert_eq!(stats.hidden, 0);
    assert!(tree[empty].visible);
}

#[test]
fn test_line_break_gap_becomes_margin() {
    let mut fx = TreeFixture::new(r(0.0, 0.0, 200.0, 200.0));
    fx.child(fx.root, text("first", r(0.0, 0.0, 100.0, 20.0)));
    fx.child(fx.root, line_break(r(100.0, 0.0, 0.0, 20.0)));
    let second = fx.child(fx.root, text("second", r(0.0, 30.0, 100.0, 20.0)));
    let mut tree = fx.finish();

    let stats = collapse(&mut tree);
    assert_eq!(stats.line_gaps, 1);
    assert_eq!(tree.resolved(second, BoxSlot::MARGIN_TOP), 10.0);
}

#[test]
fn test_line_break_gap_corrects_half_leading() {
    let mut fx = TreeFixture::new(r(0.0, 0.0, 200.0, 200.0));
    fx.child(fx.root, text("first", r(0.0, 0.0, 100.0, 20.0)).line_height(24.0).lines(1));
    fx.child(fx.root, line_break(r(100.0, 0.0, 0.0, 20.0)));
    let second = fx.child(
        fx.root,
        text("second", r(0.0, 30.0, 100.0, 20.0)).line_height(24.0).lines(1),
    );
    let mut tree = fx.finish();

    collapse(&mut tree);
    assert_eq!(tree.resolved(second, BoxSlot::MARGIN_TOP), 6.0);
}

#[test]
fn test_collapse_is_idempotent() {
    let mut fx = TreeFixture::new(r(0.0, 0.0, 300.0, 600.0));
    let section = fx.child(fx.root, block("section", r(0.0, 0.0, 300.0, 200.0)));
    fx.child(section, block("h1", r(0.0, 0.0, 300.0, 30.0)).margin([24.0, 0.0, 12.0, 0.0]));
    fx.child(section, block("p", r(0.0, 42.0, 300.0, 40.0)).margin([8.0, 0.0, -4.0, 0.0]));
    fx.child(section, block("div", r(0.0, 90.0, 300.0, 0.0)).margin([6.0, 0.0, 6.0, 0.0]));
    fx.child(section, block("p", r(0.0, 96.0, 300.0, 40.0)).margin([-10.0, 0.0, 16.0, 0.0]));
    fx.child(fx.root, text("one", r(0.0, 220.0, 100.0, 20.0)));
    fx.child(fx.root, line_break(r(100.0, 220.0, 0.0, 20.0)));
    fx.child(fx.root, text("two", r(0.0, 250.0, 100.0, 20.0)));
    fx.child(fx.root, block("footer", r(0.0, 300.0, 300.0, 40.0)).margin([20.0, 0.0, 0.0, 0.0]));
    let mut tree = fx.finish();

    collapse(&mut tree);
    let first = spacing_snapshot(&tree);
    let stats = collapse(&mut tree);
    assert_eq!(spacing_snapshot(&tree), first);
    assert_eq!(stats.collapsed, 0);
    assert_eq!(stats.hidden, 0);
}

#[test]
fn test_root_never_takes_child_margin() {
    let mut fx = TreeFixture::new(r(0.0, 0.0, 200.0, 200.0));
    let p = fx.child(fx.root, block("p", r(0.0, 30.0, 200.0, 20.0)).margin([30.0, 0.0, 0.0, 0.0]));
    let mut tree = fx.finish();
    let root = tree.root().unwrap();

    collapse(&mut tree);
    assert_eq!(tree.resolved(p, BoxSlot::MARGIN_TOP), 30.0);
    assert_eq!(tree.resolved(root, BoxSlot::MARGIN_TOP), 0.0);
}

/// Sum of the margins stacked between the bottom edge of `above` and the top edge of `below`.
fn vertical_gap(tree: &NodeTree, above: NodeId, through: &[NodeId], below: NodeId) -> f32 {
    tree.resolved(above, BoxSlot::MARGIN_BOTTOM)
        + through
            .iter()
            .map(|id| tree.resolved(*id, BoxSlot::MARGIN_TOP) + tree.resolved(*id, BoxSlot::MARGIN_BOTTOM))
            .sum::<f32>()
        + tree.resolved(below, BoxSlot::MARGIN_TOP)
}

#[test]
fn test_wrapper_margin_collapses_with_previous_block() {
    let mut fx = TreeFixture::new(r(0.0, 0.0, 200.0, 300.0));
    let a = fx.child(fx.root, block("p", r(0.0, 0.0, 200.0, 40.0)).margin([0.0, 0.0, 20.0, 0.0]));
    let p = fx.child(fx.root, block("p", r(0.0, 60.0, 200.0, 40.0)).margin([10.0, 0.0, 0.0, 0.0]));
    fx.child(fx.root, block("div", r(0.0, 100.0, 60.0, 60.0)).float_left());
    fx.child(fx.root, text("below", r(0.0, 170.0, 200.0, 20.0)));
    let mut tree = fx.finish();
    let root = tree.root().unwrap();

    LayoutEngine::default().resolve(&mut tree).unwrap();

    let [first, wrapper] = tree[root].children() else {
        panic!("expected two render children, got {:?}", tree[root].children());
    };
    let wrapper = *wrapper;
    assert_eq!(*first, a);
    assert_eq!(tree[wrapper].kind, NodeKind::Wrapper);
    assert_eq!(tree.resolved(p, BoxSlot::MARGIN_TOP), 0.0);
    assert_eq!(tree.resolved(wrapper, BoxSlot::MARGIN_TOP), 0.0);
    assert!(tree.is_locked(wrapper, BoxSlot::MARGIN_TOP));
    assert_eq!(tree.resolved(a, BoxSlot::MARGIN_BOTTOM), 20.0);
    assert_eq!(vertical_gap(&tree, a, &[], wrapper), 20.0);
}

#[test]
fn test_zero_height_block_merges_both_margins() {
    let mut fx = TreeFixture::new(r(0.0, 0.0, 200.0, 200.0));
    let a = fx.child(fx.root, block("p", r(0.0, 0.0, 200.0, 20.0)));
    let z = fx.child(fx.root, block("div", r(0.0, 30.0, 200.0, 0.0)).margin([10.0, 0.0, 20.0, 0.0]));
    fx.child(z, inline("span", r(0.0, 30.0, 50.0, 10.0)).position(Position::Absolute));
    let b = fx.child(fx.root, block("p", r(0.0, 50.0, 200.0, 20.0)).margin([5.0, 0.0, 0.0, 0.0]));
    let mut tree = fx.finish();

    collapse(&mut tree);
    assert!(tree[z].visible);
    assert_eq!(tree.resolved(z, BoxSlot::MARGIN_TOP), 0.0);
    assert_eq!(tree.resolved(z, BoxSlot::MARGIN_BOTTOM), 20.0);
    assert_eq!(tree.resolved(b, BoxSlot::MARGIN_TOP), 0.0);
    assert_eq!(vertical_gap(&tree, a, &[z], b), 20.0);
}

#[test]
fn test_zero_height_block_collapses_with_both_neighbours() {
    let mut fx = TreeFixture::new(r(0.0, 0.0, 200.0, 200.0));
    let a = fx.child(fx.root, block("p", r(0.0, 0.0, 200.0, 20.0)).margin([0.0, 0.0, 30.0, 0.0]));
    let z = fx.child(fx.root, block("div", r(0.0, 50.0, 200.0, 0.0)).margin([10.0, 0.0, 15.0, 0.0]));
    fx.child(z, inline("span", r(0.0, 50.0, 50.0, 10.0)).position(Position::Absolute));
    let b = fx.child(fx.root, block("p", r(0.0, 50.0, 200.0, 20.0)).margin([12.0, 0.0, 0.0, 0.0]));
    let mut tree = fx.finish();

    collapse(&mut tree);
    // 30, 10, 15 and 12 all adjoin.
    assert_eq!(vertical_gap(&tree, a, &[z], b), 30.0);
    assert_eq!(tree.resolved(a, BoxSlot::MARGIN_BOTTOM), 0.0);
    assert_eq!(tree.resolved(z, BoxSlot::MARGIN_BOTTOM), 30.0);
}

#[test]
fn test_collapse_is_idempotent_after_resolve() {
    let mut fx = TreeFixture::new(r(0.0, 0.0, 300.0, 600.0));
    fx.child(fx.root, block("h1", r(0.0, 0.0, 300.0, 30.0)).margin([24.0, 0.0, 12.0, 0.0]));
    fx.child(fx.root, block("p", r(0.0, 42.0, 300.0, 40.0)).margin([8.0, 0.0, 6.0, 0.0]));
    fx.child(fx.root, block("img", r(0.0, 82.0, 80.0, 80.0)).float_left());
    fx.child(fx.root, text("caption", r(0.0, 170.0, 300.0, 20.0)));
    let z = fx.child(fx.root, block("div", r(0.0, 200.0, 300.0, 0.0)).margin([6.0, 0.0, 6.0, 0.0]));
    fx.child(z, inline("span", r(0.0, 200.0, 20.0, 10.0)).position(Position::Absolute));
    fx.child(fx.root, block("div", r(0.0, 210.0, 300.0, 0.0)).margin([4.0, 0.0, 4.0, 0.0]));
    let section = fx.child(fx.root, block("section", r(0.0, 230.0, 300.0, 40.0)));
    fx.child(section, block("p", r(0.0, 230.0, 300.0, 40.0)).margin([16.0, 0.0, 16.0, 0.0]));
    let mut tree = fx.finish();

    let result = LayoutEngine::default().resolve(&mut tree).unwrap();
    assert!(result.stats.wrappers >= 1);
    let first = spacing_snapshot(&tree);
    let stats = collapse(&mut tree);
    assert_eq!(spacing_snapshot(&tree), first);
    assert_eq!(stats.collapsed, 0);
    assert_eq!(stats.hidden, 0);
}
