//! Full measure-and-layout passes over small trees.

use trellis_core::{
    Alignment, CalcLength, CalcSize, Inset, MeasureType, OffsetF, PaddingProperty, RectF,
    SafeAreaEdge, SafeAreaExpandOpts, SafeAreaInsets, SafeAreaType, SizeF,
};
use trellis_layout::{FrameNode, FrameNodeId, FrameTree, LayoutPass, LayoutStage, ViewportContext};

fn px_size(width: f64, height: f64) -> CalcSize {
    CalcSize::new(Some(CalcLength::px(width)), Some(CalcLength::px(height)))
}

fn frame(tree: &FrameTree, id: FrameNodeId) -> RectF {
    tree.get(id).unwrap().geometry_node.frame_rect()
}

fn add(tree: &mut FrameTree, parent: FrameNodeId, tag: &str) -> FrameNodeId {
    let id = tree.next_id();
    tree.add_child(parent, FrameNode::new(id, tag));
    id
}

fn match_parent_root(tree: &mut FrameTree) -> FrameNodeId {
    let root = tree.next_id();
    tree.add_root(FrameNode::new(root, "Stack"));
    tree.update_layout_property(root, |p| p.update_measure_type(MeasureType::MatchParent));
    root
}

#[test]
fn test_root_fills_viewport() {
    let mut ctx = ViewportContext::new(800.0, 600.0);
    let mut tree = FrameTree::new();
    let root = match_parent_root(&mut tree);

    LayoutPass::new().run(&mut tree, &mut ctx);
    assert_eq!(frame(&tree, root), RectF::new(0.0, 0.0, 800.0, 600.0));
    assert_eq!(tree.get(root).unwrap().stage, LayoutStage::LaidOut);
}

#[test]
fn test_child_centered_with_margin() {
    let mut ctx = ViewportContext::new(800.0, 600.0);
    let mut tree = FrameTree::new();
    let root = match_parent_root(&mut tree);
    let child = add(&mut tree, root, "Text");
    tree.update_layout_property(child, |p| p.update_user_defined_ideal_size(px_size(100.0, 50.0)));
    tree.update_layout_property(child, |p| p.update_margin(PaddingProperty::all(CalcLength::px(10.0))));

    LayoutPass::new().run(&mut tree, &mut ctx);
    assert_eq!(frame(&tree, child), RectF::new(350.0, 275.0, 100.0, 50.0));
}

#[test]
fn test_syntax_nodes_are_transparent() {
    let mut ctx = ViewportContext::new(800.0, 600.0);
    let mut tree = FrameTree::new();
    let root = match_parent_root(&mut tree);
    tree.update_layout_property(root, |p| p.update_alignment(Alignment::TOP_LEFT));
    let group = tree.next_id();
    tree.add_child(root, FrameNode::syntax(group, "ForEach"));
    let child = add(&mut tree, group, "Text");
    tree.update_layout_property(child, |p| p.update_user_defined_ideal_size(px_size(40.0, 40.0)));

    LayoutPass::new().run(&mut tree, &mut ctx);
    assert_eq!(frame(&tree, child), RectF::new(0.0, 0.0, 40.0, 40.0));
}

#[test]
fn test_viewport_resize_relayouts() {
    let mut ctx = ViewportContext::new(800.0, 600.0);
    let mut tree = FrameTree::new();
    let root = match_parent_root(&mut tree);
    let child = add(&mut tree, root, "Text");
    tree.update_layout_property(child, |p| p.update_user_defined_ideal_size(px_size(100.0, 100.0)));
    LayoutPass::new().run(&mut tree, &mut ctx);

    assert!(ctx.set_root_size(400.0, 400.0));
    LayoutPass::new().run(&mut tree, &mut ctx);
    assert_eq!(frame(&tree, root).size(), SizeF::new(400.0, 400.0));
    assert_eq!(frame(&tree, child).offset(), OffsetF::new(150.0, 150.0));
}

#[test]
fn test_aspect_ratio_and_percent() {
    let mut ctx = ViewportContext::new(800.0, 600.0);
    let mut tree = FrameTree::new();
    let root = match_parent_root(&mut tree);
    let child = add(&mut tree, root, "Image");
    tree.update_layout_property(child, |p| {
        p.update_user_defined_ideal_size(CalcSize::new(Some(CalcLength::percent(0.5)), None))
    });
    tree.update_layout_property(child, |p| p.update_aspect_ratio(2.0));

    LayoutPass::new().run(&mut tree, &mut ctx);
    assert_eq!(frame(&tree, child).size(), SizeF::new(400.0, 200.0));
}

/// A full-screen window with a 20px status bar and a 20px navigation bar.
fn full_screen_window() -> (ViewportContext, FrameTree, FrameNodeId, FrameNodeId, FrameNodeId) {
    let mut ctx = ViewportContext::new(800.0, 600.0);
    let manager = ctx.safe_area_manager_mut();
    manager.set_is_full_screen(true);
    manager.update_system_safe_area(SafeAreaInsets {
        top: Inset::new(0, 20),
        bottom: Inset::new(580, 600),
        ..Default::default()
    });

    let mut tree = FrameTree::new();
    let root = match_parent_root(&mut tree);
    tree.update_layout_property(root, |p| {
        p.update_padding(PaddingProperty {
            top: Some(CalcLength::px(20.0)),
            bottom: Some(CalcLength::px(20.0)),
            ..Default::default()
        })
    });
    let background = add(&mut tree, root, "Column");
    tree.update_layout_property(background, |p| p.update_measure_type(MeasureType::MatchParent));
    tree.update_layout_property(background, |p| {
        p.update_safe_area_expand_opts(SafeAreaExpandOpts::new(
            SafeAreaType::SYSTEM,
            SafeAreaEdge::TOP | SafeAreaEdge::BOTTOM,
        ))
    });
    let label = add(&mut tree, background, "Text");
    tree.update_layout_property(label, |p| p.update_user_defined_ideal_size(px_size(100.0, 100.0)));
    (ctx, tree, root, background, label)
}

#[test]
fn test_background_expands_into_system_bars() {
    let (mut ctx, mut tree, root, background, label) = full_screen_window();
    LayoutPass::new().run(&mut tree, &mut ctx);

    assert_eq!(frame(&tree, root), RectF::new(0.0, 0.0, 800.0, 600.0));
    assert_eq!(frame(&tree, background), RectF::new(0.0, 0.0, 800.0, 600.0));
    // The label keeps its place in the unexpanded content area.
    assert_eq!(tree.global_offset(label), OffsetF::new(350.0, 250.0));
}

#[test]
fn test_expansion_is_stable_across_passes() {
    let (mut ctx, mut tree, _, background, label) = full_screen_window();
    let pass = LayoutPass::new();
    pass.run(&mut tree, &mut ctx);
    pass.run(&mut tree, &mut ctx);

    assert_eq!(frame(&tree, background), RectF::new(0.0, 0.0, 800.0, 600.0));
    assert_eq!(tree.global_offset(label), OffsetF::new(350.0, 250.0));
    let restore: Vec<_> = ctx.safe_area_manager().geo_restore_nodes().collect();
    assert_eq!(restore, vec![background]);
}

#[test]
fn test_leaving_full_screen_restores_geometry() {
    let (mut ctx, mut tree, _, background, label) = full_screen_window();
    let pass = LayoutPass::new();
    pass.run(&mut tree, &mut ctx);

    ctx.safe_area_manager_mut().set_is_full_screen(false);
    pass.run(&mut tree, &mut ctx);
    assert_eq!(frame(&tree, background), RectF::new(0.0, 20.0, 800.0, 560.0));
    assert_eq!(tree.global_offset(label), OffsetF::new(350.0, 250.0));
}

#[test]
fn test_frame_dump() {
    let (mut ctx, mut tree, root, background, label) = full_screen_window();
    LayoutPass::new().run(&mut tree, &mut ctx);
    let dump = [root, background, label]
        .iter()
        .map(|id| format!("{} {}", tree.get(*id).unwrap().tag, frame(&tree, *id)))
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(dump, @r###"
    Stack RectF (0.00, 0.00) - [800.00 x 600.00]
    Column RectF (0.00, 0.00) - [800.00 x 600.00]
    Text RectF (350.00, 250.00) - [100.00 x 100.00]
    "###);
}
