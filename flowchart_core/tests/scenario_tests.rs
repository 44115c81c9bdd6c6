use std::sync::Arc;

use flowchart_core::{
    FlowchartConfig, FlowchartView, ManualFrameHost, Rect, RejectReason, RoutingStyle, StaticLayout,
    SvgSurface, ToggleOutcome,
};
use story_data::{Flag, NodeId, StoryGraph, TimePeriodId};

const STORY: &str = r#"{
    "times": {
        "morning": {
            "nodes": [
                {"id": "A", "title": "Wake up"},
                {"id": "B", "sets_flag": "metGuide"},
                {"id": "C"}
            ],
            "connections": [
                {"from": "A", "to": "B"},
                {"from": "B", "to": "C", "condition": {"requires": ["metGuide"]}}
            ]
        },
        "evening": {
            "nodes": [{"id": "P", "sets_flag": "x"}, {"id": "Q", "sets_flag": "y"}, {"id": "R"}],
            "connections": [
                {"from": "P", "to": "R", "condition": {"requires": ["x"]}},
                {"from": "Q", "to": "R", "condition": {"requires": ["y"]}}
            ]
        }
    }
}"#;

type View = FlowchartView<StaticLayout, ManualFrameHost, SvgSurface>;

fn layout() -> StaticLayout {
    StaticLayout::new(Rect::new(0.0, 0.0, 800.0, 600.0))
        .with_rect("morning", "A", Rect::new(100.0, 0.0, 100.0, 40.0))
        .with_rect("morning", "B", Rect::new(100.0, 100.0, 100.0, 40.0))
        .with_rect("morning", "C", Rect::new(300.0, 200.0, 100.0, 40.0))
        .with_rect("evening", "P", Rect::new(0.0, 0.0, 100.0, 40.0))
        .with_rect("evening", "Q", Rect::new(200.0, 0.0, 100.0, 40.0))
        .with_rect("evening", "R", Rect::new(100.0, 100.0, 100.0, 40.0))
}

fn view_with(config: FlowchartConfig) -> View {
    let graph = Arc::new(StoryGraph::from_json_str(STORY).unwrap());
    let mut view = FlowchartView::new(graph, &config, layout(), ManualFrameHost::new(), SvgSurface::new()).unwrap();
    view.advance(50);
    view
}

fn view() -> View {
    view_with(FlowchartConfig::default())
}

fn id(name: &str) -> NodeId {
    NodeId::new(name)
}

/// Run frames until the animation loop ends; returns the number of passes.
fn run_loop(view: &mut View) -> usize {
    let mut passes = 0;
    while view.active_loop().is_some() {
        passes += view.advance(16).len();
    }
    passes
}

#[test]
fn test_morning_guide_unlocks_c_for_good() {
    let mut view = view();
    assert!(view.is_locked(&id("C")));

    let outcome = view.toggle_node(&id("B"));
    assert_eq!(
        outcome,
        ToggleOutcome::Opened {
            flag_added: Some(Flag::new("metGuide"))
        }
    );
    run_loop(&mut view);
    assert!(!view.is_locked(&id("C")));
    assert_eq!(view.surface().path_count(), 2);

    assert_eq!(view.toggle_node(&id("B")), ToggleOutcome::Closed);
    run_loop(&mut view);
    assert!(!view.is_locked(&id("C")));
    assert!(view.current_flags().contains(&Flag::new("metGuide")));
}

#[test]
fn test_unconditional_connection_drawn_without_flags() {
    let view = view();
    assert!(view.current_flags().is_empty());
    assert!(view.surface().path_d(&id("A"), &id("B")).is_some());
    assert!(view.surface().path_d(&id("B"), &id("C")).is_none());
}

#[test]
fn test_either_gate_unlocks_evening_node() {
    let mut view = view();
    view.select_time_period(&TimePeriodId::new("evening")).unwrap();
    view.advance(50);
    assert!(view.is_locked(&id("R")));

    view.toggle_node(&id("Q"));
    let passes = run_loop(&mut view);
    assert!(passes > 0);

    assert!(!view.is_locked(&id("R")));
    assert!(view.surface().path_d(&id("Q"), &id("R")).is_some());
    assert!(view.surface().path_d(&id("P"), &id("R")).is_none());
}

#[test]
fn test_rapid_toggles_keep_one_loop() {
    let mut view = view();

    view.toggle_node(&id("A"));
    let first = view.active_loop();
    assert_eq!(view.frames().pending_frames().len(), 1);

    view.toggle_node(&id("A"));
    let second = view.active_loop();
    assert_eq!(view.frames().pending_frames().len(), 1);
    assert_ne!(first, second);

    // Only the surviving loop redraws each frame.
    assert_eq!(view.advance(16).len(), 1);
    assert_eq!(view.frames().pending_frames().len(), 1);
}

#[test]
fn test_loop_tracks_live_layout() {
    let mut view = view();
    view.toggle_node(&id("A"));

    view.advance(16);
    let early = view.surface().path_d(&id("A"), &id("B")).map(str::to_owned);

    // Expanding A pushes B down mid-transition.
    view.layout_mut().set_rect("morning", "A", Rect::new(100.0, 0.0, 100.0, 80.0));
    view.layout_mut().set_rect("morning", "B", Rect::new(100.0, 140.0, 100.0, 40.0));
    view.advance(16);
    let late = view.surface().path_d(&id("A"), &id("B")).map(str::to_owned);

    assert_eq!(early.as_deref(), Some("M 150 40 C 150 80, 150 60, 150 100"));
    assert_eq!(late.as_deref(), Some("M 150 80 C 150 120, 150 100, 150 140"));
}

#[test]
fn test_loop_length_matches_transition() {
    let mut view = view();
    view.toggle_node(&id("A"));

    assert_eq!(run_loop(&mut view), 25);
    assert!(view.frames().pending_frames().is_empty());
}

#[test]
fn test_each_pass_clears_before_drawing() {
    let mut view = view();
    let clears = view.surface().clear_count();

    view.toggle_node(&id("A"));
    let passes = run_loop(&mut view);

    assert_eq!(view.surface().clear_count(), clears + passes);
    assert_eq!(view.surface().path_count(), 1);
}

#[test]
fn test_tab_switch_single_settled_pass() {
    let mut view = view();
    view.select_time_period(&TimePeriodId::new("evening")).unwrap();

    assert!(view.advance(49).is_empty());
    let reports = view.advance(1);
    assert_eq!(reports.len(), 1);
    assert!(reports[0].locked.contains(&id("R")));
    assert!(view.advance(100).is_empty());
}

#[test]
fn test_tab_switch_hides_previous_connectors_before_settle() {
    let mut view = view();
    assert!(view.surface().path_d(&id("A"), &id("B")).is_some());

    view.select_time_period(&TimePeriodId::new("evening")).unwrap();
    assert_eq!(view.surface().path_count(), 0);
    assert!(!view.surface().to_markup().contains("data-from=\"A\""));
}

#[test]
fn test_locked_toggle_schedules_nothing() {
    let mut view = view();
    let flags = view.current_flags().clone();

    assert_eq!(view.toggle_node(&id("C")), ToggleOutcome::Rejected(RejectReason::Locked));
    assert_eq!(view.current_flags(), &flags);
    assert!(view.scheduler().is_idle());
    assert!(view.advance(16).is_empty());
}

#[test]
fn test_orthogonal_routing_markup() {
    let mut config = FlowchartConfig::default();
    config.routing.style = RoutingStyle::Orthogonal;
    let view = view_with(config);

    let markup = view.surface().to_markup();
    // A and B share a column, so the route collapses to a straight drop.
    assert!(markup.contains("<path d=\"M 150 40 L 150 100\" data-from=\"A\" data-to=\"B\""));
    assert!(markup.contains("marker-end=\"url(#arrowhead)\""));
}
