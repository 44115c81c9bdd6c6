//! View State Controller - owns the active tab, open nodes and flags, and
//! drives redraw passes.

use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use story_data::{FlagSet, NodeId, StoryGraph, TimePeriodId};

use crate::config::FlowchartConfig;
use crate::error::FlowchartError;
use crate::events::{EventOutcome, InteractionEvent, RejectReason, ToggleOutcome};
use crate::gating;
use crate::geometry::{ElementIndex, GeometryResolver, LayoutSource};
use crate::path::PathBuilder;
use crate::scheduler::{FrameHandle, FrameHost, LoopId, ManualFrameHost, RedrawScheduler, RedrawTrigger, TimerHandle};
use crate::surface::{DrawingSurface, NodeDisplay};

/// Session state mutated by interaction handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    active: TimePeriodId,
    open: BTreeSet<(TimePeriodId, NodeId)>,
    flags: FlagSet,
}

impl ViewState {
    pub fn new(active: TimePeriodId) -> Self {
        Self {
            active,
            open: BTreeSet::new(),
            flags: FlagSet::new(),
        }
    }

    pub fn active_period(&self) -> &TimePeriodId {
        &self.active
    }

    /// Open state is kept per time period; switching tabs does not close nodes.
    pub fn is_open(&self, period: &TimePeriodId, node: &NodeId) -> bool {
        self.open.contains(&(period.clone(), node.clone()))
    }

    pub fn open_nodes<'a>(&'a self, period: &'a TimePeriodId) -> impl Iterator<Item = &'a NodeId> + 'a {
        self.open
            .iter()
            .filter(move |(owner, _)| owner == period)
            .map(|(_, node)| node)
    }

    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }
}

/// What one redraw pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RedrawReport {
    pub locked: BTreeSet<NodeId>,
    /// Connectors drawn.
    pub drawn: usize,
    /// Visible connections skipped because an endpoint is not rendered.
    pub skipped: Vec<(NodeId, NodeId)>,
}

/// The diagram controller for one page.
///
/// Every mutation happens synchronously before a redraw is scheduled, so each
/// pass observes a consistent snapshot. The surface is written only from
/// inside a pass.
pub struct FlowchartView<L: LayoutSource, H: FrameHost, S: DrawingSurface> {
    graph: Arc<StoryGraph>,
    state: ViewState,
    scheduler: RedrawScheduler,
    resolver: GeometryResolver,
    paths: PathBuilder,
    index: Option<ElementIndex<L::Element>>,
    layout: L,
    frames: H,
    surface: S,
}

impl<L: LayoutSource, H: FrameHost, S: DrawingSurface> FlowchartView<L, H, S> {
    /// Create the view with the first time period active and its redraw armed.
    pub fn new(
        graph: Arc<StoryGraph>,
        config: &FlowchartConfig,
        layout: L,
        frames: H,
        surface: S,
    ) -> Result<Self, FlowchartError> {
        let first = graph.first_period().ok_or(FlowchartError::EmptyStory)?.id.clone();

        let mut view = Self {
            graph,
            state: ViewState::new(first.clone()),
            scheduler: RedrawScheduler::new(config.scheduler.clone()),
            resolver: GeometryResolver::new(&config.geometry),
            paths: PathBuilder::new(&config.routing),
            index: None,
            layout,
            frames,
            surface,
        };
        view.select_time_period(&first)?;
        Ok(view)
    }

    /// Switch tabs. Flags and open nodes survive; only the active pointer moves.
    pub fn select_time_period(&mut self, id: &TimePeriodId) -> Result<(), FlowchartError> {
        if self.graph.period(id).is_none() {
            tracing::warn!(period = %id, "unknown time period selected");
            return Err(FlowchartError::UnknownTimePeriod(id.clone()));
        }

        let previous = std::mem::replace(&mut self.state.active, id.clone());
        self.surface.activate_period(id);
        self.index = Some(ElementIndex::build(&self.layout, id));
        tracing::debug!(from = %previous, to = %id, "time period selected");

        self.scheduler.schedule_redraw(RedrawTrigger::TabSwitch, &mut self.frames);
        Ok(())
    }

    /// Open or close a node of the active period.
    ///
    /// Locked and unknown nodes are rejected without touching state or
    /// scheduling a redraw.
    pub fn toggle_node(&mut self, id: &NodeId) -> ToggleOutcome {
        let graph = Arc::clone(&self.graph);
        let active = self.state.active.clone();
        let Some(node) = graph.period(&active).and_then(|period| period.node(id)) else {
            tracing::debug!(node = %id, period = %active, "toggle of unknown node rejected");
            return ToggleOutcome::Rejected(RejectReason::UnknownNode);
        };

        if self.is_locked(id) {
            tracing::debug!(node = %id, "toggle of locked node rejected");
            return ToggleOutcome::Rejected(RejectReason::Locked);
        }

        let key = (active, id.clone());
        let outcome = if self.state.open.remove(&key) {
            ToggleOutcome::Closed
        } else {
            self.state.open.insert(key);
            let flag_added = node
                .sets_flag
                .as_ref()
                .filter(|flag| self.state.flags.insert((*flag).clone()))
                .cloned();
            if let Some(flag) = &flag_added {
                tracing::debug!(node = %id, flag = %flag, "flag set");
            }
            ToggleOutcome::Opened { flag_added }
        };
        tracing::debug!(node = %id, ?outcome, "node toggled");

        self.scheduler.schedule_redraw(RedrawTrigger::NodeToggle, &mut self.frames);
        outcome
    }

    /// Route an interaction event.
    pub fn handle(&mut self, event: &InteractionEvent) -> Result<EventOutcome, FlowchartError> {
        match event {
            InteractionEvent::SelectTimePeriod { period } => {
                self.select_time_period(period)?;
                Ok(EventOutcome::TimePeriodSelected(period.clone()))
            }
            InteractionEvent::ToggleNode { node } => Ok(EventOutcome::Toggled(self.toggle_node(node))),
        }
    }

    pub fn current_flags(&self) -> &FlagSet {
        &self.state.flags
    }

    /// Fresh gating decision for a node of the active period.
    pub fn is_locked(&self, id: &NodeId) -> bool {
        self.graph
            .period(&self.state.active)
            .map_or(false, |period| gating::node_locked(period, id, &self.state.flags))
    }

    /// The host fired a frame callback.
    pub fn on_frame(&mut self, handle: FrameHandle) -> Option<RedrawReport> {
        self.scheduler
            .on_frame(handle, &mut self.frames)
            .then(|| self.redraw_pass())
    }

    /// The host fired a timer.
    pub fn on_timer(&mut self, handle: TimerHandle) -> Option<RedrawReport> {
        self.scheduler.on_timer(handle).then(|| self.redraw_pass())
    }

    /// Redraw immediately, e.g. after a window resize.
    pub fn redraw_now(&mut self) -> RedrawReport {
        self.redraw_pass()
    }

    /// Re-read the rendered elements of the active period.
    pub fn refresh_index(&mut self) {
        self.index = Some(ElementIndex::build(&self.layout, &self.state.active));
    }

    pub fn active_loop(&self) -> Option<LoopId> {
        self.scheduler.active_loop()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn graph(&self) -> &StoryGraph {
        &self.graph
    }

    pub fn scheduler(&self) -> &RedrawScheduler {
        &self.scheduler
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut L {
        &mut self.layout
    }

    pub fn frames(&self) -> &H {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut H {
        &mut self.frames
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Gate, then clear and redraw every visible connector from scratch.
    fn redraw_pass(&mut self) -> RedrawReport {
        let graph = Arc::clone(&self.graph);
        let Some(period) = graph.period(&self.state.active) else {
            self.surface.clear();
            return RedrawReport::default();
        };

        let gate = gating::evaluate(period, &self.state.flags);
        let index = match self.index.take() {
            Some(index) if index.period() == &period.id => index,
            _ => ElementIndex::build(&self.layout, &period.id),
        };
        let container = self.layout.container_rect();

        self.surface.clear();
        for node in period.nodes() {
            let display = NodeDisplay {
                open: self.state.is_open(&period.id, &node.id),
                locked: gate.is_locked(&node.id),
            };
            self.surface.set_node_display(&node.id, display);
        }

        let mut report = RedrawReport::default();
        for conn in &gate.visible {
            let from = index.rect_of(&self.layout, &conn.from);
            let to = index.rect_of(&self.layout, &conn.to);
            match self.resolver.resolve(from, to, &container) {
                Some(anchors) => {
                    let path = self.paths.build(&anchors);
                    self.surface.draw_connector(conn, &path);
                    report.drawn += 1;
                }
                None => {
                    tracing::trace!(from = %conn.from, to = %conn.to, "connection skipped, element not rendered");
                    report.skipped.push((conn.from.clone(), conn.to.clone()));
                }
            }
        }
        tracing::trace!(period = %period.id, drawn = report.drawn, skipped = report.skipped.len(), "redraw pass");

        self.index = Some(index);
        report.locked = gate.locked;
        report
    }
}

impl<L: LayoutSource, S: DrawingSurface> FlowchartView<L, ManualFrameHost, S> {
    /// Move the manual clock forward and fire whatever came due: timers first,
    /// then one display frame.
    pub fn advance(&mut self, ms: u64) -> Vec<RedrawReport> {
        self.frames.advance(ms);

        let mut reports = Vec::new();
        for timer in self.frames.take_due_timers() {
            reports.extend(self.on_timer(timer));
        }
        for frame in self.frames.take_frames() {
            reports.extend(self.on_frame(frame));
        }
        reports
    }
}
