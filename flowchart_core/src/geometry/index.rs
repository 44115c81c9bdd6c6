//! Element lookup for the active time period.

use std::collections::HashMap;

use story_data::{NodeId, TimePeriodId};

use super::Rect;

/// The page layout as seen by the engine: rendered node elements and live boxes.
pub trait LayoutSource {
    /// Host handle for a rendered node element.
    type Element: Clone;

    /// Rendered node elements of one time period, keyed by their node-id attribute.
    fn node_elements(&self, period: &TimePeriodId) -> Vec<(NodeId, Self::Element)>;

    /// Current bounding box, or `None` if the element is detached or hidden.
    fn bounding_rect(&self, element: &Self::Element) -> Option<Rect>;

    /// Bounding box of the container that defines the coordinate origin.
    fn container_rect(&self) -> Rect;
}

/// Node id -> element map for one time period, rebuilt on every tab switch.
#[derive(Debug, Clone)]
pub struct ElementIndex<E> {
    period: TimePeriodId,
    elements: HashMap<NodeId, E>,
}

impl<E: Clone> ElementIndex<E> {
    pub fn build<L>(layout: &L, period: &TimePeriodId) -> Self
    where
        L: LayoutSource<Element = E>,
    {
        let mut elements = HashMap::new();
        for (id, element) in layout.node_elements(period) {
            elements.entry(id).or_insert(element);
        }
        tracing::trace!(period = %period, elements = elements.len(), "built element index");

        Self {
            period: period.clone(),
            elements,
        }
    }

    pub fn period(&self) -> &TimePeriodId {
        &self.period
    }

    pub fn get(&self, id: &NodeId) -> Option<&E> {
        self.elements.get(id)
    }

    /// Live box of a node, `None` if it is not rendered in this period.
    pub fn rect_of<L>(&self, layout: &L, id: &NodeId) -> Option<Rect>
    where
        L: LayoutSource<Element = E>,
    {
        self.get(id).and_then(|element| layout.bounding_rect(element))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// In-memory layout for headless hosts: boxes are set explicitly.
///
/// Elements are addressed by node id; only the active container is rendered,
/// so boxes are stored per period.
#[derive(Debug, Clone, Default)]
pub struct StaticLayout {
    container: Rect,
    boxes: HashMap<TimePeriodId, HashMap<NodeId, Rect>>,
}

impl StaticLayout {
    pub fn new(container: Rect) -> Self {
        Self {
            container,
            boxes: HashMap::new(),
        }
    }

    /// Place (or move) a node box.
    pub fn set_rect(&mut self, period: impl Into<TimePeriodId>, node: impl Into<NodeId>, rect: Rect) {
        self.boxes
            .entry(period.into())
            .or_default()
            .insert(node.into(), rect);
    }

    /// Builder form of [`StaticLayout::set_rect`].
    pub fn with_rect(mut self, period: impl Into<TimePeriodId>, node: impl Into<NodeId>, rect: Rect) -> Self {
        self.set_rect(period, node, rect);
        self
    }

    /// Remove a node box, as if the element were detached.
    pub fn remove(&mut self, period: &TimePeriodId, node: &NodeId) {
        if let Some(boxes) = self.boxes.get_mut(period) {
            boxes.remove(node);
        }
    }
}

impl LayoutSource for StaticLayout {
    type Element = (TimePeriodId, NodeId);

    fn node_elements(&self, period: &TimePeriodId) -> Vec<(NodeId, Self::Element)> {
        self.boxes
            .get(period)
            .map(|boxes| {
                boxes
                    .keys()
                    .map(|id| (id.clone(), (period.clone(), id.clone())))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn bounding_rect(&self, element: &Self::Element) -> Option<Rect> {
        let (period, node) = element;
        self.boxes.get(period)?.get(node).copied()
    }

    fn container_rect(&self) -> Rect {
        self.container
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_scoped_to_period() {
        let layout = StaticLayout::new(Rect::default())
            .with_rect("morning", "A", Rect::new(0.0, 0.0, 10.0, 10.0))
            .with_rect("evening", "Z", Rect::new(0.0, 0.0, 10.0, 10.0));

        let index = ElementIndex::build(&layout, &TimePeriodId::new("morning"));
        assert_eq!(index.len(), 1);
        assert!(index.get(&NodeId::new("A")).is_some());
        assert!(index.get(&NodeId::new("Z")).is_none());
    }

    #[test]
    fn test_rect_follows_live_layout() {
        let mut layout = StaticLayout::new(Rect::default())
            .with_rect("morning", "A", Rect::new(0.0, 0.0, 10.0, 10.0));
        let index = ElementIndex::build(&layout, &TimePeriodId::new("morning"));
        let a = NodeId::new("A");

        layout.set_rect("morning", "A", Rect::new(5.0, 5.0, 10.0, 30.0));
        assert_eq!(index.rect_of(&layout, &a), Some(Rect::new(5.0, 5.0, 10.0, 30.0)));

        layout.remove(&TimePeriodId::new("morning"), &a);
        assert_eq!(index.rect_of(&layout, &a), None);
    }

    #[test]
    fn test_moving_a_box_keeps_one_element() {
        let mut layout = StaticLayout::new(Rect::default());
        for step in 0..50 {
            layout.set_rect("morning", "A", Rect::new(0.0, step as f64, 10.0, 10.0));
        }
        layout.set_rect("morning", "B", Rect::new(20.0, 0.0, 10.0, 10.0));

        let morning = TimePeriodId::new("morning");
        assert_eq!(layout.node_elements(&morning).len(), 2);

        let index = ElementIndex::build(&layout, &morning);
        assert_eq!(index.len(), 2);
        assert_eq!(
            index.rect_of(&layout, &NodeId::new("A")),
            Some(Rect::new(0.0, 49.0, 10.0, 10.0))
        );
    }
}
