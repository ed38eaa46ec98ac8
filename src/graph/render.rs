//! Renderer capability and the headless implementation
//!
//! The view never calls back into itself from a renderer handler. Handlers
//! registered through `EventQueue::connect` only push a `GraphEvent`; the view
//! drains the queue on its own turn. A renderer drops its handlers on
//! `dispose`, so nothing fires after teardown.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use super::reducer::{EdgeOverlay, GraphOverlay, NodeOverlay};
use super::spatial::{SpatialIndex, SpatialNode};
use super::store::GraphModel;

/// Handler receiving a node id
pub type NodeHandler = Box<dyn FnMut(&str)>;

/// Handler with no payload
pub type LeaveHandler = Box<dyn FnMut()>;

/// Pointer slop used for hit testing, in graph units
pub const HIT_SLOP: f32 = 2.0;

// =============================================================================
// CAPABILITY TRAIT
// =============================================================================

/// Narrow rendering backend capability
pub trait Renderer {
    fn set_node_overlay(&mut self, node_id: &str, overlay: &NodeOverlay);

    /// `edge_index` follows `GraphModel::edges()` order
    fn set_edge_overlay(&mut self, edge_index: usize, overlay: &EdgeOverlay);

    fn on_click(&mut self, handler: NodeHandler);

    fn on_hover_enter(&mut self, handler: NodeHandler);

    fn on_hover_leave(&mut self, handler: LeaveHandler);

    /// Release the surface and every registered handler
    fn dispose(&mut self);
}

/// Push a full overlay to a renderer
pub fn apply_overlay(renderer: &mut dyn Renderer, overlay: &GraphOverlay) {
    for node in &overlay.nodes {
        renderer.set_node_overlay(&node.id, node);
    }
    for (idx, edge) in overlay.edges.iter().enumerate() {
        renderer.set_edge_overlay(idx, edge);
    }
}

// =============================================================================
// EVENT QUEUE
// =============================================================================

/// Pointer event delivered by a renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphEvent {
    Click(String),
    HoverEnter(String),
    HoverLeave,
}

/// Pending events from renderer handlers, polled by the view
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    pending: Rc<RefCell<VecDeque<GraphEvent>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register queue-pushing handlers on a renderer
    pub fn connect(&self, renderer: &mut dyn Renderer) {
        let pending = Rc::clone(&self.pending);
        renderer.on_click(Box::new(move |id: &str| {
            pending
                .borrow_mut()
                .push_back(GraphEvent::Click(id.to_string()))
        }));

        let pending = Rc::clone(&self.pending);
        renderer.on_hover_enter(Box::new(move |id: &str| {
            pending
                .borrow_mut()
                .push_back(GraphEvent::HoverEnter(id.to_string()))
        }));

        let pending = Rc::clone(&self.pending);
        renderer.on_hover_leave(Box::new(move || {
            pending.borrow_mut().push_back(GraphEvent::HoverLeave)
        }));
    }

    /// Take all pending events in arrival order
    pub fn drain(&self) -> Vec<GraphEvent> {
        self.pending.borrow_mut().drain(..).collect()
    }

    pub fn clear(&self) {
        self.pending.borrow_mut().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}

// =============================================================================
// HEADLESS RENDERER
// =============================================================================

/// Base geometry of one node
#[derive(Debug, Clone, Copy)]
struct Placement {
    center: [f32; 2],
    size: f32,
}

/// Renderer without a drawing surface
///
/// Keeps the last overlay it was given and turns pointer positions into
/// click/hover callbacks via the spatial index. Used by the CLI and tests.
#[derive(Default)]
pub struct HeadlessRenderer {
    placements: HashMap<String, Placement>,
    /// Node ids in graph order
    order: Vec<String>,
    nodes: HashMap<String, NodeOverlay>,
    edges: HashMap<usize, EdgeOverlay>,
    index: SpatialIndex,
    index_dirty: bool,
    hovered: Option<String>,
    click: Option<NodeHandler>,
    hover_enter: Option<NodeHandler>,
    hover_leave: Option<LeaveHandler>,
    disposed: bool,
}

impl std::fmt::Debug for HeadlessRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessRenderer")
            .field("nodes", &self.order.len())
            .field("hovered", &self.hovered)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl HeadlessRenderer {
    /// Surface for the nodes of `model` at their laid-out positions
    pub fn new(model: &GraphModel) -> Self {
        let mut renderer = Self::default();
        for node in model.nodes() {
            renderer.placements.insert(
                node.id.clone(),
                Placement {
                    center: [node.attrs.x, node.attrs.y],
                    size: node.attrs.size,
                },
            );
            renderer.order.push(node.id.clone());
        }
        renderer.index_dirty = true;
        renderer
    }

    pub fn node_overlay(&self, node_id: &str) -> Option<&NodeOverlay> {
        self.nodes.get(node_id)
    }

    pub fn edge_overlay(&self, edge_index: usize) -> Option<&EdgeOverlay> {
        self.edges.get(&edge_index)
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// True while any handler is still registered
    pub fn has_handlers(&self) -> bool {
        self.click.is_some() || self.hover_enter.is_some() || self.hover_leave.is_some()
    }

    /// Center of a node, for driving pointer events
    pub fn position_of(&self, node_id: &str) -> Option<[f32; 2]> {
        self.placements.get(node_id).map(|p| p.center)
    }

    /// Visible node under `point`
    pub fn node_at(&mut self, point: [f32; 2]) -> Option<String> {
        self.refresh_index();
        self.index
            .hit_test(point, HIT_SLOP)
            .map(|node| node.id.clone())
    }

    /// Pointer moved: fire leave/enter when the node under the pointer changes
    pub fn pointer_move(&mut self, point: [f32; 2]) {
        if self.disposed {
            return;
        }
        let hit = self.node_at(point);
        if hit == self.hovered {
            return;
        }
        if self.hovered.take().is_some() {
            if let Some(handler) = self.hover_leave.as_mut() {
                handler();
            }
        }
        if let Some(id) = hit {
            if let Some(handler) = self.hover_enter.as_mut() {
                handler(&id);
            }
            self.hovered = Some(id);
        }
    }

    /// Pointer clicked: fire the click handler for the node under the pointer
    pub fn pointer_click(&mut self, point: [f32; 2]) {
        if self.disposed {
            return;
        }
        if let Some(id) = self.node_at(point) {
            if let Some(handler) = self.click.as_mut() {
                handler(&id);
            }
        }
    }

    fn refresh_index(&mut self) {
        if !self.index_dirty {
            return;
        }
        let nodes = self.order.iter().filter_map(|id| {
            let placement = self.placements.get(id)?;
            let overlay = self.nodes.get(id);
            if overlay.is_some_and(|o| o.hidden) {
                return None;
            }
            let size = overlay.and_then(|o| o.size).unwrap_or(placement.size);
            Some(SpatialNode::new(id.as_str(), placement.center, size))
        });
        self.index.rebuild(nodes);
        self.index_dirty = false;
    }
}

impl Renderer for HeadlessRenderer {
    fn set_node_overlay(&mut self, node_id: &str, overlay: &NodeOverlay) {
        if self.disposed {
            return;
        }
        self.nodes.insert(node_id.to_string(), overlay.clone());
        self.index_dirty = true;
    }

    fn set_edge_overlay(&mut self, edge_index: usize, overlay: &EdgeOverlay) {
        if self.disposed {
            return;
        }
        self.edges.insert(edge_index, overlay.clone());
    }

    fn on_click(&mut self, handler: NodeHandler) {
        if !self.disposed {
            self.click = Some(handler);
        }
    }

    fn on_hover_enter(&mut self, handler: NodeHandler) {
        if !self.disposed {
            self.hover_enter = Some(handler);
        }
    }

    fn on_hover_leave(&mut self, handler: LeaveHandler) {
        if !self.disposed {
            self.hover_leave = Some(handler);
        }
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.click = None;
        self.hover_enter = None;
        self.hover_leave = None;
        self.hovered = None;
        self.index.clear();
        self.nodes.clear();
        self.edges.clear();
        self.disposed = true;
        tracing::debug!("headless renderer disposed");
    }
}

// =============================================================================
// TESTS
// =============================================================================
