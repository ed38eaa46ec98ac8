//! Pattern Graph Module
//!
//! Builds one positioned graph per dataset snapshot and derives display
//! overlays from the current filter and hover state.
//!
//! # Architecture
//!
//! ```text
//! Dataset (patterns/problems/companies/collections)
//!        │
//!        ▼
//! GraphBuilder ──► LayoutEngine (hierarchical | radial + force)
//!        │
//!        ▼
//! PatternGraph (immutable snapshot)
//!        │
//!        ├──► reduce(graph, &FilterState) ──► GraphOverlay
//!        │                                        │
//!        │                                        ▼
//!        │                                   dyn Renderer
//!        │                                        │
//!        └──────── PatternGraphView ◄── EventQueue (click / hover)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut view = PatternGraphView::new(&config);
//! view.set_dataset(Rc::new(client.load_dataset().await?))?;
//! view.toggle_difficulty(Difficulty::Hard);
//! println!("{}", view.shown_label());
//! ```

pub mod build;
pub mod colors;
pub mod filter;
pub mod force_sim;
pub mod ids;
pub mod layout;
pub mod reducer;
pub mod render;
pub mod spatial;
pub mod store;

use std::rc::Rc;

use pattern_types::{Dataset, Difficulty, GraphError, LoadError};
use serde::{Deserialize, Serialize};

pub use build::{GraphBuilder, PatternGraph, ProblemSummary};
pub use filter::{FilterState, PatternFilter};
pub use ids::NodeKind;
pub use layout::{LayoutAssigner, LayoutEngine, LayoutMode};
pub use reducer::{reduce, EdgeOverlay, GraphOverlay, NodeOverlay};
pub use render::{EventQueue, GraphEvent, HeadlessRenderer, Renderer};
pub use store::{GraphModel, GraphStore, NodeAttributes, NodeShape};

use crate::config::ViewConfig;
use crate::solved::SolvedSet;

/// External problem page
pub const PROBLEM_URL_BASE: &str = "https://leetcode.com/problems/";

// =============================================================================
// CLICK CONTRACT
// =============================================================================

/// What clicking a pattern or subpattern node does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClickBehavior {
    /// Toggle the node as the active pattern filter
    #[default]
    ToggleFilter,
    /// Navigate to the pattern's page
    Navigate,
}

impl std::str::FromStr for ClickBehavior {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "filter" | "toggle" => Ok(Self::ToggleFilter),
            "navigate" | "link" => Ok(Self::Navigate),
            other => Err(format!("unknown click behavior '{}'", other)),
        }
    }
}

/// Result of a click, for the shell to act on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ClickAction {
    /// Open the problem page in a new browsing context
    OpenProblem { url: String },
    /// Pattern filter set to this token
    SelectPattern { token: String },
    /// Pattern filter cleared by clicking the active selection again
    ClearPattern,
    /// Navigate to an in-site page
    Navigate { url: String },
}

pub fn problem_url(slug: &str) -> String {
    format!("{}{}", PROBLEM_URL_BASE, slug)
}

pub fn pattern_url(base_path: &str, pattern_slug: &str) -> String {
    format!("{}/patterns/{}", base_path.trim_end_matches('/'), pattern_slug)
}

// =============================================================================
// VIEW
// =============================================================================

/// Dataset state of a view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// Load or build failed; no graph is shown
    Failed(String),
}

/// Interactive view over one dataset snapshot
///
/// Owns the filter state and the current overlay. The graph is rebuilt only
/// when a different dataset is supplied; filter and hover changes only rerun
/// the reducer.
pub struct PatternGraphView {
    builder: GraphBuilder,
    click: ClickBehavior,
    base_path: String,
    state: LoadState,
    dataset: Option<Rc<Dataset>>,
    graph: Option<PatternGraph>,
    filter: FilterState,
    overlay: GraphOverlay,
    /// Last published "N"
    visible: usize,
    renderer: Option<Box<dyn Renderer>>,
    events: EventQueue,
    torn_down: bool,
}

impl std::fmt::Debug for PatternGraphView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternGraphView")
            .field("state", &self.state)
            .field("filter", &self.filter)
            .field("visible", &self.visible)
            .field("attached", &self.renderer.is_some())
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

impl PatternGraphView {
    pub fn new(config: &ViewConfig) -> Self {
        Self::with_builder(
            GraphBuilder::new(LayoutEngine::new(config.layout)),
            config.click,
            &config.base_path,
        )
    }

    pub fn with_builder(builder: GraphBuilder, click: ClickBehavior, base_path: &str) -> Self {
        Self {
            builder,
            click,
            base_path: base_path.to_string(),
            state: LoadState::Loading,
            dataset: None,
            graph: None,
            filter: FilterState::default(),
            overlay: GraphOverlay::default(),
            visible: 0,
            renderer: None,
            events: EventQueue::new(),
            torn_down: false,
        }
    }

    /// Builder: solved markers applied at the next build
    pub fn with_solved(mut self, solved: SolvedSet) -> Self {
        self.builder = std::mem::take(&mut self.builder).with_solved(solved);
        self
    }

    // -------------------------------------------------------------------------
    // Dataset lifecycle
    // -------------------------------------------------------------------------

    /// Install a dataset. The same `Rc` again is a no-op.
    pub fn set_dataset(&mut self, dataset: Rc<Dataset>) -> Result<(), GraphError> {
        if self.torn_down {
            tracing::debug!("dataset arrived after teardown, dropped");
            return Ok(());
        }
        if self
            .dataset
            .as_ref()
            .is_some_and(|current| Rc::ptr_eq(current, &dataset))
        {
            return Ok(());
        }

        match self.builder.build(&dataset) {
            Ok(graph) => {
                self.graph = Some(graph);
                self.dataset = Some(dataset);
                self.state = LoadState::Ready;
                // Node ids of the previous snapshot mean nothing here
                self.filter.hovered = None;
                self.refresh();
                Ok(())
            }
            Err(e) => {
                self.fail(e.to_string());
                Err(e)
            }
        }
    }

    /// Record a failed load; any previous graph is dropped
    pub fn load_failed(&mut self, error: &LoadError) {
        if self.torn_down {
            return;
        }
        tracing::warn!("dataset load failed: {}", error);
        self.fail(error.to_string());
    }

    fn fail(&mut self, message: String) {
        self.dataset = None;
        self.graph = None;
        self.overlay = GraphOverlay::default();
        self.visible = 0;
        self.state = LoadState::Failed(message);
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == LoadState::Ready
    }

    pub fn graph(&self) -> Option<&PatternGraph> {
        self.graph.as_ref()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn overlay(&self) -> &GraphOverlay {
        &self.overlay
    }

    // -------------------------------------------------------------------------
    // Filter mutations
    // -------------------------------------------------------------------------

    pub fn toggle_difficulty(&mut self, difficulty: Difficulty) {
        self.filter.toggle_difficulty(difficulty);
        self.refresh();
    }

    pub fn set_difficulties(&mut self, difficulties: impl IntoIterator<Item = Difficulty>) {
        self.filter.difficulties = difficulties.into_iter().collect();
        self.refresh();
    }

    pub fn set_search(&mut self, query: &str) {
        self.filter.search = query.to_string();
        self.refresh();
    }

    /// Pattern dropdown selection (`""` clears)
    pub fn set_pattern(&mut self, token: &str) {
        self.filter.pattern = PatternFilter::parse(token);
        self.refresh();
    }

    pub fn set_company(&mut self, name: Option<&str>) {
        self.filter.company = name.filter(|n| !n.is_empty()).map(str::to_string);
        self.refresh();
    }

    pub fn set_collection(&mut self, name: Option<&str>) {
        self.filter.collection = name.filter(|n| !n.is_empty()).map(str::to_string);
        self.refresh();
    }

    pub fn set_show_patterns(&mut self, show: bool) {
        self.filter.show_patterns = show;
        self.refresh();
    }

    /// Replace the whole filter state
    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.refresh();
    }

    pub fn hover_enter(&mut self, node_id: &str) {
        self.filter.hovered = Some(node_id.to_string());
        self.refresh();
    }

    pub fn hover_leave(&mut self) {
        self.filter.hovered = None;
        self.refresh();
    }

    /// Click contract: problems open externally, category nodes toggle the
    /// pattern filter or navigate
    pub fn click(&mut self, node_id: &str) -> Option<ClickAction> {
        let graph = self.graph.as_ref()?;
        let kind = graph.model.node(node_id)?.kind;

        let action = match kind {
            NodeKind::Problem => {
                let summary = graph.problem(node_id)?;
                ClickAction::OpenProblem {
                    url: problem_url(&summary.slug),
                }
            }
            NodeKind::Pattern | NodeKind::Subpattern => match self.click {
                ClickBehavior::Navigate => ClickAction::Navigate {
                    url: pattern_url(&self.base_path, ids::parent_slug(node_id)),
                },
                ClickBehavior::ToggleFilter => {
                    let token = match kind {
                        NodeKind::Pattern => PatternFilter::Parent(node_id.to_string()),
                        _ => PatternFilter::Leaf(
                            node_id
                                .split_once(ids::SEPARATOR)
                                .map_or(node_id, |(_, sub)| sub)
                                .to_string(),
                        ),
                    }
                    .token();
                    self.filter.toggle_pattern(&token);
                    self.refresh();
                    match &self.filter.pattern {
                        Some(_) => ClickAction::SelectPattern { token },
                        None => ClickAction::ClearPattern,
                    }
                }
            },
        };

        tracing::debug!(node = node_id, ?action, "node clicked");
        Some(action)
    }

    // -------------------------------------------------------------------------
    // Counter
    // -------------------------------------------------------------------------

    /// Last published visible problem count ("N")
    pub fn visible_count(&self) -> usize {
        self.visible
    }

    /// Total problem count ("M")
    pub fn total_count(&self) -> usize {
        self.graph.as_ref().map_or(0, PatternGraph::total_problems)
    }

    /// "N of M shown"
    pub fn shown_label(&self) -> String {
        format!("{} of {} shown", self.visible, self.total_count())
    }

    // -------------------------------------------------------------------------
    // Renderer
    // -------------------------------------------------------------------------

    /// Attach a renderer; it receives the current overlay immediately
    pub fn attach(&mut self, mut renderer: Box<dyn Renderer>) {
        if self.torn_down {
            renderer.dispose();
            return;
        }
        if let Some(mut previous) = self.renderer.take() {
            previous.dispose();
        }
        self.events.clear();
        self.events.connect(renderer.as_mut());
        render::apply_overlay(renderer.as_mut(), &self.overlay);
        self.renderer = Some(renderer);
    }

    /// Apply queued renderer events in arrival order
    pub fn process_events(&mut self) -> Vec<ClickAction> {
        let mut actions = Vec::new();
        if self.events.is_empty() {
            return actions;
        }
        for event in self.events.drain() {
            match event {
                GraphEvent::HoverEnter(id) => self.hover_enter(&id),
                GraphEvent::HoverLeave => self.hover_leave(),
                GraphEvent::Click(id) => actions.extend(self.click(&id)),
            }
        }
        actions
    }

    /// Release the renderer and its handlers; later dataset arrivals are dropped
    pub fn teardown(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer.dispose();
        }
        self.events.clear();
        self.torn_down = true;
        tracing::debug!("pattern graph view torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Recompute the overlay, publish the count unless a known node is
    /// hovered, and push the overlay to the renderer
    fn refresh(&mut self) {
        let Some(graph) = self.graph.as_ref() else {
            return;
        };
        self.overlay = reduce(graph, &self.filter);
        let hovering = self
            .filter
            .hovered
            .as_deref()
            .is_some_and(|id| graph.model.index_of(id).is_some());
        if !hovering {
            self.visible = self.overlay.visible_problems;
        }
        if let Some(renderer) = self.renderer.as_mut() {
            render::apply_overlay(renderer.as_mut(), &self.overlay);
        }
    }
}

impl Drop for PatternGraphView {
    fn drop(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer.dispose();
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
