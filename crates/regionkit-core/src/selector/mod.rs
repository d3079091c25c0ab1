//! Interactive region selection.
//!
//! [`RegionSelector`] is the model behind the selection canvas. The UI feeds
//! it normalized pointer positions (see [`crate::geometry::normalize_pointer`])
//! and redraws from its state; nothing here touches a canvas.
//!
//! # State Machine
//!
//! ```text
//! Idle --down--> DrawingRect | DrawingStroke | Moving | Resizing
//!      --move--> (same state, rect/points/position updated)
//!      --up----> committed / edited --> Idle
//! ```
//!
//! Rect mode commits one region per drag. Brush mode accumulates pending
//! strokes; [`RegionSelector::commit_brush`] bundles them into one region.

mod load;

use serde::{Deserialize, Serialize};

use crate::config::{SelectorConfig, MAX_BRUSH_SIZE};
use crate::geometry::{NormPoint, NormRect};
use crate::handles::{apply_resize, hit_test, Handle};
use crate::region::{Color, Region, RegionShape, Stroke};

pub use load::{cache_busted_url, ImageLoad, LoadStatus};

const ID_PREFIX: &str = "region-";

/// The two mutually exclusive drawing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    #[default]
    Rect,
    Brush,
}

/// What a pointer event did, so the UI knows what to repaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SelectorEvent {
    /// Nothing happened.
    None,
    /// A draw, move or resize interaction started.
    Started,
    /// The in-progress interaction changed.
    Dragging,
    /// A new rect region was committed.
    Committed { id: String },
    /// A brush stroke was added to the pending strokes.
    StrokeAdded,
    /// An existing region was moved or resized.
    Edited { id: String },
    /// A click selected an existing region without changing it.
    Selected { id: String },
    /// The interaction ended without a result (a click, or a one-point stroke).
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
enum Interaction {
    Idle,
    DrawingRect {
        start: NormPoint,
        current: NormPoint,
    },
    DrawingStroke(Stroke),
    Moving {
        id: String,
        origin: NormPoint,
        start_rect: NormRect,
    },
    Resizing {
        id: String,
        handle: Handle,
        origin: NormPoint,
        start_rect: NormRect,
    },
}

/// Selection session state.
#[derive(Debug, Clone)]
pub struct RegionSelector {
    config: SelectorConfig,
    mode: DrawMode,
    brush_size: f64,
    brush_color: Color,
    regions: Vec<Region>,
    pending_strokes: Vec<Stroke>,
    interaction: Interaction,
    selected: Option<String>,
    next_id: u64,
    canvas_width: f64,
}

impl Default for RegionSelector {
    fn default() -> Self {
        Self::new(SelectorConfig::default())
    }
}

impl RegionSelector {
    pub fn new(config: SelectorConfig) -> Self {
        Self {
            brush_size: config.default_brush_size,
            brush_color: config.brush_color,
            config,
            mode: DrawMode::Rect,
            regions: Vec::new(),
            pending_strokes: Vec::new(),
            interaction: Interaction::Idle,
            selected: None,
            next_id: 1,
            canvas_width: 0.0,
        }
    }

    /// Start a session seeded with previously confirmed regions.
    ///
    /// New ids continue after the highest `region-N` id in `initial`.
    /// Seeded rects are clamped into the unit square.
    pub fn with_regions(config: SelectorConfig, mut initial: Vec<Region>) -> Self {
        for region in &mut initial {
            if let RegionShape::Rect { rect } = &mut region.shape {
                *rect = rect.clamped(config.min_draw_size);
            }
        }

        let next_id = initial
            .iter()
            .filter_map(|r| r.id.strip_prefix(ID_PREFIX)?.parse::<u64>().ok())
            .max()
            .map_or(1, |n| n.saturating_add(1));

        Self {
            regions: initial,
            next_id,
            ..Self::new(config)
        }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    /// Switch drawing mode.
    ///
    /// Any in-progress interaction is dropped and the selection cleared.
    /// Pending brush strokes are kept until committed, undone or cleared.
    pub fn set_mode(&mut self, mode: DrawMode) {
        if self.mode != mode {
            self.mode = mode;
            self.interaction = Interaction::Idle;
            self.selected = None;
        }
    }

    pub fn brush_size(&self) -> f64 {
        self.brush_size
    }

    /// Set the brush radius as a fraction of canvas width.
    ///
    /// Non-positive or non-finite sizes are ignored; large sizes are capped.
    pub fn set_brush_size(&mut self, size: f64) {
        if size.is_finite() && size > 0.0 {
            self.brush_size = size.min(MAX_BRUSH_SIZE);
        }
    }

    /// Record the on-screen canvas width, used for each stroke's pixel size.
    pub fn set_canvas_width(&mut self, width: f64) {
        self.canvas_width = if width.is_finite() { width.max(0.0) } else { 0.0 };
    }

    pub fn brush_color(&self) -> Color {
        self.brush_color
    }

    pub fn set_brush_color(&mut self, color: Color) {
        self.brush_color = color;
    }

    /// Committed regions, in drawing order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn into_regions(self) -> Vec<Region> {
        self.regions
    }

    /// Brush strokes drawn but not yet bundled into a region.
    pub fn pending_strokes(&self) -> &[Stroke] {
        &self.pending_strokes
    }

    /// The rectangle being drawn, for preview.
    pub fn draft_rect(&self) -> Option<NormRect> {
        match &self.interaction {
            Interaction::DrawingRect { start, current } => {
                Some(NormRect::from_corners(*start, *current, self.config.min_draw_size))
            }
            _ => None,
        }
    }

    /// The stroke being drawn, for preview.
    pub fn draft_stroke(&self) -> Option<&Stroke> {
        match &self.interaction {
            Interaction::DrawingStroke(stroke) => Some(stroke),
            _ => None,
        }
    }

    /// Whether a pointer interaction is in progress.
    pub fn is_interacting(&self) -> bool {
        self.interaction != Interaction::Idle
    }

    /// The selected region, if any.
    pub fn selected(&self) -> Option<&Region> {
        let id = self.selected.as_deref()?;
        self.regions.iter().find(|r| r.id == id)
    }

    /// Select a region by id. Returns false if no such region exists.
    pub fn select(&mut self, id: &str) -> bool {
        if self.regions.iter().any(|r| r.id == id) {
            self.selected = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Delete the selected region.
    pub fn delete_selected(&mut self) -> Option<Region> {
        let id = self.selected.take()?;
        self.remove(&id)
    }

    /// Remove a region by id.
    pub fn remove(&mut self, id: &str) -> Option<Region> {
        let index = self.regions.iter().position(|r| r.id == id)?;
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        Some(self.regions.remove(index))
    }

    /// Drop every region, pending stroke and in-progress interaction.
    pub fn clear(&mut self) {
        self.regions.clear();
        self.pending_strokes.clear();
        self.interaction = Interaction::Idle;
        self.selected = None;
    }

    /// Undo the most recent action for the active mode.
    ///
    /// Brush mode pops the last pending stroke, falling back to the last
    /// committed region. Rect mode pops the last committed region. Returns
    /// false (and changes nothing) when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if self.mode == DrawMode::Brush && self.pending_strokes.pop().is_some() {
            return true;
        }
        match self.regions.pop() {
            Some(region) => {
                if self.selected.as_deref() == Some(region.id.as_str()) {
                    self.selected = None;
                }
                true
            }
            None => false,
        }
    }

    /// Bundle all pending strokes into one brush region.
    ///
    /// Returns the new region's id, or `None` if there were no strokes.
    pub fn commit_brush(&mut self) -> Option<String> {
        if self.pending_strokes.is_empty() {
            return None;
        }
        let strokes = std::mem::take(&mut self.pending_strokes);
        let id = self.allocate_id();
        self.regions.push(Region::brush(id.clone(), strokes));
        Some(id)
    }

    /// CSS cursor for a pointer hovering at `p`.
    pub fn cursor_at(&self, p: NormPoint) -> &'static str {
        if self.mode == DrawMode::Brush {
            return "crosshair";
        }
        if let Some(rect) = self.selected().and_then(Region::as_rect) {
            if let Some(handle) = hit_test(rect, p, self.config.handle_threshold) {
                return handle.cursor();
            }
        }
        if self.rect_region_at(p).is_some() {
            "move"
        } else {
            "crosshair"
        }
    }

    /// Pointer pressed at normalized position `p`.
    pub fn pointer_down(&mut self, p: NormPoint) -> SelectorEvent {
        let p = p.clamped();
        match self.mode {
            DrawMode::Brush => {
                self.selected = None;
                let mut stroke = Stroke::new(self.brush_size, self.brush_color);
                stroke.size = self.brush_size * self.canvas_width;
                stroke.points.push(p);
                self.interaction = Interaction::DrawingStroke(stroke);
            }
            DrawMode::Rect => {
                self.interaction = self.begin_rect_interaction(p);
            }
        }
        SelectorEvent::Started
    }

    /// Pointer moved to `p`.
    pub fn pointer_move(&mut self, p: NormPoint) -> SelectorEvent {
        let p = p.clamped();
        let at_drag_origin = p == self.drag_origin();
        match &mut self.interaction {
            Interaction::Idle => SelectorEvent::None,
            Interaction::DrawingRect { current, .. } => {
                *current = p;
                SelectorEvent::Dragging
            }
            Interaction::DrawingStroke(stroke) => {
                if stroke.points.last() != Some(&p) {
                    stroke.points.push(p);
                }
                SelectorEvent::Dragging
            }
            // Back at the press point: exactly the starting rect, no float drift
            Interaction::Moving { id, start_rect, .. }
            | Interaction::Resizing { id, start_rect, .. }
                if at_drag_origin =>
            {
                let (id, rect) = (id.clone(), *start_rect);
                self.set_rect(&id, rect);
                SelectorEvent::Dragging
            }
            Interaction::Moving {
                id,
                origin,
                start_rect,
            } => {
                let rect = start_rect.translated(p.x - origin.x, p.y - origin.y);
                let id = id.clone();
                self.set_rect(&id, rect);
                SelectorEvent::Dragging
            }
            Interaction::Resizing {
                id,
                handle,
                origin,
                start_rect,
            } => {
                let rect = apply_resize(
                    start_rect,
                    *handle,
                    p.x - origin.x,
                    p.y - origin.y,
                    self.config.min_resize_size,
                );
                let id = id.clone();
                self.set_rect(&id, rect);
                SelectorEvent::Dragging
            }
        }
    }

    /// Pointer released at `p`; finishes the current interaction.
    pub fn pointer_up(&mut self, p: NormPoint) -> SelectorEvent {
        self.pointer_move(p);

        match std::mem::replace(&mut self.interaction, Interaction::Idle) {
            Interaction::Idle => SelectorEvent::None,
            Interaction::DrawingRect { start, current } => {
                let dx = (current.x - start.x).abs();
                let dy = (current.y - start.y).abs();
                if dx < self.config.min_commit_size && dy < self.config.min_commit_size {
                    return SelectorEvent::Cancelled;
                }
                let rect = NormRect::from_corners(start, current, self.config.min_draw_size);
                let id = self.allocate_id();
                self.regions.push(Region::rect(id.clone(), rect));
                SelectorEvent::Committed { id }
            }
            Interaction::DrawingStroke(stroke) => {
                if stroke.is_committable() {
                    self.pending_strokes.push(stroke);
                    SelectorEvent::StrokeAdded
                } else {
                    SelectorEvent::Cancelled
                }
            }
            Interaction::Moving { id, start_rect, .. }
            | Interaction::Resizing { id, start_rect, .. } => {
                let unchanged = self
                    .regions
                    .iter()
                    .find(|r| r.id == id)
                    .and_then(Region::as_rect)
                    .map_or(true, |rect| *rect == start_rect);
                if unchanged {
                    SelectorEvent::Selected { id }
                } else {
                    SelectorEvent::Edited { id }
                }
            }
        }
    }

    /// Pointer position where the current move or resize started.
    fn drag_origin(&self) -> NormPoint {
        match &self.interaction {
            Interaction::Moving { origin, .. } | Interaction::Resizing { origin, .. } => *origin,
            _ => NormPoint::default(),
        }
    }

    /// Abandon the in-progress interaction, restoring a moved or resized
    /// region to where it started.
    pub fn cancel_interaction(&mut self) {
        match std::mem::replace(&mut self.interaction, Interaction::Idle) {
            Interaction::Moving { id, start_rect, .. }
            | Interaction::Resizing { id, start_rect, .. } => self.set_rect(&id, start_rect),
            _ => {}
        }
    }

    fn begin_rect_interaction(&mut self, p: NormPoint) -> Interaction {
        // Handles of the selected rect take priority
        if let Some(region) = self.selected() {
            if let Some(rect) = region.as_rect() {
                if let Some(handle) = hit_test(rect, p, self.config.handle_threshold) {
                    return Interaction::Resizing {
                        id: region.id.clone(),
                        handle,
                        origin: p,
                        start_rect: *rect,
                    };
                }
            }
        }

        if let Some((id, rect)) = self.rect_region_at(p) {
            self.selected = Some(id.clone());
            return Interaction::Moving {
                id,
                origin: p,
                start_rect: rect,
            };
        }

        self.selected = None;
        Interaction::DrawingRect {
            start: p,
            current: p,
        }
    }

    /// Topmost rect region containing `p`.
    fn rect_region_at(&self, p: NormPoint) -> Option<(String, NormRect)> {
        self.regions.iter().rev().find_map(|r| match &r.shape {
            RegionShape::Rect { rect } if rect.contains(p) => Some((r.id.clone(), *rect)),
            _ => None,
        })
    }

    fn set_rect(&mut self, id: &str, new_rect: NormRect) {
        if let Some(region) = self.regions.iter_mut().find(|r| r.id == id) {
            if let RegionShape::Rect { rect } = &mut region.shape {
                if *rect != new_rect {
                    *rect = new_rect;
                    // Geometry changed, so any earlier thumbnail is stale
                    region.thumbnail_url = None;
                }
            }
        }
    }

    /// Next unused `region-N` id. The counter wraps back to 1 at `u64::MAX`.
    fn allocate_id(&mut self) -> String {
        loop {
            let id = format!("{ID_PREFIX}{}", self.next_id);
            self.next_id = self.next_id.checked_add(1).unwrap_or(1);
            if !self.regions.iter().any(|r| r.id == id) {
                return id;
            }
        }
    }
}
