//! Screen/world transform
//!
//! World units are grid cells with Y up; screen space is pixels with Y down.
//! Hosts use this to draw the engine's snapshot and to map clicks back.

use glam::Vec2;

use crate::sim::{GameState, VectorRecord};

/// Pixels per grid unit at zoom 1
pub const BASE_GRID_SCALE: f32 = 50.0;

const WHEEL_SENSITIVITY: f32 = 0.001;
const WHEEL_ZOOM_MIN: f32 = 0.5;
const WHEEL_ZOOM_MAX: f32 = 4.0;
const FIT_ZOOM_MIN: f32 = 0.6;
const FIT_ZOOM_MAX: f32 = 3.0;
/// World units kept around fitted content
const FIT_PADDING: f32 = 1.5;
/// Pointer movement (px) after which a press counts as a drag, not a click
const CLICK_SLOP: f32 = 5.0;
/// Pixel distance for double-click vector selection
const VECTOR_PICK_TOLERANCE: f32 = 10.0;

/// Zoom/pan state for a canvas
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTransform {
    pub zoom: f32,
    /// Pan offset of the origin from the canvas centre (pixels)
    pub offset: Vec2,
    /// Canvas size (pixels)
    pub canvas: Vec2,
    /// Last pointer position while dragging
    drag_anchor: Option<Vec2>,
    press_at: Vec2,
}

impl ViewTransform {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            zoom: 1.0,
            offset: Vec2::ZERO,
            canvas: Vec2::new(width, height),
            drag_anchor: None,
            press_at: Vec2::ZERO,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.canvas = Vec2::new(width, height);
    }

    fn scale(&self) -> f32 {
        BASE_GRID_SCALE * self.zoom
    }

    fn center(&self) -> Vec2 {
        self.canvas / 2.0 + self.offset
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let scale = self.scale();
        let center = self.center();
        Vec2::new(center.x + world.x * scale, center.y - world.y * scale)
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let scale = self.scale();
        let center = self.center();
        Vec2::new((screen.x - center.x) / scale, (center.y - screen.y) / scale)
    }

    /// Mouse-wheel zoom
    pub fn wheel(&mut self, delta_y: f32) {
        self.zoom = (self.zoom - delta_y * WHEEL_SENSITIVITY).clamp(WHEEL_ZOOM_MIN, WHEEL_ZOOM_MAX);
    }

    pub fn begin_drag(&mut self, pointer: Vec2) {
        self.drag_anchor = Some(pointer);
        self.press_at = pointer;
    }

    pub fn drag_to(&mut self, pointer: Vec2) {
        if let Some(anchor) = self.drag_anchor {
            self.offset += pointer - anchor;
            self.drag_anchor = Some(pointer);
        }
    }

    /// Finish a drag; returns true when the pointer barely moved (a click)
    pub fn end_drag(&mut self, pointer: Vec2) -> bool {
        self.drag_anchor = None;
        let moved = (pointer - self.press_at).abs();
        moved.x <= CLICK_SLOP && moved.y <= CLICK_SLOP
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Zoom and pan so every point is visible with some padding
    pub fn fit(&mut self, points: &[Vec2]) {
        let Some(first) = points.first() else {
            return;
        };
        let (mut min, mut max) = (*first, *first);
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
        min -= Vec2::splat(FIT_PADDING);
        max += Vec2::splat(FIT_PADDING);

        let size = max - min;
        let canvas_aspect = self.canvas.x / self.canvas.y;
        let world_aspect = size.x / size.y;
        let desired_scale = if canvas_aspect > world_aspect {
            self.canvas.y / size.y
        } else {
            self.canvas.x / size.x
        };
        self.zoom = (desired_scale / BASE_GRID_SCALE).clamp(FIT_ZOOM_MIN, FIT_ZOOM_MAX);

        let world_center = min + size / 2.0;
        let scale = self.scale();
        self.offset = Vec2::new(-world_center.x * scale, world_center.y * scale);
        self.drag_anchor = None;
    }

    /// Fit everything that matters in the current level
    pub fn fit_state(&mut self, state: &GameState) {
        self.fit(&fit_points(state));
    }

    /// Index of the history vector under `screen`, if any
    pub fn pick_vector(&self, history: &[VectorRecord], screen: Vec2) -> Option<usize> {
        history.iter().position(|r| {
            let start = self.world_to_screen(r.start);
            let end = self.world_to_screen(r.end());
            segment_distance(screen, start, end)
                .is_some_and(|d| d < VECTOR_PICK_TOLERANCE)
        })
    }
}

/// Distance from `p` to segment `a`-`b`; None for a degenerate segment
fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> Option<f32> {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return None;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    Some(p.distance(a + ab * t))
}

/// Points that auto-fit keeps on screen
pub fn fit_points(state: &GameState) -> Vec<Vec2> {
    let level = state.level();
    let mut points = vec![Vec2::ZERO, state.player];

    points.extend(state.objects.iter().filter(|o| !o.collected).map(|o| o.pos));
    for record in &state.history {
        points.push(record.start);
        points.push(record.end());
    }
    for visual in &level.static_visuals {
        points.push(visual.pos);
        points.extend(visual.end());
    }
    if level.mechanics.has_monster {
        points.extend(state.monster().map(|m| m.pos));
    }
    points
}
