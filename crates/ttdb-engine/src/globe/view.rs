use std::collections::HashMap;
use std::f64::consts::PI;

use ttdb_core::{Coordinate, RecordId};

use super::projector::{center_rotation, project, Projection};
use super::rotation::RotationAnimator;

pub const ZOOM_MIN: f64 = 0.7;
pub const ZOOM_MAX: f64 = 3.5;
pub const ZOOM_STEP: f64 = 1.12;
pub const DEFAULT_ZOOM: f64 = 1.2;

const BASE_RADIUS_SCALE: f64 = 1.18;
const VIEW_PADDING: f64 = 6.0;
const DRAG_SENSITIVITY: f64 = 0.005;
const DRAG_THRESHOLD: f64 = 6.0;
const DRAG_LAT_LIMIT: f64 = PI / 2.0 - 0.05;
const HIT_THRESHOLD: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 520.0,
        }
    }
}

impl Viewport {
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    fn base_radius(&self) -> f64 {
        let base = self.width.min(self.height) / 2.0 - VIEW_PADDING;
        (base * BASE_RADIUS_SCALE).max(10.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct DragState {
    active: bool,
    moved: bool,
    start: (f64, f64),
    last: (f64, f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Click,
    Dragged,
}

// Screen-space view of the coordinate-bearing subgraph: rotation, zoom,
// per-record screen points for hit testing, and drag handling.
#[derive(Debug)]
pub struct GlobeView {
    pub rotation: RotationAnimator,
    pub viewport: Viewport,
    pub invert_drag_y: bool,
    zoom: f64,
    drag: DragState,
    screen_points: HashMap<RecordId, (f64, f64)>,
}

impl Default for GlobeView {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobeView {
    pub fn new() -> Self {
        Self {
            rotation: RotationAnimator::default(),
            viewport: Viewport::default(),
            invert_drag_y: true,
            zoom: DEFAULT_ZOOM,
            drag: DragState::default(),
            screen_points: HashMap::new(),
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, value: f64) -> bool {
        let clamped = value.clamp(ZOOM_MIN, ZOOM_MAX);
        if (clamped - self.zoom).abs() < 1e-4 {
            return false;
        }
        self.zoom = clamped;
        true
    }

    pub fn zoom_step(&mut self, direction: i32) -> bool {
        if direction > 0 {
            self.set_zoom(self.zoom * ZOOM_STEP)
        } else {
            self.set_zoom(self.zoom / ZOOM_STEP)
        }
    }

    pub fn reset_zoom(&mut self) -> bool {
        self.set_zoom(1.0)
    }

    pub fn radius(&self) -> f64 {
        (self.viewport.base_radius() * self.zoom).max(10.0)
    }

    pub fn project(&self, coord: Coordinate) -> Projection {
        project(coord, self.rotation.rot_lat, self.rotation.rot_lon)
    }

    pub fn to_screen(&self, projection: &Projection) -> (f64, f64) {
        let (cx, cy) = self.viewport.center();
        let radius = self.radius();
        (cx + projection.x * radius, cy - projection.y * radius)
    }

    // Recompute screen points for the visible order; only front-facing
    // points are interactive.
    pub fn reproject(&mut self, coords: &HashMap<RecordId, Coordinate>, visible: &[RecordId]) {
        self.screen_points.clear();
        for id in visible {
            let Some(coord) = coords.get(id) else {
                continue;
            };
            let projection = self.project(*coord);
            if !projection.is_front() {
                continue;
            }
            let point = self.to_screen(&projection);
            self.screen_points.insert(id.clone(), point);
        }
    }

    pub fn screen_points(&self) -> &HashMap<RecordId, (f64, f64)> {
        &self.screen_points
    }

    pub fn clear_points(&mut self) {
        self.screen_points.clear();
    }

    pub fn hit_test(&self, x: f64, y: f64) -> Option<RecordId> {
        let mut closest: Option<(&RecordId, f64)> = None;
        for (id, (px, py)) in &self.screen_points {
            let dist = (px - x).hypot(py - y);
            if closest.map_or(true, |(_, best)| dist < best) {
                closest = Some((id, dist));
            }
        }
        match closest {
            Some((id, dist)) if dist <= HIT_THRESHOLD => Some(id.clone()),
            _ => None,
        }
    }

    pub fn nearest_to_center(&self) -> Option<RecordId> {
        let (cx, cy) = self.viewport.center();
        let mut closest: Option<(&RecordId, f64)> = None;
        for (id, (px, py)) in &self.screen_points {
            let dist = (px - cx).hypot(py - cy);
            if closest.map_or(true, |(_, best)| dist < best) {
                closest = Some((id, dist));
            }
        }
        closest.map(|(id, _)| id.clone())
    }

    pub fn center_on(&mut self, coord: Coordinate) {
        let (lat, lon) = center_rotation(coord);
        self.rotation.set_target(lat, lon);
    }

    pub fn begin_drag(&mut self, x: f64, y: f64) {
        self.drag = DragState {
            active: false,
            moved: false,
            start: (x, y),
            last: (x, y),
        };
    }

    // Returns true when the rotation changed; movement below the activation
    // threshold is treated as an eventual click.
    pub fn drag_to(&mut self, x: f64, y: f64) -> bool {
        let (sx, sy) = self.drag.start;
        if !self.drag.active {
            if (x - sx).hypot(y - sy) < DRAG_THRESHOLD {
                return false;
            }
            self.drag.active = true;
        }
        let (lx, ly) = self.drag.last;
        let dx = x - lx;
        let dy = y - ly;
        self.drag.last = (x, y);
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        self.drag.moved = true;

        let invert = if self.invert_drag_y { 1.0 } else { -1.0 };
        let lat = clamp_lat(self.rotation.rot_lat + dy * DRAG_SENSITIVITY * invert);
        let lon = self.rotation.rot_lon + dx * DRAG_SENSITIVITY;
        self.rotation.hold(lat, lon);
        true
    }

    pub fn end_drag(&mut self) -> DragOutcome {
        let dragged = self.drag.active && self.drag.moved;
        self.drag = DragState::default();
        if dragged {
            DragOutcome::Dragged
        } else {
            DragOutcome::Click
        }
    }

    // Graticule polylines (meridians every 30 degrees, parallels every 30
    // degrees), broken into visible segments for the renderer.
    pub fn graticule(&self) -> Vec<Vec<(f64, f64)>> {
        let mut lines = Vec::new();
        for lon in (-150..180).step_by(30) {
            let samples = (-90..=90).step_by(6).map(|lat| (lat as f64, lon as f64));
            self.visible_segments(samples, &mut lines);
        }
        for lat in (-60..90).step_by(30) {
            let samples = (-180..=180).step_by(6).map(|lon| (lat as f64, lon as f64));
            self.visible_segments(samples, &mut lines);
        }
        lines
    }

    fn visible_segments(
        &self,
        samples: impl Iterator<Item = (f64, f64)>,
        lines: &mut Vec<Vec<(f64, f64)>>,
    ) {
        let mut segment = Vec::new();
        for (lat, lon) in samples {
            let projection = self.project(Coordinate {
                lat,
                lon,
                depth: 0.0,
            });
            if projection.is_front() {
                segment.push(self.to_screen(&projection));
                continue;
            }
            if segment.len() >= 2 {
                lines.push(std::mem::take(&mut segment));
            } else {
                segment.clear();
            }
        }
        if segment.len() >= 2 {
            lines.push(segment);
        }
    }
}

fn clamp_lat(value: f64) -> f64 {
    value.clamp(-DRAG_LAT_LIMIT, DRAG_LAT_LIMIT)
}
