use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_RESIZE_TOLERANCE: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: String,
    pub width: f32,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
}

/// Pointer-to-stroke recorder backing the drawing canvas.
///
/// Input is only accepted while the recorder is active, which the host
/// ties to the `Drawing` phase.
#[derive(Debug, Clone)]
pub struct StrokeRecorder {
    strokes: Vec<Stroke>,
    current: Option<Stroke>,
    active: bool,
    color: String,
    width: f32,
    size: (u32, u32),
    resize_tolerance: u32,
}

impl Default for StrokeRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_RESIZE_TOLERANCE)
    }
}

impl StrokeRecorder {
    pub fn new(resize_tolerance: u32) -> Self {
        Self {
            strokes: Vec::new(),
            current: None,
            active: false,
            color: "#000000".to_string(),
            width: 4.0,
            size: (0, 0),
            resize_tolerance,
        }
    }

    /// Deactivating commits any stroke still in progress
    pub fn set_active(&mut self, active: bool) {
        if !active {
            self.finish_stroke();
        }
        self.active = active;
    }

    pub fn set_brush(&mut self, color: impl Into<String>, width: f32) {
        self.color = color.into();
        self.width = width.max(0.5);
    }

    /// Returns whether the event was recorded
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        if !self.active {
            return false;
        }

        match event {
            PointerEvent::Down { x, y } => {
                self.finish_stroke();
                self.current = Some(Stroke {
                    color: self.color.clone(),
                    width: self.width,
                    points: vec![Point { x, y }],
                });
                true
            }
            PointerEvent::Move { x, y } => match &mut self.current {
                Some(stroke) => {
                    stroke.points.push(Point { x, y });
                    true
                }
                None => false,
            },
            PointerEvent::Up => {
                let had_stroke = self.current.is_some();
                self.finish_stroke();
                had_stroke
            }
        }
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// In-progress stroke, if the pointer is down
    pub fn current(&self) -> Option<&Stroke> {
        self.current.as_ref()
    }

    pub fn is_blank(&self) -> bool {
        self.strokes.is_empty() && self.current.is_none()
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.current = None;
    }

    /// Track a new surface size. Drawings survive a change of at most
    /// `resize_tolerance` pixels on each axis and are cleared otherwise.
    /// Returns whether content was kept.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let (old_width, old_height) = self.size;
        self.size = (width, height);

        if old_width == 0 && old_height == 0 {
            return true;
        }

        let keep = old_width.abs_diff(width) <= self.resize_tolerance
            && old_height.abs_diff(height) <= self.resize_tolerance;
        if !keep {
            debug!(
                "Canvas resized {}x{} -> {}x{}, clearing",
                old_width, old_height, width, height
            );
            self.clear();
        }
        keep
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    fn finish_stroke(&mut self) {
        if let Some(stroke) = self.current.take() {
            self.strokes.push(stroke);
        }
    }
}
