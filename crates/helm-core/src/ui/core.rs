// src/ui/core.rs
//! Core UI types for the helm control panel

use embedded_graphics::prelude::*;

/// Panel width in pixels.
pub const DISPLAY_WIDTH_PX: u16 = 320;
/// Panel height in pixels.
pub const DISPLAY_HEIGHT_PX: u16 = 240;

/// Represents a 2D touch point on the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchPoint {
    pub x: u16,
    pub y: u16,
}

impl TouchPoint {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    pub fn to_point(self) -> Point {
        Point::new(self.x as i32, self.y as i32)
    }
}

/// Touch events that can occur on the panel
///
/// One event per phase of a touch interaction: finger down, finger moved
/// while down, finger lifted. `Release` carries the last reported position
/// since capacitive controllers stop reporting coordinates on lift-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEvent {
    /// Initial touch press at a point
    Press(TouchPoint),
    /// Touch drag to a new point
    Drag(TouchPoint),
    /// Touch released, with the last known point
    Release(TouchPoint),
}

impl TouchEvent {
    pub fn point(self) -> TouchPoint {
        match self {
            TouchEvent::Press(p) | TouchEvent::Drag(p) | TouchEvent::Release(p) => p,
        }
    }
}

/// Screen identifier for navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenId {
    /// The control panel screen shown at startup.
    Home,
    /// The second page, a placeholder for upcoming status views.
    Second,
}
