// src/ui/mod.rs
//! UI primitives for the helm control panel
//!
//! This module provides:
//! - Touch points, touch events, and screen identifiers
//! - Widget styling (fills, outlines, text sizes)
//! - The arena-based widget tree with hit-testing and painting

pub mod core;
pub mod style;
pub mod tree;

// Re-export commonly used items
pub use self::core::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, ScreenId, TouchEvent, TouchPoint};
pub use self::style::{Style, TextSize};
pub use self::tree::{
    ActivateHandler, ImagePair, NodeId, TreeError, WidgetKind, WidgetNode, WidgetTree,
};
