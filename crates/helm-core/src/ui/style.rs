// src/ui/style.rs
//! Widget styling: fills, outlines, and text sizes

use embedded_graphics::mono_font::{MonoFont, ascii::FONT_6X10};
use embedded_graphics::pixelcolor::{Rgb565, RgbColor, WebColors};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, PrimitiveStyleBuilder};

/// Background color behind every screen.
pub const SCREEN_BACKGROUND: Rgb565 = Rgb565::BLACK;
/// Fill color of the title banner.
pub const BANNER_FILL: Rgb565 = Rgb565::CSS_DARK_BLUE;
/// Outline color of the title banner.
pub const BANNER_OUTLINE: Rgb565 = Rgb565::WHITE;

/// Text size variants
///
/// Three preset sizes with corresponding embedded-graphics fonts:
/// - `Small`: 5x8 font
/// - `Medium`: 6x10 font (default)
/// - `Large`: 10x20 font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Small,
    Medium,
    Large,
}

impl TextSize {
    pub fn font(&self) -> &'static MonoFont<'static> {
        match self {
            TextSize::Small => &embedded_graphics::mono_font::ascii::FONT_5X8,
            TextSize::Medium => &FONT_6X10,
            TextSize::Large => &embedded_graphics::mono_font::ascii::FONT_10X20,
        }
    }
}

/// Visual style of a widget node.
///
/// Every part is optional except the text color; a widget with no fill,
/// no outline, no image, and no text paints nothing. `pressed_fill` is the
/// fill shown while a button is held down; it falls back to `fill` when
/// unset.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub fill: Option<Rgb565>,
    pub pressed_fill: Option<Rgb565>,
    pub outline: Option<Rgb565>,
    pub text_color: Rgb565,
    pub text_size: TextSize,
}

impl Default for Style {
    fn default() -> Self {
        Self::new()
    }
}

impl Style {
    pub const fn new() -> Self {
        Self {
            fill: None,
            pressed_fill: None,
            outline: None,
            text_color: Rgb565::WHITE,
            text_size: TextSize::Medium,
        }
    }

    pub fn with_fill(mut self, color: Rgb565) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn with_pressed_fill(mut self, color: Rgb565) -> Self {
        self.pressed_fill = Some(color);
        self
    }

    pub fn with_outline(mut self, color: Rgb565) -> Self {
        self.outline = Some(color);
        self
    }

    pub fn with_text_color(mut self, color: Rgb565) -> Self {
        self.text_color = color;
        self
    }

    pub fn with_text_size(mut self, size: TextSize) -> Self {
        self.text_size = size;
        self
    }

    /// Primitive style for the widget rectangle, or `None` when neither a
    /// fill nor an outline is configured.
    pub fn primitive_style(&self, pressed: bool) -> Option<PrimitiveStyle<Rgb565>> {
        let fill = if pressed {
            self.pressed_fill.or(self.fill)
        } else {
            self.fill
        };

        if fill.is_none() && self.outline.is_none() {
            return None;
        }

        let mut builder = PrimitiveStyleBuilder::new();
        if let Some(color) = fill {
            builder = builder.fill_color(color);
        }
        if let Some(color) = self.outline {
            builder = builder.stroke_color(color).stroke_width(1);
        }
        Some(builder.build())
    }
}
