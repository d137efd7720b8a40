// src/screens/home.rs
//! The home screen: drive control panel.
//!
//! Layout (320x240 panel): a title banner across the top 24 rows, a dark
//! content container below it holding the Next navigation button, the
//! +/- adjustment buttons, and the framed readout labels for weather
//! classification, motor speed, current, temperature, acceleration, and
//! the fault line.

use alloc::boxed::Box;

use embedded_graphics::image::ImageRaw;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::{Rgb565, RgbColor, WebColors};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle};
use embedded_graphics::text::{Alignment, Text};

use crate::screen_manager::ScreenDef;
use crate::screen_state::ScreenState;
use crate::ui::core::ScreenId;
use crate::ui::style::{BANNER_FILL, BANNER_OUTLINE, SCREEN_BACKGROUND, Style, TextSize};
use crate::ui::tree::{ImagePair, NodeId, TreeError, WidgetNode, WidgetTree};

/// Height of the title banner in pixels.
const BANNER_HEIGHT: u32 = 24;

// 50x50 RGB565 (big-endian) sprites for the adjustment buttons.
static ADJUST_SPRITE: &[u8] = include_bytes!("assets/adjust_50x50.raw");
static ADJUST_SPRITE_PRESSED: &[u8] = include_bytes!("assets/adjust_50x50_pressed.raw");

pub fn screen<D: DrawTarget<Color = Rgb565>>() -> ScreenDef<D> {
    ScreenDef {
        id: ScreenId::Home,
        title: "HELM CONTROL PANEL",
        build: build_tree,
        decorate: Some(draw_banner),
    }
}

fn rect(x: i32, y: i32, w: u32, h: u32) -> Rectangle {
    Rectangle::new(Point::new(x, y), Size::new(w, h))
}

fn adjust_images() -> ImagePair {
    ImagePair {
        normal: ImageRaw::new(ADJUST_SPRITE, 50),
        pressed: ImageRaw::new(ADJUST_SPRITE_PRESSED, 50),
    }
}

fn readout_style() -> Style {
    Style::new()
        .with_fill(Rgb565::WHITE)
        .with_outline(Rgb565::RED)
        .with_text_color(Rgb565::BLACK)
}

fn build_tree(tree: &mut WidgetTree) -> Result<NodeId, TreeError> {
    let root = tree.set_root(
        WidgetNode::container(rect(10, 25, 300, 205))
            .with_style(Style::new().with_fill(SCREEN_BACKGROUND)),
    )?;

    tree.add_child(
        root,
        WidgetNode::button(rect(270, 190, 50, 50), "Next")
            .with_style(
                Style::new()
                    .with_fill(Rgb565::BLACK)
                    .with_pressed_fill(Rgb565::CSS_DIM_GRAY)
                    .with_outline(Rgb565::WHITE)
                    .with_text_color(Rgb565::WHITE),
            )
            .on_activate(Box::new(|screens: &mut ScreenState| {
                screens.set(ScreenId::Second)
            })),
    )?;

    let adjust_style = Style::new()
        .with_text_color(Rgb565::CSS_SILVER)
        .with_text_size(TextSize::Large);
    tree.add_child(
        root,
        WidgetNode::button(rect(210, 150, 50, 50), "+")
            .with_style(adjust_style)
            .with_images(adjust_images()),
    )?;
    tree.add_child(
        root,
        WidgetNode::button(rect(60, 150, 50, 50), "-")
            .with_style(adjust_style)
            .with_images(adjust_images()),
    )?;

    for (text, x, y) in [
        ("WEATHER", 85, 40),
        ("MOTOR", 5, 80),
        ("CURRENT", 5, 115),
        ("TEMP", 165, 80),
        ("ACCEL", 165, 115),
        ("Fault:..", 85, 210),
    ] {
        tree.add_child(
            root,
            WidgetNode::label(rect(x, y, 150, 25), text).with_style(readout_style()),
        )?;
    }

    Ok(root)
}

/// Title banner across the top of the display; not part of the widget
/// tree, drawn once per screen entry.
fn draw_banner<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    title: &'static str,
) -> Result<(), D::Error> {
    let width = display.bounding_box().size.width;
    let banner = Rectangle::new(Point::zero(), Size::new(width, BANNER_HEIGHT));

    banner
        .into_styled(
            PrimitiveStyleBuilder::new()
                .fill_color(BANNER_FILL)
                .stroke_color(BANNER_OUTLINE)
                .stroke_width(1)
                .build(),
        )
        .draw(display)?;

    let text_style = MonoTextStyle::new(TextSize::Medium.font(), Rgb565::WHITE);
    Text::with_alignment(
        title,
        Point::new(width as i32 / 2, BANNER_HEIGHT as i32 / 2 + 3),
        text_style,
        Alignment::Center,
    )
    .draw(display)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::core::TouchPoint;
    use crate::ui::tree::WidgetKind;

    #[test]
    fn builds_the_full_panel() {
        let mut tree = WidgetTree::new();
        let root = build_tree(&mut tree).unwrap();

        assert_eq!(tree.root(), Some(root));
        assert_eq!(tree.kind(root), WidgetKind::Container);
        // Next, +, -, and six readout labels.
        assert_eq!(tree.children(root).len(), 9);
        assert_eq!(tree.len(), 10);
    }

    #[test]
    fn next_button_sits_in_the_corner() {
        let mut tree = WidgetTree::new();
        build_tree(&mut tree).unwrap();

        let hit = tree.hit_test(TouchPoint::new(290, 210)).unwrap();
        assert_eq!(tree.kind(hit), WidgetKind::Button);
        assert_eq!(tree.bounds(hit), rect(270, 190, 50, 50));
    }

    #[test]
    fn rebuild_requires_a_cleared_tree() {
        let mut tree = WidgetTree::new();
        build_tree(&mut tree).unwrap();
        assert_eq!(build_tree(&mut tree), Err(TreeError::RootAlreadySet));

        tree.clear();
        build_tree(&mut tree).unwrap();
        assert_eq!(tree.len(), 10);
    }
}
