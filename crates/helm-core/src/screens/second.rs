// src/screens/second.rs
//! The second page: an empty placeholder for upcoming status views.
//!
//! Matches the shipped behavior of the panel: the page presents a blank
//! surface and pumps input, and nothing on it navigates back yet.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::screen_manager::ScreenDef;
use crate::ui::core::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, ScreenId};
use crate::ui::style::{SCREEN_BACKGROUND, Style};
use crate::ui::tree::{NodeId, TreeError, WidgetNode, WidgetTree};

pub fn screen<D: DrawTarget<Color = Rgb565>>() -> ScreenDef<D> {
    ScreenDef {
        id: ScreenId::Second,
        title: "SECOND PAGE",
        build: build_tree,
        decorate: None,
    }
}

fn build_tree(tree: &mut WidgetTree) -> Result<NodeId, TreeError> {
    tree.set_root(
        WidgetNode::container(Rectangle::new(
            Point::zero(),
            Size::new(DISPLAY_WIDTH_PX as u32, DISPLAY_HEIGHT_PX as u32),
        ))
        .with_style(Style::new().with_fill(SCREEN_BACKGROUND)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::core::TouchPoint;

    #[test]
    fn second_page_is_an_empty_root() {
        let mut tree = WidgetTree::new();
        let root = build_tree(&mut tree).unwrap();

        assert_eq!(tree.len(), 1);
        assert!(tree.children(root).is_empty());
        // Everything on the panel hits the root itself.
        assert_eq!(tree.hit_test(TouchPoint::new(160, 120)), Some(root));
    }
}
