// src/dispatcher.rs
//! Touch event pump: drains the queue into the active widget tree.
//!
//! Activation semantics follow the usual push-button contract: a widget
//! fires only when the press and the release both land inside its bounds.
//! Dragging off the widget while held cancels the press without firing.

use log::debug;

use crate::events::TouchReceiver;
use crate::screen_state::ScreenState;
use crate::ui::core::TouchEvent;
use crate::ui::tree::{NodeId, WidgetTree};

/// Pumps queued touch events into the widget tree, one per call.
///
/// Holds at most one "pressed candidate": the node hit by the most recent
/// `Press` that has not yet been released or cancelled. The candidate
/// handle is only meaningful for the tree it was produced from; call
/// [`Dispatcher::reset`] whenever the tree is rebuilt.
#[derive(Debug, Default)]
pub struct Dispatcher {
    pressed: Option<NodeId>,
}

impl Dispatcher {
    pub const fn new() -> Self {
        Self { pressed: None }
    }

    /// Forget the pressed candidate (e.g. after a tree rebuild).
    pub fn reset(&mut self) {
        self.pressed = None;
    }

    /// Process at most one queued event.
    ///
    /// Returns `false` without doing any work when the queue is empty, so
    /// the caller can interleave other periodic work. Returns `true`
    /// whenever an event was consumed, whether or not it activated a
    /// widget. Activation handlers run synchronously here, borrowing the
    /// screen state for the duration of the call.
    pub fn pump_once(
        &mut self,
        events: &mut TouchReceiver<'_>,
        tree: &mut WidgetTree,
        screens: &mut ScreenState,
    ) -> bool {
        let Some(event) = events.recv() else {
            return false;
        };

        match event {
            TouchEvent::Press(point) => {
                if let Some(stale) = self.pressed.take() {
                    tree.set_pressed(stale, false);
                }
                let hit = tree.hit_test(point);
                if let Some(id) = hit {
                    debug!("press at ({}, {}) hit {:?}", point.x, point.y, id);
                    tree.set_pressed(id, true);
                }
                self.pressed = hit;
            }
            TouchEvent::Drag(point) => {
                if let Some(id) = self.pressed {
                    if !tree.node_contains(id, point) {
                        debug!("drag left {:?}, press cancelled", id);
                        tree.set_pressed(id, false);
                        self.pressed = None;
                    }
                }
            }
            TouchEvent::Release(point) => {
                if let Some(id) = self.pressed.take() {
                    tree.set_pressed(id, false);
                    if tree.node_contains(id, point) {
                        tree.activate(id, screens);
                    }
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{TouchQueue, split};
    use crate::ui::core::{ScreenId, TouchPoint};
    use crate::ui::tree::WidgetNode;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::Rectangle;

    fn rect(x: i32, y: i32, w: u32, h: u32) -> Rectangle {
        Rectangle::new(Point::new(x, y), Size::new(w, h))
    }

    /// Root container covering the panel with one button spanning
    /// (210, 150) to (260, 200) that navigates to the second screen.
    fn panel_tree() -> (WidgetTree, NodeId) {
        let mut tree = WidgetTree::new();
        let root = tree
            .set_root(WidgetNode::container(rect(0, 0, 320, 240)))
            .unwrap();
        let button = tree
            .add_child(
                root,
                WidgetNode::button(rect(210, 150, 50, 50), "go")
                    .on_activate(Box::new(|s: &mut ScreenState| s.set(ScreenId::Second))),
            )
            .unwrap();
        (tree, button)
    }

    fn down(x: u16, y: u16) -> TouchEvent {
        TouchEvent::Press(TouchPoint::new(x, y))
    }

    fn drag(x: u16, y: u16) -> TouchEvent {
        TouchEvent::Drag(TouchPoint::new(x, y))
    }

    fn up(x: u16, y: u16) -> TouchEvent {
        TouchEvent::Release(TouchPoint::new(x, y))
    }

    fn run(events: &[TouchEvent]) -> (ScreenState, WidgetTree, u32) {
        let mut queue = TouchQueue::new();
        let (mut sender, mut receiver) = split(&mut queue);
        for &event in events {
            assert!(sender.send(event));
        }

        let (mut tree, _) = panel_tree();
        let mut screens = ScreenState::new(ScreenId::Home);
        let mut dispatcher = Dispatcher::new();

        let mut consumed = 0;
        while dispatcher.pump_once(&mut receiver, &mut tree, &mut screens) {
            consumed += 1;
        }
        (screens, tree, consumed)
    }

    #[test]
    fn empty_queue_is_a_non_blocking_no_op() {
        let (screens, _, consumed) = run(&[]);
        assert_eq!(consumed, 0);
        assert_eq!(screens.get(), ScreenId::Home);
    }

    #[test]
    fn matched_down_up_fires() {
        let (screens, _, consumed) = run(&[down(215, 155), up(215, 155)]);
        assert_eq!(screens.get(), ScreenId::Second);
        assert_eq!(consumed, 2);
    }

    #[test]
    fn release_outside_bounds_does_not_fire() {
        let (screens, _, _) = run(&[down(215, 155), up(5, 5)]);
        assert_eq!(screens.get(), ScreenId::Home);
    }

    #[test]
    fn press_outside_bounds_never_fires() {
        let (screens, _, _) = run(&[down(5, 5), up(215, 155)]);
        // The press candidate is the root, which has no handler.
        assert_eq!(screens.get(), ScreenId::Home);
    }

    #[test]
    fn move_out_cancels_even_if_released_inside() {
        let (screens, _, _) = run(&[down(215, 155), drag(5, 5), up(215, 155)]);
        assert_eq!(screens.get(), ScreenId::Home);
    }

    #[test]
    fn drag_within_bounds_keeps_the_press() {
        let (screens, _, _) = run(&[down(215, 155), drag(250, 190), up(250, 190)]);
        assert_eq!(screens.get(), ScreenId::Second);
    }

    #[test]
    fn each_event_is_consumed_exactly_once() {
        let (_, _, consumed) = run(&[down(215, 155), drag(216, 155), up(216, 155)]);
        assert_eq!(consumed, 3);
    }

    #[test]
    fn button_visual_state_follows_the_touch() {
        let mut queue = TouchQueue::new();
        let (mut sender, mut receiver) = split(&mut queue);
        let (mut tree, button) = panel_tree();
        let mut screens = ScreenState::new(ScreenId::Home);
        let mut dispatcher = Dispatcher::new();

        sender.send(down(215, 155));
        dispatcher.pump_once(&mut receiver, &mut tree, &mut screens);
        assert!(tree.is_pressed(button));

        sender.send(up(215, 155));
        dispatcher.pump_once(&mut receiver, &mut tree, &mut screens);
        assert!(!tree.is_pressed(button));
    }

    #[test]
    fn drag_out_resets_button_visual() {
        let mut queue = TouchQueue::new();
        let (mut sender, mut receiver) = split(&mut queue);
        let (mut tree, button) = panel_tree();
        let mut screens = ScreenState::new(ScreenId::Home);
        let mut dispatcher = Dispatcher::new();

        sender.send(down(215, 155));
        sender.send(drag(5, 5));
        dispatcher.pump_once(&mut receiver, &mut tree, &mut screens);
        assert!(tree.is_pressed(button));
        dispatcher.pump_once(&mut receiver, &mut tree, &mut screens);
        assert!(!tree.is_pressed(button));
    }

    #[test]
    fn events_dispatch_in_fifo_order() {
        // An up before the down would never fire; in FIFO order the later
        // matched pair still does.
        let (screens, _, consumed) =
            run(&[up(215, 155), down(215, 155), up(215, 155)]);
        assert_eq!(screens.get(), ScreenId::Second);
        assert_eq!(consumed, 3);
    }
}
