// src/ui/tree.rs
//! Arena-based widget tree with hit-testing and painting.
//!
//! Nodes live in a fixed-capacity arena and refer to each other through
//! copyable [`NodeId`] handles, so parent back-references never form
//! ownership cycles. One tree holds the widgets of exactly one screen;
//! it is cleared and rebuilt on every screen entry.
//!
//! Hit-testing policy: depth-first, first-added child wins. Children are
//! visited in insertion order and the first subtree that produces a hit
//! short-circuits its later siblings; a node's own bounds are only
//! considered after all of its children miss. Child bounds are not
//! required to lie inside their parent's bounds.

use alloc::boxed::Box;

use embedded_graphics::image::{Image, ImageRawBE};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Alignment, Text};
use heapless::Vec;
use log::debug;
use thiserror_no_std::Error;

use crate::screen_state::ScreenState;
use crate::ui::core::TouchPoint;
use crate::ui::style::Style;

/// Maximum number of nodes per screen.
pub const MAX_WIDGETS: usize = 16;
/// Maximum number of children per node.
pub const MAX_CHILDREN: usize = 12;
/// Maximum label length in characters.
pub const MAX_LABEL_LEN: usize = 32;

/// Handle to a node in a [`WidgetTree`].
///
/// Handles are only valid for the tree that produced them and are
/// invalidated by [`WidgetTree::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

impl NodeId {
    fn index(self) -> usize {
        self.0
    }
}

/// Activation handler invoked when a widget is tapped.
///
/// The dispatcher lends its mutable screen-state handle into the handler,
/// so screen navigation stays confined to dispatch context.
pub type ActivateHandler = Box<dyn FnMut(&mut ScreenState)>;

/// Widget kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    /// Grouping node; the root of every screen is a container.
    Container,
    /// Interactive node with a pressed visual state.
    Button,
    /// Static framed text.
    Label,
}

/// Normal/pressed sprite pair for image buttons.
#[derive(Debug, Clone, Copy)]
pub struct ImagePair {
    pub normal: ImageRawBE<'static, Rgb565>,
    pub pressed: ImageRawBE<'static, Rgb565>,
}

/// Errors from widget tree construction.
///
/// All of these are programming-contract violations surfaced while a
/// screen is being built, never during event pumping.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("widget arena is full")]
    ArenaFull,
    #[error("node is already attached to a parent")]
    AlreadyAttached,
    #[error("parent cannot hold more children")]
    TooManyChildren,
    #[error("tree already has a root")]
    RootAlreadySet,
}

/// A single visual element of a screen.
pub struct WidgetNode {
    kind: WidgetKind,
    bounds: Rectangle,
    style: Style,
    text: heapless::String<MAX_LABEL_LEN>,
    images: Option<ImagePair>,
    parent: Option<NodeId>,
    children: Vec<NodeId, MAX_CHILDREN>,
    on_activate: Option<ActivateHandler>,
    pressed: bool,
    dirty: bool,
}

impl WidgetNode {
    fn new(kind: WidgetKind, bounds: Rectangle, text: &str) -> Self {
        let mut label = heapless::String::new();
        label.push_str(text).ok();

        Self {
            kind,
            bounds,
            style: Style::new(),
            text: label,
            images: None,
            parent: None,
            children: Vec::new(),
            on_activate: None,
            pressed: false,
            dirty: true,
        }
    }

    pub fn container(bounds: Rectangle) -> Self {
        Self::new(WidgetKind::Container, bounds, "")
    }

    pub fn button(bounds: Rectangle, label: &str) -> Self {
        Self::new(WidgetKind::Button, bounds, label)
    }

    pub fn label(bounds: Rectangle, text: &str) -> Self {
        Self::new(WidgetKind::Label, bounds, text)
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_images(mut self, images: ImagePair) -> Self {
        self.images = Some(images);
        self
    }

    pub fn on_activate(mut self, handler: ActivateHandler) -> Self {
        self.on_activate = Some(handler);
        self
    }
}

/// The widget tree of the active screen.
#[derive(Default)]
pub struct WidgetTree {
    nodes: Vec<WidgetNode, MAX_WIDGETS>,
    root: Option<NodeId>,
}

impl WidgetTree {
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Remove every node. Outstanding [`NodeId`]s become invalid.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Add a detached node to the arena.
    pub fn insert(&mut self, node: WidgetNode) -> Result<NodeId, TreeError> {
        self.nodes.push(node).map_err(|_| TreeError::ArenaFull)?;
        Ok(NodeId(self.nodes.len() - 1))
    }

    /// Install `node` as the single root of the tree.
    pub fn set_root(&mut self, node: WidgetNode) -> Result<NodeId, TreeError> {
        if self.root.is_some() {
            return Err(TreeError::RootAlreadySet);
        }
        let id = self.insert(node)?;
        self.root = Some(id);
        Ok(id)
    }

    /// Link an already-inserted node under `parent`.
    ///
    /// Fails if `child` already has a parent (nodes appear exactly once in
    /// exactly one child list) or is the root.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if self.nodes[child.index()].parent.is_some() || self.root == Some(child) {
            return Err(TreeError::AlreadyAttached);
        }
        self.nodes[parent.index()]
            .children
            .push(child)
            .map_err(|_| TreeError::TooManyChildren)?;
        self.nodes[child.index()].parent = Some(parent);
        Ok(())
    }

    /// Insert `node` and attach it under `parent` in one step.
    pub fn add_child(&mut self, parent: NodeId, node: WidgetNode) -> Result<NodeId, TreeError> {
        let id = self.insert(node)?;
        self.attach(parent, id)?;
        Ok(id)
    }

    pub fn kind(&self, id: NodeId) -> WidgetKind {
        self.nodes[id.index()].kind
    }

    pub fn bounds(&self, id: NodeId) -> Rectangle {
        self.nodes[id.index()].bounds
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn is_pressed(&self, id: NodeId) -> bool {
        self.nodes.get(id.index()).is_some_and(|n| n.pressed)
    }

    /// Whether `id`'s own bounds contain `at`.
    pub fn node_contains(&self, id: NodeId, at: TouchPoint) -> bool {
        self.nodes
            .get(id.index())
            .is_some_and(|n| n.bounds.contains(at.to_point()))
    }

    /// Flip a button's pressed visual. No-op for other kinds.
    pub fn set_pressed(&mut self, id: NodeId, pressed: bool) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            if node.kind == WidgetKind::Button && node.pressed != pressed {
                node.pressed = pressed;
                node.dirty = true;
            }
        }
    }

    /// Invoke `id`'s activation handler, if any. Returns whether one ran.
    pub fn activate(&mut self, id: NodeId, screens: &mut ScreenState) -> bool {
        let Some(node) = self.nodes.get_mut(id.index()) else {
            return false;
        };
        let Some(handler) = node.on_activate.as_mut() else {
            return false;
        };
        debug!("activating {:?} node {:?}", node.kind, id);
        handler(screens);
        true
    }

    /// Deepest node containing `at`, or `None`.
    ///
    /// See the module docs for the sibling tie-break policy.
    pub fn hit_test(&self, at: TouchPoint) -> Option<NodeId> {
        self.root.and_then(|root| self.hit_node(root, at))
    }

    fn hit_node(&self, id: NodeId, at: TouchPoint) -> Option<NodeId> {
        let node = &self.nodes[id.index()];
        for &child in node.children.iter() {
            if let Some(hit) = self.hit_node(child, at) {
                return Some(hit);
            }
        }
        node.bounds.contains(at.to_point()).then_some(id)
    }

    pub fn is_dirty(&self) -> bool {
        self.nodes.iter().any(|n| n.dirty)
    }

    pub fn mark_clean(&mut self) {
        for node in self.nodes.iter_mut() {
            node.dirty = false;
        }
    }

    /// Draw the whole tree, parents before children.
    ///
    /// Idempotent: repeated calls with no state change produce the same
    /// output. Pair with [`WidgetTree::mark_clean`] after a successful
    /// draw.
    pub fn paint<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        match self.root {
            Some(root) => self.paint_node(root, display),
            None => Ok(()),
        }
    }

    /// Redraw only subtrees whose root node is marked dirty.
    pub fn paint_dirty<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        match self.root {
            Some(root) => self.paint_dirty_node(root, display),
            None => Ok(()),
        }
    }

    fn paint_dirty_node<D: DrawTarget<Color = Rgb565>>(
        &self,
        id: NodeId,
        display: &mut D,
    ) -> Result<(), D::Error> {
        if self.nodes[id.index()].dirty {
            return self.paint_node(id, display);
        }
        for &child in self.nodes[id.index()].children.iter() {
            self.paint_dirty_node(child, display)?;
        }
        Ok(())
    }

    fn paint_node<D: DrawTarget<Color = Rgb565>>(
        &self,
        id: NodeId,
        display: &mut D,
    ) -> Result<(), D::Error> {
        let node = &self.nodes[id.index()];

        if let Some(style) = node.style.primitive_style(node.pressed) {
            node.bounds.into_styled(style).draw(display)?;
        }

        if let Some(images) = &node.images {
            let raw = if node.pressed {
                &images.pressed
            } else {
                &images.normal
            };
            Image::new(raw, node.bounds.top_left).draw(display)?;
        }

        if !node.text.is_empty() {
            let text_style = MonoTextStyle::new(node.style.text_size.font(), node.style.text_color);
            Text::with_alignment(
                &node.text,
                node.bounds.center(),
                text_style,
                Alignment::Center,
            )
            .draw(display)?;
        }

        for &child in node.children.iter() {
            self.paint_node(child, display)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::core::ScreenId;
    use embedded_graphics::mock_display::MockDisplay;

    fn rect(x: i32, y: i32, w: u32, h: u32) -> Rectangle {
        Rectangle::new(Point::new(x, y), Size::new(w, h))
    }

    fn tree_with_root() -> (WidgetTree, NodeId) {
        let mut tree = WidgetTree::new();
        let root = tree.set_root(WidgetNode::container(rect(0, 0, 64, 64))).unwrap();
        (tree, root)
    }

    #[test]
    fn attach_rejects_reparenting() {
        let (mut tree, root) = tree_with_root();
        let a = tree.add_child(root, WidgetNode::container(rect(0, 0, 10, 10))).unwrap();
        let b = tree
            .insert(WidgetNode::button(rect(0, 0, 10, 10), "b"))
            .unwrap();

        tree.attach(a, b).unwrap();
        assert_eq!(tree.attach(root, b), Err(TreeError::AlreadyAttached));
        assert_eq!(tree.attach(a, root), Err(TreeError::AlreadyAttached));
        assert_eq!(tree.parent(b), Some(a));
        assert_eq!(tree.children(a), &[b]);
    }

    #[test]
    fn only_one_root() {
        let (mut tree, _) = tree_with_root();
        assert_eq!(
            tree.set_root(WidgetNode::container(rect(0, 0, 8, 8))),
            Err(TreeError::RootAlreadySet)
        );
    }

    #[test]
    fn arena_capacity_is_enforced() {
        let (mut tree, root) = tree_with_root();
        for _ in 0..MAX_WIDGETS - 1 {
            tree.insert(WidgetNode::container(rect(0, 0, 1, 1))).unwrap();
        }
        assert_eq!(
            tree.add_child(root, WidgetNode::container(rect(0, 0, 1, 1))),
            Err(TreeError::ArenaFull)
        );
    }

    #[test]
    fn hit_test_prefers_innermost_node() {
        let (mut tree, root) = tree_with_root();
        let panel = tree
            .add_child(root, WidgetNode::container(rect(10, 10, 40, 40)))
            .unwrap();
        let button = tree
            .add_child(panel, WidgetNode::button(rect(20, 20, 10, 10), "x"))
            .unwrap();

        assert_eq!(tree.hit_test(TouchPoint::new(25, 25)), Some(button));
        assert_eq!(tree.hit_test(TouchPoint::new(12, 12)), Some(panel));
        assert_eq!(tree.hit_test(TouchPoint::new(2, 2)), Some(root));
        assert_eq!(tree.hit_test(TouchPoint::new(200, 200)), None);
    }

    #[test]
    fn overlapping_siblings_resolve_first_added() {
        let (mut tree, root) = tree_with_root();
        let first = tree
            .add_child(root, WidgetNode::button(rect(10, 10, 20, 20), "a"))
            .unwrap();
        let _second = tree
            .add_child(root, WidgetNode::button(rect(10, 10, 20, 20), "b"))
            .unwrap();

        assert_eq!(tree.hit_test(TouchPoint::new(15, 15)), Some(first));
    }

    #[test]
    fn hit_test_is_deterministic() {
        let (mut tree, root) = tree_with_root();
        tree.add_child(root, WidgetNode::button(rect(5, 5, 30, 30), "a"))
            .unwrap();

        let at = TouchPoint::new(10, 10);
        let first = tree.hit_test(at);
        assert_eq!(tree.hit_test(at), first);
        assert_eq!(tree.hit_test(at), first);
    }

    #[test]
    fn child_may_extend_outside_parent_bounds() {
        let (mut tree, root) = tree_with_root();
        let panel = tree
            .add_child(root, WidgetNode::container(rect(0, 0, 10, 10)))
            .unwrap();
        let wide = tree
            .add_child(panel, WidgetNode::button(rect(30, 30, 20, 20), "w"))
            .unwrap();

        // The child is hittable even though it lies outside its parent.
        assert_eq!(tree.hit_test(TouchPoint::new(35, 35)), Some(wide));
    }

    #[test]
    fn activation_runs_handler_with_screen_state() {
        let (mut tree, root) = tree_with_root();
        let button = tree
            .add_child(
                root,
                WidgetNode::button(rect(0, 0, 10, 10), "go")
                    .on_activate(Box::new(|s: &mut ScreenState| s.set(ScreenId::Second))),
            )
            .unwrap();

        let mut screens = ScreenState::new(ScreenId::Home);
        assert!(tree.activate(button, &mut screens));
        assert_eq!(screens.get(), ScreenId::Second);

        // Nodes without a handler report no activation.
        assert!(!tree.activate(root, &mut screens));
    }

    #[test]
    fn pressed_visual_only_applies_to_buttons() {
        let (mut tree, root) = tree_with_root();
        let button = tree
            .add_child(root, WidgetNode::button(rect(0, 0, 10, 10), "b"))
            .unwrap();
        tree.mark_clean();

        tree.set_pressed(button, true);
        assert!(tree.is_pressed(button));
        assert!(tree.is_dirty());

        tree.set_pressed(root, true);
        assert!(!tree.is_pressed(root));
    }

    #[test]
    fn paint_is_idempotent() {
        let (mut tree, root) = tree_with_root();
        tree.add_child(
            root,
            WidgetNode::button(rect(8, 8, 20, 12), "ok").with_style(
                Style::new()
                    .with_fill(Rgb565::BLUE)
                    .with_outline(Rgb565::WHITE),
            ),
        )
        .unwrap();

        let mut first = MockDisplay::<Rgb565>::new();
        first.set_allow_overdraw(true);
        tree.paint(&mut first).unwrap();

        let mut second = MockDisplay::<Rgb565>::new();
        second.set_allow_overdraw(true);
        tree.paint(&mut second).unwrap();
        tree.paint(&mut second).unwrap();

        first.assert_eq(&second);
    }

    #[test]
    fn paint_dirty_skips_clean_subtrees() {
        let (mut tree, root) = tree_with_root();
        let button = tree
            .add_child(
                root,
                WidgetNode::button(rect(4, 4, 12, 8), "b")
                    .with_style(Style::new().with_fill(Rgb565::RED)),
            )
            .unwrap();
        tree.mark_clean();

        // Nothing dirty: nothing painted.
        let mut display = MockDisplay::<Rgb565>::new();
        tree.paint_dirty(&mut display).unwrap();
        display.assert_eq(&MockDisplay::new());

        // Pressing the button repaints only its rectangle.
        tree.set_pressed(button, true);
        let mut display = MockDisplay::<Rgb565>::new();
        display.set_allow_overdraw(true);
        tree.paint_dirty(&mut display).unwrap();
        let mut expected = MockDisplay::<Rgb565>::new();
        expected.set_allow_overdraw(true);
        tree.paint_node(button, &mut expected).unwrap();
        display.assert_eq(&expected);
    }
}
