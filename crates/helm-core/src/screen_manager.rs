// src/screen_manager.rs
//! Per-screen render loop and top-level screen selector.
//!
//! The manager owns the display, the screen state, the active widget
//! tree, and the dispatcher, and drives a small state machine for the
//! screen being served:
//!
//! ```text
//! Building -> Drawn -> Pumping -> Exiting -> Building (next screen)
//! ```
//!
//! [`ScreenManager::tick`] performs exactly one bounded step of that
//! machine and returns, so the caller decides how to interleave it with
//! the rest of the system (a timer-paced embassy loop on hardware, frame
//! pacing in the simulator). The touch producer is never starved because
//! a tick never spins.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use heapless::Vec;
use log::{debug, error, warn};

use crate::dispatcher::Dispatcher;
use crate::events::TouchReceiver;
use crate::screen_state::ScreenState;
use crate::ui::core::ScreenId;
use crate::ui::style::SCREEN_BACKGROUND;
use crate::ui::tree::{NodeId, TreeError, WidgetTree};

/// Maximum number of registered screens.
pub const MAX_SCREENS: usize = 8;

/// Render loop state for the screen currently being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Rebuilding the screen's widget tree.
    Building,
    /// One-time full-surface draw of decoration and tree.
    Drawn,
    /// Draining the touch queue, watching for a screen change.
    Pumping,
    /// Screen change observed; the selector picks the next screen.
    Exiting,
}

/// A registered screen: identity plus how to build and decorate it.
///
/// `build` constructs the widget tree from scratch; it runs on every
/// entry, which keeps activation behavior identical across rebuilds.
/// `decorate` draws static chrome (such as the title banner) that is not
/// part of the widget tree.
pub struct ScreenDef<D: DrawTarget<Color = Rgb565>> {
    pub id: ScreenId,
    pub title: &'static str,
    pub build: fn(&mut WidgetTree) -> Result<NodeId, TreeError>,
    pub decorate: Option<fn(&mut D, &'static str) -> Result<(), D::Error>>,
}

/// Owns the display and serves one screen at a time.
pub struct ScreenManager<D: DrawTarget<Color = Rgb565>> {
    display: D,
    screens: ScreenState,
    tree: WidgetTree,
    dispatcher: Dispatcher,
    defs: Vec<ScreenDef<D>, MAX_SCREENS>,
    serving: ScreenId,
    state: LoopState,
    missing_warned: Option<ScreenId>,
}

impl<D: DrawTarget<Color = Rgb565>> ScreenManager<D> {
    pub fn new(display: D, initial: ScreenId) -> Self {
        Self {
            display,
            screens: ScreenState::new(initial),
            tree: WidgetTree::new(),
            dispatcher: Dispatcher::new(),
            defs: Vec::new(),
            serving: initial,
            state: LoopState::Building,
            missing_warned: None,
        }
    }

    /// Register a screen definition.
    pub fn register(&mut self, def: ScreenDef<D>) {
        debug!("registered screen {:?} ({})", def.id, def.title);
        if self.defs.push(def).is_err() {
            warn!("screen registry full, definition dropped");
        }
    }

    /// The screen the state machine is currently serving.
    pub fn current_screen(&self) -> ScreenId {
        self.screens.get()
    }

    pub fn loop_state(&self) -> LoopState {
        self.state
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Advance the render loop by one bounded step.
    ///
    /// Errors are draw failures from the display; the state machine is
    /// left where it was so the caller may retry the tick.
    pub fn tick(&mut self, events: &mut TouchReceiver<'_>) -> Result<LoopState, D::Error> {
        match self.state {
            LoopState::Building => self.build(),
            LoopState::Drawn => self.draw()?,
            LoopState::Pumping => self.pump(events)?,
            LoopState::Exiting => {
                self.serving = self.screens.get();
                self.state = LoopState::Building;
            }
        }
        Ok(self.state)
    }

    fn find(&self, id: ScreenId) -> Option<&ScreenDef<D>> {
        self.defs.iter().find(|d| d.id == id)
    }

    fn build(&mut self) {
        // Re-read the state so an idle wait on an unregistered screen can
        // still be redirected by a later write.
        self.serving = self.screens.get();

        let Some(def) = self.find(self.serving) else {
            if self.missing_warned != Some(self.serving) {
                warn!("no screen registered for {:?}, idling", self.serving);
                self.missing_warned = Some(self.serving);
            }
            return;
        };
        let build = def.build;

        self.missing_warned = None;
        self.dispatcher.reset();
        self.tree.clear();
        debug!("building screen {:?}", self.serving);
        if let Err(e) = build(&mut self.tree) {
            error!("failed to build screen {:?}: {}", self.serving, e);
        }
        self.state = LoopState::Drawn;
    }

    fn draw(&mut self) -> Result<(), D::Error> {
        self.display.clear(SCREEN_BACKGROUND)?;
        if let Some(def) = self.defs.iter().find(|d| d.id == self.serving) {
            if let Some(decorate) = def.decorate {
                decorate(&mut self.display, def.title)?;
            }
        }
        self.tree.paint(&mut self.display)?;
        self.tree.mark_clean();
        self.state = LoopState::Pumping;
        Ok(())
    }

    fn pump(&mut self, events: &mut TouchReceiver<'_>) -> Result<(), D::Error> {
        self.dispatcher
            .pump_once(events, &mut self.tree, &mut self.screens);

        if self.screens.get() != self.serving {
            debug!("leaving {:?} for {:?}", self.serving, self.screens.get());
            self.state = LoopState::Exiting;
            return Ok(());
        }

        if self.tree.is_dirty() {
            self.tree.paint_dirty(&mut self.display)?;
            self.tree.mark_clean();
        }
        Ok(())
    }

    #[cfg(test)]
    fn screens_mut(&mut self) -> &mut ScreenState {
        &mut self.screens
    }
}
