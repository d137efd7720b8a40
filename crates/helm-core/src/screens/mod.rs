// src/screens/mod.rs
//! Concrete screens of the control panel.

pub mod home;
pub mod second;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::screen_manager::ScreenManager;

/// Register every screen with the manager.
pub fn register_all<D: DrawTarget<Color = Rgb565>>(manager: &mut ScreenManager<D>) {
    manager.register(home::screen());
    manager.register(second::screen());
}
