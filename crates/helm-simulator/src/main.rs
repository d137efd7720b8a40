//! Desktop simulator for the helm-rs touchscreen control panel.
//!
//! Renders the helm-core screens in an SDL2 window via
//! `embedded-graphics-simulator` and forwards mouse input as touch
//! events, so the identical render loop and dispatcher run end-to-end
//! without hardware. Press Q or Escape (or close the window) to quit.

use std::thread;
use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::info;

use helm_core::events::{self, TouchQueue};
use helm_core::screen_manager::ScreenManager;
use helm_core::screens;
use helm_core::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, ScreenId, TouchEvent, TouchPoint};

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 2;

/// Target frame duration (~60 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Render-loop ticks per frame; lets a queued tap drain within a frame.
const TICKS_PER_FRAME: u32 = 8;

fn to_touch(point: Point) -> TouchPoint {
    TouchPoint::new(point.x.max(0) as u16, point.y.max(0) as u16)
}

fn main() {
    env_logger::init();
    info!("Starting helm-rs simulator");
    info!(
        "Display: {}x{} (scale {}x)",
        DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX, WINDOW_SCALE
    );

    let display = SimulatorDisplay::<Rgb565>::new(Size::new(
        DISPLAY_WIDTH_PX as u32,
        DISPLAY_HEIGHT_PX as u32,
    ));

    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Helm Simulator", &output_settings);

    let mut queue = TouchQueue::new();
    let (mut sender, mut receiver) = events::split(&mut queue);

    let mut manager = ScreenManager::new(display, ScreenId::Home);
    screens::register_all(&mut manager);

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    window.update(manager.display());

    let mut mouse_down = false;

    'running: loop {
        let frame_start = Instant::now();

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, .. } => {
                    if keycode == Keycode::Q || keycode == Keycode::Escape {
                        break 'running;
                    }
                }

                SimulatorEvent::MouseButtonDown { point, .. } => {
                    mouse_down = true;
                    sender.send(TouchEvent::Press(to_touch(point)));
                }

                SimulatorEvent::MouseMove { point } => {
                    if mouse_down {
                        sender.send(TouchEvent::Drag(to_touch(point)));
                    }
                }

                SimulatorEvent::MouseButtonUp { point, .. } => {
                    mouse_down = false;
                    sender.send(TouchEvent::Release(to_touch(point)));
                }

                _ => {}
            }
        }

        for _ in 0..TICKS_PER_FRAME {
            // SimulatorDisplay cannot fail to draw.
            let _ = manager.tick(&mut receiver);
        }

        window.update(manager.display());

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    info!("Simulator exiting");
}
