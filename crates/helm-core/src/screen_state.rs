// src/screen_state.rs
//! The single authoritative "current screen" value.

use log::debug;

use crate::ui::core::ScreenId;

/// Which screen the panel is showing.
///
/// Owned by the [`ScreenManager`](crate::screen_manager::ScreenManager) and
/// lent mutably only into activation handlers via the dispatcher. Both the
/// writers (handlers) and the reader (the render loop's exit check) run in
/// the consumer context, so no cross-context synchronization is involved;
/// keep it that way when adding writers.
#[derive(Debug)]
pub struct ScreenState {
    current: ScreenId,
}

impl ScreenState {
    pub const fn new(initial: ScreenId) -> Self {
        Self { current: initial }
    }

    pub fn get(&self) -> ScreenId {
        self.current
    }

    pub fn set(&mut self, id: ScreenId) {
        if id != self.current {
            debug!("screen {:?} -> {:?}", self.current, id);
        }
        self.current = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_exactly_one_screen() {
        let mut screens = ScreenState::new(ScreenId::Home);
        assert_eq!(screens.get(), ScreenId::Home);

        screens.set(ScreenId::Second);
        assert_eq!(screens.get(), ScreenId::Second);

        screens.set(ScreenId::Second);
        assert_eq!(screens.get(), ScreenId::Second);
    }
}
