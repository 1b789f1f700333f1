// src/input.rs

use crate::canvas::CanvasSize;
use crate::geometry::Vec2;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// The named buttons the editor reacts to.
    ///
    /// With serde these serialize as flag names joined by `|`, e.g.
    /// `"PRIMARY | EYE_DROPPER"`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Buttons: u16 {
        const PRIMARY = 1 << 0;
        const SECONDARY = 1 << 1;
        const SAVE = 1 << 2;
        const RESET = 1 << 3;
        const ERASER = 1 << 4;
        const QUICK_SWITCH = 1 << 5;
        const EYE_DROPPER = 1 << 6;
        const SIZE_32 = 1 << 7;
        const SIZE_64 = 1 << 8;
        const SIZE_128 = 1 << 9;
        const SIZE_256 = 1 << 10;
        const SIZE_512 = 1 << 11;
        const SIZE_1024 = 1 << 12;
    }
}

impl Buttons {
    /// The resize button for each canvas size, smallest first.
    pub const SIZES: [(Buttons, CanvasSize); 6] = [
        (Buttons::SIZE_32, CanvasSize::S32),
        (Buttons::SIZE_64, CanvasSize::S64),
        (Buttons::SIZE_128, CanvasSize::S128),
        (Buttons::SIZE_256, CanvasSize::S256),
        (Buttons::SIZE_512, CanvasSize::S512),
        (Buttons::SIZE_1024, CanvasSize::S1024),
    ];
}

/// One frame of input as seen by the editor session.
///
/// `held` is the level state of every button this frame; `tapped` holds the
/// buttons that went down since the previous frame. The session only reads
/// snapshots, the caller builds each one from the last.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub pointer: Vec2,
    pub last_pointer: Vec2,
    pub held: Buttons,
    pub tapped: Buttons,
    /// Wheel direction: positive zooms in, negative zooms out.
    pub scroll: i32,
}

impl InputSnapshot {
    /// A first-frame snapshot: everything held counts as tapped and the
    /// pointer has not moved.
    pub fn first(pointer: Vec2, held: Buttons, scroll: i32) -> Self {
        Self {
            pointer,
            last_pointer: pointer,
            held,
            tapped: held,
            scroll,
        }
    }

    /// Builds the snapshot that follows `self`, deriving tap edges and the
    /// previous pointer position.
    pub fn next(&self, pointer: Vec2, held: Buttons, scroll: i32) -> Self {
        Self {
            pointer,
            last_pointer: self.pointer,
            held,
            tapped: held.difference(self.held),
            scroll,
        }
    }

    pub fn is_held(&self, buttons: Buttons) -> bool {
        self.held.contains(buttons)
    }

    pub fn was_tapped(&self, buttons: Buttons) -> bool {
        self.tapped.contains(buttons)
    }

    /// Pointer movement since the previous frame.
    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer - self.last_pointer
    }

    /// The largest canvas size whose resize button was tapped this frame.
    pub fn requested_size(&self) -> Option<CanvasSize> {
        Buttons::SIZES
            .iter()
            .rev()
            .find(|(button, _)| self.was_tapped(*button))
            .map(|&(_, size)| size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_derives_tap_edges() {
        let first = InputSnapshot::first(Vec2::new(1.0, 2.0), Buttons::PRIMARY, 0);
        assert!(first.was_tapped(Buttons::PRIMARY));

        let second = first.next(Vec2::new(4.0, 6.0), Buttons::PRIMARY | Buttons::SAVE, 0);
        assert!(second.is_held(Buttons::PRIMARY));
        assert!(!second.was_tapped(Buttons::PRIMARY));
        assert!(second.was_tapped(Buttons::SAVE));
        assert_eq!(second.last_pointer, Vec2::new(1.0, 2.0));
        assert_eq!(second.pointer_delta(), Vec2::new(3.0, 4.0));

        let third = second.next(Vec2::new(4.0, 6.0), Buttons::empty(), -1);
        assert!(third.tapped.is_empty());
        assert_eq!(third.scroll, -1);
    }

    #[test]
    fn largest_tapped_size_wins() {
        let snapshot = InputSnapshot {
            tapped: Buttons::SIZE_32 | Buttons::SIZE_256 | Buttons::SIZE_64,
            ..InputSnapshot::default()
        };
        assert_eq!(snapshot.requested_size(), Some(CanvasSize::S256));
        assert_eq!(InputSnapshot::default().requested_size(), None);
    }

    #[test]
    fn buttons_serialize_by_name() {
        let json = serde_json::to_string(&(Buttons::PRIMARY | Buttons::EYE_DROPPER)).unwrap();
        assert_eq!(json, "\"PRIMARY | EYE_DROPPER\"");
        let parsed: Buttons = serde_json::from_str("\"SECONDARY | SIZE_1024\"").unwrap();
        assert_eq!(parsed, Buttons::SECONDARY | Buttons::SIZE_1024);
    }
}
