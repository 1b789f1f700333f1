// src/replay.rs

//! Scripted input for running the editor without a window.
//!
//! A replay script is JSON:
//!
//! ```json
//! { "frames": [
//!     { "pointer": [85.0, 15.0], "held": "PRIMARY" },
//!     { "held": "SAVE" },
//!     { "pointer": [100.0, 750.0], "held": "PRIMARY",
//!       "pick": { "color": [0.0, 128.0, 255.0, 255.0] } }
//! ] }
//! ```
//!
//! Each frame names the buttons held during it; taps and the previous pointer
//! are derived from the frame before, as a live input loop would. `pick`
//! answers the color dialog if that frame opens it.

use crate::color::Color;
use crate::error::{EditorError, Result};
use crate::framebuffer::Framebuffer;
use crate::geometry::Vec2;
use crate::input::{Buttons, InputSnapshot};
use crate::palette::CUSTOM_SWATCH_COUNT;
use crate::platform::Platform;
use crate::session::{ColorDialog, ColorPick, ColorPickerRequest, EditorSession, ExportOutcome};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReplayScript {
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayFrame {
    pub pointer: Vec2,
    pub held: Buttons,
    pub scroll: i32,
    pub pick: Option<ScriptedPick>,
}

/// A scripted color dialog answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedPick {
    pub color: Color,
    /// Left out to keep the session's current custom colors.
    #[serde(default)]
    pub custom_colors: Option<[Color; CUSTOM_SWATCH_COUNT]>,
}

impl ColorDialog for ReplayFrame {
    fn choose(&mut self, request: &ColorPickerRequest) -> Option<ColorPick> {
        self.pick.map(|pick| ColorPick {
            color: pick.color,
            custom_colors: pick.custom_colors.unwrap_or(request.custom_colors),
        })
    }
}

/// Totals from running a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaySummary {
    pub frames: usize,
    pub exports_written: usize,
    pub exports_failed: usize,
    pub dialogs_opened: usize,
}

impl ReplayScript {
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| EditorError::Replay(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let script = Self::parse(&fs::read_to_string(path)?)?;
        info!("Loaded {} replay frames from {}", script.frames.len(), path.display());
        Ok(script)
    }

    /// The input snapshots this script produces, in order.
    pub fn snapshots(&self) -> Vec<InputSnapshot> {
        let mut previous: Option<InputSnapshot> = None;
        self.frames
            .iter()
            .map(|frame| {
                let snapshot = match previous {
                    Some(prev) => prev.next(frame.pointer, frame.held, frame.scroll),
                    None => InputSnapshot::first(frame.pointer, frame.held, frame.scroll),
                };
                previous = Some(snapshot);
                snapshot
            })
            .collect()
    }

    /// Feeds every frame through `session`, answering color dialogs from the
    /// script. Stops at the first fatal error.
    pub fn run<P: Platform>(&self, session: &mut EditorSession<P>, fb: &mut Framebuffer) -> Result<ReplaySummary> {
        let mut summary = ReplaySummary::default();
        for (index, (frame, snapshot)) in self.frames.iter().zip(self.snapshots()).enumerate() {
            let mut dialog = frame.clone();
            let report = session.update_with_dialog(fb, &snapshot, &mut dialog)?;
            debug!("Replay frame {}: {:?}", index, report.render);

            summary.frames += 1;
            if report.color_picker.is_some() {
                summary.dialogs_opened += 1;
            }
            match report.export {
                Some(ExportOutcome::Written { .. }) => summary.exports_written += 1,
                Some(ExportOutcome::Failed { .. }) => summary.exports_failed += 1,
                None => {}
            }
        }
        Ok(summary)
    }
}

/// An empty script: one idle frame, enough to initialize and draw.
pub fn idle_script() -> ReplayScript {
    ReplayScript {
        frames: vec![ReplayFrame {
            pointer: Vec2::ZERO,
            held: Buttons::empty(),
            scroll: 0,
            pick: None,
        }],
    }
}
