// src/session.rs

//! The editor session: one frame of input in, one rendered frame out.
//!
//! `EditorSession` owns the canvas, viewport and palette and is driven by the
//! host calling [`EditorSession::update_and_render`] once per frame. The
//! session starts uninitialized; the first frame allocates the canvas and
//! lays out the palette. Each frame then applies the input's intents in a
//! fixed order (resize, scroll, export, reset, tool toggles, pointer) and
//! redraws the framebuffer from scratch.
//!
//! The native color dialog is not part of the session. When the picker button
//! is pressed the frame report carries a [`ColorPickerRequest`]; the host
//! answers it by calling [`EditorSession::apply_color_pick`], or lets
//! [`EditorSession::update_with_dialog`] do so through a [`ColorDialog`].

use crate::bitmap;
use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::{Config, CONFIG};
use crate::error::{EditorError, Result};
use crate::framebuffer::Framebuffer;
use crate::input::{Buttons, InputSnapshot};
use crate::palette::{Palette, CUSTOM_SWATCH_COUNT};
use crate::platform::Platform;
use crate::renderer::{RenderStats, Renderer};
use crate::viewport::Viewport;

use log::{debug, info, warn};
use std::io;

mod tests;

/// Asks the host to show a color dialog seeded with the session's colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPickerRequest {
    pub current: Color,
    pub custom_colors: [Color; CUSTOM_SWATCH_COUNT],
}

/// A color dialog's answer. Both fields are copied into the session as is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPick {
    pub color: Color,
    pub custom_colors: [Color; CUSTOM_SWATCH_COUNT],
}

/// A host color chooser. Returns `None` when the user cancels.
pub trait ColorDialog {
    fn choose(&mut self, request: &ColorPickerRequest) -> Option<ColorPick>;
}

/// What happened to a save request this frame.
#[derive(Debug)]
pub enum ExportOutcome {
    Written { filename: String, bytes: usize },
    /// The bitmap was encoded but the platform could not write it. The canvas
    /// is unaffected and the next save may succeed.
    Failed { filename: String, error: io::Error },
}

impl ExportOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, ExportOutcome::Written { .. })
    }
}

#[derive(Debug, Default)]
pub struct FrameReport {
    pub export: Option<ExportOutcome>,
    pub color_picker: Option<ColorPickerRequest>,
    pub render: RenderStats,
}

#[derive(Debug)]
struct EditorState {
    canvas: Canvas,
    viewport: Viewport,
    palette: Palette,
    active_color: Color,
    eye_dropper: bool,
}

impl EditorState {
    fn initialize<P: Platform>(platform: &mut P, config: &Config) -> Result<Self> {
        let size = config.export.default_canvas_size;
        let canvas = Canvas::allocate(platform, size)?;
        let viewport = Viewport::new(&config.layout, canvas.width(), canvas.height());
        let palette = Palette::layout(&config.layout, &config.palette);
        let active_color = palette.picker.color;
        info!(
            "Editor initialized: {}x{} canvas, zoom {}",
            canvas.width(),
            canvas.height(),
            viewport.zoom()
        );
        Ok(Self {
            canvas,
            viewport,
            palette,
            active_color,
            eye_dropper: false,
        })
    }
}

pub struct EditorSession<P: Platform> {
    platform: P,
    config: Config,
    renderer: Renderer,
    state: Option<EditorState>,
}

impl<P: Platform> EditorSession<P> {
    /// Creates a session with the default configuration.
    pub fn new(platform: P) -> Self {
        Self::with_config(platform, CONFIG.clone())
    }

    pub fn with_config(platform: P, config: Config) -> Self {
        Self {
            platform,
            renderer: Renderer::new(config.colors.clone()),
            config,
            state: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn into_platform(self) -> P {
        self.platform
    }

    /// `false` until the first frame has run successfully.
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    pub fn canvas(&self) -> Option<&Canvas> {
        self.state.as_ref().map(|s| &s.canvas)
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.state.as_ref().map(|s| &s.viewport)
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.state.as_ref().map(|s| &s.palette)
    }

    pub fn active_color(&self) -> Option<Color> {
        self.state.as_ref().map(|s| s.active_color)
    }

    pub fn eye_dropper_enabled(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.eye_dropper)
    }

    /// Runs one frame: applies `input` and redraws `fb`.
    ///
    /// Fails only when the canvas or export buffer cannot be allocated. The
    /// canvas is left as it was in that case, and the framebuffer is not
    /// redrawn.
    pub fn update_and_render(&mut self, fb: &mut Framebuffer, input: &InputSnapshot) -> Result<FrameReport> {
        let Self {
            platform,
            config,
            renderer,
            state,
        } = self;
        let state = match state {
            Some(state) => state,
            empty => empty.insert(EditorState::initialize(platform, config)?),
        };
        let mut report = FrameReport::default();

        if let Some(size) = input.requested_size() {
            let canvas = Canvas::allocate(platform, size)?;
            let old = std::mem::replace(&mut state.canvas, canvas);
            platform.free(old.into_cells());
            state.viewport.resize_canvas(size.side(), size.side());
            info!("Canvas resized to {}x{}", size.side(), size.side());
        }

        if input.scroll > 0 {
            state.viewport.zoom_in();
        } else if input.scroll < 0 {
            state.viewport.zoom_out();
            state.viewport.pan_by(input.pointer_delta());
        }

        if input.was_tapped(Buttons::SAVE) {
            report.export = Some(export(platform, &state.canvas, &config.export.filename)?);
        }

        if input.was_tapped(Buttons::RESET) {
            state.canvas.fill(Color::BLACK);
            debug!("Canvas reset");
        }

        if input.was_tapped(Buttons::ERASER) {
            state.active_color = Color::BLACK;
            debug!("Eraser selected");
        }
        if input.was_tapped(Buttons::QUICK_SWITCH) {
            std::mem::swap(&mut state.active_color, &mut state.palette.quick_switch.color);
            debug!("Quick switch to {:?}", state.active_color);
        }
        if input.was_tapped(Buttons::EYE_DROPPER) {
            state.eye_dropper = !state.eye_dropper;
            debug!("Eye dropper {}", if state.eye_dropper { "on" } else { "off" });
        }

        report.color_picker = apply_pointer(state, input);
        report.render = renderer.draw(fb, &state.canvas, &state.viewport, &state.palette, state.active_color);
        Ok(report)
    }

    /// Runs a frame and, if it asked for the color dialog, shows `dialog`
    /// and applies its answer.
    pub fn update_with_dialog<D: ColorDialog + ?Sized>(
        &mut self,
        fb: &mut Framebuffer,
        input: &InputSnapshot,
        dialog: &mut D,
    ) -> Result<FrameReport> {
        let report = self.update_and_render(fb, input)?;
        if let Some(request) = &report.color_picker {
            if let Some(pick) = dialog.choose(request) {
                self.apply_color_pick(pick);
            }
        }
        Ok(report)
    }

    /// Applies a color dialog answer: the chosen color becomes the active
    /// color and the custom swatches take the dialog's custom colors.
    /// Returns `false` if the session has not run a frame yet.
    pub fn apply_color_pick(&mut self, pick: ColorPick) -> bool {
        let Some(state) = self.state.as_mut() else {
            debug!("Color pick ignored before first frame");
            return false;
        };
        state.active_color = pick.color;
        state.palette.set_custom_colors(pick.custom_colors);
        debug!("Color picked: {:?}", pick.color);
        true
    }
}

/// Pointer intents. Returns the color dialog request if the picker is held.
fn apply_pointer(state: &mut EditorState, input: &InputSnapshot) -> Option<ColorPickerRequest> {
    let pointer = input.pointer;
    let primary = input.is_held(Buttons::PRIMARY);

    let request = (primary && state.palette.picker.rect.contains(pointer)).then(|| ColorPickerRequest {
        current: state.active_color,
        custom_colors: state.palette.custom_colors(),
    });

    let in_viewport = state.viewport.contains(pointer);
    if input.is_held(Buttons::SECONDARY) && in_viewport {
        state.viewport.pan_by(input.pointer_delta());
    } else if primary && in_viewport {
        if let Some((gx, gy)) = state.viewport.screen_to_grid(pointer) {
            if state.eye_dropper {
                if let Some(color) = state.canvas.get(gx, gy) {
                    state.active_color = color;
                }
            } else {
                state.canvas.set(gx, gy, state.active_color);
            }
        }
    }

    if primary {
        if let Some(color) = state.palette.custom_swatch_at(pointer) {
            state.active_color = color;
        }
    }

    request
}

fn export<P: Platform>(platform: &mut P, canvas: &Canvas, filename: &str) -> Result<ExportOutcome> {
    let len = bitmap::encoded_len(canvas.width(), canvas.height());
    let mut buffer = platform.allocate("bitmap export", len, 0u8)?;
    if buffer.len() < len {
        warn!("Platform returned {} of {} bytes for bitmap export", buffer.len(), len);
        platform.free(buffer);
        return Err(EditorError::FatalAllocation {
            what: "bitmap export",
            bytes: len,
        });
    }
    bitmap::encode_canvas_into(canvas, &mut buffer);
    let written = platform.write_file(filename, &buffer);
    platform.free(buffer);

    Ok(match written {
        Ok(()) => {
            info!("Exported {} ({} bytes)", filename, len);
            ExportOutcome::Written {
                filename: filename.to_string(),
                bytes: len,
            }
        }
        Err(error) => {
            warn!("Export to {} failed: {}", filename, error);
            ExportOutcome::Failed {
                filename: filename.to_string(),
                error,
            }
        }
    })
}
