// src/session/tests.rs

#[cfg(test)]
mod session_tests {
    use crate::bitmap::{BitmapHeader, HEADER_LEN};
    use crate::canvas::CanvasSize;
    use crate::color::Color;
    use crate::config::Config;
    use crate::error::EditorError;
    use crate::framebuffer::Framebuffer;
    use crate::geometry::Vec2;
    use crate::input::{Buttons, InputSnapshot};
    use crate::palette::CUSTOM_SWATCH_COUNT;
    use crate::platform::mock::MockPlatform;
    use crate::platform::Platform;
    use crate::rasterizer::GRID_LINE_COLOR;
    use crate::session::*;
    use test_log::test;

    // The default 64x64 canvas is drawn at 700 / 64 = 10.9375 pixels per cell.
    const CELL: f32 = 10.9375;

    struct Harness {
        session: EditorSession<MockPlatform>,
        fb: Framebuffer,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_platform(MockPlatform::new())
        }

        fn with_platform(platform: MockPlatform) -> Self {
            Harness {
                session: EditorSession::new(platform),
                fb: Framebuffer::new(860, 860),
            }
        }

        fn frame(&mut self, input: InputSnapshot) -> FrameReport {
            self.session
                .update_and_render(&mut self.fb, &input)
                .expect("frame should succeed")
        }

        fn idle(&mut self) -> FrameReport {
            self.frame(InputSnapshot::default())
        }

        fn tap(&mut self, buttons: Buttons) -> FrameReport {
            self.frame(InputSnapshot {
                held: buttons,
                tapped: buttons,
                ..InputSnapshot::default()
            })
        }

        fn press_at(&mut self, pointer: Vec2, held: Buttons) -> FrameReport {
            self.frame(InputSnapshot {
                pointer,
                last_pointer: pointer,
                held,
                tapped: Buttons::empty(),
                scroll: 0,
            })
        }

        fn canvas_cell(&self, x: usize, y: usize) -> Color {
            self.session.canvas().unwrap().get(x, y).unwrap()
        }

        fn active(&self) -> Color {
            self.session.active_color().unwrap()
        }
    }

    /// Centre of cell `(gx, gy)` on the unpanned default canvas.
    fn cell_center(gx: usize, gy: usize) -> Vec2 {
        Vec2::new(80.0 + (gx as f32 + 0.5) * CELL, 10.0 + (gy as f32 + 0.5) * CELL)
    }

    fn painted_cells(session: &EditorSession<MockPlatform>) -> usize {
        let canvas = session.canvas().unwrap();
        canvas.cells().iter().filter(|&&c| c != Color::BLACK).count()
    }

    #[test]
    fn first_frame_initializes_defaults() {
        let mut h = Harness::new();
        assert!(!h.session.is_initialized());
        assert!(h.session.canvas().is_none());

        let report = h.idle();
        assert!(report.export.is_none());
        assert!(report.color_picker.is_none());
        assert_eq!(report.render.cells_drawn, 64 * 64);

        let canvas = h.session.canvas().unwrap();
        assert_eq!((canvas.width(), canvas.height()), (64, 64));
        assert!(canvas.cells().iter().all(|&c| c == Color::BLACK));
        let viewport = h.session.viewport().unwrap();
        assert_eq!(viewport.zoom(), CELL);
        assert_eq!(viewport.min_zoom(), CELL);
        assert_eq!(h.active(), Color::RED);
        assert_eq!(h.session.palette().unwrap().quick_switch.color, Color::WHITE);
        assert!(!h.session.eye_dropper_enabled());
        assert_eq!(h.session.platform().allocations(), 1);
    }

    #[test]
    fn paint_then_export_red_cell() {
        let mut h = Harness::new();
        h.press_at(cell_center(0, 0), Buttons::PRIMARY);
        assert_eq!(h.canvas_cell(0, 0), Color::RED);
        assert_eq!(painted_cells(&h.session), 1);

        let report = h.tap(Buttons::SAVE);
        match report.export {
            Some(ExportOutcome::Written { ref filename, bytes }) => {
                assert_eq!(filename, "Bitmap.bmp");
                assert_eq!(bytes, HEADER_LEN + 64 * 64 * 4);
            }
            ref other => panic!("expected a written export, got {:?}", other),
        }

        let platform = h.session.platform();
        let file = platform.file("Bitmap.bmp").expect("export written");
        assert_eq!(file.len(), HEADER_LEN + 64 * 64 * 4);
        let header = BitmapHeader::parse(file).unwrap();
        assert_eq!((header.width, header.height), (64, -64));
        assert_eq!(header.file_size as usize, file.len());
        let first = u32::from_le_bytes([file[54], file[55], file[56], file[57]]);
        assert_eq!(first, 0xffff_0000);
        let second = u32::from_le_bytes([file[58], file[59], file[60], file[61]]);
        assert_eq!(second, 0xff00_0000);

        // Export buffer is returned to the platform, canvas untouched.
        assert_eq!(platform.frees(), 1);
        assert_eq!(h.canvas_cell(0, 0), Color::RED);
    }

    #[test]
    fn resize_clears_canvas_and_lowers_min_zoom() {
        let mut h = Harness::new();
        h.press_at(cell_center(5, 5), Buttons::PRIMARY);
        let old_min = h.session.viewport().unwrap().min_zoom();

        h.tap(Buttons::SIZE_256);
        let canvas = h.session.canvas().unwrap();
        assert_eq!((canvas.width(), canvas.height()), (256, 256));
        assert!(canvas.cells().iter().all(|&c| c == Color::BLACK));

        let viewport = h.session.viewport().unwrap();
        assert_eq!(viewport.min_zoom(), 5.0);
        assert!(viewport.min_zoom() < old_min);
        assert_eq!(viewport.pan(), Vec2::ZERO);
        assert_eq!(h.session.platform().frees(), 1);
    }

    #[test]
    fn largest_tapped_size_wins() {
        let mut h = Harness::new();
        h.tap(Buttons::SIZE_32 | Buttons::SIZE_512 | Buttons::SIZE_128);
        assert_eq!(h.session.canvas().unwrap().width(), 512);
        // Only one reallocation happens.
        assert_eq!(h.session.platform().frees(), 1);
    }

    #[test]
    fn eye_dropper_on_border_pixel_samples_cell() {
        let mut h = Harness::new();
        h.press_at(cell_center(3, 2), Buttons::PRIMARY);
        h.tap(Buttons::ERASER);
        assert_eq!(h.active(), Color::BLACK);

        // Cell (3, 2) spans x 113..124 and y 32..43; (123, 42) is its grid line.
        assert_eq!(h.fb.pixel(123, 42), Some(GRID_LINE_COLOR));
        assert_eq!(h.fb.pixel(118, 37), Some(0xffff_0000));

        h.frame(InputSnapshot {
            pointer: Vec2::new(123.0, 42.0),
            last_pointer: Vec2::new(123.0, 42.0),
            held: Buttons::PRIMARY | Buttons::EYE_DROPPER,
            tapped: Buttons::EYE_DROPPER,
            scroll: 0,
        });
        assert!(h.session.eye_dropper_enabled());
        assert_eq!(h.active(), Color::RED);
        assert_eq!(painted_cells(&h.session), 1);

        h.tap(Buttons::EYE_DROPPER);
        assert!(!h.session.eye_dropper_enabled());
    }

    #[test]
    fn eye_dropper_on_border_pixel_after_zoom_and_pan() {
        let mut h = Harness::new();
        h.tap(Buttons::SIZE_32);
        for _ in 0..3 {
            h.frame(InputSnapshot {
                scroll: 1,
                ..InputSnapshot::default()
            });
        }
        h.frame(InputSnapshot {
            pointer: Vec2::new(300.0, 300.0),
            last_pointer: Vec2::new(337.0, 391.0),
            held: Buttons::SECONDARY,
            tapped: Buttons::empty(),
            scroll: 0,
        });
        let viewport = h.session.viewport().unwrap().clone();
        assert_eq!(viewport.zoom(), 36.0);
        assert!(viewport.pan().y.fract() != 0.0);

        let rect = viewport.cell_rect(1, 2);
        let centre = Vec2::new(
            (rect.x + rect.width / 2) as f32,
            (rect.y.max(10) + rect.y + rect.height) as f32 / 2.0,
        );
        h.press_at(centre, Buttons::PRIMARY);
        assert_eq!(h.canvas_cell(1, 2), Color::RED);
        h.tap(Buttons::ERASER);

        let border = (81, rect.y + rect.height - 1);
        assert_eq!(h.fb.pixel(border.0, border.1 as usize), Some(GRID_LINE_COLOR));
        let border = Vec2::new(border.0 as f32, border.1 as f32);
        h.frame(InputSnapshot {
            pointer: border,
            last_pointer: border,
            held: Buttons::PRIMARY | Buttons::EYE_DROPPER,
            tapped: Buttons::EYE_DROPPER,
            scroll: 0,
        });
        assert_eq!(h.active(), Color::RED);
        assert_eq!(painted_cells(&h.session), 1);
    }

    #[test]
    fn eye_dropper_off_grid_keeps_color() {
        let mut h = Harness::new();
        h.tap(Buttons::EYE_DROPPER);
        // The viewport hit test is inclusive, so its far corner is inside the
        // viewport but one cell past the canvas.
        h.press_at(Vec2::new(780.0, 710.0), Buttons::PRIMARY);
        assert_eq!(h.active(), Color::RED);
    }

    #[test]
    fn painting_off_grid_is_noop() {
        let mut h = Harness::new();
        h.press_at(Vec2::new(780.0, 710.0), Buttons::PRIMARY);
        h.press_at(Vec2::new(20.0, 20.0), Buttons::PRIMARY);
        assert_eq!(painted_cells(&h.session), 0);
    }

    #[test]
    fn first_frame_allocation_failure_is_fatal() {
        let mut h = Harness::with_platform(MockPlatform::new().with_allocation_limit(1024));
        let err = h
            .session
            .update_and_render(&mut h.fb, &InputSnapshot::default())
            .unwrap_err();
        assert!(matches!(err, EditorError::FatalAllocation { what: "canvas", .. }));
        assert!(!h.session.is_initialized());
    }

    #[test]
    fn resize_allocation_failure_keeps_canvas() {
        let mut h = Harness::new();
        h.press_at(cell_center(1, 1), Buttons::PRIMARY);
        h.session.platform_mut().set_allocation_limit(Some(64 * 64 * 16));

        let input = InputSnapshot {
            held: Buttons::SIZE_1024,
            tapped: Buttons::SIZE_1024,
            ..InputSnapshot::default()
        };
        let err = h.session.update_and_render(&mut h.fb, &input).unwrap_err();
        assert!(matches!(err, EditorError::FatalAllocation { what: "canvas", .. }));

        assert_eq!(h.session.canvas().unwrap().width(), 64);
        assert_eq!(h.canvas_cell(1, 1), Color::RED);
        assert_eq!(h.session.viewport().unwrap().zoom(), CELL);
        assert_eq!(h.session.platform().frees(), 0);
    }

    #[test]
    fn export_allocation_failure_is_fatal() {
        let mut h = Harness::new();
        h.press_at(cell_center(0, 0), Buttons::PRIMARY);
        h.session.platform_mut().set_allocation_limit(Some(1000));

        let input = InputSnapshot {
            held: Buttons::SAVE,
            tapped: Buttons::SAVE,
            ..InputSnapshot::default()
        };
        let err = h.session.update_and_render(&mut h.fb, &input).unwrap_err();
        assert!(matches!(err, EditorError::FatalAllocation { what: "bitmap export", .. }));
        assert_eq!(h.session.platform().file_count(), 0);
        assert_eq!(h.canvas_cell(0, 0), Color::RED);
    }

    /// Hands out the buffer named `short` one element short.
    struct ShortPlatform {
        inner: MockPlatform,
        short: &'static str,
    }

    impl Platform for ShortPlatform {
        fn allocate<T: Clone>(&mut self, what: &'static str, count: usize, fill: T) -> crate::Result<Vec<T>> {
            let mut buffer = self.inner.allocate(what, count, fill)?;
            if what == self.short {
                buffer.pop();
            }
            Ok(buffer)
        }

        fn free<T>(&mut self, buffer: Vec<T>) {
            self.inner.free(buffer);
        }

        fn write_file(&mut self, name: &str, data: &[u8]) -> std::io::Result<()> {
            self.inner.write_file(name, data)
        }
    }

    #[test]
    fn short_export_buffer_is_fatal() {
        let mut session = EditorSession::new(ShortPlatform {
            inner: MockPlatform::new(),
            short: "bitmap export",
        });
        let mut fb = Framebuffer::new(860, 860);
        let input = InputSnapshot {
            held: Buttons::SAVE,
            tapped: Buttons::SAVE,
            ..InputSnapshot::default()
        };
        let err = session.update_and_render(&mut fb, &input).unwrap_err();
        assert!(matches!(err, EditorError::FatalAllocation { what: "bitmap export", .. }));
        assert_eq!(session.platform().inner.file_count(), 0);
        assert_eq!(session.platform().inner.frees(), 1);
        assert!(session.is_initialized());
    }

    #[test]
    fn short_canvas_buffer_is_fatal() {
        let mut session = EditorSession::new(ShortPlatform {
            inner: MockPlatform::new(),
            short: "canvas",
        });
        let mut fb = Framebuffer::new(860, 860);
        let err = session.update_and_render(&mut fb, &InputSnapshot::default()).unwrap_err();
        assert!(matches!(err, EditorError::FatalAllocation { what: "canvas", .. }));
        assert!(!session.is_initialized());
    }

    #[test]
    fn export_write_failure_is_reported() {
        let mut h = Harness::new();
        h.press_at(cell_center(0, 0), Buttons::PRIMARY);
        h.session.platform_mut().set_fail_writes(true);

        let report = h.tap(Buttons::SAVE);
        let export = report.export.expect("save was tapped");
        assert!(!export.is_written());
        assert!(matches!(export, ExportOutcome::Failed { ref filename, .. } if filename == "Bitmap.bmp"));
        assert_eq!(h.session.platform().frees(), 1);
        assert_eq!(h.canvas_cell(0, 0), Color::RED);

        // A later save can still succeed.
        h.session.platform_mut().set_fail_writes(false);
        h.idle();
        let report = h.tap(Buttons::SAVE);
        assert!(report.export.unwrap().is_written());
    }

    #[test]
    fn quick_switch_swaps_colors() {
        let mut h = Harness::new();
        h.tap(Buttons::QUICK_SWITCH);
        assert_eq!(h.active(), Color::WHITE);
        assert_eq!(h.session.palette().unwrap().quick_switch.color, Color::RED);
        // Picker is drawn in the active color, quick-switch peeks out behind it.
        assert_eq!(h.fb.pixel(100, 740), Some(0xffff_ffff));
        assert_eq!(h.fb.pixel(77, 717), Some(0xffff_0000));

        h.idle();
        h.tap(Buttons::QUICK_SWITCH);
        assert_eq!(h.active(), Color::RED);
    }

    #[test]
    fn eraser_paints_black() {
        let mut h = Harness::new();
        h.press_at(cell_center(2, 2), Buttons::PRIMARY);
        h.tap(Buttons::ERASER);
        h.press_at(cell_center(2, 2), Buttons::PRIMARY);
        assert_eq!(h.canvas_cell(2, 2), Color::BLACK);
    }

    #[test]
    fn reset_clears_every_cell() {
        let mut h = Harness::new();
        for i in 0..10 {
            h.press_at(cell_center(i, 63 - i), Buttons::PRIMARY);
        }
        assert_eq!(painted_cells(&h.session), 10);
        h.tap(Buttons::RESET);
        assert_eq!(painted_cells(&h.session), 0);
    }

    #[test]
    fn picker_press_requests_dialog() {
        let mut h = Harness::new();
        let report = h.press_at(Vec2::new(100.0, 750.0), Buttons::PRIMARY);
        let request = report.color_picker.expect("picker was pressed");
        assert_eq!(request.current, Color::RED);
        assert_eq!(request.custom_colors, [Color::BLACK; CUSTOM_SWATCH_COUNT]);
        assert_eq!(painted_cells(&h.session), 0);

        // Secondary on the picker does nothing.
        let report = h.press_at(Vec2::new(100.0, 750.0), Buttons::SECONDARY);
        assert!(report.color_picker.is_none());
    }

    #[test]
    fn color_pick_then_swatch_selection() {
        let mut h = Harness::new();
        assert!(!h.session.apply_color_pick(ColorPick {
            color: Color::WHITE,
            custom_colors: [Color::WHITE; CUSTOM_SWATCH_COUNT],
        }));
        h.idle();

        let teal = Color::opaque(0.0, 128.0, 128.0);
        let mut custom = [Color::BLACK; CUSTOM_SWATCH_COUNT];
        custom[9] = teal;
        assert!(h.session.apply_color_pick(ColorPick {
            color: Color::opaque(10.0, 20.0, 30.0),
            custom_colors: custom,
        }));
        assert_eq!(h.active(), Color::opaque(10.0, 20.0, 30.0));

        // Swatch 9 is second row, second column: (188, 754), 30x30.
        h.press_at(Vec2::new(200.0, 770.0), Buttons::PRIMARY);
        assert_eq!(h.active(), teal);
        assert_eq!(h.fb.pixel(200, 770), Some(teal.encode()));
    }

    struct ScriptedDialog {
        answer: Option<ColorPick>,
        requests: Vec<ColorPickerRequest>,
    }

    impl ColorDialog for ScriptedDialog {
        fn choose(&mut self, request: &ColorPickerRequest) -> Option<ColorPick> {
            self.requests.push(*request);
            self.answer
        }
    }

    #[test]
    fn dialog_answer_is_applied() {
        let mut h = Harness::new();
        let pick = ColorPick {
            color: Color::opaque(1.0, 2.0, 3.0),
            custom_colors: [Color::WHITE; CUSTOM_SWATCH_COUNT],
        };
        let mut dialog = ScriptedDialog {
            answer: Some(pick),
            requests: Vec::new(),
        };

        let idle = InputSnapshot::default();
        h.session.update_with_dialog(&mut h.fb, &idle, &mut dialog).unwrap();
        assert!(dialog.requests.is_empty());

        let press = InputSnapshot::first(Vec2::new(90.0, 730.0), Buttons::PRIMARY, 0);
        h.session.update_with_dialog(&mut h.fb, &press, &mut dialog).unwrap();
        assert_eq!(dialog.requests.len(), 1);
        assert_eq!(h.active(), Color::opaque(1.0, 2.0, 3.0));
        assert_eq!(h.session.palette().unwrap().custom_colors(), [Color::WHITE; CUSTOM_SWATCH_COUNT]);

        dialog.answer = None;
        h.session.update_with_dialog(&mut h.fb, &press, &mut dialog).unwrap();
        assert_eq!(dialog.requests.len(), 2);
        assert_eq!(h.active(), Color::opaque(1.0, 2.0, 3.0));
    }

    #[test]
    fn secondary_drag_pans_when_zoomed() {
        let mut h = Harness::new();
        h.frame(InputSnapshot {
            scroll: 1,
            ..InputSnapshot::default()
        });
        assert_eq!(h.session.viewport().unwrap().zoom(), 15.0);

        h.frame(InputSnapshot {
            pointer: Vec2::new(300.0, 350.0),
            last_pointer: Vec2::new(450.0, 380.0),
            held: Buttons::SECONDARY,
            tapped: Buttons::empty(),
            scroll: 0,
        });
        assert_eq!(h.session.viewport().unwrap().pan(), Vec2::new(-10.0, -2.0));

        // Painting now lands on the panned cell.
        h.press_at(Vec2::new(81.0, 11.0), Buttons::PRIMARY);
        assert_eq!(h.canvas_cell(10, 2), Color::RED);
    }

    #[test]
    fn secondary_takes_precedence_over_primary() {
        let mut h = Harness::new();
        h.press_at(cell_center(4, 4), Buttons::PRIMARY | Buttons::SECONDARY);
        assert_eq!(painted_cells(&h.session), 0);
    }

    #[test]
    fn scroll_out_to_minimum_recenters() {
        let mut h = Harness::new();
        for _ in 0..3 {
            h.frame(InputSnapshot {
                scroll: 1,
                ..InputSnapshot::default()
            });
        }
        h.press_at(Vec2::new(400.0, 400.0), Buttons::empty());
        h.frame(InputSnapshot {
            pointer: Vec2::new(100.0, 100.0),
            last_pointer: Vec2::new(400.0, 400.0),
            held: Buttons::SECONDARY,
            tapped: Buttons::empty(),
            scroll: 0,
        });
        assert!(h.session.viewport().unwrap().pan().x < 0.0);

        for _ in 0..5 {
            h.frame(InputSnapshot {
                scroll: -1,
                ..InputSnapshot::default()
            });
        }
        let viewport = h.session.viewport().unwrap();
        assert_eq!(viewport.zoom(), CELL);
        assert_eq!(viewport.pan(), Vec2::ZERO);
    }

    #[test]
    fn custom_config_changes_defaults() {
        let mut config = Config::default();
        config.export.default_canvas_size = CanvasSize::S32;
        config.export.filename = "art.bmp".to_string();
        config.palette.picker_color = Color::WHITE;

        let mut session = EditorSession::with_config(MockPlatform::new(), config);
        let mut fb = Framebuffer::new(860, 860);
        let save = InputSnapshot::first(Vec2::ZERO, Buttons::SAVE, 0);
        let report = session.update_and_render(&mut fb, &save).unwrap();
        assert!(report.export.unwrap().is_written());
        assert_eq!(session.canvas().unwrap().width(), 32);
        assert_eq!(session.active_color(), Some(Color::WHITE));
        assert!(session.platform().file("art.bmp").is_some());
    }

    #[test]
    fn survives_framebuffer_resize_between_frames() {
        let mut h = Harness::new();
        h.idle();
        h.fb = Framebuffer::with_pitch(300, 200, 1300).unwrap();
        let report = h.idle();
        assert!(report.render.pixels_written > 0);
        assert_eq!(h.fb.pixel(0, 0), Some(0xff11_1111));
    }
}
