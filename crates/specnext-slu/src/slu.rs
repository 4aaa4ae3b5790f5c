//! The compositor: beam timing, layer orchestration and pixel output.

use emu_core::{Observable, Tickable, Ticks, Value};

use crate::beam::{Beam, BeamEvent, BeamPosition};
use crate::clip::{ClipLayer, ClipWindow, ClipWindows};
use crate::config::{BlendMode, DEFAULT_FALLBACK_RGB8, LayerPriority, SluConfig};
use crate::error::SluError;
use crate::framebuffer::{FB_HEIGHT, FB_WIDTH, FrameBuffer};
use crate::layers::{LayerContext, SluBus};
use crate::line_irq::{LINE_IRQ_ROW_MASK, LineIrq};
use crate::palette::{Palette, PaletteBank};
use crate::resolve::{LayerInputs, resolve};

/// Which reset the machine performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetKind {
    /// Reset button: cursors, fallback colour and clip windows.
    Soft,
    /// Power cycle: everything, including palette contents.
    Hard,
}

/// Sprites / Layer 2 / ULA compositor.
///
/// One tick is one pixel clock. Each tick moves the beam, checks the line
/// interrupt, runs the copper twice, then asks each layer for its pixel and
/// writes the winner to the frame buffer.
pub struct Slu {
    config: SluConfig,
    palette: Palette,
    beam: Beam,
    line_irq: LineIrq,
    frame: FrameBuffer,
    bus: SluBus,
    frame_complete: bool,
    frame_count: u64,
}

impl Slu {
    /// Build a compositor around its collaborators.
    ///
    /// # Errors
    ///
    /// Fails if the frame buffer cannot be allocated.
    pub fn new(mut config: SluConfig, mut bus: SluBus) -> Result<Self, SluError> {
        config.line_irq_row &= LINE_IRQ_ROW_MASK;
        let frame = FrameBuffer::new(FB_WIDTH, FB_HEIGHT)?;
        bus.ula.set_output_enabled(config.ula_enabled);
        Ok(Self {
            config,
            palette: Palette::new(),
            beam: Beam::new(),
            line_irq: LineIrq::new(),
            frame,
            bus,
            frame_complete: false,
            frame_count: 0,
        })
    }

    /// Run `ticks` pixel clocks. Returns the number consumed, which is
    /// always all of them.
    pub fn run(&mut self, ticks: Ticks) -> Ticks {
        self.tick_n(ticks);
        ticks
    }

    fn end_frame(&mut self) {
        self.bus.display.present(&self.frame);
        self.bus.ula.frame_complete();
        self.frame_complete = true;
        self.frame_count += 1;
        log::debug!("slu: frame {} complete", self.frame_count);
    }

    fn step(&mut self) {
        let (rows, columns) = self.bus.ula.display_size();
        if self.beam.advance(rows, columns) == BeamEvent::Frame {
            self.end_frame();
        }

        let beam = self.beam.position();
        let BeamPosition { row, column } = beam;
        if self
            .line_irq
            .update(self.config.line_irq_enabled, self.config.line_irq_row, beam)
        {
            log::trace!("slu: line interrupt at row {row}");
            self.bus.cpu.irq();
        }

        // Copper runs at twice the pixel clock.
        self.bus.copper.tick(row, column);
        self.bus.copper.tick(row, column);

        let palette = &self.palette;
        let clip = &self.config.clip;
        let ctx = move |layer| LayerContext {
            palette,
            clip: clip.window(layer),
        };

        let Some(ula) = self.bus.ula.tick(row, column, &ctx(ClipLayer::Ula)) else {
            return;
        };
        let (fb_row, fb_column) = (ula.fb_row, ula.fb_column);
        let inputs = LayerInputs {
            ula,
            tilemap: self.bus.tilemap.tick(fb_row, fb_column, &ctx(ClipLayer::Tilemap)),
            sprite: self.bus.sprites.tick(fb_row, fb_column, &ctx(ClipLayer::Sprites)),
            layer2: self.bus.layer2.tick(fb_row, fb_column, &ctx(ClipLayer::Layer2)),
        };

        let rgb16 = resolve(&self.config, &inputs);
        self.frame.set(fb_row, fb_column, rgb16);
    }

    /// True once after each completed frame.
    pub fn take_frame_complete(&mut self) -> bool {
        std::mem::take(&mut self.frame_complete)
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Current beam row, as seen by the active video line registers.
    #[must_use]
    pub fn active_line(&self) -> u32 {
        self.beam.row()
    }

    #[must_use]
    pub fn beam(&self) -> BeamPosition {
        self.beam.position()
    }

    #[must_use]
    pub fn config(&self) -> &SluConfig {
        &self.config
    }

    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    #[must_use]
    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame
    }

    #[must_use]
    pub fn bus(&self) -> &SluBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut SluBus {
        &mut self.bus
    }

    pub fn set_layer_priority(&mut self, priority: LayerPriority) {
        self.config.layer_priority = priority;
        log::warn!("slu: layer priority {}", priority.name());
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.config.blend_mode = mode;
        log::warn!("slu: blend mode {}", mode.bits());
    }

    pub fn set_stencil_mode(&mut self, enabled: bool) {
        self.config.stencil_mode = enabled;
    }

    pub fn set_ula_enabled(&mut self, enabled: bool) {
        self.config.ula_enabled = enabled;
        self.bus.ula.set_output_enabled(enabled);
    }

    pub fn set_transparent_rgb8(&mut self, rgb8: u8) {
        self.config.transparent_rgb8 = rgb8;
    }

    pub fn set_fallback_rgb8(&mut self, rgb8: u8) {
        self.config.fallback_rgb8 = rgb8;
    }

    pub fn set_line_irq_enabled(&mut self, enabled: bool) {
        self.config.line_irq_enabled = enabled;
        if !enabled {
            self.line_irq.clear();
        }
        log::debug!("slu: line interrupt {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Set the 9-bit target row. Higher bits are ignored.
    pub fn set_line_irq_row(&mut self, row: u16) {
        self.config.line_irq_row = row & LINE_IRQ_ROW_MASK;
        log::debug!("slu: line interrupt row {}", self.config.line_irq_row);
    }

    /// Set only while the beam sits on the target row's first pixel.
    #[must_use]
    pub fn line_irq_active(&self) -> bool {
        self.line_irq.active()
    }

    pub fn set_clip_window(&mut self, layer: ClipLayer, window: ClipWindow) {
        self.config.clip.set(layer, window);
    }

    #[must_use]
    pub fn clip_windows(&self) -> &ClipWindows {
        &self.config.clip
    }

    pub(crate) fn clip_windows_mut(&mut self) -> &mut ClipWindows {
        &mut self.config.clip
    }

    pub fn reset(&mut self, kind: ResetKind) {
        self.palette.reset_cursor();
        self.config.fallback_rgb8 = DEFAULT_FALLBACK_RGB8;
        self.config.clip = ClipWindows::new();

        if kind == ResetKind::Hard {
            self.palette.load_defaults();
            self.beam.reset();
            self.line_irq.clear();
            self.config = SluConfig::default();
            self.bus.ula.set_output_enabled(self.config.ula_enabled);
            self.frame.clear();
            self.frame_complete = false;
        }
        log::debug!("slu: {kind:?} reset");
    }

    /// Place the beam (for testing).
    #[doc(hidden)]
    pub fn set_beam_position(&mut self, row: u32, column: u32) {
        self.beam.set_position(row, column);
    }
}

impl Tickable for Slu {
    fn tick(&mut self) {
        self.step();
    }
}

impl Observable for Slu {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("beam.") {
            match rest {
                "row" => Some(self.beam.row().into()),
                "column" => Some(self.beam.column().into()),
                _ => None,
            }
        } else if let Some(rest) = path.strip_prefix("line_irq.") {
            match rest {
                "enabled" => Some(self.config.line_irq_enabled.into()),
                "row" => Some(self.config.line_irq_row.into()),
                "active" => Some(self.line_irq.active().into()),
                _ => None,
            }
        } else if let Some(rest) = path.strip_prefix("palette.") {
            match rest {
                "bank" => Some(self.palette.selected_bank().name().into()),
                "index" => Some(self.palette.index().into()),
                _ => {
                    let (bank, index) = rest.split_once('.')?;
                    let bank = PaletteBank::from_name(bank)?;
                    let index = u8::try_from(parse_hex_or_dec(index)?).ok()?;
                    Some(self.palette.entry(bank, index).rgb9.into())
                }
            }
        } else {
            match path {
                "frame_count" => Some(self.frame_count.into()),
                "layer_priority" => Some(self.config.layer_priority.name().into()),
                "blend_mode" => Some(self.config.blend_mode.bits().into()),
                "stencil" => Some(self.config.stencil_mode.into()),
                "transparent" => Some(self.config.transparent_rgb8.into()),
                "fallback" => Some(self.config.fallback_rgb8.into()),
                _ => None,
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "beam.row",
            "beam.column",
            "frame_count",
            "line_irq.enabled",
            "line_irq.row",
            "line_irq.active",
            "layer_priority",
            "blend_mode",
            "stencil",
            "transparent",
            "fallback",
            "palette.bank",
            "palette.index",
            "palette.<bank>.<index>",
        ]
    }
}

fn parse_hex_or_dec(s: &str) -> Option<u32> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(hex) = s.strip_prefix('$') {
        u32::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{UlaLayer, UlaPixel};
    use crate::palette::PaletteLayer;

    /// Maps the beam 1:1 onto the frame buffer and draws ULA colour 1.
    struct Grid {
        rows: u32,
        columns: u32,
    }

    impl UlaLayer for Grid {
        fn display_size(&self) -> (u32, u32) {
            (self.rows, self.columns)
        }

        fn tick(&mut self, row: u32, column: u32, ctx: &LayerContext<'_>) -> Option<UlaPixel> {
            Some(UlaPixel {
                enabled: true,
                colour: ctx.palette.lookup(PaletteLayer::Ula, 1),
                fb_row: row,
                fb_column: column,
                ..UlaPixel::default()
            })
        }

        fn frame_complete(&mut self) {}
    }

    fn slu(rows: u32, columns: u32) -> Slu {
        let bus = SluBus::with_ula(Box::new(Grid { rows, columns }));
        Slu::new(SluConfig::default(), bus).unwrap()
    }

    #[test]
    fn frame_completes_after_one_raster() {
        let mut slu = slu(4, 8);
        assert_eq!(slu.run(Ticks::new(31)), Ticks::new(31));
        assert!(!slu.take_frame_complete());
        slu.tick();
        assert!(slu.take_frame_complete());
        assert!(!slu.take_frame_complete(), "flag clears on read");
        assert_eq!(slu.frame_count(), 1);
        assert_eq!(slu.beam(), BeamPosition::default());
    }

    #[test]
    fn writes_resolved_pixel_at_ula_coordinates() {
        let mut slu = slu(4, 8);
        slu.run(Ticks::new(10));
        // Beam is at row 1, column 2; ULA blue ink.
        assert_eq!(slu.frame_buffer().get(1, 2), Some(0x00A0));
        assert_eq!(slu.frame_buffer().get(1, 3), Some(0));
    }

    #[test]
    fn line_irq_latches_for_one_tick() {
        let mut slu = slu(4, 8);
        slu.set_line_irq_row(2);
        slu.set_line_irq_enabled(true);
        slu.set_beam_position(1, 7);

        slu.tick();
        assert!(slu.line_irq_active());
        assert_eq!(slu.query("line_irq.active"), Some(Value::Bool(true)));
        slu.tick();
        assert!(!slu.line_irq_active());
    }

    #[test]
    fn soft_reset_keeps_palette_and_priority() {
        let mut slu = slu(4, 8);
        slu.set_layer_priority(LayerPriority::Uls);
        slu.set_fallback_rgb8(0x00);
        slu.palette_mut().write_control(0x90);
        slu.palette_mut().write_rgb8(0x1C);
        slu.set_clip_window(ClipLayer::Layer2, ClipWindow::new(1, 2, 3, 4));

        slu.reset(ResetKind::Soft);
        assert_eq!(slu.config().layer_priority, LayerPriority::Uls);
        assert_eq!(slu.config().fallback_rgb8, 0xE3);
        assert_eq!(slu.palette().selected_bank(), PaletteBank::UlaFirst);
        assert_eq!(slu.palette().entry(PaletteBank::Layer2First, 0).rgb8, 0x1C);
        assert_eq!(*slu.clip_windows().window(ClipLayer::Layer2), ClipWindow::DISPLAY);
    }

    #[test]
    fn hard_reset_restores_everything() {
        let mut slu = slu(4, 8);
        slu.set_layer_priority(LayerPriority::Blend);
        slu.set_line_irq_enabled(true);
        slu.palette_mut().set_index(1);
        slu.palette_mut().write_rgb8(0xFF);
        slu.run(Ticks::new(5));

        slu.reset(ResetKind::Hard);
        assert_eq!(*slu.config(), SluConfig::default());
        assert_eq!(slu.beam(), BeamPosition::default());
        assert_eq!(slu.palette().entry(PaletteBank::UlaFirst, 1).rgb8, 0x02);
    }

    #[test]
    fn observable_paths() {
        let mut slu = slu(4, 8);
        slu.set_layer_priority(LayerPriority::Blend5);
        slu.run(Ticks::new(9));

        assert_eq!(slu.query("beam.row"), Some(Value::U32(1)));
        assert_eq!(slu.query("beam.column"), Some(Value::U32(1)));
        assert_eq!(slu.query("layer_priority"), Some(Value::from("BLEND_5")));
        assert_eq!(slu.query("palette.bank"), Some(Value::from("ula_first")));
        assert_eq!(slu.query("palette.ula_first.0x0F"), Some(Value::U16(0x1FF)));
        assert_eq!(slu.query("palette.layer2_first.$10"), Some(Value::U16(0x020)));
        assert_eq!(slu.query("palette.ula_first.256"), None);
        assert_eq!(slu.query("palette.copper.1"), None);
        assert_eq!(slu.query("sprites.count"), None);
        assert!(slu.query_paths().contains(&"palette.<bank>.<index>"));
    }
}
