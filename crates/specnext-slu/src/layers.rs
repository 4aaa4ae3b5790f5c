//! Collaborators the compositor drives once per pixel clock.
//!
//! Each layer generator renders on its own terms and hands back a candidate
//! pixel for one position. The ULA owns the translation from beam space to
//! frame-buffer space, so it is ticked first; every other layer is addressed
//! in frame-buffer coordinates.

use crate::clip::ClipWindow;
use crate::framebuffer::FrameBuffer;
use crate::palette::{Palette, PaletteEntry};

/// Read-only state handed to a layer on every tick.
#[derive(Clone, Copy)]
pub struct LayerContext<'a> {
    pub palette: &'a Palette,
    /// The layer's own committed clip window.
    pub clip: &'a ClipWindow,
}

/// ULA output for one beam position inside the frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UlaPixel {
    pub enabled: bool,
    pub border: bool,
    pub clipped: bool,
    pub colour: PaletteEntry,
    pub fb_row: u32,
    pub fb_column: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TilemapPixel {
    /// Layer enabled at all.
    pub enabled: bool,
    pub pixel_enabled: bool,
    /// Tile attribute: draw under the ULA.
    pub below: bool,
    pub text_mode: bool,
    pub colour: PaletteEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpritePixel {
    pub pixel_enabled: bool,
    /// Already in display format.
    pub rgb16: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Layer2Pixel {
    pub pixel_enabled: bool,
    pub colour: PaletteEntry,
    /// Palette priority bit; lifts the pixel above every other layer.
    pub priority: bool,
}

/// Legacy Spectrum display, including border and timing geometry.
pub trait UlaLayer {
    /// Raster size as `(rows, columns)` in pixel clocks. Never zero.
    fn display_size(&self) -> (u32, u32);

    /// Render the pixel under the beam. `None` means the beam is outside
    /// the frame buffer (blanking) and nothing else is ticked.
    fn tick(&mut self, row: u32, column: u32, ctx: &LayerContext<'_>) -> Option<UlaPixel>;

    /// Called once the last pixel of a frame has been presented.
    fn frame_complete(&mut self);

    /// ULA control bit 7 (inverted).
    fn set_output_enabled(&mut self, _enabled: bool) {}

    /// ULA frame interrupt enable, shared with the line interrupt control.
    fn set_frame_irq_enabled(&mut self, _enabled: bool) {}

    fn frame_irq_enabled(&self) -> bool {
        true
    }
}

pub trait TilemapLayer {
    fn tick(&mut self, fb_row: u32, fb_column: u32, ctx: &LayerContext<'_>) -> TilemapPixel;
}

pub trait SpriteLayer {
    fn tick(&mut self, fb_row: u32, fb_column: u32, ctx: &LayerContext<'_>) -> SpritePixel;
}

pub trait Layer2Layer {
    fn tick(&mut self, fb_row: u32, fb_column: u32, ctx: &LayerContext<'_>) -> Layer2Pixel;
}

/// Display-synchronised co-processor. Runs at twice the pixel clock.
pub trait Copper {
    fn tick(&mut self, row: u32, column: u32);
}

/// The CPU's maskable interrupt input.
pub trait InterruptLine {
    fn irq(&mut self);
}

/// Presentation backend. Receives the whole frame at frame end.
pub trait FrameSink {
    fn present(&mut self, frame: &FrameBuffer);
}

/// Everything the compositor talks to.
pub struct SluBus {
    pub ula: Box<dyn UlaLayer>,
    pub tilemap: Box<dyn TilemapLayer>,
    pub sprites: Box<dyn SpriteLayer>,
    pub layer2: Box<dyn Layer2Layer>,
    pub copper: Box<dyn Copper>,
    pub cpu: Box<dyn InterruptLine>,
    pub display: Box<dyn FrameSink>,
}

/// A layer that never draws. Stands in for generators a host does not
/// emulate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blank;

impl TilemapLayer for Blank {
    fn tick(&mut self, _fb_row: u32, _fb_column: u32, _ctx: &LayerContext<'_>) -> TilemapPixel {
        TilemapPixel::default()
    }
}

impl SpriteLayer for Blank {
    fn tick(&mut self, _fb_row: u32, _fb_column: u32, _ctx: &LayerContext<'_>) -> SpritePixel {
        SpritePixel::default()
    }
}

impl Layer2Layer for Blank {
    fn tick(&mut self, _fb_row: u32, _fb_column: u32, _ctx: &LayerContext<'_>) -> Layer2Pixel {
        Layer2Pixel::default()
    }
}

impl Copper for Blank {
    fn tick(&mut self, _row: u32, _column: u32) {}
}

impl InterruptLine for Blank {
    fn irq(&mut self) {}
}

impl FrameSink for Blank {
    fn present(&mut self, _frame: &FrameBuffer) {}
}

impl SluBus {
    /// A bus with only a ULA; every other collaborator is [`Blank`].
    #[must_use]
    pub fn with_ula(ula: Box<dyn UlaLayer>) -> Self {
        Self {
            ula,
            tilemap: Box::new(Blank),
            sprites: Box::new(Blank),
            layer2: Box::new(Blank),
            copper: Box::new(Blank),
            cpu: Box::new(Blank),
            display: Box::new(Blank),
        }
    }
}
