//! ZX Spectrum Next SLU (Sprites, Layer 2, ULA) compositor.
//!
//! The SLU sits at the end of the Next's video pipeline. On every pixel clock
//! it moves the raster beam, asks each layer generator for its candidate
//! pixel, decides which one is visible under the current priority and blend
//! settings, and writes the result to a frame buffer. It also owns the
//! palette every layer looks its colours up in, and the line interrupt.
//!
//! The layer generators, copper, CPU and display are collaborators supplied
//! through [`SluBus`]; this crate never renders a layer itself.
//!
//! # Pipeline (one pixel clock)
//!
//! 1. Beam advances; at the end of the raster the frame is presented and the
//!    ULA is told the frame is complete.
//! 2. Line interrupt check.
//! 3. Copper ticks twice (it runs at 28 MHz).
//! 4. ULA ticks and maps the beam into frame-buffer space, or reports
//!    blanking, which ends the tick.
//! 5. Tilemap, sprites and Layer 2 tick at the frame-buffer position.
//! 6. [`resolve`] picks the visible colour and it is stored.
//!
//! # Colour formats
//!
//! - `rgb8`: `RRRGGGBB`. Register protocol and transparency comparisons.
//! - `rgb9`: `RRRGGGBBB`. Full precision, fed to the blend mixer.
//! - `rgb16`: `RRR0GGG0BBB00000`, what the frame buffer holds.
//!
//! # Example
//!
//! ```ignore
//! let bus = SluBus::with_ula(Box::new(my_ula));
//! let mut slu = Slu::new(SluConfig::default(), bus)?;
//! slu.write_register(registers::SPRITE_LAYER_SYSTEM, 0x08);
//! slu.run(Ticks::new(1_000));
//! ```

mod beam;
mod clip;
mod config;
mod error;
mod framebuffer;
mod layers;
mod line_irq;
mod palette;
pub mod registers;
mod resolve;
mod slu;

pub use beam::{Beam, BeamEvent, BeamPosition};
pub use clip::{ClipLayer, ClipWindow, ClipWindows};
pub use config::{
    BlendMode, DEFAULT_FALLBACK_RGB8, DEFAULT_TRANSPARENT_RGB8, LayerPriority, SluConfig,
};
pub use error::SluError;
pub use framebuffer::{FB_HEIGHT, FB_WIDTH, FrameBuffer};
pub use layers::{
    Blank, Copper, FrameSink, InterruptLine, Layer2Layer, Layer2Pixel, LayerContext, SluBus,
    SpriteLayer, SpritePixel, TilemapLayer, TilemapPixel, UlaLayer, UlaPixel,
};
pub use line_irq::{LINE_IRQ_ROW_MASK, LineIrq};
pub use palette::{
    PALETTE_SIZE, Palette, PaletteBank, PaletteEntry, PaletteLayer, rgb8_to_rgb9, rgb8_to_rgb16,
    rgb9_to_rgb16,
};
pub use resolve::{LayerInputs, Mixer, attenuate, clamp, resolve, solid};
pub use slu::{ResetKind, Slu};

pub use emu_core::{Observable, Tickable, Ticks, Value};
