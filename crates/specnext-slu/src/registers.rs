//! Next registers owned by the compositor and palette.
//!
//! The register front end forwards writes and reads for these numbers;
//! everything else belongs to other devices.

use crate::clip::ClipLayer;
use crate::config::{BlendMode, LayerPriority};
use crate::slu::Slu;

pub const GLOBAL_TRANSPARENCY: u8 = 0x14;
pub const SPRITE_LAYER_SYSTEM: u8 = 0x15;
pub const CLIP_LAYER2: u8 = 0x18;
pub const CLIP_SPRITES: u8 = 0x19;
pub const CLIP_ULA: u8 = 0x1A;
pub const CLIP_TILEMAP: u8 = 0x1B;
pub const CLIP_CONTROL: u8 = 0x1C;
pub const ACTIVE_LINE_MSB: u8 = 0x1E;
pub const ACTIVE_LINE_LSB: u8 = 0x1F;
pub const LINE_IRQ_CONTROL: u8 = 0x22;
pub const LINE_IRQ_VALUE_LSB: u8 = 0x23;
pub const PALETTE_INDEX: u8 = 0x40;
pub const PALETTE_VALUE_8: u8 = 0x41;
pub const PALETTE_CONTROL: u8 = 0x43;
pub const PALETTE_VALUE_9: u8 = 0x44;
pub const FALLBACK_COLOUR: u8 = 0x4A;
pub const ULA_CONTROL: u8 = 0x68;

/// Layer priority field of the sprite and layers system register.
const PRIORITY_SHIFT: u8 = 2;
const PRIORITY_MASK: u8 = 0x07 << PRIORITY_SHIFT;

fn clip_layer(reg: u8) -> Option<ClipLayer> {
    match reg {
        CLIP_LAYER2 => Some(ClipLayer::Layer2),
        CLIP_SPRITES => Some(ClipLayer::Sprites),
        CLIP_ULA => Some(ClipLayer::Ula),
        CLIP_TILEMAP => Some(ClipLayer::Tilemap),
        _ => None,
    }
}

impl Slu {
    /// Handle a register write. Returns false if the register is not ours.
    ///
    /// Writes to the read-only active line registers are accepted and
    /// dropped.
    pub fn write_register(&mut self, reg: u8, value: u8) -> bool {
        if let Some(layer) = clip_layer(reg) {
            self.clip_windows_mut().write(layer, value);
            return true;
        }

        match reg {
            GLOBAL_TRANSPARENCY => self.set_transparent_rgb8(value),
            SPRITE_LAYER_SYSTEM => {
                self.set_layer_priority(LayerPriority::from_bits(value >> PRIORITY_SHIFT));
            }
            CLIP_CONTROL => self.clip_windows_mut().write_control(value),
            ACTIVE_LINE_MSB | ACTIVE_LINE_LSB => {}
            LINE_IRQ_CONTROL => {
                self.bus_mut().ula.set_frame_irq_enabled(value & 0x04 == 0);
                let row = (u16::from(value & 0x01) << 8) | (self.config().line_irq_row & 0x00FF);
                self.set_line_irq_row(row);
                self.set_line_irq_enabled(value & 0x02 != 0);
            }
            LINE_IRQ_VALUE_LSB => {
                let row = (self.config().line_irq_row & 0x0100) | u16::from(value);
                self.set_line_irq_row(row);
            }
            PALETTE_INDEX => self.palette_mut().set_index(value),
            PALETTE_VALUE_8 => self.palette_mut().write_rgb8(value),
            PALETTE_CONTROL => self.palette_mut().write_control(value),
            PALETTE_VALUE_9 => self.palette_mut().write_rgb9(value),
            FALLBACK_COLOUR => self.set_fallback_rgb8(value),
            ULA_CONTROL => {
                self.set_ula_enabled(value & 0x80 == 0);
                self.set_blend_mode(BlendMode::from_bits(value >> 5));
                self.set_stencil_mode(value & 0x01 != 0);
            }
            _ => return false,
        }
        true
    }

    /// Read a register, or `None` if it is not ours.
    ///
    /// The sprite and layers system register only reports the priority
    /// field; its other bits belong to the sprite engine.
    #[must_use]
    pub fn read_register(&self, reg: u8) -> Option<u8> {
        if let Some(layer) = clip_layer(reg) {
            return Some(self.clip_windows().read(layer));
        }

        let config = self.config();
        let palette = self.palette();
        let value = match reg {
            GLOBAL_TRANSPARENCY => config.transparent_rgb8,
            SPRITE_LAYER_SYSTEM => (config.layer_priority.bits() << PRIORITY_SHIFT) & PRIORITY_MASK,
            CLIP_CONTROL => self.clip_windows().read_control(),
            ACTIVE_LINE_MSB => ((self.active_line() >> 8) & 0x01) as u8,
            ACTIVE_LINE_LSB => (self.active_line() & 0xFF) as u8,
            LINE_IRQ_CONTROL => {
                (u8::from(self.line_irq_active()) << 7)
                    | (u8::from(!self.bus().ula.frame_irq_enabled()) << 2)
                    | (u8::from(config.line_irq_enabled) << 1)
                    | (config.line_irq_row >> 8) as u8
            }
            LINE_IRQ_VALUE_LSB => (config.line_irq_row & 0x00FF) as u8,
            PALETTE_INDEX => palette.index(),
            PALETTE_VALUE_8 => palette.read_rgb8(),
            PALETTE_CONTROL => palette.read_control(),
            PALETTE_VALUE_9 => palette.read_rgb9(),
            FALLBACK_COLOUR => config.fallback_rgb8,
            ULA_CONTROL => {
                (u8::from(!config.ula_enabled) << 7)
                    | (config.blend_mode.bits() << 5)
                    | u8::from(config.stencil_mode)
            }
            _ => return None,
        };
        Some(value)
    }
}
