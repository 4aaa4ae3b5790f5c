//! Transparency and priority resolution.
//!
//! Turns the four layer candidates for one pixel into a single display
//! colour. Everything here is a pure function of the configuration and the
//! layer outputs.

use crate::config::{BlendMode, LayerPriority, SluConfig};
use crate::layers::{Layer2Pixel, SpritePixel, TilemapPixel, UlaPixel};
use crate::palette::{PaletteEntry, rgb8_to_rgb16};

/// Layer outputs for one pixel.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerInputs {
    pub ula: UlaPixel,
    pub tilemap: TilemapPixel,
    pub sprite: SpritePixel,
    pub layer2: Layer2Pixel,
}

/// A colour with its transparency. Transparent candidates carry black.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    transparent: bool,
    colour: PaletteEntry,
}

impl Candidate {
    const NONE: Self = Self {
        transparent: true,
        colour: PaletteEntry::BLACK,
    };

    fn new(transparent: bool, colour: PaletteEntry) -> Self {
        if transparent {
            Self::NONE
        } else {
            Self {
                transparent,
                colour,
            }
        }
    }

    /// Same colour, made transparent when `hidden`.
    fn unless(self, hidden: bool) -> Self {
        Self {
            transparent: self.transparent || hidden,
            colour: self.colour,
        }
    }

    fn rgb16(self) -> Option<u16> {
        (!self.transparent).then_some(self.colour.rgb16)
    }
}

/// Per-layer transparency after the derivation rules.
#[derive(Debug, Clone, Copy)]
struct Derived {
    /// ULA as seen by the mixer: ignores the enable bit.
    ula_mix: Candidate,
    ula: Candidate,
    ula_border: bool,
    tilemap: Candidate,
    tilemap_below: bool,
    /// ULA and tilemap combined, or their stencil.
    ula_tilemap: Candidate,
    sprite_transparent: bool,
    sprite_rgb16: u16,
    layer2: Candidate,
    layer2_priority: bool,
}

fn derive(config: &SluConfig, inputs: &LayerInputs) -> Derived {
    let LayerInputs {
        ula,
        tilemap: tm,
        sprite,
        layer2,
    } = *inputs;
    let transparent_rgb8 = config.transparent_rgb8;

    let ula_mix_transparent = ula.clipped || ula.colour.rgb8 == transparent_rgb8;
    // The mixer adds the ULA colour when it shows and black when it does not.
    let ula_mix = Candidate::new(ula_mix_transparent, ula.colour);
    let ula_final = Candidate::new(ula_mix_transparent || !ula.enabled, ula.colour);

    // The transparent index only applies to text-mode tiles.
    let tm_transparent = !tm.enabled
        || !tm.pixel_enabled
        || (tm.text_mode && tm.colour.rgb8 == transparent_rgb8);
    let tilemap = Candidate::new(tm_transparent, tm.colour);

    let combined = Candidate {
        transparent: ula_final.transparent && tilemap.transparent,
        colour: if !tilemap.transparent && (!tm.below || ula_final.transparent) {
            tilemap.colour
        } else {
            ula_final.colour
        },
    };

    let ula_tilemap = if config.stencil_mode && ula.enabled && tm.enabled {
        stencil(ula_final, tilemap)
    } else {
        combined
    };

    let layer2_transparent = !layer2.pixel_enabled || layer2.colour.rgb8 == transparent_rgb8;

    Derived {
        ula_mix,
        ula: ula_final,
        ula_border: ula.border,
        tilemap,
        tilemap_below: tm.below,
        ula_tilemap,
        sprite_transparent: !sprite.pixel_enabled,
        sprite_rgb16: if sprite.pixel_enabled { sprite.rgb16 } else { 0 },
        layer2: Candidate::new(layer2_transparent, layer2.colour),
        layer2_priority: !layer2_transparent && layer2.priority,
    }
}

/// Bitwise AND of the two colours, opaque only when both are.
fn stencil(ula: Candidate, tilemap: Candidate) -> Candidate {
    let transparent = ula.transparent || tilemap.transparent;
    Candidate::new(
        transparent,
        PaletteEntry::from_rgb9(ula.colour.rgb9 & tilemap.colour.rgb9, false),
    )
}

/// The three blend operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Operands {
    mix: Candidate,
    top: Candidate,
    bottom: Candidate,
}

fn blend_operands(mode: BlendMode, d: &Derived) -> Operands {
    match mode {
        BlendMode::Ula => Operands {
            mix: d.ula_mix,
            top: d.tilemap.unless(d.tilemap_below),
            bottom: d.tilemap.unless(!d.tilemap_below),
        },
        BlendMode::None => {
            let (top, bottom) = if d.tilemap_below {
                (d.ula, d.tilemap)
            } else {
                (d.tilemap, d.ula)
            };
            Operands {
                mix: Candidate::NONE,
                top,
                bottom,
            }
        }
        BlendMode::UlaTilemapMix => Operands {
            mix: d.ula_tilemap,
            top: Candidate::NONE,
            bottom: Candidate::NONE,
        },
        BlendMode::Tilemap => Operands {
            mix: d.tilemap,
            top: d.ula.unless(!d.tilemap_below),
            bottom: d.ula.unless(d.tilemap_below),
        },
    }
}

/// Per-channel sum of Layer 2 and the mix operand, four bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mixer {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Mixer {
    #[must_use]
    pub fn sum(layer2: &PaletteEntry, mix: &PaletteEntry) -> Self {
        Self {
            r: layer2.red() + mix.red(),
            g: layer2.green() + mix.green(),
            b: layer2.blue() + mix.blue(),
        }
    }

    #[must_use]
    pub fn map(self, f: impl Fn(u8) -> u8) -> Self {
        Self {
            r: f(self.r),
            g: f(self.g),
            b: f(self.b),
        }
    }

    /// Display colour. Channels must already be clamped.
    #[must_use]
    pub fn rgb16(self) -> u16 {
        solid(self.r, self.g, self.b)
    }
}

/// BLEND_5 darkening of one mixer channel.
#[must_use]
pub fn attenuate(channel: u8) -> u8 {
    if channel <= 4 {
        0
    } else if channel & 0x0C == 0x0C {
        7
    } else {
        channel - 5
    }
}

/// Saturate a 4-bit mixer channel to 3 bits.
#[must_use]
pub fn clamp(channel: u8) -> u8 {
    if channel & 0x08 != 0 { 7 } else { channel }
}

/// Pack 3-bit channels into the display format.
#[must_use]
pub fn solid(r: u8, g: u8, b: u8) -> u16 {
    (u16::from(r & 0x07) << 13) | (u16::from(g & 0x07) << 9) | (u16::from(b & 0x07) << 5)
}

/// Resolve one pixel to its display colour.
#[must_use]
pub fn resolve(config: &SluConfig, inputs: &LayerInputs) -> u16 {
    choose(config, &derive(config, inputs)).unwrap_or_else(|| rgb8_to_rgb16(config.fallback_rgb8))
}

fn choose(config: &SluConfig, d: &Derived) -> Option<u16> {
    let layer2 = d.layer2.rgb16();
    let promoted = layer2.filter(|_| d.layer2_priority);
    let sprite = (!d.sprite_transparent).then_some(d.sprite_rgb16);
    let ula_tilemap = d.ula_tilemap.rgb16();
    // Border ULA gives way to a sprite when no tile covers it.
    let ula_tilemap_over_sprite =
        ula_tilemap.filter(|_| !(d.ula_border && d.tilemap.transparent && !d.sprite_transparent));

    match config.layer_priority {
        LayerPriority::Slu => promoted.or(sprite).or(layer2).or(ula_tilemap),
        LayerPriority::Lsu => layer2.or(sprite).or(ula_tilemap),
        LayerPriority::Sul => promoted.or(sprite).or(ula_tilemap).or(layer2),
        LayerPriority::Lus => layer2.or(ula_tilemap_over_sprite).or(sprite),
        LayerPriority::Usl => promoted.or(ula_tilemap_over_sprite).or(sprite).or(layer2),
        LayerPriority::Uls => promoted.or(ula_tilemap_over_sprite).or(layer2).or(sprite),
        LayerPriority::Blend | LayerPriority::Blend5 => {
            let ops = blend_operands(config.blend_mode, d);
            let mut mixer = Mixer::sum(&d.layer2.colour, &ops.mix.colour);
            if config.layer_priority == LayerPriority::Blend5 && !ops.mix.transparent {
                mixer = mixer.map(attenuate);
            }
            let mixed = mixer.map(clamp).rgb16();

            d.layer2_priority
                .then_some(mixed)
                .or(ops.top.rgb16())
                .or(sprite)
                .or(ops.bottom.rgb16())
                .or(layer2.map(|_| mixed))
        }
    }
}
