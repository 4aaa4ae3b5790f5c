//! Compositor configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::clip::ClipWindows;

/// Default global transparency colour (bright magenta, `rgb8`).
pub const DEFAULT_TRANSPARENT_RGB8: u8 = 0xE3;

/// Default fallback colour (`rgb8`).
pub const DEFAULT_FALLBACK_RGB8: u8 = 0xE3;

/// Layer ordering, front to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LayerPriority {
    /// Sprites over Layer 2 over ULA.
    #[default]
    Slu = 0,
    /// Layer 2 over sprites over ULA.
    Lsu = 1,
    /// Sprites over ULA over Layer 2.
    Sul = 2,
    /// Layer 2 over ULA over sprites.
    Lus = 3,
    /// ULA over sprites over Layer 2.
    Usl = 4,
    /// ULA over Layer 2 over sprites.
    Uls = 5,
    /// Sprites over Layer 2 + ULA, channels clamped to 7.
    Blend = 6,
    /// Sprites over Layer 2 + ULA - 5, channels clamped to 0..=7.
    Blend5 = 7,
}

impl LayerPriority {
    pub const ALL: [Self; 8] = [
        Self::Slu,
        Self::Lsu,
        Self::Sul,
        Self::Lus,
        Self::Usl,
        Self::Uls,
        Self::Blend,
        Self::Blend5,
    ];

    /// Decode a 3-bit priority. Higher bits are ignored.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self::ALL[(bits & 0x07) as usize]
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn is_blend(self) -> bool {
        matches!(self, Self::Blend | Self::Blend5)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Slu => "SLU",
            Self::Lsu => "LSU",
            Self::Sul => "SUL",
            Self::Lus => "LUS",
            Self::Usl => "USL",
            Self::Uls => "ULS",
            Self::Blend => "BLEND",
            Self::Blend5 => "BLEND_5",
        }
    }
}

/// Which layers feed the blend mixer in the BLEND modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BlendMode {
    /// ULA mixes with Layer 2; tilemap sits above or below.
    #[default]
    Ula = 0,
    /// Nothing mixes; ULA and tilemap are ordered by the tilemap's below bit.
    None = 1,
    /// Combined ULA + tilemap mixes with Layer 2.
    UlaTilemapMix = 2,
    /// Tilemap mixes with Layer 2; ULA sits above or below.
    Tilemap = 3,
}

impl BlendMode {
    pub const ALL: [Self; 4] = [Self::Ula, Self::None, Self::UlaTilemapMix, Self::Tilemap];

    /// Decode a 2-bit blend mode. Higher bits are ignored.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self::ALL[(bits & 0x03) as usize]
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Runtime compositor state set through the register surface.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SluConfig {
    pub layer_priority: LayerPriority,
    pub blend_mode: BlendMode,
    /// ULA control bit 7, inverted.
    pub ula_enabled: bool,
    /// AND the ULA and tilemap colours when both are enabled.
    pub stencil_mode: bool,
    /// `rgb8` value treated as transparent.
    pub transparent_rgb8: u8,
    /// `rgb8` colour shown where every layer is transparent.
    pub fallback_rgb8: u8,
    pub line_irq_enabled: bool,
    pub line_irq_row: u16,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub clip: ClipWindows,
}

impl Default for SluConfig {
    fn default() -> Self {
        Self {
            layer_priority: LayerPriority::Slu,
            blend_mode: BlendMode::Ula,
            ula_enabled: true,
            stencil_mode: false,
            transparent_rgb8: DEFAULT_TRANSPARENT_RGB8,
            fallback_rgb8: DEFAULT_FALLBACK_RGB8,
            line_irq_enabled: false,
            line_irq_row: 0,
            clip: ClipWindows::new(),
        }
    }
}
