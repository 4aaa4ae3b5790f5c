//! Per-layer clip windows.
//!
//! Each layer has an inclusive rectangle in its own pixel units. Pixels
//! outside it are transparent (or border, for the ULA). The rectangle is
//! written one coordinate at a time through a cycling index:
//! x1, x2, y1, y2, then back to x1.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Inclusive clip rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClipWindow {
    pub x1: u8,
    pub x2: u8,
    pub y1: u8,
    pub y2: u8,
}

impl ClipWindow {
    /// 256x192, the ULA, Layer 2 and sprite default.
    pub const DISPLAY: Self = Self::new(0, 255, 0, 191);
    /// Tilemap default; x is in units of 4 pixels.
    pub const TILEMAP: Self = Self::new(0, 159, 0, 255);

    #[must_use]
    pub const fn new(x1: u8, x2: u8, y1: u8, y2: u8) -> Self {
        Self { x1, x2, y1, y2 }
    }

    /// Is `(x, y)` inside the window? An inverted range (x1 > x2)
    /// contains nothing.
    #[must_use]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        (u32::from(self.x1)..=u32::from(self.x2)).contains(&x)
            && (u32::from(self.y1)..=u32::from(self.y2)).contains(&y)
    }

    fn coordinate(&self, index: u8) -> u8 {
        match index & 0x03 {
            0 => self.x1,
            1 => self.x2,
            2 => self.y1,
            _ => self.y2,
        }
    }
}

/// Layers that own a clip window, in clip control bit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClipLayer {
    Layer2 = 0,
    Sprites = 1,
    Ula = 2,
    Tilemap = 3,
}

impl ClipLayer {
    pub const ALL: [Self; 4] = [Self::Layer2, Self::Sprites, Self::Ula, Self::Tilemap];

    const fn default_window(self) -> ClipWindow {
        match self {
            Self::Tilemap => ClipWindow::TILEMAP,
            _ => ClipWindow::DISPLAY,
        }
    }
}

/// The four clip windows and their write cursors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipWindows {
    windows: [ClipWindow; 4],
    /// Coordinates being written, committed on the fourth write.
    pending: [ClipWindow; 4],
    index: [u8; 4],
}

impl ClipWindows {
    #[must_use]
    pub fn new() -> Self {
        let windows = ClipLayer::ALL.map(ClipLayer::default_window);
        Self {
            windows,
            pending: windows,
            index: [0; 4],
        }
    }

    #[must_use]
    pub fn window(&self, layer: ClipLayer) -> &ClipWindow {
        &self.windows[layer as usize]
    }

    /// Replace a window directly and restart its write cursor.
    pub fn set(&mut self, layer: ClipLayer, window: ClipWindow) {
        self.windows[layer as usize] = window;
        self.pending[layer as usize] = window;
        self.index[layer as usize] = 0;
    }

    /// Write the next coordinate. The window takes effect once y2 lands.
    pub fn write(&mut self, layer: ClipLayer, value: u8) {
        let slot = layer as usize;
        let pending = &mut self.pending[slot];
        match self.index[slot] {
            0 => pending.x1 = value,
            1 => pending.x2 = value,
            2 => pending.y1 = value,
            _ => pending.y2 = value,
        }

        self.index[slot] = (self.index[slot] + 1) & 0x03;
        if self.index[slot] == 0 {
            self.windows[slot] = *pending;
        }
    }

    /// The coordinate the write cursor points at.
    #[must_use]
    pub fn read(&self, layer: ClipLayer) -> u8 {
        let slot = layer as usize;
        self.pending[slot].coordinate(self.index[slot])
    }

    /// Clip control write: bits 0-3 restart the Layer 2, sprite, ULA and
    /// tilemap cursors.
    pub fn write_control(&mut self, value: u8) {
        for layer in ClipLayer::ALL {
            if value & (1 << layer as u8) != 0 {
                self.index[layer as usize] = 0;
            }
        }
    }

    /// Clip control read: cursor positions packed two bits per layer,
    /// Layer 2 in bits 1-0 up to tilemap in bits 7-6.
    #[must_use]
    pub fn read_control(&self) -> u8 {
        ClipLayer::ALL
            .iter()
            .fold(0, |acc, &layer| acc | (self.index[layer as usize] << (2 * layer as u8)))
    }
}

impl Default for ClipWindows {
    fn default() -> Self {
        Self::new()
    }
}
