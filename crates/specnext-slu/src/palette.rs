//! Next palette store.
//!
//! Eight banks of 256 entries: a first and a second bank for each of the ULA,
//! Layer 2, sprite and tilemap layers. Each entry is kept in three precisions
//! so the compositor never converts on the hot path:
//!
//! - `rgb8`: `RRRGGGBB`, what the 8-bit register protocol and the global
//!   transparency comparison see.
//! - `rgb9`: `RRRGGGBBB`, the full hardware precision, used by the blend mixer.
//! - `rgb16`: display colour, each 3-bit channel left-aligned in a nibble
//!   (`R << 13 | G << 9 | B << 5`).
//!
//! Editing goes through a single cursor (selected bank + index) shared by
//! two write protocols. The 8-bit protocol derives the missing blue bit; the
//! 9-bit protocol takes two writes per entry, the second carrying the blue
//! LSB and the Layer 2 priority bit.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Entries per bank.
pub const PALETTE_SIZE: usize = 256;

/// Standard Spectrum colours as `rgb8`, normal then bright, in GRB order
/// (black, blue, red, magenta, green, cyan, yellow, white).
const ULA_DEFAULT_COLOURS: [u8; 16] = [
    0x00, 0x02, 0xA0, 0xA2, 0x14, 0x16, 0xB4, 0xB6, // normal
    0x00, 0x03, 0xE0, 0xE7, 0x1C, 0x1F, 0xFC, 0xFF, // bright
];

/// One palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaletteEntry {
    pub rgb8: u8,
    pub rgb9: u16,
    pub rgb16: u16,
    pub is_layer2_priority: bool,
}

impl PaletteEntry {
    pub const BLACK: Self = Self {
        rgb8: 0,
        rgb9: 0,
        rgb16: 0,
        is_layer2_priority: false,
    };

    /// Build an entry from a 9-bit colour.
    #[must_use]
    pub const fn from_rgb9(rgb9: u16, is_layer2_priority: bool) -> Self {
        let rgb9 = rgb9 & 0x1FF;
        Self {
            rgb8: (rgb9 >> 1) as u8,
            rgb9,
            rgb16: rgb9_to_rgb16(rgb9),
            is_layer2_priority,
        }
    }

    /// Build an entry from an 8-bit colour. The blue LSB is the OR of the
    /// two blue bits.
    #[must_use]
    pub const fn from_rgb8(rgb8: u8) -> Self {
        Self::from_rgb9(rgb8_to_rgb9(rgb8), false)
    }

    /// 3-bit red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        ((self.rgb9 >> 6) & 0x07) as u8
    }

    /// 3-bit green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        ((self.rgb9 >> 3) & 0x07) as u8
    }

    /// 3-bit blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        (self.rgb9 & 0x07) as u8
    }
}

/// Widen `RRRGGGBB` to `RRRGGGBBB`.
#[must_use]
pub const fn rgb8_to_rgb9(rgb8: u8) -> u16 {
    let blue = rgb8 & 0x03;
    ((rgb8 as u16) << 1) | (blue != 0) as u16
}

/// Convert a 9-bit colour to the 16-bit display format.
#[must_use]
pub const fn rgb9_to_rgb16(rgb9: u16) -> u16 {
    let r = (rgb9 >> 6) & 0x07;
    let g = (rgb9 >> 3) & 0x07;
    let b = rgb9 & 0x07;
    (r << 13) | (g << 9) | (b << 5)
}

/// Convert an 8-bit colour to the 16-bit display format.
#[must_use]
pub const fn rgb8_to_rgb16(rgb8: u8) -> u16 {
    rgb9_to_rgb16(rgb8_to_rgb9(rgb8))
}

/// The eight banks, numbered as in palette control bits 6-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PaletteBank {
    UlaFirst = 0,
    Layer2First = 1,
    SpritesFirst = 2,
    TilemapFirst = 3,
    UlaSecond = 4,
    Layer2Second = 5,
    SpritesSecond = 6,
    TilemapSecond = 7,
}

impl PaletteBank {
    pub const ALL: [Self; 8] = [
        Self::UlaFirst,
        Self::Layer2First,
        Self::SpritesFirst,
        Self::TilemapFirst,
        Self::UlaSecond,
        Self::Layer2Second,
        Self::SpritesSecond,
        Self::TilemapSecond,
    ];

    /// Decode a 3-bit bank number. Higher bits are ignored.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self::ALL[(bits & 0x07) as usize]
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// The layer this bank belongs to.
    #[must_use]
    pub const fn layer(self) -> PaletteLayer {
        PaletteLayer::ALL[(self as usize) & 0x03]
    }

    #[must_use]
    pub const fn is_second(self) -> bool {
        (self as u8) & 0x04 != 0
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UlaFirst => "ula_first",
            Self::Layer2First => "layer2_first",
            Self::SpritesFirst => "sprites_first",
            Self::TilemapFirst => "tilemap_first",
            Self::UlaSecond => "ula_second",
            Self::Layer2Second => "layer2_second",
            Self::SpritesSecond => "sprites_second",
            Self::TilemapSecond => "tilemap_second",
        }
    }

    /// Inverse of [`PaletteBank::name`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bank| bank.name() == name)
    }
}

/// A display layer that owns a pair of banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PaletteLayer {
    Ula = 0,
    Layer2 = 1,
    Sprites = 2,
    Tilemap = 3,
}

impl PaletteLayer {
    pub const ALL: [Self; 4] = [Self::Ula, Self::Layer2, Self::Sprites, Self::Tilemap];

    /// This layer's first or second bank.
    #[must_use]
    pub const fn bank(self, second: bool) -> PaletteBank {
        PaletteBank::from_bits(self as u8 | if second { 0x04 } else { 0x00 })
    }
}

/// Palette store with its editing cursor.
pub struct Palette {
    banks: Vec<[PaletteEntry; PALETTE_SIZE]>,
    /// Bank addressed by the value registers.
    selected: PaletteBank,
    index: u8,
    auto_increment_disabled: bool,
    /// Next 9-bit write is the first of a pair.
    first_write: bool,
    /// Which bank each layer displays from, indexed by `PaletteLayer`.
    second_active: [bool; 4],
    ulanext: bool,
}

impl Palette {
    #[must_use]
    pub fn new() -> Self {
        let mut palette = Self {
            banks: vec![[PaletteEntry::BLACK; PALETTE_SIZE]; PaletteBank::ALL.len()],
            selected: PaletteBank::UlaFirst,
            index: 0,
            auto_increment_disabled: false,
            first_write: true,
            second_active: [false; 4],
            ulanext: false,
        };
        palette.load_defaults();
        palette
    }

    /// Restore power-on colours in every bank.
    pub fn load_defaults(&mut self) {
        for bank in PaletteBank::ALL {
            let entries = &mut self.banks[bank as usize];
            for (i, entry) in entries.iter_mut().enumerate() {
                *entry = PaletteEntry::from_rgb8(i as u8);
            }
            if bank.layer() == PaletteLayer::Ula {
                // Ink at 0-15, paper at 16-31.
                for (i, &rgb8) in ULA_DEFAULT_COLOURS.iter().enumerate() {
                    entries[i] = PaletteEntry::from_rgb8(rgb8);
                    entries[16 + i] = PaletteEntry::from_rgb8(rgb8);
                }
            }
        }
    }

    /// Reset the cursor and active-bank selection. Contents are kept.
    pub fn reset_cursor(&mut self) {
        self.selected = PaletteBank::UlaFirst;
        self.index = 0;
        self.auto_increment_disabled = false;
        self.first_write = true;
        self.second_active = [false; 4];
        self.ulanext = false;
    }

    /// Read any entry.
    #[must_use]
    pub fn entry(&self, bank: PaletteBank, index: u8) -> PaletteEntry {
        self.banks[bank as usize][index as usize]
    }

    /// Overwrite any entry, bypassing the cursor.
    pub fn set_entry(&mut self, bank: PaletteBank, index: u8, entry: PaletteEntry) {
        self.banks[bank as usize][index as usize] = entry;
    }

    /// Resolve a layer's colour index through its active bank.
    #[must_use]
    pub fn lookup(&self, layer: PaletteLayer, index: u8) -> PaletteEntry {
        self.entry(self.active_bank(layer), index)
    }

    #[must_use]
    pub fn active_bank(&self, layer: PaletteLayer) -> PaletteBank {
        layer.bank(self.second_active[layer as usize])
    }

    /// Choose the bank a layer displays from.
    pub fn set_active_bank(&mut self, layer: PaletteLayer, second: bool) {
        self.second_active[layer as usize] = second;
    }

    #[must_use]
    pub fn selected_bank(&self) -> PaletteBank {
        self.selected
    }

    pub fn select_bank(&mut self, bank: PaletteBank) {
        self.selected = bank;
    }

    #[must_use]
    pub fn index(&self) -> u8 {
        self.index
    }

    /// Move the cursor. Always restarts the 9-bit write pair.
    pub fn set_index(&mut self, index: u8) {
        self.index = index;
        self.first_write = true;
        log::debug!("palette: index set to {index}");
    }

    #[must_use]
    pub fn auto_increment(&self) -> bool {
        !self.auto_increment_disabled
    }

    pub fn set_auto_increment(&mut self, enabled: bool) {
        self.auto_increment_disabled = !enabled;
    }

    /// True when the next 9-bit write is the first of a pair.
    #[must_use]
    pub fn is_first_write(&self) -> bool {
        self.first_write
    }

    #[must_use]
    pub fn ulanext(&self) -> bool {
        self.ulanext
    }

    /// The entry under the cursor.
    #[must_use]
    pub fn selected_entry(&self) -> PaletteEntry {
        self.entry(self.selected, self.index)
    }

    fn store(&mut self, entry: PaletteEntry) {
        self.set_entry(self.selected, self.index, entry);
    }

    fn advance(&mut self) {
        if !self.auto_increment_disabled {
            self.index = self.index.wrapping_add(1);
        }
    }

    /// 8-bit value write: `RRRGGGBB`.
    pub fn write_rgb8(&mut self, value: u8) {
        self.store(PaletteEntry::from_rgb8(value));
        self.advance();
    }

    /// 8-bit value read. The blue LSB is dropped.
    #[must_use]
    pub fn read_rgb8(&self) -> u8 {
        let entry = self.selected_entry();
        (entry.red() << 5) | (entry.green() << 2) | (entry.blue() >> 1)
    }

    /// 9-bit value write, two writes per entry.
    ///
    /// First: `RRRGGGBB` with the blue LSB and priority cleared.
    /// Second: `P______B`, only bit 7 (priority) and bit 0 (blue LSB) used;
    /// the index advances after this one.
    pub fn write_rgb9(&mut self, value: u8) {
        if self.first_write {
            self.store(PaletteEntry::from_rgb9(u16::from(value) << 1, false));
        } else {
            let entry = self.selected_entry();
            let rgb9 = (entry.rgb9 & !0x001) | u16::from(value & 0x01);
            self.store(PaletteEntry::from_rgb9(rgb9, value & 0x80 != 0));
            self.advance();
        }
        self.first_write = !self.first_write;
    }

    /// 9-bit value read: `P______B`.
    #[must_use]
    pub fn read_rgb9(&self) -> u8 {
        let entry = self.selected_entry();
        (u8::from(entry.is_layer2_priority) << 7) | (entry.blue() & 0x01)
    }

    /// Palette control write.
    ///
    /// Bit 7 disables auto-increment, bits 6-4 select the bank to edit,
    /// bits 3-1 pick the second bank for sprites, Layer 2 and ULA, bit 0
    /// enables ULANext.
    pub fn write_control(&mut self, value: u8) {
        self.auto_increment_disabled = value & 0x80 != 0;
        self.selected = PaletteBank::from_bits(value >> 4);
        self.second_active[PaletteLayer::Sprites as usize] = value & 0x08 != 0;
        self.second_active[PaletteLayer::Layer2 as usize] = value & 0x04 != 0;
        self.second_active[PaletteLayer::Ula as usize] = value & 0x02 != 0;
        self.ulanext = value & 0x01 != 0;

        if self.ulanext {
            log::warn!("palette: ULANext mode not implemented");
        }
    }

    #[must_use]
    pub fn read_control(&self) -> u8 {
        (u8::from(self.auto_increment_disabled) << 7)
            | (self.selected.bits() << 4)
            | (u8::from(self.second_active[PaletteLayer::Sprites as usize]) << 3)
            | (u8::from(self.second_active[PaletteLayer::Layer2 as usize]) << 2)
            | (u8::from(self.second_active[PaletteLayer::Ula as usize]) << 1)
            | u8::from(self.ulanext)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb8_conversion_sets_blue_lsb_from_blue_bits() {
        assert_eq!(rgb8_to_rgb9(0x00), 0x000);
        assert_eq!(rgb8_to_rgb9(0x01), 0x003);
        assert_eq!(rgb8_to_rgb9(0x02), 0x005);
        assert_eq!(rgb8_to_rgb9(0xFC), 0x1F8);
        assert_eq!(rgb8_to_rgb9(0xFF), 0x1FF);
    }

    #[test]
    fn rgb16_left_aligns_each_channel() {
        assert_eq!(rgb9_to_rgb16(0x1FF), 0xEEE0);
        assert_eq!(rgb9_to_rgb16(0x1C0), 0xE000);
        assert_eq!(rgb9_to_rgb16(0x038), 0x0E00);
        assert_eq!(rgb9_to_rgb16(0x007), 0x00E0);
        assert_eq!(rgb8_to_rgb16(0xE3), 0xE0E0);
    }

    #[test]
    fn entry_precisions_agree() {
        let entry = PaletteEntry::from_rgb9(0x155, true);
        assert_eq!(entry.rgb8, 0xAA);
        assert_eq!((entry.red(), entry.green(), entry.blue()), (5, 2, 5));
        assert!(entry.is_layer2_priority);
    }

    #[test]
    fn bank_numbering_matches_control_register() {
        assert_eq!(PaletteBank::from_bits(0), PaletteBank::UlaFirst);
        assert_eq!(PaletteBank::from_bits(5), PaletteBank::Layer2Second);
        assert_eq!(PaletteBank::from_bits(0x0B), PaletteBank::TilemapFirst);
        assert_eq!(PaletteLayer::Tilemap.bank(true), PaletteBank::TilemapSecond);
        assert_eq!(PaletteBank::SpritesSecond.layer(), PaletteLayer::Sprites);
        assert!(PaletteBank::UlaSecond.is_second());
        assert!(!PaletteBank::TilemapFirst.is_second());
        assert_eq!(PaletteBank::from_name("layer2_second"), Some(PaletteBank::Layer2Second));
        assert_eq!(PaletteBank::from_name("copper"), None);
    }

    #[test]
    fn defaults_hold_identity_and_spectrum_colours() {
        let palette = Palette::new();
        assert_eq!(palette.entry(PaletteBank::Layer2First, 0x42).rgb8, 0x42);
        assert_eq!(palette.entry(PaletteBank::TilemapSecond, 0xE3).rgb8, 0xE3);
        // ULA bright white ink and normal blue paper.
        assert_eq!(palette.entry(PaletteBank::UlaFirst, 15).rgb8, 0xFF);
        assert_eq!(palette.entry(PaletteBank::UlaSecond, 17).rgb8, 0x02);
        assert_eq!(palette.entry(PaletteBank::UlaFirst, 32).rgb8, 32);
    }

    #[test]
    fn rgb8_read_back_drops_only_the_derived_blue_bit() {
        let mut palette = Palette::new();
        palette.set_auto_increment(false);
        for value in [0x00, 0x01, 0x02, 0x03, 0x6D, 0xE3, 0xFF] {
            palette.write_rgb8(value);
            assert_eq!(palette.read_rgb8(), value);
            let blue_lsb = palette.read_rgb9() & 0x01;
            assert_eq!(blue_lsb, u8::from(value & 0x03 != 0), "value {value:#04X}");
        }
    }

    #[test]
    fn rgb8_write_clears_priority() {
        let mut palette = Palette::new();
        palette.set_auto_increment(false);
        palette.write_rgb9(0xFF);
        palette.write_rgb9(0x80);
        assert!(palette.selected_entry().is_layer2_priority);
        palette.write_rgb8(0xFF);
        assert!(!palette.selected_entry().is_layer2_priority);
    }

    #[test]
    fn auto_increment_advances_and_wraps() {
        let mut palette = Palette::new();
        palette.set_index(250);
        for _ in 0..10 {
            palette.write_rgb8(0x1C);
        }
        assert_eq!(palette.index(), 4);
        assert_eq!(palette.entry(PaletteBank::UlaFirst, 255).rgb8, 0x1C);
        assert_eq!(palette.entry(PaletteBank::UlaFirst, 3).rgb8, 0x1C);
    }

    #[test]
    fn auto_increment_disabled_holds_index() {
        let mut palette = Palette::new();
        palette.write_control(0x80);
        palette.set_index(7);
        for value in 0..20 {
            palette.write_rgb8(value);
            palette.write_rgb9(value);
        }
        assert_eq!(palette.index(), 7);
    }

    #[test]
    fn nine_bit_pair_combines_both_writes() {
        let mut palette = Palette::new();
        palette.select_bank(PaletteBank::Layer2First);
        palette.set_index(0x10);

        palette.write_rgb9(0b101_010_11);
        assert_eq!(palette.index(), 0x10, "first write must not advance");
        let half = palette.entry(PaletteBank::Layer2First, 0x10);
        assert_eq!(half.rgb9, 0b101_010_110);
        assert!(!half.is_layer2_priority);

        palette.write_rgb9(0x81);
        assert_eq!(palette.index(), 0x11);
        let entry = palette.entry(PaletteBank::Layer2First, 0x10);
        assert_eq!(entry.rgb9, 0b101_010_111);
        assert!(entry.is_layer2_priority);
        assert_eq!(entry.rgb16, rgb9_to_rgb16(0b101_010_111));
    }

    #[test]
    fn index_write_restarts_nine_bit_pair() {
        let mut palette = Palette::new();
        palette.set_index(3);
        palette.write_rgb9(0xE0);
        assert!(!palette.is_first_write());

        palette.set_index(3);
        assert!(palette.is_first_write());
        // Treated as a first write again: overwrites colour, no advance.
        palette.write_rgb9(0x1C);
        assert_eq!(palette.index(), 3);
        assert_eq!(palette.selected_entry().rgb9, 0x1C << 1);
    }

    #[test]
    fn nine_bit_read_reports_priority_and_blue_lsb() {
        let mut palette = Palette::new();
        palette.set_auto_increment(false);
        palette.write_rgb9(0x00);
        palette.write_rgb9(0x81);
        assert_eq!(palette.read_rgb9(), 0x81);
        palette.write_rgb9(0x00);
        palette.write_rgb9(0x00);
        assert_eq!(palette.read_rgb9(), 0x00);
    }

    #[test]
    fn control_register_round_trips() {
        let mut palette = Palette::new();
        palette.write_control(0b1_110_1010);
        assert!(!palette.auto_increment());
        assert_eq!(palette.selected_bank(), PaletteBank::SpritesSecond);
        assert_eq!(palette.active_bank(PaletteLayer::Sprites), PaletteBank::SpritesSecond);
        assert_eq!(palette.active_bank(PaletteLayer::Layer2), PaletteBank::Layer2First);
        assert_eq!(palette.active_bank(PaletteLayer::Ula), PaletteBank::UlaSecond);
        assert_eq!(palette.read_control(), 0b1_110_1010);
    }

    #[test]
    fn lookup_follows_active_bank() {
        let mut palette = Palette::new();
        palette.set_entry(PaletteBank::TilemapSecond, 9, PaletteEntry::from_rgb8(0x55));
        assert_eq!(palette.lookup(PaletteLayer::Tilemap, 9).rgb8, 9);
        palette.set_active_bank(PaletteLayer::Tilemap, true);
        assert_eq!(palette.lookup(PaletteLayer::Tilemap, 9).rgb8, 0x55);
    }

    #[test]
    fn reset_cursor_keeps_contents() {
        let mut palette = Palette::new();
        palette.write_control(0xFE);
        palette.set_index(9);
        palette.write_rgb9(0x00);
        palette.set_entry(PaletteBank::UlaFirst, 1, PaletteEntry::BLACK);

        palette.reset_cursor();
        assert_eq!(palette.selected_bank(), PaletteBank::UlaFirst);
        assert_eq!(palette.index(), 0);
        assert!(palette.auto_increment());
        assert!(palette.is_first_write());
        assert_eq!(palette.read_control(), 0x00);
        assert_eq!(palette.entry(PaletteBank::UlaFirst, 1), PaletteEntry::BLACK);

        palette.load_defaults();
        assert_eq!(palette.entry(PaletteBank::UlaFirst, 1).rgb8, 0x02);
    }
}
