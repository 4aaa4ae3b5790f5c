//! Line interrupt generator.

use crate::beam::BeamPosition;

/// Mask for the 9-bit target row.
pub const LINE_IRQ_ROW_MASK: u16 = 0x01FF;

/// Raises an interrupt when the beam reaches column 0 of the target row.
///
/// Enable and target row are configuration; only the `active` latch lives
/// here.
#[derive(Debug, Clone, Default)]
pub struct LineIrq {
    active: bool,
}

impl LineIrq {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate at the current beam position. Returns true on the tick the
    /// interrupt fires; `active` holds for that tick only.
    pub fn update(&mut self, enabled: bool, target_row: u16, beam: BeamPosition) -> bool {
        self.active = enabled
            && beam.row == u32::from(target_row & LINE_IRQ_ROW_MASK)
            && beam.column == 0;
        self.active
    }

    #[must_use]
    pub fn active(&self) -> bool {
        self.active
    }

    pub fn clear(&mut self) {
        self.active = false;
    }
}
