//! Raster beam position.

/// Where the beam is. `(0, 0)` is the top-left pixel of the content area;
/// the display geometry comes from the ULA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BeamPosition {
    pub row: u32,
    pub column: u32,
}

/// What happened on an advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeamEvent {
    /// Moved along the current line.
    Pixel,
    /// Wrapped to the start of the next line.
    Line,
    /// Wrapped to the top-left; a frame just finished.
    Frame,
}

/// Beam timer.
#[derive(Debug, Clone, Default)]
pub struct Beam {
    position: BeamPosition,
}

impl Beam {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn position(&self) -> BeamPosition {
        self.position
    }

    #[must_use]
    pub fn row(&self) -> u32 {
        self.position.row
    }

    #[must_use]
    pub fn column(&self) -> u32 {
        self.position.column
    }

    /// Move one pixel right on a display of `rows` x `columns`.
    ///
    /// Both dimensions are non-zero for every ULA timing. A geometry that
    /// shrinks under the beam wraps on the next advance.
    pub fn advance(&mut self, rows: u32, columns: u32) -> BeamEvent {
        self.position.column += 1;
        if self.position.column < columns {
            return BeamEvent::Pixel;
        }

        self.position.column = 0;
        self.position.row += 1;
        if self.position.row < rows {
            return BeamEvent::Line;
        }

        self.position.row = 0;
        BeamEvent::Frame
    }

    pub fn reset(&mut self) {
        self.position = BeamPosition::default();
    }

    /// Place the beam (for testing).
    #[doc(hidden)]
    pub fn set_position(&mut self, row: u32, column: u32) {
        self.position = BeamPosition { row, column };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_then_row_then_frame() {
        let mut beam = Beam::new();
        assert_eq!(beam.advance(2, 3), BeamEvent::Pixel);
        assert_eq!(beam.advance(2, 3), BeamEvent::Pixel);
        assert_eq!(beam.advance(2, 3), BeamEvent::Line);
        assert_eq!(beam.position(), BeamPosition { row: 1, column: 0 });
        assert_eq!(beam.advance(2, 3), BeamEvent::Pixel);
        assert_eq!(beam.advance(2, 3), BeamEvent::Pixel);
        assert_eq!(beam.advance(2, 3), BeamEvent::Frame);
        assert_eq!(beam.position(), BeamPosition::default());
    }

    #[test]
    fn full_raster_returns_to_origin_with_one_frame() {
        let (rows, columns) = (5, 7);
        let mut beam = Beam::new();
        let frames = (0..rows * columns)
            .filter(|_| beam.advance(rows, columns) == BeamEvent::Frame)
            .count();
        assert_eq!(frames, 1);
        assert_eq!(beam.position(), BeamPosition::default());
    }

    #[test]
    fn shrinking_geometry_wraps() {
        let mut beam = Beam::new();
        beam.set_position(300, 800);
        assert_eq!(beam.advance(256, 640), BeamEvent::Frame);
        assert_eq!((beam.row(), beam.column()), (0, 0));
    }
}
