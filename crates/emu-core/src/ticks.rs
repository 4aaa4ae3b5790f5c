//! Clock tick counts.

/// A count of clock ticks.
///
/// The clock is whatever the owning component counts in; the SLU counts
/// pixel clocks (14 MHz on the Next).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ticks(pub u64);

impl Ticks {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(count: u64) -> Self {
        Self(count)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Ticks in one raster of `rows` lines of `columns` pixels each.
    #[must_use]
    pub const fn per_raster(rows: u32, columns: u32) -> Self {
        Self(rows as u64 * columns as u64)
    }
}

impl core::ops::Add for Ticks {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl core::ops::AddAssign for Ticks {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl From<u32> for Ticks {
    fn from(count: u32) -> Self {
        Self(u64::from(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_raster_multiplies_without_overflow() {
        assert_eq!(Ticks::per_raster(320, 896).get(), 286_720);
        assert_eq!(
            Ticks::per_raster(u32::MAX, 2).get(),
            u64::from(u32::MAX) * 2
        );
    }

    #[test]
    fn add_accumulates() {
        let mut total = Ticks::ZERO;
        assert!(total.is_zero());
        total += Ticks::from(3u32);
        assert_eq!(total + Ticks::new(4), Ticks::new(7));
    }
}
