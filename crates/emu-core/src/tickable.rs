//! Components advanced one clock tick at a time.

use crate::Ticks;

/// A component driven by a clock.
///
/// All work for one tick completes before `tick` returns; nothing suspends
/// and nothing depends on wall-clock time.
pub trait Tickable {
    /// Advance by exactly one tick.
    fn tick(&mut self);

    /// Advance by `count` ticks.
    ///
    /// Overrides must behave exactly like calling `tick()` `count` times.
    fn tick_n(&mut self, count: Ticks) {
        for _ in 0..count.get() {
            self.tick();
        }
    }
}
