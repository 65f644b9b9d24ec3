//! Strength sweep.
//!
//! While playing, the strength walks the slider one step at a time, bouncing
//! off `min` and `max`, so consecutive generations morph between the plain
//! emoji and the fully stylized artwork. A tick never advances while a
//! generation is still loading.

use crate::StrengthRange;

/// Walk direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDirection {
    /// Towards `max`.
    Up,
    /// Towards `min`.
    Down,
}

/// Ping-pong walker over a [`StrengthRange`].
#[derive(Debug, Clone)]
pub struct StrengthSweep {
    range: StrengthRange,
    direction: SweepDirection,
    playing: bool,
}

impl StrengthSweep {
    /// Create a paused sweep.
    #[must_use]
    pub fn new(range: StrengthRange) -> Self {
        Self {
            range,
            direction: SweepDirection::Up,
            playing: false,
        }
    }

    /// Start sweeping.
    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Stop sweeping.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Whether the sweep is running.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Current direction.
    #[must_use]
    pub fn direction(&self) -> SweepDirection {
        self.direction
    }

    /// Next strength after `current`, or `None` when paused or loading.
    pub fn advance(&mut self, current: u32, loading: bool) -> Option<u32> {
        if !self.playing || loading {
            return None;
        }
        let step = i64::from(self.range.step.max(1));
        let current = i64::from(self.range.clamp(i64::from(current)));
        let max = i64::from(self.range.max);
        let min = i64::from(self.range.min);

        if self.direction == SweepDirection::Up && current >= max {
            self.direction = SweepDirection::Down;
        } else if self.direction == SweepDirection::Down && current <= min {
            self.direction = SweepDirection::Up;
        }

        let next = match self.direction {
            SweepDirection::Up => current + step,
            SweepDirection::Down => current - step,
        };
        Some(self.range.clamp(next))
    }
}

impl Default for StrengthSweep {
    fn default() -> Self {
        Self::new(StrengthRange::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paused_sweep_holds() {
        let mut sweep = StrengthSweep::default();
        assert_eq!(sweep.advance(500, false), None);
    }

    #[test]
    fn test_loading_holds() {
        let mut sweep = StrengthSweep::default();
        sweep.play();
        assert_eq!(sweep.advance(500, true), None);
        assert_eq!(sweep.advance(500, false), Some(510));
    }

    #[test]
    fn test_bounces_at_edges() {
        let mut sweep = StrengthSweep::default();
        sweep.play();
        assert_eq!(sweep.advance(690, false), Some(700));
        assert_eq!(sweep.advance(700, false), Some(690));
        assert_eq!(sweep.direction(), SweepDirection::Down);
        assert_eq!(sweep.advance(410, false), Some(400));
        assert_eq!(sweep.advance(400, false), Some(410));
        assert_eq!(sweep.direction(), SweepDirection::Up);
    }

    #[test]
    fn test_full_cycle_stays_in_range() {
        let range = StrengthRange::default();
        let mut sweep = StrengthSweep::new(range);
        sweep.play();
        let mut strength = range.min;
        for _ in 0..200 {
            strength = sweep.advance(strength, false).expect("playing");
            assert!(range.contains(strength));
        }
    }
}
