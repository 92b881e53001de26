//! Line counting and level progression
//!
//! The level rises by one for each configured threshold the cumulative line
//! count reaches. Each threshold carries a one-shot guard so re-checking
//! after it has been crossed never levels up twice.

use crate::config::LevelThreshold;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progression {
    lines: u32,
    level: u32,
    reached: Vec<bool>,
}

impl Progression {
    pub fn new(threshold_count: usize) -> Self {
        Self {
            lines: 0,
            level: 0,
            reached: vec![false; threshold_count],
        }
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Add the rows removed by one lock
    pub fn advance_lines(&mut self, n: u32) {
        self.lines = self.lines.saturating_add(n);
    }

    /// Level up past every newly crossed threshold
    ///
    /// Returns the thresholds crossed by this call in ascending order; empty
    /// when nothing changed.
    pub fn update_level(&mut self, thresholds: &[LevelThreshold]) -> Vec<LevelThreshold> {
        let mut crossed = Vec::new();
        for (threshold, reached) in thresholds.iter().zip(self.reached.iter_mut()) {
            if !*reached && self.lines >= threshold.lines {
                *reached = true;
                self.level += 1;
                crossed.push(*threshold);
            }
        }
        crossed
    }

    pub fn reset(&mut self) {
        self.lines = 0;
        self.level = 0;
        self.reached.iter_mut().for_each(|r| *r = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_levels;

    #[test]
    fn test_level_is_idempotent_per_threshold() {
        let levels = default_levels();
        let mut p = Progression::new(levels.len());
        p.advance_lines(4);

        assert_eq!(p.update_level(&levels), vec![levels[0]]);
        assert_eq!(p.level(), 1);
        for _ in 0..10 {
            assert!(p.update_level(&levels).is_empty());
        }
        assert_eq!(p.level(), 1);
    }

    #[test]
    fn test_below_threshold_stays_put() {
        let levels = default_levels();
        let mut p = Progression::new(levels.len());
        p.advance_lines(3);
        assert!(p.update_level(&levels).is_empty());
        assert_eq!(p.level(), 0);
    }

    #[test]
    fn test_overshoot_counts_as_crossing() {
        // 3 + 2 lands on 5, past the 4-line threshold without equalling it
        let levels = default_levels();
        let mut p = Progression::new(levels.len());
        p.advance_lines(3);
        p.update_level(&levels);
        p.advance_lines(2);
        assert_eq!(p.update_level(&levels).len(), 1);
        assert_eq!(p.level(), 1);
    }

    #[test]
    fn test_jump_over_two_thresholds() {
        let levels = default_levels();
        let mut p = Progression::new(levels.len());
        p.advance_lines(20);
        assert_eq!(p.update_level(&levels), vec![levels[0], levels[1]]);
        assert_eq!(p.level(), 2);
    }

    #[test]
    fn test_reset() {
        let levels = default_levels();
        let mut p = Progression::new(levels.len());
        p.advance_lines(70);
        p.update_level(&levels);
        assert_eq!(p.level(), 3);

        p.reset();
        assert_eq!((p.lines(), p.level()), (0, 0));
        p.advance_lines(4);
        assert_eq!(p.update_level(&levels), vec![levels[0]]);
    }
}
