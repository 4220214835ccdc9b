/// One-shot count-up animation
///
/// The displayed value climbs from zero to the target in equal increments,
/// one per tick, and clamps on the last step.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterAnimation {
    /// Slide holding the counter
    pub slide: usize,

    /// Element key within the slide
    pub key: String,

    target: f64,
    current: f64,
    increment: f64,
    finished: bool,
}

impl CounterAnimation {
    pub fn new(slide: usize, key: impl Into<String>, target: u64, duration_ms: u64, tick_ms: u64) -> Self {
        let steps = (duration_ms as f64 / tick_ms.max(1) as f64).max(1.0);
        Self {
            slide,
            key: key.into(),
            target: target as f64,
            current: 0.0,
            increment: target as f64 / steps,
            finished: false,
        }
    }

    /// Advance one tick and return the value to display
    pub fn step(&mut self) -> u64 {
        if self.finished {
            return self.target as u64;
        }

        self.current += self.increment;
        if self.current >= self.target {
            self.current = self.target;
            self.finished = true;
        }
        self.current.floor() as u64
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn target(&self) -> u64 {
        self.target as u64
    }

    /// Value shown right now
    pub fn display_value(&self) -> u64 {
        self.current.floor() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_up_in_equal_steps() {
        let mut counter = CounterAnimation::new(0, "repos", 100, 160, 16);
        let values: Vec<u64> = (0..10).map(|_| counter.step()).collect();
        assert_eq!(values, vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        assert!(counter.is_finished());
    }

    #[test]
    fn test_clamps_on_overshoot() {
        let mut counter = CounterAnimation::new(0, "stars", 7, 48, 16);
        let mut last = 0;
        while !counter.is_finished() {
            let value = counter.step();
            assert!(value >= last);
            assert!(value <= 7);
            last = value;
        }
        assert_eq!(last, 7);
        assert_eq!(counter.step(), 7);
    }

    #[test]
    fn test_display_is_floor_of_running_value() {
        let mut counter = CounterAnimation::new(0, "solved", 5, 2000, 16);
        assert_eq!(counter.step(), 0);
        assert_eq!(counter.display_value(), 0);
        assert!(!counter.is_finished());
    }

    #[test]
    fn test_zero_target_finishes_immediately() {
        let mut counter = CounterAnimation::new(0, "empty", 0, 2000, 16);
        assert_eq!(counter.step(), 0);
        assert!(counter.is_finished());
    }
}
