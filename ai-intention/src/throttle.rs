/// Whole server ticks covering `seconds`, rounded to nearest.
pub fn time_to_ticks(seconds: f32, tick_interval: f32) -> i64 {
    (0.5 + seconds / tick_interval) as i64
}

/// Countdown, in server ticks, until the next update is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateThrottle {
    next_update_tick: i64,
}

impl Default for UpdateThrottle {
    fn default() -> Self {
        Self {
            next_update_tick: -1,
        }
    }
}

impl UpdateThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm so that the next check fires.
    pub fn reset(&mut self) {
        self.next_update_tick = -1;
    }

    pub fn upkeep(&mut self) {
        if self.next_update_tick > 0 {
            self.next_update_tick -= 1;
        }
    }

    /// `true` when due; re-arms the countdown for `interval` seconds.
    pub fn should_update(&mut self, interval: f32, tick_interval: f32) -> bool {
        if self.next_update_tick > 0 {
            return false;
        }
        self.next_update_tick = time_to_ticks(interval, tick_interval);
        true
    }

    /// Self-clocked variant of [`should_update`](Self::should_update): counts down
    /// only on checks that do not fire, so updates land
    /// `time_to_ticks(interval) + 1` checks apart. Needs no [`upkeep`](Self::upkeep).
    pub fn poll(&mut self, interval: f32, tick_interval: f32) -> bool {
        if self.next_update_tick <= 0 {
            self.next_update_tick = time_to_ticks(interval, tick_interval);
            return true;
        }
        self.next_update_tick -= 1;
        false
    }

    pub fn remaining_ticks(&self) -> i64 {
        self.next_update_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: f32 = 1.0 / 60.0;

    #[test]
    fn ticks_round_to_nearest() {
        assert_eq!(time_to_ticks(0.06, TICK), 4);
        assert_eq!(time_to_ticks(0.07, TICK), 4);
        assert_eq!(time_to_ticks(0.1, TICK), 6);
        assert_eq!(time_to_ticks(0.0, TICK), 0);
    }

    #[test]
    fn fires_immediately_then_waits_out_the_interval() {
        let mut throttle = UpdateThrottle::new();
        let mut fired = Vec::new();
        for frame in 1..=10 {
            throttle.upkeep();
            if throttle.should_update(0.06, TICK) {
                fired.push(frame);
            }
        }
        assert_eq!(fired, vec![1, 5, 9]);
    }

    #[test]
    fn polling_counts_down_only_while_waiting() {
        let mut throttle = UpdateThrottle::new();
        let fired: Vec<_> = (1..=12)
            .filter(|_| throttle.poll(0.06, TICK))
            .collect();
        assert_eq!(fired, vec![1, 6, 11]);
    }

    #[test]
    fn reset_makes_the_next_check_fire() {
        let mut throttle = UpdateThrottle::new();
        assert!(throttle.should_update(1.0, TICK));
        assert!(!throttle.should_update(1.0, TICK));

        throttle.reset();
        assert_eq!(throttle.remaining_ticks(), -1);
        assert!(throttle.should_update(1.0, TICK));
    }

    #[test]
    fn zero_interval_fires_every_check() {
        let mut throttle = UpdateThrottle::new();
        assert!((0..5).all(|_| throttle.should_update(0.0, TICK)));
    }
}
