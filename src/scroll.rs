// 捲動到指定位置的動畫

use std::time::{Duration, Instant};

/// in-out 指數緩動，輸入輸出都在 [0, 1]
pub fn ease_in_out_expo(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t == 0.0 || t == 1.0 {
        t
    } else if t < 0.5 {
        2f64.powf(20.0 * t - 10.0) / 2.0
    } else {
        (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTick {
    Running(usize),
    /// 動畫結束：最終捲動位置與要恢復的 (行, 列)
    Finished { offset: usize, restore: (usize, usize) },
}

#[derive(Debug, Clone)]
pub struct ScrollAnimation {
    from: usize,
    to: usize,
    started: Instant,
    duration: Duration,
    restore: (usize, usize),
}

impl ScrollAnimation {
    pub fn new(
        from: usize,
        to: usize,
        started: Instant,
        duration: Duration,
        restore: (usize, usize),
    ) -> Self {
        Self {
            from,
            to,
            started,
            duration,
            restore,
        }
    }

    pub fn target(&self) -> usize {
        self.to
    }

    pub fn tick(&self, now: Instant) -> ScrollTick {
        let elapsed = now.saturating_duration_since(self.started);
        if self.duration.is_zero() || elapsed >= self.duration {
            return ScrollTick::Finished {
                offset: self.to,
                restore: self.restore,
            };
        }

        let progress = ease_in_out_expo(elapsed.as_secs_f64() / self.duration.as_secs_f64());
        let delta = (self.to as f64 - self.from as f64) * progress;
        let offset = (self.from as f64 + delta).round().max(0.0) as usize;
        ScrollTick::Running(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(ease_in_out_expo(0.0), 0.0);
        assert_eq!(ease_in_out_expo(1.0), 1.0);
        assert!((ease_in_out_expo(0.5) - 0.5).abs() < 1e-9);
        assert!(ease_in_out_expo(0.25) < 0.25);
        assert!(ease_in_out_expo(0.75) > 0.75);
    }

    #[test]
    fn test_animation_progress() {
        let start = Instant::now();
        let animation = ScrollAnimation::new(0, 100, start, Duration::from_millis(300), (7, 2));

        assert_eq!(animation.tick(start), ScrollTick::Running(0));
        assert_eq!(
            animation.tick(start + Duration::from_millis(150)),
            ScrollTick::Running(50)
        );
        assert_eq!(
            animation.tick(start + Duration::from_millis(300)),
            ScrollTick::Finished {
                offset: 100,
                restore: (7, 2)
            }
        );
    }

    #[test]
    fn test_scrolling_up() {
        let start = Instant::now();
        let animation = ScrollAnimation::new(40, 10, start, Duration::from_millis(300), (10, 0));
        match animation.tick(start + Duration::from_millis(200)) {
            ScrollTick::Running(offset) => assert!(offset < 40 && offset >= 10),
            other => panic!("unexpected tick: {other:?}"),
        }
    }
}
