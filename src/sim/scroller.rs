//! World scroll speed ratchet

use serde::{Deserialize, Serialize};

use crate::level::LevelDefinition;

/// Scroll speed of the world (pixels/s). Only ever goes up during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldScroller {
    speed: f32,
    increment: f32,
    cap: f32,
}

impl WorldScroller {
    pub fn new(level: &LevelDefinition) -> Self {
        Self {
            speed: level.initial_scroll_speed.min(level.scroll_speed_cap),
            increment: level.scroll_speed_increment.max(0.0),
            cap: level.scroll_speed_cap,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Distance the world moves in `dt`
    pub fn distance(&self, dt: f32) -> f32 {
        self.speed * dt
    }

    /// Step up after a challenge retires. Returns the new speed.
    pub fn ratchet(&mut self) -> f32 {
        self.speed = (self.speed + self.increment).min(self.cap);
        self.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelCatalog;
    use proptest::prelude::*;

    #[test]
    fn test_ratchet_caps() {
        let catalog = LevelCatalog::default();
        let level = catalog.get(1).unwrap();
        let mut scroller = WorldScroller::new(level);
        assert_eq!(scroller.speed(), 300.0);
        assert_eq!(scroller.ratchet(), 312.0);

        for _ in 0..100 {
            scroller.ratchet();
        }
        assert_eq!(scroller.speed(), level.scroll_speed_cap);
    }

    #[test]
    fn test_distance() {
        let catalog = LevelCatalog::default();
        let scroller = WorldScroller::new(catalog.get(1).unwrap());
        assert!((scroller.distance(0.5) - 150.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_speed_monotonic_and_capped(
            initial in 1.0f32..500.0,
            increment in 0.0f32..50.0,
            headroom in 0.0f32..500.0,
            steps in 0usize..200,
        ) {
            let level = LevelDefinition {
                id: 1,
                points_required: 100,
                initial_scroll_speed: initial,
                scroll_speed_increment: increment,
                scroll_speed_cap: initial + headroom,
            };
            let mut scroller = WorldScroller::new(&level);
            let mut last = scroller.speed();
            for _ in 0..steps {
                let speed = scroller.ratchet();
                prop_assert!(speed >= last);
                prop_assert!(speed <= level.scroll_speed_cap);
                last = speed;
            }
        }
    }
}
