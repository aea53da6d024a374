//! Motion domain: landing impact accumulation shared by bounce and smash.

/// Thresholds a landing must meet to trigger an effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactThresholds {
    pub min_air_time: f32,
    pub min_fall_speed: f32,
}

/// Tracks one airborne phase and fires at most once when it ends.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImpactAccumulator {
    airborne: bool,
    airborne_time: f32,
    max_fall_speed: f32,
    consumed: bool,
}

impl ImpactAccumulator {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn airborne_time(&self) -> f32 {
        self.airborne_time
    }

    pub fn max_fall_speed(&self) -> f32 {
        self.max_fall_speed
    }

    /// Nothing accumulated and nothing waiting to fire.
    pub fn is_idle(&self) -> bool {
        !self.airborne && self.airborne_time == 0.0 && self.max_fall_speed == 0.0
    }

    /// Feed one tick. Returns the impact speed on the single qualifying
    /// landing tick, `None` otherwise.
    pub fn observe(
        &mut self,
        grounded: bool,
        vertical_velocity: f32,
        dt: f32,
        thresholds: ImpactThresholds,
    ) -> Option<f32> {
        if !grounded {
            if !self.airborne {
                self.airborne = true;
                self.airborne_time = 0.0;
                self.max_fall_speed = 0.0;
                self.consumed = false;
            }
            self.airborne_time += dt;
            self.record_fall(vertical_velocity);
            return None;
        }

        if !self.airborne || self.consumed {
            return None;
        }

        self.airborne = false;
        self.consumed = true;
        self.record_fall(vertical_velocity);

        let qualifies = self.airborne_time >= thresholds.min_air_time
            && self.max_fall_speed >= thresholds.min_fall_speed;
        let impact_speed = self.max_fall_speed;

        self.airborne_time = 0.0;
        self.max_fall_speed = 0.0;

        qualifies.then_some(impact_speed)
    }

    fn record_fall(&mut self, vertical_velocity: f32) {
        if vertical_velocity < 0.0 {
            self.max_fall_speed = self.max_fall_speed.max(-vertical_velocity);
        }
    }
}
