//! Tunable physics constants.

/// Falls shorter than this (in blocks) deal no damage.
pub const FALL_DAMAGE_MIN_HEIGHT: f32 = 4.0;
/// Damage per block fallen beyond the threshold.
pub const FALL_DAMAGE_MULTIPLIER: f32 = 1.0;

/// Entity physics configuration.
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Downward acceleration in blocks/s².
    pub gravity: f32,
    /// Gravity multiplier while in a liquid.
    pub water_gravity_scale: f32,
    /// Fraction of velocity lost per second while in a liquid.
    pub water_drag: f32,
    /// Maximum downward speed in blocks/s.
    pub terminal_velocity: f32,
    /// Longest time step integrated at once; larger steps are clamped.
    pub max_dt: f32,
    /// Horizontal inset of the collision box so bodies can slide along walls.
    pub collision_margin: f32,
    /// Highest ledge a walking body climbs without jumping.
    pub step_height: f32,
    pub fall_damage_min_height: f32,
    pub fall_damage_multiplier: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 25.0,
            water_gravity_scale: 0.3,
            water_drag: 2.0,
            terminal_velocity: 50.0,
            max_dt: 0.05,
            collision_margin: 0.01,
            step_height: 1.0,
            fall_damage_min_height: FALL_DAMAGE_MIN_HEIGHT,
            fall_damage_multiplier: FALL_DAMAGE_MULTIPLIER,
        }
    }
}

impl PhysicsConfig {
    /// Damage for landing after falling `fall_distance` blocks, if any.
    pub fn fall_damage(&self, fall_distance: f32) -> Option<f32> {
        (fall_distance >= self.fall_damage_min_height).then(|| {
            (fall_distance - self.fall_damage_min_height + 1.0) * self.fall_damage_multiplier
        })
    }

    #[must_use]
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    #[must_use]
    pub fn with_step_height(mut self, step_height: f32) -> Self {
        self.step_height = step_height;
        self
    }
}
