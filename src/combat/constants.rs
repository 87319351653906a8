//! Combat system constants - resolver internals that are not balance knobs
//!
//! Balance values (damage, radii, cooldowns) live in `BalanceConfig`.

/// Broadphase cell size; roughly the largest common attack radius
pub const GRID_CELL_SIZE: f32 = 128.0;

/// Hitboxes from ability bursts linger this long
pub const ABILITY_HITBOX_DURATION: f32 = 0.1;

/// Knockback below this distance is not applied
pub const MIN_KNOCKBACK: f32 = 0.01;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_reasonable() {
        assert!(GRID_CELL_SIZE > 0.0);
        assert!(ABILITY_HITBOX_DURATION > 0.0);
        assert!(MIN_KNOCKBACK >= 0.0);
    }
}
