//! Gameplay tuning constants shared across unit systems.
//!
//! Angular rates are expressed in degrees per second to match how designers
//! author them; systems convert to radians at the point of use.

/// Base yaw turn rate for rate-driven look input, in degrees per second.
pub const BASE_LOOK_RIGHT_RATE: f32 = 45.0;
/// Base pitch turn rate for rate-driven look input, in degrees per second.
pub const BASE_LOOK_UP_RATE: f32 = 45.0;

/// Distance the follow camera trails behind the player.
pub const CAMERA_ARM_LENGTH: f32 = 300.0;

/// Yaw rate used when orienting a body towards its movement direction.
pub const ROTATION_RATE_YAW: f32 = 540.0;
/// Initial upwards velocity applied by a jump.
pub const JUMP_Z_VELOCITY: f32 = 600.0;
/// Fraction of lateral control available while airborne.
pub const AIR_CONTROL: f32 = 0.2;

/// Default maximum acceleration of a character movement component.
pub const DEFAULT_MAX_ACCELERATION: f32 = 2048.0;
/// Default top speed of a character on foot, in world units per second.
pub const DEFAULT_MAX_WALK_SPEED: f32 = 600.0;

/// Car mode accelerates this many times faster than mech mode.
pub const CAR_ACCELERATION_MULTIPLIER: f32 = 2.0;

/// Health an enemy spawns with when none is configured.
pub const DEFAULT_ENEMY_HEALTH: i32 = 100;

/// Degrees of controller rotation per unit of mouse motion.
pub const MOUSE_LOOK_SCALE: f32 = 0.1;
