//! Character movement collaborator and the steering controller.
//!
//! Units never touch a [`Transform`] directly. They request movement through
//! the [`UnitMovement`] trait and the host consumes the accumulated input in
//! [`apply_movement_system`]. World space is Y-up with forward along `-Z`
//! and right along `+X`; yaw is the rotation about `+Y` in radians.

use std::f32::consts::{PI, TAU};

use bevy::prelude::*;
#[cfg(test)]
use mockall::automock;

use crate::constants::{
    AIR_CONTROL, DEFAULT_MAX_ACCELERATION, DEFAULT_MAX_WALK_SPEED, JUMP_Z_VELOCITY,
    ROTATION_RATE_YAW,
};

/// Pitch is clamped short of vertical so the boom never flips over.
const MAX_PITCH_DEGREES: f32 = 89.0;

/// Horizontal forward direction for a yaw angle.
///
/// # Examples
///
/// ```
/// use bevy::math::Vec3;
/// use haert::movement::yaw_forward;
///
/// let forward = yaw_forward(0.0);
/// assert!((forward - Vec3::NEG_Z).length() < 1e-6);
/// ```
#[must_use]
pub fn yaw_forward(yaw: f32) -> Vec3 {
    Quat::from_rotation_y(yaw) * Vec3::NEG_Z
}

/// Horizontal right direction for a yaw angle.
#[must_use]
pub fn yaw_right(yaw: f32) -> Vec3 {
    Quat::from_rotation_y(yaw) * Vec3::X
}

/// Extracts the yaw component of a rotation, discarding pitch and roll.
#[must_use]
pub fn yaw_of(rotation: Quat) -> f32 {
    rotation.to_euler(EulerRot::YXZ).0
}

/// Yaw that faces along `direction` projected onto the ground plane.
#[must_use]
pub fn yaw_towards(direction: Vec3) -> f32 {
    (-direction.x).atan2(-direction.z)
}

/// Wraps an angle into `[-PI, PI)`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Turns `current` towards `target` by no more than `max_step` radians,
/// taking the shorter way round.
#[must_use]
pub fn turn_towards(current: f32, target: f32, max_step: f32) -> f32 {
    let diff = wrap_angle(target - current);
    if diff.abs() <= max_step {
        target
    } else {
        wrap_angle(current + max_step.copysign(diff))
    }
}

/// Movement services a unit may call while handling input.
///
/// This is the seam between gameplay code and whatever moves bodies around.
/// Requests accumulate until the host consumes them.
#[cfg_attr(test, automock)]
pub trait UnitMovement {
    /// Adds movement input along `direction`, scaled by `magnitude`.
    fn request_move(&mut self, direction: Vec3, magnitude: f32);
    /// Current body yaw, independent of any controller.
    fn facing_yaw(&self) -> f32;
    /// Whether the body should turn to face its travel direction.
    fn set_orient_to_movement(&mut self, orient: bool);
    /// Reports the orient-to-movement flag.
    fn orient_to_movement(&self) -> bool;
    /// Starts a jump.
    fn jump(&mut self);
    /// Releases a held jump.
    fn stop_jumping(&mut self);
    /// Maximum acceleration the body can apply.
    fn max_acceleration(&self) -> f32;
}

/// Host-side movement state for a walking or driving body.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct CharacterMovement {
    /// Turn the body towards the direction of travel.
    pub orient_rotation_to_movement: bool,
    /// Yaw rate used while orienting, in degrees per second.
    pub rotation_rate: f32,
    /// Initial upwards velocity of a jump.
    pub jump_z_velocity: f32,
    /// Lateral control available while airborne.
    pub air_control: f32,
    /// Maximum acceleration the body can apply.
    pub max_acceleration: f32,
    /// Top speed in world units per second.
    pub max_walk_speed: f32,
    pending_input: Vec3,
    jump_pressed: bool,
}

impl Default for CharacterMovement {
    fn default() -> Self {
        Self {
            orient_rotation_to_movement: false,
            rotation_rate: 0.0,
            jump_z_velocity: JUMP_Z_VELOCITY,
            air_control: AIR_CONTROL,
            max_acceleration: DEFAULT_MAX_ACCELERATION,
            max_walk_speed: DEFAULT_MAX_WALK_SPEED,
            pending_input: Vec3::ZERO,
            jump_pressed: false,
        }
    }
}

impl CharacterMovement {
    /// Movement tuned for a third-person character that faces where it walks.
    #[must_use]
    pub fn third_person() -> Self {
        Self {
            orient_rotation_to_movement: true,
            rotation_rate: ROTATION_RATE_YAW,
            ..Self::default()
        }
    }

    /// Accumulates movement input for this frame.
    pub fn add_input_vector(&mut self, direction: Vec3, scale: f32) {
        self.pending_input += direction * scale;
    }

    /// Input accumulated since the last consume.
    #[must_use]
    pub const fn pending_input(&self) -> Vec3 {
        self.pending_input
    }

    /// Returns and clears the accumulated input.
    pub fn consume_input_vector(&mut self) -> Vec3 {
        std::mem::take(&mut self.pending_input)
    }

    /// Whether jump is currently held.
    #[must_use]
    pub const fn is_jump_pressed(&self) -> bool {
        self.jump_pressed
    }
}

/// [`UnitMovement`] view over a [`CharacterMovement`] and its body's facing.
#[derive(Debug)]
pub struct MovementDriver<'a> {
    movement: &'a mut CharacterMovement,
    facing_yaw: f32,
}

impl<'a> MovementDriver<'a> {
    /// Binds movement state to the body's current transform.
    pub fn new(movement: &'a mut CharacterMovement, transform: &Transform) -> Self {
        Self {
            movement,
            facing_yaw: yaw_of(transform.rotation),
        }
    }
}

impl UnitMovement for MovementDriver<'_> {
    fn request_move(&mut self, direction: Vec3, magnitude: f32) {
        self.movement.add_input_vector(direction, magnitude);
    }

    fn facing_yaw(&self) -> f32 {
        self.facing_yaw
    }

    fn set_orient_to_movement(&mut self, orient: bool) {
        self.movement.orient_rotation_to_movement = orient;
    }

    fn orient_to_movement(&self) -> bool {
        self.movement.orient_rotation_to_movement
    }

    fn jump(&mut self) {
        self.movement.jump_pressed = true;
    }

    fn stop_jumping(&mut self) {
        self.movement.jump_pressed = false;
    }

    fn max_acceleration(&self) -> f32 {
        self.movement.max_acceleration
    }
}

/// Steering controller owning the control rotation.
///
/// The control rotation drives the camera and the direction of
/// controller-relative movement. A unit without this component has no
/// controller and ignores movement input.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Controller {
    yaw: f32,
    pitch: f32,
}

impl Controller {
    /// Creates a controller with the given control rotation in radians.
    #[must_use]
    pub const fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    /// Control yaw in radians.
    #[must_use]
    pub const fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Control pitch in radians.
    #[must_use]
    pub const fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Turns the control rotation; positive values turn right.
    pub fn add_yaw_input(&mut self, degrees: f32) {
        self.yaw = wrap_angle(self.yaw - degrees.to_radians());
    }

    /// Tilts the control rotation; positive values look up.
    pub fn add_pitch_input(&mut self, degrees: f32) {
        let limit = MAX_PITCH_DEGREES.to_radians();
        self.pitch = (self.pitch + degrees.to_radians()).clamp(-limit, limit);
    }

    /// Full control rotation (yaw then pitch).
    #[must_use]
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

/// Which controller rotation axes the body copies directly.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlRotationUsage {
    /// Copy controller pitch onto the body.
    pub pitch: bool,
    /// Copy controller yaw onto the body.
    pub yaw: bool,
    /// Copy controller roll onto the body.
    pub roll: bool,
}

/// Advances one body by `delta_seconds` using its accumulated input.
///
/// Input is clamped to unit length before scaling by the walk speed, so
/// stacked requests never exceed top speed.
pub fn step_kinematics(
    movement: &mut CharacterMovement,
    transform: &mut Transform,
    usage: ControlRotationUsage,
    controller: Option<&Controller>,
    delta_seconds: f32,
) {
    let input = movement.consume_input_vector().clamp_length_max(1.0);
    transform.translation += input * movement.max_walk_speed * delta_seconds;

    let current = yaw_of(transform.rotation);
    let horizontal = Vec3::new(input.x, 0.0, input.z);
    let yaw = if movement.orient_rotation_to_movement && horizontal != Vec3::ZERO {
        let max_step = movement.rotation_rate.to_radians() * delta_seconds;
        turn_towards(current, yaw_towards(horizontal), max_step)
    } else if let (true, Some(ctrl)) = (usage.yaw, controller) {
        ctrl.yaw()
    } else {
        current
    };
    transform.rotation = Quat::from_rotation_y(yaw);
}

/// Consumes movement requests for every body this frame.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn apply_movement_system(
    time: Res<Time>,
    mut bodies: Query<(
        &mut CharacterMovement,
        &mut Transform,
        Option<&ControlRotationUsage>,
        Option<&Controller>,
    )>,
) {
    let delta = time.delta_secs();
    for (mut movement, mut transform, usage, controller) in &mut bodies {
        step_kinematics(
            &mut movement,
            &mut transform,
            usage.copied().unwrap_or_default(),
            controller,
            delta,
        );
    }
}
