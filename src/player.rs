//! The player-controlled unit that switches between car and mech.
//!
//! Movement and fire input is routed through a per-mode handler table so
//! every `(mode, operation)` pair is spelled out once. Both modes currently
//! share forward and right movement; strafing and weapons differ.

use bevy::prelude::*;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::constants::{BASE_LOOK_RIGHT_RATE, BASE_LOOK_UP_RATE, CAR_ACCELERATION_MULTIPLIER};
use crate::input::{ButtonEdge, InputAction, InputAxis, InputRegistry};
use crate::movement::{yaw_forward, yaw_right, UnitMovement};
use crate::unit::{Unit, UnitContext};

/// Behavioural configuration of the player unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect)]
pub enum PlayerMode {
    /// Fast ground vehicle.
    CarMode,
    /// Walking mech.
    #[default]
    MechMode,
}

impl PlayerMode {
    /// The mode a transformation switches to.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::CarMode => Self::MechMode,
            Self::MechMode => Self::CarMode,
        }
    }

    fn handlers(self) -> &'static ModeHandlers {
        match self {
            Self::CarMode => &CAR_HANDLERS,
            Self::MechMode => &MECH_HANDLERS,
        }
    }
}

/// Lateral input classification from the last strafe sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
pub enum StrafeState {
    /// Strafe input was negative.
    StrafeLeft,
    /// No strafe input.
    #[default]
    StrafeNone,
    /// Strafe input was positive.
    StrafeRight,
}

impl StrafeState {
    /// Classifies a strafe axis value by its sign.
    ///
    /// # Examples
    ///
    /// ```
    /// use haert::player::StrafeState;
    ///
    /// assert_eq!(StrafeState::from_axis(-0.3), StrafeState::StrafeLeft);
    /// assert_eq!(StrafeState::from_axis(0.0), StrafeState::StrafeNone);
    /// ```
    #[must_use]
    pub fn from_axis(value: f32) -> Self {
        if value < 0.0 {
            Self::StrafeLeft
        } else if value > 0.0 {
            Self::StrafeRight
        } else {
            Self::StrafeNone
        }
    }
}

/// Weapon handler selected by a fire input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weapon {
    /// Car main gun.
    CarPrimary,
    /// Car boost thruster.
    CarThruster,
    /// Mech main gun.
    MechPrimary,
    /// Mech secondary weapon.
    MechSecondary,
}

type AxisFn = fn(&mut PlayerUnit, &mut UnitContext<'_>, f32);
type FireFn = fn(&mut PlayerUnit) -> Weapon;

struct ModeHandlers {
    move_forward: AxisFn,
    move_right: AxisFn,
    strafe: AxisFn,
    fire_primary: FireFn,
    fire_secondary: FireFn,
}

static CAR_HANDLERS: ModeHandlers = ModeHandlers {
    move_forward: move_forward_car,
    move_right: move_right_car,
    strafe: strafe_car,
    fire_primary: fire_primary_car,
    fire_secondary: fire_thruster_car,
};

static MECH_HANDLERS: ModeHandlers = ModeHandlers {
    move_forward: move_forward_mech,
    move_right: move_right_mech,
    strafe: strafe_mech,
    fire_primary: fire_primary_mech,
    fire_secondary: fire_secondary_mech,
};

/// Dual-mode player unit.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerUnit {
    mode: PlayerMode,
    /// Set by every transformation; nothing in the unit clears it.
    pub is_transforming: bool,
    /// Primary fire is held.
    pub is_shooting_primary: bool,
    /// Secondary fire is held.
    pub is_shooting_secondary: bool,
    /// Classification of the most recent strafe input.
    pub current_strafe_state: StrafeState,
    /// Base yaw rate for rate-driven look input, in degrees per second.
    pub base_look_right_rate: f32,
    /// Base pitch rate for rate-driven look input, in degrees per second.
    pub base_look_up_rate: f32,
    mech_acceleration: f32,
    car_acceleration: f32,
}

impl PlayerUnit {
    /// Creates a mech-mode player whose accelerations derive from the body's
    /// maximum acceleration.
    #[must_use]
    pub fn new(max_acceleration: f32) -> Self {
        Self {
            mode: PlayerMode::MechMode,
            is_transforming: false,
            is_shooting_primary: false,
            is_shooting_secondary: false,
            current_strafe_state: StrafeState::StrafeNone,
            base_look_right_rate: BASE_LOOK_RIGHT_RATE,
            base_look_up_rate: BASE_LOOK_UP_RATE,
            mech_acceleration: max_acceleration,
            car_acceleration: CAR_ACCELERATION_MULTIPLIER * max_acceleration,
        }
    }

    /// Creates a player sized to `movement`.
    #[must_use]
    pub fn for_movement(movement: &dyn UnitMovement) -> Self {
        Self::new(movement.max_acceleration())
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> PlayerMode {
        self.mode
    }

    /// Acceleration the unit uses in `mode`.
    #[must_use]
    pub const fn acceleration_for(&self, mode: PlayerMode) -> f32 {
        match mode {
            PlayerMode::CarMode => self.car_acceleration,
            PlayerMode::MechMode => self.mech_acceleration,
        }
    }

    /// Switches to `next` and flags the transformation.
    pub fn set_mode(&mut self, next: PlayerMode) {
        self.mode = next;
        self.is_transforming = true;
        info!("Transformed into {next:?}");
    }

    /// Switches to the other mode. Always succeeds.
    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    /// Forward and backward input relative to the controller's yaw.
    pub fn move_forward(&mut self, ctx: &mut UnitContext<'_>, value: f32) {
        (self.mode.handlers().move_forward)(self, ctx, value);
    }

    /// Side to side input relative to the controller's yaw.
    pub fn move_right(&mut self, ctx: &mut UnitContext<'_>, value: f32) {
        (self.mode.handlers().move_right)(self, ctx, value);
    }

    /// Side to side input relative to the body's own facing.
    ///
    /// The strafe state is updated from the sign of `value` in every mode.
    pub fn strafe(&mut self, ctx: &mut UnitContext<'_>, value: f32) {
        self.current_strafe_state = StrafeState::from_axis(value);
        (self.mode.handlers().strafe)(self, ctx, value);
    }

    /// Fires the current mode's primary weapon.
    pub fn fire_primary(&mut self) -> Weapon {
        info!("Primary fired");
        self.is_shooting_primary = true;
        (self.mode.handlers().fire_primary)(self)
    }

    /// Fires the current mode's secondary weapon.
    pub fn fire_secondary(&mut self) -> Weapon {
        info!("Secondary fired");
        self.is_shooting_secondary = true;
        (self.mode.handlers().fire_secondary)(self)
    }

    /// Releases the primary trigger.
    pub fn release_primary(&mut self) {
        self.is_shooting_primary = false;
    }

    /// Releases the secondary trigger.
    pub fn release_secondary(&mut self) {
        self.is_shooting_secondary = false;
    }

    /// Accepts a normalised yaw rate. Rate-driven turning is not applied.
    pub fn look_right_at_rate(&mut self, _rate: f32) {}

    /// Accepts a normalised pitch rate. Rate-driven turning is not applied.
    pub fn look_up_at_rate(&mut self, _rate: f32) {}
}

impl Default for PlayerUnit {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_MAX_ACCELERATION)
    }
}

/// Requests movement along a controller-relative horizontal axis.
fn move_along_control_axis(ctx: &mut UnitContext<'_>, value: f32, axis: fn(f32) -> Vec3) {
    let Some(yaw) = ctx.control_yaw() else {
        return;
    };
    if value != 0.0 {
        ctx.movement.request_move(axis(yaw), value);
    }
}

fn move_forward_car(_unit: &mut PlayerUnit, ctx: &mut UnitContext<'_>, value: f32) {
    move_along_control_axis(ctx, value, yaw_forward);
}

fn move_right_car(_unit: &mut PlayerUnit, ctx: &mut UnitContext<'_>, value: f32) {
    move_along_control_axis(ctx, value, yaw_right);
}

fn strafe_car(_unit: &mut PlayerUnit, _ctx: &mut UnitContext<'_>, _value: f32) {}

fn fire_primary_car(_unit: &mut PlayerUnit) -> Weapon {
    Weapon::CarPrimary
}

fn fire_thruster_car(_unit: &mut PlayerUnit) -> Weapon {
    Weapon::CarThruster
}

fn move_forward_mech(_unit: &mut PlayerUnit, ctx: &mut UnitContext<'_>, value: f32) {
    move_along_control_axis(ctx, value, yaw_forward);
}

fn move_right_mech(_unit: &mut PlayerUnit, ctx: &mut UnitContext<'_>, value: f32) {
    move_along_control_axis(ctx, value, yaw_right);
}

/// Sidesteps along the body's right axis while holding its facing.
///
/// Idle input hands facing back to the movement direction.
fn strafe_mech(_unit: &mut PlayerUnit, ctx: &mut UnitContext<'_>, value: f32) {
    if ctx.controller.is_some() && value != 0.0 {
        ctx.movement.set_orient_to_movement(false);
        let direction = yaw_right(ctx.movement.facing_yaw());
        ctx.movement.request_move(direction, value);
    } else {
        ctx.movement.set_orient_to_movement(true);
    }
}

fn fire_primary_mech(_unit: &mut PlayerUnit) -> Weapon {
    Weapon::MechPrimary
}

fn fire_secondary_mech(_unit: &mut PlayerUnit) -> Weapon {
    Weapon::MechSecondary
}

fn look_right(_unit: &mut PlayerUnit, ctx: &mut UnitContext<'_>, value: f32) {
    if let Some(controller) = ctx.controller.as_deref_mut() {
        controller.add_yaw_input(value);
    }
}

fn look_up(_unit: &mut PlayerUnit, ctx: &mut UnitContext<'_>, value: f32) {
    if let Some(controller) = ctx.controller.as_deref_mut() {
        controller.add_pitch_input(value);
    }
}

impl Unit for PlayerUnit {
    fn can_ever_tick(&self) -> bool {
        false
    }

    fn on_spawn(&mut self) {
        debug!(
            "player spawned in {:?}, accelerations mech={} car={}",
            self.mode, self.mech_acceleration, self.car_acceleration
        );
    }

    fn on_bind_inputs(&self, registry: &mut InputRegistry<Self>) {
        registry
            .bind_axis(InputAxis::MoveForward, |unit, ctx, value| {
                unit.move_forward(ctx, value);
            })
            .bind_axis(InputAxis::MoveRight, |unit, ctx, value| {
                unit.move_right(ctx, value);
            })
            .bind_axis(InputAxis::Strafe, |unit, ctx, value| unit.strafe(ctx, value))
            .bind_axis(InputAxis::LookRight, look_right)
            .bind_axis(InputAxis::LookRightRate, |unit, _, rate| {
                unit.look_right_at_rate(rate);
            })
            .bind_axis(InputAxis::LookUp, look_up)
            .bind_axis(InputAxis::LookUpRate, |unit, _, rate| {
                unit.look_up_at_rate(rate);
            })
            .bind_action(InputAction::Jump, ButtonEdge::Pressed, |_, ctx| {
                ctx.movement.jump();
            })
            .bind_action(InputAction::Jump, ButtonEdge::Released, |_, ctx| {
                ctx.movement.stop_jumping();
            })
            .bind_action(InputAction::Transform, ButtonEdge::Pressed, |unit, _| {
                unit.toggle_mode();
            })
            .bind_action(InputAction::FirePrimary, ButtonEdge::Pressed, |unit, _| {
                let weapon = unit.fire_primary();
                debug!("primary handler {weapon:?}");
            })
            .bind_action(InputAction::FirePrimary, ButtonEdge::Released, |unit, _| {
                unit.release_primary();
            })
            .bind_action(InputAction::FireSecondary, ButtonEdge::Pressed, |unit, _| {
                let weapon = unit.fire_secondary();
                debug!("secondary handler {weapon:?}");
            })
            .bind_action(InputAction::FireSecondary, ButtonEdge::Released, |unit, _| {
                unit.release_secondary();
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::{CharacterMovement, Controller, MockUnitMovement, MovementDriver};
    use approx::assert_relative_eq;
    use mockall::predicate::{always, eq};
    use rstest::{fixture, rstest};

    #[fixture]
    fn player() -> PlayerUnit {
        PlayerUnit::new(1000.0)
    }

    fn car(mut unit: PlayerUnit) -> PlayerUnit {
        unit.toggle_mode();
        unit
    }

    #[rstest]
    fn starts_as_idle_mech(player: PlayerUnit) {
        assert_eq!(player.mode(), PlayerMode::MechMode);
        assert!(!player.is_transforming);
        assert!(!player.is_shooting_primary);
        assert!(!player.is_shooting_secondary);
        assert_relative_eq!(player.base_look_right_rate, 45.0);
        assert_relative_eq!(player.base_look_up_rate, 45.0);
    }

    #[rstest]
    fn car_accelerates_twice_as_hard(player: PlayerUnit) {
        assert_relative_eq!(player.acceleration_for(PlayerMode::MechMode), 1000.0);
        assert_relative_eq!(player.acceleration_for(PlayerMode::CarMode), 2000.0);
    }

    #[rstest]
    fn accelerations_come_from_movement() {
        let mut movement = MockUnitMovement::new();
        movement.expect_max_acceleration().return_const(512.0_f32);
        let unit = PlayerUnit::for_movement(&movement);
        assert_relative_eq!(unit.acceleration_for(PlayerMode::CarMode), 1024.0);
    }

    #[rstest]
    fn toggling_twice_returns_to_start(mut player: PlayerUnit) {
        player.toggle_mode();
        assert_eq!(player.mode(), PlayerMode::CarMode);
        assert!(player.is_transforming);
        player.toggle_mode();
        assert_eq!(player.mode(), PlayerMode::MechMode);
        assert!(player.is_transforming);
    }

    #[rstest]
    fn set_mode_to_current_mode_still_transforms(mut player: PlayerUnit) {
        player.set_mode(PlayerMode::MechMode);
        assert_eq!(player.mode(), PlayerMode::MechMode);
        assert!(player.is_transforming);
    }

    #[rstest]
    #[case::left(-0.5, StrafeState::StrafeLeft)]
    #[case::none(0.0, StrafeState::StrafeNone)]
    #[case::right(1.0, StrafeState::StrafeRight)]
    fn strafe_state_tracks_sign_in_both_modes(
        player: PlayerUnit,
        #[case] value: f32,
        #[case] expected: StrafeState,
    ) {
        for mut unit in [player.clone(), car(player.clone())] {
            let mut movement = CharacterMovement::third_person();
            let transform = Transform::default();
            let mut driver = MovementDriver::new(&mut movement, &transform);
            let mut controller = Controller::default();
            let mut ctx = UnitContext::new(Some(&mut controller), &mut driver);
            unit.strafe(&mut ctx, value);
            assert_eq!(unit.current_strafe_state, expected);
        }
    }

    #[rstest]
    #[case::mech(false)]
    #[case::car(true)]
    fn zero_forward_input_requests_nothing(player: PlayerUnit, #[case] as_car: bool) {
        let mut unit = if as_car { car(player) } else { player };
        let mut movement = MockUnitMovement::new();
        movement.expect_request_move().never();
        let mut controller = Controller::default();
        let mut ctx = UnitContext::new(Some(&mut controller), &mut movement);
        unit.move_forward(&mut ctx, 0.0);
        unit.move_right(&mut ctx, 0.0);
    }

    #[rstest]
    fn movement_without_controller_is_ignored(mut player: PlayerUnit) {
        let mut movement = MockUnitMovement::new();
        movement.expect_request_move().never();
        let mut ctx = UnitContext::new(None, &mut movement);
        player.move_forward(&mut ctx, 1.0);
        player.move_right(&mut ctx, -1.0);
    }

    #[rstest]
    #[case::mech(false)]
    #[case::car(true)]
    fn forward_follows_controller_yaw_only(player: PlayerUnit, #[case] as_car: bool) {
        let mut unit = if as_car { car(player) } else { player };
        let mut movement = CharacterMovement::third_person();
        let transform = Transform::from_rotation(Quat::from_rotation_y(2.0));
        let mut driver = MovementDriver::new(&mut movement, &transform);
        let mut controller = Controller::new(std::f32::consts::FRAC_PI_2, 0.7);
        let mut ctx = UnitContext::new(Some(&mut controller), &mut driver);
        unit.move_forward(&mut ctx, 0.5);
        unit.move_right(&mut ctx, 1.0);
        let input = movement.pending_input();
        // Forward at a quarter turn left is -X; right is -Z.
        assert_relative_eq!(input.x, -0.5, epsilon = 1e-5);
        assert_relative_eq!(input.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(input.z, -1.0, epsilon = 1e-5);
    }

    #[rstest]
    fn mech_strafe_uses_body_facing_and_toggles_orientation(mut player: PlayerUnit) {
        let mut movement = CharacterMovement::third_person();
        let transform = Transform::from_rotation(Quat::from_rotation_y(std::f32::consts::PI));
        let mut controller = Controller::default();
        {
            let mut driver = MovementDriver::new(&mut movement, &transform);
            let mut ctx = UnitContext::new(Some(&mut controller), &mut driver);
            player.strafe(&mut ctx, 1.0);
            assert!(!ctx.movement.orient_to_movement());
        }
        // Facing backwards, body right is world -X.
        assert_relative_eq!(movement.pending_input().x, -1.0, epsilon = 1e-5);
        {
            let mut driver = MovementDriver::new(&mut movement, &transform);
            let mut ctx = UnitContext::new(Some(&mut controller), &mut driver);
            player.strafe(&mut ctx, 0.0);
            assert!(ctx.movement.orient_to_movement());
        }
    }

    #[rstest]
    fn mech_strafe_without_controller_restores_orientation(mut player: PlayerUnit) {
        let mut movement = MockUnitMovement::new();
        movement
            .expect_set_orient_to_movement()
            .with(eq(true))
            .times(1)
            .return_const(());
        movement.expect_request_move().never();
        let mut ctx = UnitContext::new(None, &mut movement);
        player.strafe(&mut ctx, 1.0);
        assert_eq!(player.current_strafe_state, StrafeState::StrafeRight);
    }

    #[rstest]
    fn car_strafe_leaves_movement_alone(player: PlayerUnit) {
        let mut unit = car(player);
        let mut movement = MockUnitMovement::new();
        movement.expect_set_orient_to_movement().never();
        movement.expect_request_move().with(always(), always()).never();
        let mut controller = Controller::default();
        let mut ctx = UnitContext::new(Some(&mut controller), &mut movement);
        unit.strafe(&mut ctx, -1.0);
        assert_eq!(unit.current_strafe_state, StrafeState::StrafeLeft);
    }

    #[rstest]
    fn fire_dispatches_by_mode(mut player: PlayerUnit) {
        assert_eq!(player.fire_primary(), Weapon::MechPrimary);
        assert_eq!(player.fire_secondary(), Weapon::MechSecondary);
        player.toggle_mode();
        assert_eq!(player.fire_primary(), Weapon::CarPrimary);
        assert_eq!(player.fire_secondary(), Weapon::CarThruster);
    }

    #[rstest]
    fn shooting_flags_follow_trigger(mut player: PlayerUnit) {
        player.fire_primary();
        player.fire_secondary();
        assert!(player.is_shooting_primary && player.is_shooting_secondary);
        player.release_primary();
        assert!(!player.is_shooting_primary);
        assert!(player.is_shooting_secondary);
    }

    #[rstest]
    fn rate_look_changes_nothing(mut player: PlayerUnit) {
        let before = player.clone();
        player.look_right_at_rate(1.0);
        player.look_up_at_rate(-1.0);
        assert_eq!(player, before);
    }

    #[rstest]
    fn binds_every_named_input(player: PlayerUnit) {
        let mut registry = InputRegistry::new();
        player.on_bind_inputs(&mut registry);
        for axis in InputAxis::ALL {
            assert!(registry.is_axis_bound(axis), "{axis:?} unbound");
        }
        for action in [
            InputAction::Jump,
            InputAction::Transform,
            InputAction::FirePrimary,
            InputAction::FireSecondary,
        ] {
            assert!(registry.is_action_bound(action, ButtonEdge::Pressed));
        }
        assert!(registry.is_action_bound(InputAction::Jump, ButtonEdge::Released));
        assert!(!registry.is_action_bound(InputAction::Transform, ButtonEdge::Released));
    }

    #[rstest]
    fn look_binding_turns_controller(player: PlayerUnit) {
        let mut unit = player;
        let mut registry = InputRegistry::new();
        unit.on_bind_inputs(&mut registry);
        let mut movement = MockUnitMovement::new();
        let mut controller = Controller::default();
        {
            let mut ctx = UnitContext::new(Some(&mut controller), &mut movement);
            registry.dispatch_axis(&mut unit, &mut ctx, InputAxis::LookRight, 90.0);
            registry.dispatch_axis(&mut unit, &mut ctx, InputAxis::LookRightRate, 1.0);
        }
        assert_relative_eq!(controller.yaw(), -std::f32::consts::FRAC_PI_2, epsilon = 1e-5);
    }
}
