//! Bevy plugin wiring the unit lifecycle into the schedule.

use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;

use crate::camera::{camera_follow_system, CameraBoom};
use crate::enemy::{apply_raycast_damage, kill_enemy, EnemyUnit};
use crate::input::{consume_input_actions_system, UnitInputFrame};
use crate::input_map::{gather_unit_input_system, InputMap};
use crate::movement::apply_movement_system;
use crate::placeholder::PlaceholderUnit;
use crate::player::PlayerUnit;
use crate::unit::{
    bind_spawned_units_system, dispatch_unit_input_system, tick_units_system, Unit,
};

/// Ordered stages of a unit frame, all in `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitSystems {
    /// Device state is sampled into [`UnitInputFrame`].
    GatherInput,
    /// Newly spawned units run their spawn and binding hooks.
    Bind,
    /// Input is routed to unit handlers.
    DispatchInput,
    /// Delivered action edges are dropped from the frame.
    ConsumeInput,
    /// Units that tick are ticked.
    Tick,
    /// Movement requests are consumed.
    Movement,
    /// Follow cameras catch up with their targets.
    Camera,
}

/// Installs the player, enemy and placeholder units.
///
/// Adds the damage observers, movement step and follow camera alongside the
/// per-unit lifecycle systems. Device resources are initialised so the
/// plugin also runs headless under `MinimalPlugins`.
#[derive(Debug, Clone, Copy)]
pub struct UnitsPlugin {
    /// Sample keyboard and mouse into [`UnitInputFrame`] each frame. Turn off
    /// when a host writes the frame itself.
    pub gather_device_input: bool,
}

impl Default for UnitsPlugin {
    fn default() -> Self {
        Self {
            gather_device_input: true,
        }
    }
}

impl Plugin for UnitsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PlayerUnit>()
            .register_type::<EnemyUnit>()
            .register_type::<PlaceholderUnit>()
            .register_type::<CameraBoom>();

        app.init_resource::<InputMap>()
            .init_resource::<UnitInputFrame>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<AccumulatedMouseMotion>();

        app.configure_sets(
            Update,
            (
                UnitSystems::GatherInput,
                UnitSystems::Bind,
                UnitSystems::DispatchInput,
                UnitSystems::ConsumeInput,
                UnitSystems::Tick,
                UnitSystems::Movement,
                UnitSystems::Camera,
            )
                .chain(),
        );

        if self.gather_device_input {
            app.add_systems(
                Update,
                gather_unit_input_system.in_set(UnitSystems::GatherInput),
            );
        }

        add_unit_systems::<PlayerUnit>(app);
        add_unit_systems::<EnemyUnit>(app);
        add_unit_systems::<PlaceholderUnit>(app);

        app.add_systems(
            Update,
            (
                consume_input_actions_system.in_set(UnitSystems::ConsumeInput),
                apply_movement_system.in_set(UnitSystems::Movement),
                camera_follow_system.in_set(UnitSystems::Camera),
            ),
        );

        app.add_observer(apply_raycast_damage);
        app.add_observer(kill_enemy);
    }
}

/// Registers the lifecycle systems for one unit type.
pub fn add_unit_systems<U: Unit>(app: &mut App) {
    app.add_systems(
        Update,
        (
            bind_spawned_units_system::<U>.in_set(UnitSystems::Bind),
            dispatch_unit_input_system::<U>.in_set(UnitSystems::DispatchInput),
            tick_units_system::<U>.in_set(UnitSystems::Tick),
        ),
    );
}
