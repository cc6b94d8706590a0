//! Lifecycle contract between units and the host schedule.
//!
//! A unit is a component implementing [`Unit`]. The generic systems here are
//! registered once per unit type by [`UnitsPlugin`](crate::UnitsPlugin):
//!
//! - [`bind_spawned_units_system`] runs `on_spawn` and `on_bind_inputs` the
//!   first frame a unit is seen and stores its [`BoundInputs`].
//! - [`dispatch_unit_input_system`] routes the [`UnitInputFrame`] through
//!   those bindings.
//! - [`tick_units_system`] calls `on_tick` for units that opt in.

use bevy::ecs::component::Mutable;
use bevy::prelude::*;

use crate::input::{BoundInputs, InputAxis, InputRegistry, UnitInputFrame};
use crate::movement::{CharacterMovement, Controller, MovementDriver, UnitMovement};

/// Callbacks the host invokes on a unit.
///
/// Every method has an empty default so a unit only overrides what it uses.
pub trait Unit: Component<Mutability = Mutable> + Sized {
    /// Whether the unit wants per-frame [`Unit::on_tick`] calls.
    fn can_ever_tick(&self) -> bool {
        true
    }

    /// Called once when the unit enters the world.
    fn on_spawn(&mut self) {}

    /// Called every frame with the elapsed time, if the unit ticks.
    fn on_tick(&mut self, _delta_seconds: f32) {}

    /// Registers input handlers. Called once, after [`Unit::on_spawn`].
    fn on_bind_inputs(&self, _registry: &mut InputRegistry<Self>) {}
}

/// Collaborators available to a unit while it handles input.
pub struct UnitContext<'a> {
    /// Steering controller, when the unit is possessed by one.
    pub controller: Option<&'a mut Controller>,
    /// Movement services for the unit's body.
    pub movement: &'a mut dyn UnitMovement,
}

impl<'a> UnitContext<'a> {
    /// Bundles the collaborators for one dispatch.
    pub fn new(controller: Option<&'a mut Controller>, movement: &'a mut dyn UnitMovement) -> Self {
        Self {
            controller,
            movement,
        }
    }

    /// Control yaw, or `None` without a controller.
    #[must_use]
    pub fn control_yaw(&self) -> Option<f32> {
        self.controller.as_deref().map(Controller::yaw)
    }
}

/// Runs spawn hooks and records input bindings for units not yet bound.
///
/// An entity keeps its [`BoundInputs`] when its unit component is replaced,
/// so the hooks run once per entity.
pub fn bind_spawned_units_system<U: Unit>(
    mut commands: Commands,
    mut spawned: Query<(Entity, &mut U), Without<BoundInputs<U>>>,
) {
    for (entity, mut unit) in &mut spawned {
        unit.on_spawn();
        let mut registry = InputRegistry::new();
        unit.on_bind_inputs(&mut registry);
        commands.entity(entity).insert(BoundInputs(registry));
    }
}

/// Routes this frame's input through each unit's bindings.
///
/// Every axis is dispatched every frame, with `0.0` when idle, followed by
/// the frame's action edges in arrival order.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn dispatch_unit_input_system<U: Unit>(
    frame: Res<UnitInputFrame>,
    mut units: Query<(
        &mut U,
        &BoundInputs<U>,
        &mut CharacterMovement,
        &Transform,
        Option<&mut Controller>,
    )>,
) {
    for (mut unit, bindings, mut movement, transform, mut controller) in &mut units {
        let mut driver = MovementDriver::new(&mut movement, transform);
        let mut ctx = UnitContext::new(controller.as_deref_mut(), &mut driver);
        for axis in InputAxis::ALL {
            bindings
                .0
                .dispatch_axis(&mut unit, &mut ctx, axis, frame.axis(axis));
        }
        for &(action, edge) in frame.actions() {
            bindings.0.dispatch_action(&mut unit, &mut ctx, action, edge);
        }
    }
}

/// Calls [`Unit::on_tick`] on every unit that can tick.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn tick_units_system<U: Unit>(time: Res<Time>, mut units: Query<&mut U>) {
    let delta = time.delta_secs();
    for mut unit in &mut units {
        if unit.can_ever_tick() {
            unit.on_tick(delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ButtonEdge, InputAction};
    use rstest::rstest;

    #[derive(Component, Default)]
    struct Probe {
        spawned: u32,
        ticks: u32,
        forward: f32,
        jumps: u32,
    }

    impl Unit for Probe {
        fn on_spawn(&mut self) {
            self.spawned += 1;
        }

        fn on_tick(&mut self, _delta_seconds: f32) {
            self.ticks += 1;
        }

        fn on_bind_inputs(&self, registry: &mut InputRegistry<Self>) {
            registry
                .bind_axis(InputAxis::MoveForward, |probe, _, value| {
                    probe.forward = value;
                })
                .bind_action(InputAction::Jump, ButtonEdge::Pressed, |probe, ctx| {
                    probe.jumps += 1;
                    ctx.movement.jump();
                });
        }
    }

    #[derive(Component, Default)]
    struct Dormant {
        ticks: u32,
    }

    impl Unit for Dormant {
        fn can_ever_tick(&self) -> bool {
            false
        }

        fn on_tick(&mut self, _delta_seconds: f32) {
            self.ticks += 1;
        }
    }

    fn probe_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<UnitInputFrame>();
        app.add_systems(
            Update,
            (
                bind_spawned_units_system::<Probe>,
                dispatch_unit_input_system::<Probe>,
                tick_units_system::<Probe>,
                tick_units_system::<Dormant>,
            )
                .chain(),
        );
        app
    }

    #[rstest]
    fn spawn_hook_runs_once_and_bindings_are_stored() {
        let mut app = probe_app();
        let entity = app
            .world_mut()
            .spawn((Probe::default(), CharacterMovement::default(), Transform::default()))
            .id();
        app.update();
        app.update();

        let probe = app.world().get::<Probe>(entity);
        assert_eq!(probe.map(|p| p.spawned), Some(1));
        assert_eq!(probe.map(|p| p.ticks), Some(2));
        assert!(app.world().get::<BoundInputs<Probe>>(entity).is_some());
    }

    #[rstest]
    fn replacing_the_unit_component_does_not_respawn() {
        let mut app = probe_app();
        let entity = app
            .world_mut()
            .spawn((Probe::default(), CharacterMovement::default(), Transform::default()))
            .id();
        app.update();

        app.world_mut().entity_mut(entity).insert(Probe {
            spawned: 5,
            ..Probe::default()
        });
        app.update();

        assert_eq!(app.world().get::<Probe>(entity).map(|p| p.spawned), Some(5));
    }

    #[rstest]
    fn frame_input_reaches_bound_handlers() {
        let mut app = probe_app();
        let entity = app
            .world_mut()
            .spawn((Probe::default(), CharacterMovement::default(), Transform::default()))
            .id();
        app.update();

        {
            let mut frame = app.world_mut().resource_mut::<UnitInputFrame>();
            frame.set_axis(InputAxis::MoveForward, 0.5);
            frame.push_action(InputAction::Jump, ButtonEdge::Pressed);
        }
        app.update();

        let world = app.world();
        let probe = world.get::<Probe>(entity);
        assert_eq!(probe.map(|p| p.jumps), Some(1));
        assert!(probe.is_some_and(|p| (p.forward - 0.5).abs() < f32::EPSILON));
        assert!(world
            .get::<CharacterMovement>(entity)
            .is_some_and(CharacterMovement::is_jump_pressed));
    }

    #[rstest]
    fn units_that_opt_out_never_tick() {
        let mut app = probe_app();
        let entity = app.world_mut().spawn(Dormant::default()).id();
        app.update();
        app.update();
        assert_eq!(app.world().get::<Dormant>(entity).map(|d| d.ticks), Some(0));
    }
}
