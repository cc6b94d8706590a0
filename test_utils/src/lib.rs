//! Utility helpers for tests.
//!
//! Builds headless apps with the unit plugin installed and drives the
//! device resources the way the input plugin would, one frame at a time.

use std::time::Duration;

use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use haert::{spawn_enemy_unit, spawn_player_unit, UnitsPlugin};

/// Simulated frame length. The first frame after startup has zero delta.
pub const FRAME: Duration = Duration::from_millis(100);

fn headless_app(plugin: UnitsPlugin) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(plugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
    app
}

/// Headless app with [`UnitsPlugin`] sampling devices.
pub fn unit_test_app() -> App {
    headless_app(UnitsPlugin::default())
}

/// Headless app where tests write `UnitInputFrame` directly.
pub fn scripted_unit_test_app() -> App {
    headless_app(UnitsPlugin {
        gather_device_input: false,
    })
}

/// Spawns a possessed player at the origin and runs its spawn hooks.
pub fn spawn_player(app: &mut App) -> Entity {
    let world = app.world_mut();
    let entity = spawn_player_unit(&mut world.commands(), Transform::default());
    world.flush();
    step(app);
    entity
}

/// Spawns an enemy at the origin and runs its spawn hooks.
pub fn spawn_enemy(app: &mut App, starting_health: i32) -> Entity {
    let world = app.world_mut();
    let entity = spawn_enemy_unit(&mut world.commands(), Transform::default(), starting_health);
    world.flush();
    step(app);
    entity
}

/// Presses `key` for the next frame.
pub fn press_key(app: &mut App, key: KeyCode) {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(key);
}

/// Releases `key` for the next frame.
pub fn release_key(app: &mut App, key: KeyCode) {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .release(key);
}

/// Presses a mouse button for the next frame.
pub fn press_button(app: &mut App, button: MouseButton) {
    app.world_mut()
        .resource_mut::<ButtonInput<MouseButton>>()
        .press(button);
}

/// Sets the mouse motion reported for the next frame.
pub fn move_mouse(app: &mut App, delta: Vec2) {
    app.world_mut()
        .resource_mut::<AccumulatedMouseMotion>()
        .delta = delta;
}

/// Runs one frame, then clears button edges and mouse motion so held
/// buttons stay pressed without re-triggering.
pub fn step(app: &mut App) {
    app.update();
    let world = app.world_mut();
    world.resource_mut::<ButtonInput<KeyCode>>().clear();
    world.resource_mut::<ButtonInput<MouseButton>>().clear();
    world.resource_mut::<AccumulatedMouseMotion>().delta = Vec2::ZERO;
}

/// Reads a component from `entity`, panicking with a useful message if it
/// is missing.
///
/// # Panics
/// Panics if `entity` does not exist or lacks the component.
pub fn component<T: Component + Clone>(app: &App, entity: Entity) -> T {
    app.world()
        .get::<T>(entity)
        .cloned()
        .unwrap_or_else(|| panic!("{entity} has no {}", std::any::type_name::<T>()))
}
