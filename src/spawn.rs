//! Helpers that assemble unit entities and a small arena.

use bevy::prelude::*;

use crate::camera::{CameraBoom, FollowCamera};
use crate::constants::DEFAULT_ENEMY_HEALTH;
use crate::enemy::EnemyUnit;
use crate::movement::{CharacterMovement, ControlRotationUsage, Controller, MovementDriver};
use crate::placeholder::PlaceholderUnit;
use crate::player::PlayerUnit;

/// Spacing between enemies placed by [`spawn_arena_system`].
const ENEMY_SPACING: f32 = 400.0;
/// Distance from the player to the enemy line.
const ENEMY_LINE_DISTANCE: f32 = 1200.0;

/// Arena layout.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaSettings {
    /// Number of enemies placed in front of the player.
    pub enemy_count: u16,
    /// Starting health of each enemy.
    pub enemy_health: i32,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            enemy_count: 3,
            enemy_health: DEFAULT_ENEMY_HEALTH,
        }
    }
}

/// Marker for the camera riding the player's boom.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerCamera;

/// Spawns a possessed player unit and its follow camera.
///
/// Returns the player entity.
pub fn spawn_player_unit(commands: &mut Commands, transform: Transform) -> Entity {
    let mut movement = CharacterMovement::third_person();
    let player = PlayerUnit::for_movement(&MovementDriver::new(&mut movement, &transform));
    let entity = commands
        .spawn((
            Name::new("Player"),
            player,
            movement,
            transform,
            Controller::default(),
            ControlRotationUsage::default(),
            CameraBoom::default(),
        ))
        .id();

    let mut camera = commands.spawn((
        Name::new("PlayerCamera"),
        PlayerCamera,
        FollowCamera::new(entity),
        Transform::default(),
    ));
    attach_camera(&mut camera);

    entity
}

#[cfg(feature = "render")]
fn attach_camera(camera: &mut EntityCommands<'_>) {
    camera.insert(Camera3d::default());
}

#[cfg(not(feature = "render"))]
fn attach_camera(_camera: &mut EntityCommands<'_>) {}

/// Spawns an enemy at full health.
pub fn spawn_enemy_unit(commands: &mut Commands, transform: Transform, starting_health: i32) -> Entity {
    commands
        .spawn((Name::new("Enemy"), EnemyUnit::new(starting_health), transform))
        .id()
}

/// Spawns a placeholder unit.
pub fn spawn_placeholder_unit(commands: &mut Commands, player_id: i32) -> Entity {
    commands
        .spawn((
            Name::new("Placeholder"),
            PlaceholderUnit { player_id },
            Transform::default(),
        ))
        .id()
}

/// Spawns the player, a line of enemies ahead of it and a placeholder.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn spawn_arena_system(mut commands: Commands, settings: Res<ArenaSettings>) {
    spawn_player_unit(&mut commands, Transform::default());

    let half_width = ENEMY_SPACING * f32::from(settings.enemy_count.saturating_sub(1)) / 2.0;
    for index in 0..settings.enemy_count {
        let x = f32::from(index).mul_add(ENEMY_SPACING, -half_width);
        spawn_enemy_unit(
            &mut commands,
            Transform::from_xyz(x, 0.0, -ENEMY_LINE_DISTANCE),
            settings.enemy_health,
        );
    }

    spawn_placeholder_unit(&mut commands, 0);
    log::info!("arena spawned with {} enemies", settings.enemy_count);
}

/// Gives units and the arena floor something to render.
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub fn dress_arena_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    players: Query<Entity, Added<PlayerUnit>>,
    enemies: Query<Entity, Added<EnemyUnit>>,
    mut floor_spawned: Local<bool>,
) {
    if !*floor_spawned {
        commands.spawn((
            Name::new("Floor"),
            Mesh3d(meshes.add(Plane3d::default().mesh().size(6000.0, 6000.0))),
            MeshMaterial3d(materials.add(Color::srgb(0.3, 0.35, 0.3))),
            Transform::from_xyz(0.0, -50.0, 0.0),
        ));
        commands.spawn((
            DirectionalLight::default(),
            Transform::from_xyz(0.0, 1000.0, 500.0).looking_at(Vec3::ZERO, Vec3::Y),
        ));
        *floor_spawned = true;
    }

    for entity in &players {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Capsule3d::new(40.0, 100.0))),
            MeshMaterial3d(materials.add(Color::srgb(0.2, 0.4, 0.9))),
        ));
    }
    for entity in &enemies {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Cuboid::new(100.0, 100.0, 100.0))),
            MeshMaterial3d(materials.add(Color::srgb(0.8, 0.2, 0.2))),
        ));
    }
}
