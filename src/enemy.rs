//! Destructible enemy unit.
//!
//! Damage arrives through [`StruckByRaycast`] from whatever system resolves
//! hits. An enemy whose health reaches zero is removed from the world once
//! and then ignores anything else sent its way.

use bevy::prelude::*;
use log::{debug, info, warn};

use crate::constants::DEFAULT_ENEMY_HEALTH;
use crate::unit::Unit;

/// Result of applying damage to an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The enemy is still standing.
    Survived {
        /// Health left after the hit.
        remaining: i32,
    },
    /// This hit destroyed the enemy.
    Destroyed,
    /// The enemy was already destroyed; nothing changed.
    AlreadyDestroyed,
}

/// Enemy pawn with hit points.
#[derive(Component, Debug, Clone, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct EnemyUnit {
    /// Health the enemy spawns with, and the ceiling for healing.
    pub starting_health: i32,
    health: i32,
    destroyed: bool,
}

impl Default for EnemyUnit {
    fn default() -> Self {
        Self::new(DEFAULT_ENEMY_HEALTH)
    }
}

impl EnemyUnit {
    /// Creates an enemy at full health.
    #[must_use]
    pub const fn new(starting_health: i32) -> Self {
        Self {
            starting_health,
            health: starting_health,
            destroyed: false,
        }
    }

    /// Current health. May be negative after the killing blow.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Whether the enemy has been removed.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Applies damage with no particular impact point.
    pub fn apply_damage(&mut self, amount: i32) -> DamageOutcome {
        self.apply_damage_at(amount, Vec3::ZERO)
    }

    /// Subtracts `amount` from health and destroys the enemy at or below
    /// zero.
    ///
    /// Negative amounts heal, capped at [`EnemyUnit::starting_health`].
    /// `hit_location` is relative to the enemy and only reported.
    pub fn apply_damage_at(&mut self, amount: i32, hit_location: Vec3) -> DamageOutcome {
        if self.destroyed {
            return DamageOutcome::AlreadyDestroyed;
        }

        let after = self.health.saturating_sub(amount);
        if amount < 0 {
            self.health = after.min(self.starting_health);
            warn!("{}", self.heal_message(amount));
        } else {
            self.health = after;
        }
        debug!("enemy took {amount} at {hit_location}, health {}", self.health);

        if self.health > 0 {
            DamageOutcome::Survived {
                remaining: self.health,
            }
        } else if self.destroy_self() {
            DamageOutcome::Destroyed
        } else {
            DamageOutcome::AlreadyDestroyed
        }
    }

    fn heal_message(&self, amount: i32) -> String {
        format!("negative damage {amount} heals enemy to {}", self.health)
    }

    /// Marks the enemy destroyed. Returns `false` if it already was.
    pub fn destroy_self(&mut self) -> bool {
        !std::mem::replace(&mut self.destroyed, true)
    }
}

impl Unit for EnemyUnit {
    fn can_ever_tick(&self) -> bool {
        false
    }

    fn on_spawn(&mut self) {
        debug!("enemy spawned with {} health", self.starting_health);
    }
}

/// A hit on an entity, raised by projectile or raycast systems.
#[derive(EntityEvent, Debug, Clone, Copy, PartialEq)]
pub struct StruckByRaycast {
    /// Entity that was hit.
    pub entity: Entity,
    /// Damage to subtract.
    pub damage: i32,
    /// Impact point relative to the hit entity.
    pub relative_hit_location: Vec3,
}

impl StruckByRaycast {
    /// A hit at the entity's origin.
    #[must_use]
    pub const fn new(entity: Entity, damage: i32) -> Self {
        Self {
            entity,
            damage,
            relative_hit_location: Vec3::ZERO,
        }
    }
}

/// Request to destroy an enemy outright.
#[derive(EntityEvent, Debug, Clone, Copy, PartialEq, Eq)]
pub struct KillEnemy {
    /// Enemy to destroy.
    pub entity: Entity,
}

/// Raised once when an enemy is destroyed, before it is despawned.
#[derive(EntityEvent, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyKilled {
    /// The destroyed enemy.
    pub entity: Entity,
}

fn remove_enemy(commands: &mut Commands, entity: Entity) {
    info!("enemy {entity} destroyed");
    commands.trigger(EnemyKilled { entity });
    commands.entity(entity).despawn();
}

/// Applies [`StruckByRaycast`] hits to enemies.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
pub fn apply_raycast_damage(
    struck: On<StruckByRaycast>,
    mut enemies: Query<&mut EnemyUnit>,
    mut commands: Commands,
) {
    let StruckByRaycast {
        entity,
        damage,
        relative_hit_location,
    } = *struck.event();
    let Ok(mut enemy) = enemies.get_mut(entity) else {
        debug!("hit on {entity} ignored: not an enemy");
        return;
    };
    if enemy.apply_damage_at(damage, relative_hit_location) == DamageOutcome::Destroyed {
        remove_enemy(&mut commands, entity);
    }
}

/// Destroys enemies named by [`KillEnemy`].
#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
pub fn kill_enemy(kill: On<KillEnemy>, mut enemies: Query<&mut EnemyUnit>, mut commands: Commands) {
    let entity = kill.event().entity;
    if let Ok(mut enemy) = enemies.get_mut(entity) {
        if enemy.destroy_self() {
            remove_enemy(&mut commands, entity);
        }
    }
}
