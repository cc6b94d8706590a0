//! Scaffold unit with an identifier and no behaviour.

use bevy::prelude::*;

use crate::unit::Unit;

/// Placeholder pawn reserved for a future player slot.
///
/// It ticks and binds inputs like any unit, but its hooks do nothing.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component, Default)]
pub struct PlaceholderUnit {
    /// Slot identifier. Not assigned by the unit itself.
    pub player_id: i32,
}

impl Unit for PlaceholderUnit {}
