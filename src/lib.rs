#![cfg_attr(docsrs, feature(doc_cfg))]
//! Library crate providing the HAERT gameplay units.
//! Exposes the dual-mode player, the destructible enemy and the placeholder
//! pawn, together with the lifecycle plugin that drives them.
pub mod camera;
pub mod constants;
pub mod enemy;
pub mod input;
pub mod input_map;
pub mod logging;
pub mod movement;
pub mod placeholder;
pub mod player;
pub mod plugin;
pub mod spawn;
pub mod unit;
pub use constants::*;

// Re-export commonly used items
pub use camera::{CameraBoom, FollowCamera};
pub use enemy::{DamageOutcome, EnemyKilled, EnemyUnit, KillEnemy, StruckByRaycast};
pub use input::{ButtonEdge, InputAction, InputAxis, InputRegistry, UnitInputFrame};
pub use input_map::{InputMap, InputMapError};
pub use logging::init as init_logging;
pub use movement::{CharacterMovement, Controller, UnitMovement};
pub use placeholder::PlaceholderUnit;
pub use player::{PlayerMode, PlayerUnit, StrafeState, Weapon};
pub use plugin::{UnitSystems, UnitsPlugin};
pub use spawn::{spawn_arena_system, spawn_enemy_unit, spawn_player_unit, ArenaSettings};
pub use unit::{Unit, UnitContext};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use haert::prelude::*;
    //! ```

    pub use crate::EnemyUnit;
    pub use crate::PlayerMode;
    pub use crate::PlayerUnit;
    pub use crate::StruckByRaycast;
    pub use crate::Unit;
    pub use crate::UnitsPlugin;
}
