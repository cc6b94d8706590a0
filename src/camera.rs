//! Third-person camera boom.
//!
//! The boom hangs off the player and the follow camera sits at its end. The
//! camera is its own entity so it is not dragged around by the body's
//! rotation.

use bevy::prelude::*;

use crate::constants::CAMERA_ARM_LENGTH;
use crate::movement::Controller;

/// Spring arm holding the follow camera behind a unit.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CameraBoom {
    /// Distance from the unit to the camera.
    pub target_arm_length: f32,
    /// Rotate the arm with the controller instead of the body.
    pub use_pawn_control_rotation: bool,
}

impl Default for CameraBoom {
    fn default() -> Self {
        Self {
            target_arm_length: CAMERA_ARM_LENGTH,
            use_pawn_control_rotation: true,
        }
    }
}

/// Camera attached to the end of a unit's [`CameraBoom`].
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowCamera {
    /// Unit whose boom this camera rides.
    pub target: Entity,
    /// Leave the camera's rotation untouched; only its position follows the
    /// boom.
    pub use_pawn_control_rotation: bool,
}

impl FollowCamera {
    /// A camera fixed to the end of `target`'s boom.
    #[must_use]
    pub const fn new(target: Entity) -> Self {
        Self {
            target,
            use_pawn_control_rotation: false,
        }
    }
}

/// World transform of a camera at the end of a boom.
#[must_use]
pub fn boom_camera_transform(
    anchor: &Transform,
    boom: &CameraBoom,
    controller: Option<&Controller>,
) -> Transform {
    let rotation = match controller {
        Some(ctrl) if boom.use_pawn_control_rotation => ctrl.rotation(),
        _ => anchor.rotation,
    };
    Transform {
        translation: anchor.translation + rotation * Vec3::Z * boom.target_arm_length,
        rotation,
        scale: Vec3::ONE,
    }
}

/// Moves every follow camera to the end of its target's boom.
pub fn camera_follow_system(
    targets: Query<(&Transform, &CameraBoom, Option<&Controller>), Without<FollowCamera>>,
    mut cameras: Query<(&FollowCamera, &mut Transform)>,
) {
    for (follow, mut transform) in &mut cameras {
        let Ok((anchor, boom, controller)) = targets.get(follow.target) else {
            continue;
        };
        let placed = boom_camera_transform(anchor, boom, controller);
        transform.translation = placed.translation;
        if !follow.use_pawn_control_rotation {
            transform.rotation = placed.rotation;
        }
    }
}
