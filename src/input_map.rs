//! Device-to-input mapping and the per-frame gather system.
//!
//! [`InputMap`] says which keys, buttons and mouse axes feed each named
//! input. It can be loaded from JSON so players can remap controls without
//! a rebuild.

use std::path::{Path, PathBuf};

use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MOUSE_LOOK_SCALE;
use crate::input::{ButtonEdge, InputAction, InputAxis, UnitInputFrame};

/// Errors raised while loading an [`InputMap`].
#[derive(Debug, Error)]
pub enum InputMapError {
    /// The file could not be read.
    #[error("failed to read input map {}: {source}", .path.display())]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file was not a valid input map.
    #[error("invalid input map: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Device source for an axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AxisSource {
    /// Contributes `1.0` while the key is held.
    Key(KeyCode),
    /// Horizontal mouse motion this frame.
    MouseX,
    /// Vertical mouse motion this frame.
    MouseY,
}

/// Device source for an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonSource {
    /// Keyboard key.
    Key(KeyCode),
    /// Mouse button.
    Mouse(MouseButton),
}

/// One source feeding an axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisMapping {
    /// Axis fed by this source.
    pub axis: InputAxis,
    /// Where the raw value comes from.
    pub source: AxisSource,
    /// Multiplier applied to the raw value.
    pub scale: f32,
}

/// One source triggering an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionMapping {
    /// Action triggered.
    pub action: InputAction,
    /// Button that triggers it.
    pub source: ButtonSource,
}

/// Mapping from devices to named inputs.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputMap {
    /// Axis sources; several sources may feed the same axis.
    pub axes: Vec<AxisMapping>,
    /// Action sources.
    pub actions: Vec<ActionMapping>,
}

const fn key_axis(axis: InputAxis, key: KeyCode, scale: f32) -> AxisMapping {
    AxisMapping {
        axis,
        source: AxisSource::Key(key),
        scale,
    }
}

impl Default for InputMap {
    fn default() -> Self {
        Self {
            axes: vec![
                key_axis(InputAxis::MoveForward, KeyCode::KeyW, 1.0),
                key_axis(InputAxis::MoveForward, KeyCode::KeyS, -1.0),
                key_axis(InputAxis::MoveRight, KeyCode::KeyD, 1.0),
                key_axis(InputAxis::MoveRight, KeyCode::KeyA, -1.0),
                key_axis(InputAxis::Strafe, KeyCode::KeyE, 1.0),
                key_axis(InputAxis::Strafe, KeyCode::KeyQ, -1.0),
                AxisMapping {
                    axis: InputAxis::LookRight,
                    source: AxisSource::MouseX,
                    scale: MOUSE_LOOK_SCALE,
                },
                AxisMapping {
                    axis: InputAxis::LookUp,
                    source: AxisSource::MouseY,
                    scale: -MOUSE_LOOK_SCALE,
                },
                key_axis(InputAxis::LookRightRate, KeyCode::ArrowRight, 1.0),
                key_axis(InputAxis::LookRightRate, KeyCode::ArrowLeft, -1.0),
                key_axis(InputAxis::LookUpRate, KeyCode::ArrowUp, 1.0),
                key_axis(InputAxis::LookUpRate, KeyCode::ArrowDown, -1.0),
            ],
            actions: vec![
                ActionMapping {
                    action: InputAction::Jump,
                    source: ButtonSource::Key(KeyCode::Space),
                },
                ActionMapping {
                    action: InputAction::Transform,
                    source: ButtonSource::Key(KeyCode::Tab),
                },
                ActionMapping {
                    action: InputAction::FirePrimary,
                    source: ButtonSource::Mouse(MouseButton::Left),
                },
                ActionMapping {
                    action: InputAction::FireSecondary,
                    source: ButtonSource::Mouse(MouseButton::Right),
                },
            ],
        }
    }
}

impl InputMap {
    /// Parses a map from JSON.
    ///
    /// # Errors
    /// Returns [`InputMapError::Parse`] when the text is not a valid map.
    pub fn from_json_str(text: &str) -> Result<Self, InputMapError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads a map from a JSON file.
    ///
    /// # Errors
    /// Returns [`InputMapError::Read`] if the file cannot be read and
    /// [`InputMapError::Parse`] if its contents are invalid.
    pub fn load(path: &Path) -> Result<Self, InputMapError> {
        let text = std::fs::read_to_string(path).map_err(|source| InputMapError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let map = Self::from_json_str(&text)?;
        info!(
            "loaded input map from {} ({} axes, {} actions)",
            path.display(),
            map.axes.len(),
            map.actions.len()
        );
        Ok(map)
    }

    /// Builds this frame's input from device state.
    #[must_use]
    pub fn sample(
        &self,
        keys: &ButtonInput<KeyCode>,
        buttons: &ButtonInput<MouseButton>,
        mouse_delta: Vec2,
    ) -> UnitInputFrame {
        let mut frame = UnitInputFrame::default();
        for mapping in &self.axes {
            let raw = match mapping.source {
                AxisSource::Key(key) => {
                    if keys.pressed(key) {
                        1.0
                    } else {
                        0.0
                    }
                }
                AxisSource::MouseX => mouse_delta.x,
                AxisSource::MouseY => mouse_delta.y,
            };
            frame.add_axis(mapping.axis, raw * mapping.scale);
        }
        for mapping in &self.actions {
            let (pressed, released) = match mapping.source {
                ButtonSource::Key(key) => (keys.just_pressed(key), keys.just_released(key)),
                ButtonSource::Mouse(button) => {
                    (buttons.just_pressed(button), buttons.just_released(button))
                }
            };
            if pressed {
                frame.push_action(mapping.action, ButtonEdge::Pressed);
            }
            if released {
                frame.push_action(mapping.action, ButtonEdge::Released);
            }
        }
        frame
    }
}

/// Replaces [`UnitInputFrame`] with the current device state.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn gather_unit_input_system(
    map: Res<InputMap>,
    keys: Res<ButtonInput<KeyCode>>,
    buttons: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    mut frame: ResMut<UnitInputFrame>,
) {
    *frame = map.sample(&keys, &buttons, motion.delta);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::io::Write;

    #[fixture]
    fn keys() -> ButtonInput<KeyCode> {
        ButtonInput::default()
    }

    #[fixture]
    fn buttons() -> ButtonInput<MouseButton> {
        ButtonInput::default()
    }

    #[rstest]
    fn opposing_keys_cancel(mut keys: ButtonInput<KeyCode>, buttons: ButtonInput<MouseButton>) {
        keys.press(KeyCode::KeyW);
        let frame = InputMap::default().sample(&keys, &buttons, Vec2::ZERO);
        assert!((frame.axis(InputAxis::MoveForward) - 1.0).abs() < f32::EPSILON);

        keys.press(KeyCode::KeyS);
        let frame = InputMap::default().sample(&keys, &buttons, Vec2::ZERO);
        assert!(frame.axis(InputAxis::MoveForward).abs() < f32::EPSILON);
    }

    #[rstest]
    fn mouse_motion_is_scaled(keys: ButtonInput<KeyCode>, buttons: ButtonInput<MouseButton>) {
        let frame = InputMap::default().sample(&keys, &buttons, Vec2::new(10.0, 20.0));
        assert!((frame.axis(InputAxis::LookRight) - 10.0 * MOUSE_LOOK_SCALE).abs() < 1e-6);
        assert!((frame.axis(InputAxis::LookUp) + 20.0 * MOUSE_LOOK_SCALE).abs() < 1e-6);
    }

    #[rstest]
    fn button_edges_become_actions(
        mut keys: ButtonInput<KeyCode>,
        mut buttons: ButtonInput<MouseButton>,
    ) {
        keys.press(KeyCode::Tab);
        buttons.press(MouseButton::Left);
        buttons.press(MouseButton::Right);
        buttons.clear();
        buttons.release(MouseButton::Right);
        let frame = InputMap::default().sample(&keys, &buttons, Vec2::ZERO);
        assert_eq!(
            frame.actions(),
            &[
                (InputAction::Transform, ButtonEdge::Pressed),
                (InputAction::FireSecondary, ButtonEdge::Released),
            ]
        );
    }

    #[rstest]
    fn loads_remapped_controls_from_file() {
        let json = r#"{
            "axes": [{ "axis": "MoveForward", "source": { "Key": "KeyI" }, "scale": 2.0 }],
            "actions": [{ "action": "Jump", "source": { "Mouse": "Middle" } }]
        }"#;
        let mut file = tempfile::NamedTempFile::new().unwrap_or_else(|e| panic!("temp file: {e}"));
        file.write_all(json.as_bytes())
            .unwrap_or_else(|e| panic!("write map: {e}"));

        let map = InputMap::load(file.path()).unwrap_or_else(|e| panic!("load map: {e}"));
        assert_eq!(map.axes.len(), 1);
        assert_eq!(
            map.actions,
            vec![ActionMapping {
                action: InputAction::Jump,
                source: ButtonSource::Mouse(MouseButton::Middle),
            }]
        );
    }

    #[rstest]
    fn missing_file_reports_path() {
        let err = InputMap::load(Path::new("/nonexistent/controls.json"))
            .err()
            .map(|e| e.to_string());
        assert!(err.is_some_and(|msg| msg.contains("/nonexistent/controls.json")));
    }

    #[rstest]
    fn malformed_json_is_a_parse_error() {
        let result = InputMap::from_json_str("{ not json");
        assert!(matches!(result, Err(InputMapError::Parse(_))));
    }
}
