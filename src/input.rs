//! Named input axes and actions, and the per-unit binding registry.
//!
//! Units describe which handler each named input reaches in
//! [`Unit::on_bind_inputs`](crate::unit::Unit::on_bind_inputs). The host then
//! routes the per-frame [`UnitInputFrame`] through those bindings.

use bevy::prelude::*;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::unit::{Unit, UnitContext};

/// Continuous inputs sampled every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAxis {
    /// Forward and backward travel.
    MoveForward,
    /// Side to side travel relative to the controller.
    MoveRight,
    /// Side to side travel relative to the body.
    Strafe,
    /// Absolute yaw delta, as produced by a mouse.
    LookRight,
    /// Normalised yaw rate, as produced by a stick.
    LookRightRate,
    /// Absolute pitch delta.
    LookUp,
    /// Normalised pitch rate.
    LookUpRate,
}

impl InputAxis {
    /// Every axis, in dispatch order.
    pub const ALL: [Self; 7] = [
        Self::MoveForward,
        Self::MoveRight,
        Self::Strafe,
        Self::LookRight,
        Self::LookRightRate,
        Self::LookUp,
        Self::LookUpRate,
    ];
}

/// Discrete inputs delivered on press and release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Leave the ground.
    Jump,
    /// Switch between car and mech.
    Transform,
    /// Main weapon.
    FirePrimary,
    /// Secondary weapon or thruster.
    FireSecondary,
}

/// Which edge of a button an action handler reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonEdge {
    /// The button went down this frame.
    Pressed,
    /// The button went up this frame.
    Released,
}

/// Handler for a continuous axis.
pub type AxisHandler<U> = fn(&mut U, &mut UnitContext<'_>, f32);
/// Handler for a discrete action edge.
pub type ActionHandler<U> = fn(&mut U, &mut UnitContext<'_>);

/// Maps named inputs to handlers on a unit type.
pub struct InputRegistry<U> {
    axes: HashMap<InputAxis, AxisHandler<U>>,
    actions: HashMap<(InputAction, ButtonEdge), ActionHandler<U>>,
}

impl<U> Default for InputRegistry<U> {
    fn default() -> Self {
        Self {
            axes: HashMap::new(),
            actions: HashMap::new(),
        }
    }
}

impl<U> Clone for InputRegistry<U> {
    fn clone(&self) -> Self {
        Self {
            axes: self.axes.clone(),
            actions: self.actions.clone(),
        }
    }
}

impl<U> std::fmt::Debug for InputRegistry<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputRegistry")
            .field("axes", &self.axes.keys().collect::<Vec<_>>())
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<U> InputRegistry<U> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `axis` to `handler`, replacing any earlier binding.
    pub fn bind_axis(&mut self, axis: InputAxis, handler: AxisHandler<U>) -> &mut Self {
        if self.axes.insert(axis, handler).is_some() {
            log::debug!("rebound axis {axis:?}");
        }
        self
    }

    /// Binds one edge of `action` to `handler`, replacing any earlier binding.
    pub fn bind_action(
        &mut self,
        action: InputAction,
        edge: ButtonEdge,
        handler: ActionHandler<U>,
    ) -> &mut Self {
        if self.actions.insert((action, edge), handler).is_some() {
            log::debug!("rebound action {action:?} on {edge:?}");
        }
        self
    }

    /// Whether `axis` has a handler.
    #[must_use]
    pub fn is_axis_bound(&self, axis: InputAxis) -> bool {
        self.axes.contains_key(&axis)
    }

    /// Whether the given edge of `action` has a handler.
    #[must_use]
    pub fn is_action_bound(&self, action: InputAction, edge: ButtonEdge) -> bool {
        self.actions.contains_key(&(action, edge))
    }

    /// Invokes the handler bound to `axis`, returning whether one ran.
    pub fn dispatch_axis(
        &self,
        unit: &mut U,
        ctx: &mut UnitContext<'_>,
        axis: InputAxis,
        value: f32,
    ) -> bool {
        self.axes.get(&axis).is_some_and(|handler| {
            handler(unit, ctx, value);
            true
        })
    }

    /// Invokes the handler bound to an action edge, returning whether one ran.
    pub fn dispatch_action(
        &self,
        unit: &mut U,
        ctx: &mut UnitContext<'_>,
        action: InputAction,
        edge: ButtonEdge,
    ) -> bool {
        self.actions.get(&(action, edge)).is_some_and(|handler| {
            handler(unit, ctx);
            true
        })
    }
}

/// Bindings a unit registered when it spawned.
#[derive(Component, Debug, Clone)]
pub struct BoundInputs<U: Unit>(pub InputRegistry<U>);

/// Input gathered for the current frame.
///
/// Axes default to `0.0` when no source is active. Action edges are in the
/// order they were observed.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct UnitInputFrame {
    axes: HashMap<InputAxis, f32>,
    actions: Vec<(InputAction, ButtonEdge)>,
}

impl UnitInputFrame {
    /// Sets the value of `axis` for this frame.
    pub fn set_axis(&mut self, axis: InputAxis, value: f32) {
        self.axes.insert(axis, value);
    }

    /// Adds `value` to `axis`, for axes fed by several sources.
    pub fn add_axis(&mut self, axis: InputAxis, value: f32) {
        *self.axes.entry(axis).or_insert(0.0) += value;
    }

    /// Value of `axis` this frame.
    #[must_use]
    pub fn axis(&self, axis: InputAxis) -> f32 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }

    /// Records an action edge.
    pub fn push_action(&mut self, action: InputAction, edge: ButtonEdge) {
        self.actions.push((action, edge));
    }

    /// Action edges observed this frame.
    #[must_use]
    pub fn actions(&self) -> &[(InputAction, ButtonEdge)] {
        &self.actions
    }

    /// Forgets this frame's action edges, keeping axis values.
    pub fn clear_actions(&mut self) {
        self.actions.clear();
    }

    /// Resets every axis to zero and forgets all action edges.
    pub fn clear(&mut self) {
        self.axes.clear();
        self.actions.clear();
    }
}

/// Drops action edges once every unit has seen them.
///
/// Axis values stay until rewritten, so a host that writes the frame only
/// needs to touch what changed. Each edge is delivered on one frame only.
pub fn consume_input_actions_system(mut frame: ResMut<UnitInputFrame>) {
    frame.clear_actions();
}
