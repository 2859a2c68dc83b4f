//! Drag-to-rotate mapping for the detail view's rotation control
//!
//! Horizontal drag displacement maps one-to-one to degrees of rotation about
//! the vertical axis. Releasing snaps back to zero with a short ease-in-out
//! animation. There is no inertia.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::animation::{Easing, TimedAnimation};

/// Default snap-back duration in seconds
pub const DEFAULT_SNAP_BACK_SECS: f32 = 0.36;

/// Rotation axis in scene space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

/// A rotation to apply to the scene root
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationCommand {
    pub axis: Axis,
    pub radians: f32,
    /// `None` applies immediately
    pub animation: Option<TimedAnimation>,
}

impl RotationCommand {
    pub fn degrees(&self) -> f32 {
        self.radians.to_degrees()
    }
}

/// Tracks the active drag and turns it into rotation commands
#[derive(Debug, Clone)]
pub struct RotationController {
    origin_x: Option<f32>,
    offset: f32,
    snap_back: TimedAnimation,
}

impl Default for RotationController {
    fn default() -> Self {
        Self::new(DEFAULT_SNAP_BACK_SECS)
    }
}

impl RotationController {
    pub fn new(snap_back_secs: f32) -> Self {
        Self {
            origin_x: None,
            offset: 0.0,
            snap_back: TimedAnimation {
                duration_secs: snap_back_secs.max(0.0),
                easing: Easing::EaseInOut,
            },
        }
    }

    /// Current drag displacement
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.origin_x.is_some()
    }

    pub fn snap_back(&self) -> TimedAnimation {
        self.snap_back
    }

    /// Current rotation in degrees; a pure function of the offset
    pub fn angle_degrees(&self) -> f32 {
        self.offset
    }

    /// Start a drag at `origin_x`
    pub fn begin(&mut self, origin_x: f32) {
        self.origin_x = Some(origin_x);
        self.offset = 0.0;
    }

    /// Pointer moved while dragging
    ///
    /// Returns `None` if no drag is active.
    pub fn update(&mut self, pointer_x: f32) -> Option<RotationCommand> {
        let origin = self.origin_x?;
        self.offset = pointer_x - origin;
        trace!(offset = self.offset, "Rotation drag");
        Some(RotationCommand {
            axis: Axis::Y,
            radians: self.offset.to_radians(),
            animation: None,
        })
    }

    /// Drag released
    ///
    /// Snaps the offset to zero. Returns the animated return to zero, or
    /// `None` when the offset was already zero.
    pub fn end(&mut self) -> Option<RotationCommand> {
        self.origin_x = None;
        let previous = std::mem::replace(&mut self.offset, 0.0);
        if previous == 0.0 {
            return None;
        }
        Some(RotationCommand {
            axis: Axis::Y,
            radians: 0.0,
            animation: Some(self.snap_back),
        })
    }

    /// Drop any drag state without emitting a command (selection changed)
    pub fn reset(&mut self) {
        self.origin_x = None;
        self.offset = 0.0;
    }
}
