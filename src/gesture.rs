//! Drag gesture interpretation: pointer positions in, clamped rotation and
//! selected weight out.

use std::fmt;

use crate::config::WeightRange;
use crate::scene::Point;

/// Rotation of the scale, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    /// Live rotation, always inside the range's angle bounds.
    pub current_angle: f64,
    /// Touch angle recorded when the current drag began.
    pub drag_start_angle: f64,
    /// Baseline carried from the previous drag.
    pub angle_at_last_release: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
}

/// Host-independent pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleEvent {
    DragStart { position: Point },
    DragMove { position: Point },
    DragEnd,
}

/// Angle in degrees of `position` around `circle_center`, measured from the
/// upward vertical and growing clockwise on screen.
///
/// A position exactly on the center has no direction and maps to 0.
pub fn touch_angle(circle_center: Point, position: Point) -> f64 {
    let dx = circle_center.x - position.x;
    let dy = circle_center.y - position.y;
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    let angle = -dx.atan2(dy).to_degrees();
    if angle.is_finite() {
        angle
    } else {
        0.0
    }
}

/// Weight under the indicator for a given rotation.
///
/// Halves round toward positive infinity so that `x.5` and `-x.5` behave the
/// same way the reported values always have.
pub fn weight_at_angle(initial_weight: i32, angle: f64) -> i32 {
    (initial_weight as f64 - angle + 0.5).floor() as i32
}

/// Saturating clamp that tolerates inverted bounds.
fn saturate(value: f64, (lower, upper): (f64, f64)) -> f64 {
    value.min(upper).max(lower)
}

/// Idle -> Dragging -> Idle state machine over [`RotationState`].
pub struct GestureInterpreter {
    range: WeightRange,
    state: RotationState,
    phase: DragPhase,
    on_weight_change: Option<Box<dyn FnMut(i32)>>,
}

impl fmt::Debug for GestureInterpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureInterpreter")
            .field("range", &self.range)
            .field("state", &self.state)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl GestureInterpreter {
    pub fn new(range: WeightRange) -> Self {
        Self {
            range,
            state: RotationState::default(),
            phase: DragPhase::Idle,
            on_weight_change: None,
        }
    }

    /// Called synchronously with the new weight on every drag move.
    pub fn on_weight_change(mut self, f: impl FnMut(i32) + 'static) -> Self {
        self.on_weight_change = Some(Box::new(f));
        self
    }

    pub fn set_callback(&mut self, f: impl FnMut(i32) + 'static) {
        self.on_weight_change = Some(Box::new(f));
    }

    pub fn range(&self) -> WeightRange {
        self.range
    }

    pub fn state(&self) -> RotationState {
        self.state
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn weight(&self) -> i32 {
        weight_at_angle(self.range.initial_weight, self.state.current_angle)
    }

    pub fn drag_start(&mut self, circle_center: Point, position: Point) {
        if self.phase == DragPhase::Dragging {
            log::debug!("drag restarted without release, keeping {:.2}°", self.state.current_angle);
            self.drag_end();
        }
        self.state.drag_start_angle = touch_angle(circle_center, position);
        self.phase = DragPhase::Dragging;
        log::debug!("drag start at {:.2}°", self.state.drag_start_angle);
    }

    /// Rotates by the angular distance travelled since [`Self::drag_start`].
    /// Returns the reported weight, or `None` when no drag is active.
    pub fn drag_move(&mut self, circle_center: Point, position: Point) -> Option<i32> {
        if self.phase != DragPhase::Dragging {
            return None;
        }
        let touch = touch_angle(circle_center, position);
        let new_angle = self.state.angle_at_last_release + (touch - self.state.drag_start_angle);
        self.state.current_angle = saturate(new_angle, self.range.angle_bounds());

        let weight = self.weight();
        log::trace!("drag move: angle {:.2}° -> weight {}", self.state.current_angle, weight);
        if let Some(f) = &mut self.on_weight_change {
            f(weight);
        }
        Some(weight)
    }

    pub fn drag_end(&mut self) {
        if self.phase != DragPhase::Dragging {
            return;
        }
        self.state.angle_at_last_release = self.state.current_angle;
        self.phase = DragPhase::Idle;
        log::debug!("drag end, baseline {:.2}° (weight {})", self.state.current_angle, self.weight());
    }

    /// Dispatches one event. Returns `true` when the rotation may have changed.
    pub fn handle(&mut self, circle_center: Point, event: ScaleEvent) -> bool {
        match event {
            ScaleEvent::DragStart { position } => {
                self.drag_start(circle_center, position);
                false
            }
            ScaleEvent::DragMove { position } => self.drag_move(circle_center, position).is_some(),
            ScaleEvent::DragEnd => {
                self.drag_end();
                false
            }
        }
    }
}
