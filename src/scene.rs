//! Arc renderer. Turns the rotation state into a flat list of draw commands;
//! no pixels are touched here.

use std::f64::consts::PI;

use crate::config::{Color, ScaleStyle, WeightRange};
use crate::gesture::RotationState;

/// Half of the indicator base, in physical pixels.
const INDICATOR_HALF_WIDTH: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `self` along `angle` (radians, screen space).
    pub fn polar(self, radius: f64, angle: f64) -> Self {
        Self::new(self.x + radius * angle.cos(), self.y + radius * angle.sin())
    }
}

/// Drawing area handed over by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
    /// Physical pixels per density-independent unit.
    pub scale_factor: f64,
}

impl Surface {
    pub const fn new(width: f64, height: f64, scale_factor: f64) -> Self {
        Self {
            width,
            height,
            scale_factor,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Normal,
    FiveStep,
    TenStep,
}

impl LineType {
    pub fn of(weight: i32) -> Self {
        if weight % 10 == 0 {
            LineType::TenStep
        } else if weight % 5 == 0 {
            LineType::FiveStep
        } else {
            LineType::Normal
        }
    }

    fn length(self, style: &ScaleStyle) -> f64 {
        match self {
            LineType::Normal => style.normal_line_length,
            LineType::FiveStep => style.five_step_line_length,
            LineType::TenStep => style.ten_step_line_length,
        }
    }

    fn color(self, style: &ScaleStyle) -> Color {
        match self {
            LineType::Normal => style.normal_line_color,
            LineType::FiveStep => style.five_step_line_color,
            LineType::TenStep => style.ten_step_line_color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub radius: f64,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Ring {
        center: Point,
        radius: f64,
        width: f64,
        color: Color,
        shadow: Option<Shadow>,
    },
    Line {
        start: Point,
        end: Point,
        width: f32,
        color: Color,
    },
    /// `anchor` is the horizontal center of the baseline; the text is turned
    /// clockwise by `rotation` degrees about it.
    Label {
        anchor: Point,
        text: String,
        size: f32,
        rotation: f64,
        color: Color,
    },
    Triangle {
        points: [Point; 3],
        color: Color,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn tick_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }
}

/// Ring geometry in physical pixels, derived from the surface and style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    pub center: Point,
    pub radius: f64,
    pub width: f64,
    pub outer_radius: f64,
    pub inner_radius: f64,
}

impl RingGeometry {
    /// The circle hangs below the surface center so the top of the ring,
    /// where the indicator sits, lines up with it.
    pub fn new(surface: &Surface, style: &ScaleStyle) -> Self {
        let radius = style.radius * surface.scale_factor;
        let width = style.scale_width * surface.scale_factor;
        let outer_radius = radius + width / 2.0;
        let inner_radius = radius - width / 2.0;
        let center = surface.center();
        Self {
            center: Point::new(center.x, center.y + outer_radius),
            radius,
            width,
            outer_radius,
            inner_radius,
        }
    }
}

/// Screen angle in radians of the tick for `weight`.
pub fn tick_angle(weight: i32, initial_weight: i32, current_angle: f64) -> f64 {
    (weight as f64 - initial_weight as f64 + current_angle - 90.0) * (PI / 180.0)
}

/// Builds the full scale for one frame.
pub fn render_scale(
    state: &RotationState,
    range: &WeightRange,
    style: &ScaleStyle,
    surface: &Surface,
) -> Scene {
    let mut scene = Scene::new();
    let dp = surface.scale_factor;
    let ring = RingGeometry::new(surface, style);

    scene.add_command(DrawCommand::Clear(style.background_color));
    scene.add_command(DrawCommand::Ring {
        center: ring.center,
        radius: ring.radius,
        width: ring.width,
        color: style.ring_color,
        shadow: Some(Shadow {
            radius: style.shadow_radius,
            color: style.shadow_color,
        }),
    });

    add_ticks(&mut scene, &ring, state.current_angle, range, style, dp);
    add_indicator(&mut scene, &ring, style, dp);

    log::trace!(
        "scale scene: {} commands, {} ticks",
        scene.commands.len(),
        scene.tick_count()
    );
    scene
}

fn add_ticks(
    scene: &mut Scene,
    ring: &RingGeometry,
    current_angle: f64,
    range: &WeightRange,
    style: &ScaleStyle,
    dp: f64,
) {
    for weight in range.min_weight..=range.max_weight {
        let angle = tick_angle(weight, range.initial_weight, current_angle);
        let line_type = LineType::of(weight);
        let length = line_type.length(style) * dp;

        scene.add_command(DrawCommand::Line {
            start: ring.center.polar(ring.outer_radius - length, angle),
            end: ring.center.polar(ring.outer_radius, angle),
            width: style.line_width * dp as f32,
            color: line_type.color(style),
        });

        if line_type == LineType::TenStep {
            let text_size = style.text_size as f64 * dp;
            let label_radius = ring.outer_radius - length - style.label_spacing * dp - text_size;
            scene.add_command(DrawCommand::Label {
                anchor: ring.center.polar(label_radius, angle),
                text: weight.unsigned_abs().to_string(),
                size: text_size as f32,
                rotation: angle.to_degrees() + 90.0,
                color: style.text_color,
            });
        }
    }
}

fn add_indicator(scene: &mut Scene, ring: &RingGeometry, style: &ScaleStyle, dp: f64) {
    let c = ring.center;
    let base_y = c.y - ring.inner_radius;
    scene.add_command(DrawCommand::Triangle {
        points: [
            Point::new(c.x, base_y - style.indicator_length * dp),
            Point::new(c.x - INDICATOR_HALF_WIDTH, base_y),
            Point::new(c.x + INDICATOR_HALF_WIDTH, base_y),
        ],
        color: style.indicator_color,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> Surface {
        Surface::new(400.0, 800.0, 1.0)
    }

    fn scene_at(angle: f64, range: WeightRange) -> Scene {
        let state = RotationState {
            current_angle: angle,
            ..RotationState::default()
        };
        render_scale(&state, &range, &ScaleStyle::default(), &surface())
    }

    fn lines(scene: &Scene) -> Vec<(Point, Point, Color)> {
        scene
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line { start, end, color, .. } => Some((*start, *end, *color)),
                _ => None,
            })
            .collect()
    }

    fn labels(scene: &Scene) -> Vec<(String, f64)> {
        scene
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Label { text, rotation, .. } => Some((text.clone(), *rotation)),
                _ => None,
            })
            .collect()
    }

    // ── LineType ──────────────────────────────────────────────────────────

    #[test]
    fn line_type_classification() {
        assert_eq!(LineType::of(100), LineType::TenStep);
        assert_eq!(LineType::of(85), LineType::FiveStep);
        assert_eq!(LineType::of(83), LineType::Normal);
        assert_eq!(LineType::of(0), LineType::TenStep);
        assert_eq!(LineType::of(-10), LineType::TenStep);
        assert_eq!(LineType::of(-15), LineType::FiveStep);
        assert_eq!(LineType::of(-3), LineType::Normal);
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn ring_top_edge_sits_on_surface_center() {
        let ring = RingGeometry::new(&surface(), &ScaleStyle::default());
        assert_eq!(ring.outer_radius, 605.0);
        assert_eq!(ring.inner_radius, 505.0);
        assert_eq!(ring.center, Point::new(200.0, 1005.0));
        assert_eq!(ring.center.y - ring.outer_radius, 400.0);
    }

    #[test]
    fn ring_scales_with_density() {
        let ring = RingGeometry::new(&Surface::new(400.0, 800.0, 2.0), &ScaleStyle::default());
        assert_eq!(ring.outer_radius, 1210.0);
        assert_eq!(ring.center.y, 400.0 + 1210.0);
    }

    #[test]
    fn tick_angle_steps_one_degree_per_weight() {
        // Heavier weights sit further clockwise, so the screen angle grows.
        for w in [-20, 0, 37, 80, 249] {
            let step = tick_angle(w + 1, 80, 12.5) - tick_angle(w, 80, 12.5);
            assert!((step - PI / 180.0).abs() < 1e-12);
        }
    }

    #[test]
    fn tick_angle_handles_extreme_weights() {
        let angle = tick_angle(i32::MAX, -1, 0.0);
        let expected = (i32::MAX as f64 + 1.0 - 90.0).to_radians();
        assert!(angle.is_finite());
        assert!(((angle - expected) / expected).abs() < 1e-12);
        assert!(tick_angle(i32::MIN, i32::MAX, 0.0) < 0.0);
    }

    #[test]
    fn initial_weight_tick_points_straight_up() {
        let scene = scene_at(0.0, WeightRange::new(20, 250, 80));
        let ring = RingGeometry::new(&surface(), &ScaleStyle::default());
        let (start, end, color) = lines(&scene)[80 - 20];
        assert!((end.x - ring.center.x).abs() < 1e-9);
        assert!((end.y - (ring.center.y - ring.outer_radius)).abs() < 1e-9);
        assert!((start.y - (ring.center.y - ring.outer_radius + 35.0)).abs() < 1e-9);
        assert_eq!(color, Color::BLACK);
    }

    #[test]
    fn rotated_scale_puts_reported_weight_under_indicator() {
        // angle 10 reports 70, so the 70 tick must be at the top.
        let scene = scene_at(10.0, WeightRange::new(20, 250, 80));
        let ring = RingGeometry::new(&surface(), &ScaleStyle::default());
        let (_, end, _) = lines(&scene)[70 - 20];
        assert!((end.x - ring.center.x).abs() < 1e-9);
    }

    // ── ticks and labels ──────────────────────────────────────────────────

    #[test]
    fn one_tick_per_weight_and_labels_on_decades() {
        let scene = scene_at(0.0, WeightRange::new(20, 250, 80));
        assert_eq!(scene.tick_count(), 231);
        let labels = labels(&scene);
        assert_eq!(labels.len(), 24);
        assert_eq!(labels[0].0, "20");
        assert_eq!(labels[23].0, "250");
    }

    #[test]
    fn negative_labels_show_absolute_value() {
        let scene = scene_at(0.0, WeightRange::new(-20, 0, 0));
        let texts: Vec<String> = labels(&scene).into_iter().map(|(t, _)| t).collect();
        assert_eq!(texts, vec!["20", "10", "0"]);
    }

    #[test]
    fn label_is_tangent_and_inside_tick() {
        let scene = scene_at(0.0, WeightRange::new(80, 80, 80));
        let ring = RingGeometry::new(&surface(), &ScaleStyle::default());
        let label = scene
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::Label { anchor, rotation, size, .. } => Some((*anchor, *rotation, *size)),
                _ => None,
            })
            .unwrap();
        assert!(label.1.abs() < 1e-9);
        assert_eq!(label.2, 18.0);
        let expected_y = ring.center.y - (ring.outer_radius - 35.0 - 5.0 - 18.0);
        assert!((label.0.y - expected_y).abs() < 1e-9);
    }

    #[test]
    fn degenerate_range_has_no_ticks() {
        let scene = scene_at(0.0, WeightRange::new(100, 50, 80));
        assert_eq!(scene.tick_count(), 0);
        assert!(labels(&scene).is_empty());
    }

    // ── indicator ─────────────────────────────────────────────────────────

    #[test]
    fn indicator_is_drawn_once_and_ignores_rotation() {
        let find = |scene: &Scene| -> Vec<[Point; 3]> {
            scene
                .commands()
                .iter()
                .filter_map(|c| match c {
                    DrawCommand::Triangle { points, .. } => Some(*points),
                    _ => None,
                })
                .collect()
        };
        let a = find(&scene_at(0.0, WeightRange::default()));
        let b = find(&scene_at(-45.0, WeightRange::default()));
        assert_eq!(a.len(), 1);
        assert_eq!(a, b);

        let [apex, left, right] = a[0];
        assert_eq!(apex, Point::new(200.0, 1005.0 - 505.0 - 60.0));
        assert_eq!(left, Point::new(196.0, 500.0));
        assert_eq!(right, Point::new(204.0, 500.0));
    }

    #[test]
    fn render_is_deterministic() {
        assert_eq!(scene_at(7.25, WeightRange::default()), scene_at(7.25, WeightRange::default()));
    }
}
