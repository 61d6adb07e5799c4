use bon::Builder;

/// Color representation for scale elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const LIGHT_GRAY: Color = Color::new(0xcc, 0xcc, 0xcc);
    pub const GREEN: Color = Color::new(0x00, 0xff, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Alpha as a coverage multiplier in `[0, 1]`.
    pub fn opacity(self) -> f32 {
        self.a as f32 / 255.0
    }
}

/// Visual configuration of the scale.
///
/// Lengths are in density-independent units; the renderer multiplies them by
/// the surface scale factor. `shadow_radius` is in physical pixels.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct ScaleStyle {
    // Ring
    #[builder(default = 100.0)]
    pub scale_width: f64,
    #[builder(default = 555.0)]
    pub radius: f64,
    #[builder(default = Color::WHITE)]
    pub ring_color: Color,
    #[builder(default = Color::BLACK.with_alpha(50))]
    pub shadow_color: Color,
    #[builder(default = 60.0)]
    pub shadow_radius: f64,

    // Ticks
    #[builder(default = Color::LIGHT_GRAY)]
    pub normal_line_color: Color,
    #[builder(default = Color::GREEN)]
    pub five_step_line_color: Color,
    #[builder(default = Color::BLACK)]
    pub ten_step_line_color: Color,
    #[builder(default = 15.0)]
    pub normal_line_length: f64,
    #[builder(default = 25.0)]
    pub five_step_line_length: f64,
    #[builder(default = 35.0)]
    pub ten_step_line_length: f64,
    #[builder(default = 1.0)]
    pub line_width: f32,

    // Indicator
    #[builder(default = Color::GREEN)]
    pub indicator_color: Color,
    #[builder(default = 60.0)]
    pub indicator_length: f64,

    // Labels
    #[builder(default = 18.0)]
    pub text_size: f32,
    #[builder(default = 5.0)]
    pub label_spacing: f64,
    #[builder(default = Color::BLACK)]
    pub text_color: Color,

    #[builder(default = Color::WHITE)]
    pub background_color: Color,
}

impl Default for ScaleStyle {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Selectable weight domain. `initial_weight` sits under the indicator when
/// the scale has not been rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightRange {
    pub min_weight: i32,
    pub max_weight: i32,
    pub initial_weight: i32,
}

impl WeightRange {
    pub const fn new(min_weight: i32, max_weight: i32, initial_weight: i32) -> Self {
        Self {
            min_weight,
            max_weight,
            initial_weight,
        }
    }

    /// Rotation bounds in degrees. Heavier weights sit at smaller angles, so
    /// the lower bound comes from `max_weight`.
    pub fn angle_bounds(&self) -> (f64, f64) {
        (
            self.initial_weight as f64 - self.max_weight as f64,
            self.initial_weight as f64 - self.min_weight as f64,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.min_weight > self.max_weight
    }
}

impl Default for WeightRange {
    fn default() -> Self {
        Self::new(20, 250, 80)
    }
}

/// Window configuration used by [`crate::WeightPicker::show`].
#[derive(Debug, Clone, Builder)]
pub struct WindowOptions {
    #[builder(default = "Weight Picker".to_string(), into)]
    pub title: String,
    #[builder(default = 420)]
    pub width: u32,
    #[builder(default = 760)]
    pub height: u32,
    #[builder(default = true)]
    pub resizable: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_style_matches_builder_defaults() {
        let style = ScaleStyle::default();
        assert_eq!(style.scale_width, 100.0);
        assert_eq!(style.radius, 555.0);
        assert_eq!(style.ten_step_line_length, 35.0);
        assert_eq!(style.indicator_color, Color::GREEN);
        assert_eq!(style.shadow_color.a, 50);
    }

    #[test]
    fn builder_overrides_single_field() {
        let style = ScaleStyle::builder().scale_width(150.0).build();
        assert_eq!(style.scale_width, 150.0);
        assert_eq!(style.radius, 555.0);
    }

    #[test]
    fn angle_bounds_are_inverted() {
        let range = WeightRange::default();
        assert_eq!(range.angle_bounds(), (-170.0, 60.0));
        assert!(!range.is_empty());
        assert!(WeightRange::new(100, 50, 80).is_empty());
    }

    #[test]
    fn angle_bounds_survive_extreme_weights() {
        let range = WeightRange::new(-10, i32::MAX, -10);
        assert_eq!(range.angle_bounds(), (-10.0 - i32::MAX as f64, 0.0));
        let range = WeightRange::new(i32::MIN, 0, 0);
        assert_eq!(range.angle_bounds(), (0.0, -(i32::MIN as f64)));
    }
}
