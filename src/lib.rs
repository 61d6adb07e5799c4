//! A circular, drag-rotatable weight picker.
//!
//! The picker draws a curved ruler hanging below a fixed indicator. Dragging
//! rotates the ruler; the weight under the indicator is reported through a
//! callback.
//!
//! ```rust,ignore
//! use weight_scale::{ScaleStyle, WeightPicker, WeightRange, WindowOptions};
//!
//! let picker = WeightPicker::new(WeightRange::default(), ScaleStyle::builder().scale_width(150.0).build())
//!     .on_weight_change(|w| println!("{w} kg"))
//!     .with_font_file("DejaVuSans.ttf")?;
//! picker.show(WindowOptions::default())?;
//! ```
//!
//! Hosts that own their own window route [`ScaleEvent`]s through
//! [`WeightPicker::handle_event`], call [`WeightPicker::resize`] on layout, and
//! either rasterise with [`WeightPicker::render_into`] or consume the draw
//! commands from [`WeightPicker::scene`].

// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod canvas;
pub mod config;
pub mod error;
pub mod gesture;
pub mod logging;
pub mod scene;

pub use canvas::{Canvas, Rasterizer};
pub use config::{Color, ScaleStyle, WeightRange, WindowOptions};
pub use error::ScaleError;
pub use gesture::{
    touch_angle, weight_at_angle, DragPhase, GestureInterpreter, RotationState, ScaleEvent,
};
pub use scene::{
    render_scale, tick_angle, DrawCommand, LineType, Point, RingGeometry, Scene, Shadow, Surface,
};

use std::path::Path;
use std::sync::Arc;

use pixels::{Pixels, SurfaceTexture};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, MouseButton, Touch, TouchPhase, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// The widget: mount parameters plus the interaction state it owns.
#[derive(Debug)]
pub struct WeightPicker {
    style: ScaleStyle,
    gesture: GestureInterpreter,
    surface: Surface,
    ring: RingGeometry,
    rasterizer: Rasterizer,
}

impl WeightPicker {
    pub fn new(range: WeightRange, style: ScaleStyle) -> Self {
        let surface = Surface::default();
        let ring = RingGeometry::new(&surface, &style);
        Self {
            style,
            gesture: GestureInterpreter::new(range),
            surface,
            ring,
            rasterizer: Rasterizer::with_system_font(),
        }
    }

    pub fn on_weight_change(mut self, f: impl FnMut(i32) + 'static) -> Self {
        self.gesture.set_callback(f);
        self
    }

    /// Uses `data` (TrueType/OpenType) for the decade labels.
    pub fn with_font_data(mut self, data: Vec<u8>) -> Result<Self, ScaleError> {
        self.rasterizer = Rasterizer::with_font_data(data)?;
        Ok(self)
    }

    pub fn with_font_file(self, path: impl AsRef<Path>) -> Result<Self, ScaleError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| ScaleError::FontFile {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded font {} ({} bytes)", path.display(), data.len());
        self.with_font_data(data)
    }

    /// Whether decade labels will be drawn.
    pub fn has_label_font(&self) -> bool {
        self.rasterizer.has_font()
    }

    pub fn style(&self) -> &ScaleStyle {
        &self.style
    }

    pub fn range(&self) -> WeightRange {
        self.gesture.range()
    }

    pub fn rotation(&self) -> RotationState {
        self.gesture.state()
    }

    pub fn weight(&self) -> i32 {
        self.gesture.weight()
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Center of the drawing area handed over by the host.
    pub fn center(&self) -> Point {
        self.surface.center()
    }

    pub fn circle_center(&self) -> Point {
        self.ring.center
    }

    /// Size negotiation: the host reports the area the picker may draw into.
    pub fn resize(&mut self, surface: Surface) {
        self.surface = surface;
        self.ring = RingGeometry::new(&surface, &self.style);
        log::debug!(
            "picker resized to {}x{} @{:.2}, circle center ({:.1}, {:.1})",
            surface.width,
            surface.height,
            surface.scale_factor,
            self.ring.center.x,
            self.ring.center.y
        );
    }

    /// Feeds one pointer event. Returns `true` when the host should redraw.
    pub fn handle_event(&mut self, event: ScaleEvent) -> bool {
        self.gesture.handle(self.ring.center, event)
    }

    /// Draw commands for the current state.
    pub fn scene(&self) -> Scene {
        render_scale(&self.gesture.state(), &self.gesture.range(), &self.style, &self.surface)
    }

    /// Rasterises the current state into an RGBA8 frame.
    pub fn render_into(&mut self, frame: &mut [u8], width: usize, height: usize) {
        let scene = self.scene();
        let mut canvas = Canvas::new(frame, width, height);
        self.rasterizer.render(&mut canvas, &scene);
    }

    /// Opens a window hosting the picker and blocks until it is closed.
    pub fn show(mut self, options: WindowOptions) -> Result<(), ScaleError> {
        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&options.title)
            .with_inner_size(LogicalSize::new(options.width as f64, options.height as f64))
            .with_resizable(options.resizable)
            .build(&event_loop)?;
        let window = Arc::new(window);
        let window_clone = window.clone();

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;
        self.resize(Surface::new(fb_width as f64, fb_height as f64, window.scale_factor()));
        log::info!("showing weight picker, initial weight {}", self.weight());

        let mut cursor = Point::default();
        let mut mouse_down = false;
        let mut active_touch: Option<u64> = None;

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Wait);
            let Event::WindowEvent { event, .. } = event else {
                return;
            };
            let input = match event {
                WindowEvent::CloseRequested => {
                    window_target.exit();
                    None
                }
                WindowEvent::Resized(new_size) => {
                    if new_size.width > 0 && new_size.height > 0 {
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        if let Err(err) = pixels.resize_buffer(new_size.width, new_size.height) {
                            log::warn!("failed to resize frame buffer: {err}");
                        }
                        if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                            log::warn!("failed to resize surface: {err}");
                        }
                        self.resize(Surface::new(
                            fb_width as f64,
                            fb_height as f64,
                            window_clone.scale_factor(),
                        ));
                        window_clone.request_redraw();
                    }
                    None
                }
                WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                    self.resize(Surface {
                        scale_factor,
                        ..self.surface
                    });
                    window_clone.request_redraw();
                    None
                }
                WindowEvent::CursorMoved { position, .. } => {
                    cursor = Point::new(position.x, position.y);
                    mouse_down.then_some(ScaleEvent::DragMove { position: cursor })
                }
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => match state {
                    ElementState::Pressed if active_touch.is_none() => {
                        mouse_down = true;
                        Some(ScaleEvent::DragStart { position: cursor })
                    }
                    ElementState::Released if mouse_down => {
                        mouse_down = false;
                        Some(ScaleEvent::DragEnd)
                    }
                    _ => None,
                },
                WindowEvent::Touch(Touch {
                    phase, location, id, ..
                }) => {
                    let position = Point::new(location.x, location.y);
                    match phase {
                        TouchPhase::Started if active_touch.is_none() && !mouse_down => {
                            active_touch = Some(id);
                            Some(ScaleEvent::DragStart { position })
                        }
                        TouchPhase::Moved if active_touch == Some(id) => {
                            Some(ScaleEvent::DragMove { position })
                        }
                        TouchPhase::Ended | TouchPhase::Cancelled if active_touch == Some(id) => {
                            active_touch = None;
                            Some(ScaleEvent::DragEnd)
                        }
                        _ => None,
                    }
                }
                WindowEvent::RedrawRequested => {
                    self.render_into(pixels.frame_mut(), fb_width, fb_height);
                    if let Err(err) = pixels.render() {
                        log::error!("render failed: {err}");
                        window_target.exit();
                    }
                    None
                }
                _ => None,
            };

            if let Some(input) = input {
                if self.handle_event(input) {
                    window_clone.request_redraw();
                }
            }
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn picker() -> (WeightPicker, Rc<RefCell<Vec<i32>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut picker = WeightPicker::new(WeightRange::new(20, 250, 80), ScaleStyle::default())
            .on_weight_change(move |w| sink.borrow_mut().push(w));
        picker.resize(Surface::new(400.0, 800.0, 1.0));
        (picker, seen)
    }

    /// Point on the ring `degrees` clockwise from the top.
    fn on_ring(picker: &WeightPicker, degrees: f64) -> Point {
        let c = picker.circle_center();
        c.polar(500.0, (degrees - 90.0).to_radians())
    }

    #[test]
    fn resize_derives_both_centers() {
        let (picker, _) = picker();
        assert_eq!(picker.center(), Point::new(200.0, 400.0));
        assert_eq!(picker.circle_center(), Point::new(200.0, 1005.0));
    }

    #[test]
    fn drag_reports_weight_and_moves_ticks() {
        let (mut picker, seen) = picker();
        assert!(!picker.handle_event(ScaleEvent::DragStart { position: on_ring(&picker, 0.0) }));
        assert!(picker.handle_event(ScaleEvent::DragMove { position: on_ring(&picker, 10.0) }));
        picker.handle_event(ScaleEvent::DragEnd);

        assert_eq!(*seen.borrow(), vec![70]);
        assert_eq!(picker.weight(), 70);

        // The 70 tick now sits under the indicator.
        let top = picker
            .scene()
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line { end, .. } => Some(*end),
                _ => None,
            })
            .nth(70 - 20)
            .unwrap();
        assert!((top.x - picker.circle_center().x).abs() < 1e-6);
    }

    #[test]
    fn second_drag_continues_from_the_first() {
        let (mut picker, seen) = picker();
        for (from, to) in [(0.0, 10.0), (-30.0, -25.0)] {
            picker.handle_event(ScaleEvent::DragStart { position: on_ring(&picker, from) });
            picker.handle_event(ScaleEvent::DragMove { position: on_ring(&picker, to) });
            picker.handle_event(ScaleEvent::DragEnd);
        }
        assert_eq!(*seen.borrow(), vec![70, 65]);
    }

    #[test]
    fn render_into_writes_the_frame() {
        let (mut picker, _) = picker();
        let mut frame = vec![0u8; 400 * 800 * 4];
        picker.render_into(&mut frame, 400, 800);
        // Background is cleared to white above the ring.
        assert_eq!(&frame[0..4], &[0xff, 0xff, 0xff, 0xff]);
        // Indicator base centre.
        let idx = (498 * 400 + 200) * 4;
        assert_eq!(&frame[idx..idx + 4], &[0x00, 0xff, 0x00, 0xff]);
    }

    #[test]
    fn system_font_draws_decade_labels_by_default() {
        let (mut picker, _) = picker();
        if !picker.has_label_font() {
            return;
        }
        let mut with_labels = vec![0u8; 400 * 800 * 4];
        picker.render_into(&mut with_labels, 400, 800);

        picker.rasterizer = Rasterizer::new();
        assert!(!picker.has_label_font());
        let mut without = vec![0u8; 400 * 800 * 4];
        picker.render_into(&mut without, 400, 800);
        assert_ne!(with_labels, without);
    }

    #[test]
    fn missing_font_file_is_reported() {
        let err = WeightPicker::new(WeightRange::default(), ScaleStyle::default())
            .with_font_file("/nonexistent/font.ttf")
            .unwrap_err();
        assert!(matches!(err, ScaleError::FontFile { .. }));
    }
}
