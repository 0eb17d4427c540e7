use egui::{ClippedPrimitive, Context, TexturesDelta};
use egui_winit::State as EguiWinitState;
use shared::{RenderParameters, MAX_ZOOM, MIN_ZOOM};
use winit::event::WindowEvent;
use winit::event_loop::EventLoop;
use winit::window::Window;

use crate::state::SharedParameters;

const MAX_SLIDER_ITERATIONS: i32 = 10_000;

/// Paint output of one overlay frame, handed to the renderer.
pub struct OverlayFrame {
    pub primitives: Vec<ClippedPrimitive>,
    pub textures: TexturesDelta,
    pub pixels_per_point: f32,
}

/// Values the user changed in the panel this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PanelEdits {
    pub iterations: Option<i32>,
    pub zoom: Option<f64>,
}

impl PanelEdits {
    pub fn apply(self, params: &mut RenderParameters) {
        if let Some(iterations) = self.iterations {
            params.iterations = iterations;
        }
        if let Some(zoom) = self.zoom {
            params.zoom = zoom;
        }
    }
}

/// The "Mandelbrot Set Controls" window.
pub struct Overlay {
    ctx: Context,
    state: EguiWinitState,
}

impl Overlay {
    pub fn new(event_loop: &EventLoop<()>, window: &Window) -> Self {
        let ctx = Context::default();
        let state = EguiWinitState::new(
            ctx.clone(),
            ctx.viewport_id(),
            event_loop,
            Some(window.scale_factor() as f32),
            None,
        );

        Self { ctx, state }
    }

    /// Feeds a window event to egui. Returns true when egui consumed it,
    /// i.e. the pointer is over the panel or a widget has keyboard focus.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Builds the panel from the current parameters and writes back only the
    /// fields the user touched, so animator updates in between are kept.
    pub fn run(&mut self, window: &Window, params: &SharedParameters) -> OverlayFrame {
        let snapshot = params.snapshot();
        let raw_input = self.state.take_egui_input(window);

        let mut edits = PanelEdits::default();
        let output = self.ctx.run(raw_input, |ctx| {
            edits = controls_panel(ctx, &snapshot);
        });

        if edits != PanelEdits::default() {
            params.update(|params| edits.apply(params));
        }

        self.state
            .handle_platform_output(window, output.platform_output);

        let pixels_per_point = self.ctx.pixels_per_point();
        OverlayFrame {
            primitives: self.ctx.tessellate(output.shapes, pixels_per_point),
            textures: output.textures_delta,
            pixels_per_point,
        }
    }
}

pub fn controls_panel(ctx: &Context, params: &RenderParameters) -> PanelEdits {
    let mut edits = PanelEdits::default();
    let mut iterations = params.iterations;
    let mut zoom = params.zoom;

    egui::Window::new("Mandelbrot Set Controls")
        .default_pos([10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| {
            let slider = egui::Slider::new(&mut iterations, 0..=MAX_SLIDER_ITERATIONS)
                .text("iterations");
            if ui.add(slider).changed() {
                edits.iterations = Some(iterations);
            }

            // Unclamped: a DragValue range is enforced every frame, even
            // without user input.
            ui.horizontal(|ui| {
                let drag = egui::DragValue::new(&mut zoom).speed(params.zoom * 0.01);
                if ui.add(drag).changed() && (MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
                    edits.zoom = Some(zoom);
                }
                ui.label("zoom");
            });
        });

    edits
}
