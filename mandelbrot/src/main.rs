//! Controls
//!
//! Num+ / Num-      zoom in / out
//! Scroll           zoom in / out
//! S + scroll       change the iteration count
//! Q / E            fewer / more iterations
//! Z                toggle auto zoom
//! F                toggle the color frequency animation
//! G                toggle the palette scroll animation
//! N                next palette
//! R                reset the view
//! P                print the current parameters
//! A                toggle the once-per-second FPS report
//! Left drag        pan
//! Esc              quit

mod animator;
mod config;
mod error;
mod fps;
mod input;
mod overlay;
mod palette;
mod renderer;
mod shader;
mod state;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use shared::RenderParameters;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::EventLoop,
    keyboard::PhysicalKey,
    window::WindowBuilder,
};

use crate::animator::Animator;
use crate::config::Config;
use crate::error::ViewerError;
use crate::fps::FrameCounter;
use crate::input::{Command, InputDispatcher};
use crate::overlay::Overlay;
use crate::renderer::Renderer;
use crate::state::SharedParameters;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    exit_code(run(Config::default()))
}

/// Logs a fatal error once and maps the outcome to the process status.
fn exit_code(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> Result<()> {
    let event_loop = EventLoop::new().map_err(ViewerError::EventLoop)?;

    let window = Arc::new(
        WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .build(&event_loop)
            .map_err(ViewerError::Window)?,
    );

    let mut renderer = Renderer::new(Arc::clone(&window), &config)?;
    let mut overlay = Overlay::new(&event_loop, &window);

    let params = SharedParameters::new(RenderParameters::new());
    let mut input = InputDispatcher::new(params.clone());
    let mut animator = Some(
        Animator::spawn(params.clone(), config.animator_period)
            .context("could not start the animator thread")?,
    );

    let mut frames = FrameCounter::new(Instant::now());

    info!("viewer ready");

    let mut failure = None;
    event_loop
        .run(|event, elwt| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => {
                let consumed = overlay.on_window_event(&window, &event);

                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(size) => renderer.resize(size),
                    WindowEvent::Focused(false) => input.release_all(),
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(code),
                                state,
                                repeat,
                                ..
                            },
                        ..
                    } if !consumed || state == ElementState::Released => {
                        match input.key(code, state, repeat) {
                            Some(Command::NextPalette) => {
                                let palette = renderer.next_palette();
                                debug!(palette, "switched palette");
                            }
                            Some(Command::ToggleFps) => {
                                let on = frames.toggle();
                                debug!(on, "fps report");
                            }
                            Some(Command::Exit) => elwt.exit(),
                            _ => {}
                        }
                    }
                    WindowEvent::MouseInput { state, button, .. }
                        if !consumed || state == ElementState::Released =>
                    {
                        input.mouse_button(button, state);
                    }
                    WindowEvent::CursorMoved { position, .. } => input.cursor_moved(position),
                    WindowEvent::MouseWheel { delta, .. } if !consumed => input.scroll(delta),
                    WindowEvent::RedrawRequested => {
                        let frame = config.show_overlay.then(|| overlay.run(&window, &params));
                        let snapshot = params.snapshot();

                        match renderer.render(&snapshot, frame) {
                            Ok(()) => {
                                if let Some(fps) = frames.frame(Instant::now()) {
                                    info!(fps, "[FPS]");
                                }
                            }
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                renderer.reconfigure();
                            }
                            Err(wgpu::SurfaceError::Timeout) => {
                                warn!("surface timed out, skipping frame");
                            }
                            Err(err) => {
                                failure = Some(err);
                                elwt.exit();
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => window.request_redraw(),
            Event::LoopExiting => {
                if let Some(animator) = animator.take() {
                    animator.stop();
                }
                info!("shutting down");
            }
            _ => {}
        })
        .map_err(ViewerError::EventLoop)?;

    match failure {
        Some(err) => Err(anyhow!("rendering failed: {err}")),
        None => Ok(()),
    }
}
