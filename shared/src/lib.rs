pub use bytemuck;

mod animation;
mod palette;
mod params;
mod uniforms;

pub use animation::{
    AUTO_ZOOM_FACTOR, FREQUENCY_FACTOR, FREQUENCY_FLOOR, TICK_PERIOD, UV_STEP,
};
pub use palette::PaletteCursor;
pub use params::{
    CycleDirection, RenderParameters, DEFAULT_FREQUENCY, DEFAULT_ITERATIONS, DEFAULT_ZOOM,
    ITERATION_STEP, MAX_ZOOM, MIN_SCROLL_ZOOM_FACTOR, MIN_ZOOM,
};
pub use uniforms::{UniformField, UniformKind, Uniforms, ViewportSize, UNIFORM_LAYOUT};
