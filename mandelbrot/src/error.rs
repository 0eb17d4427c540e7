use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::shader::ShaderStage;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("could not create the event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("could not create the window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("could not create the rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no GPU adapter can present to this window")]
    NoAdapter,

    #[error("GPU adapter lacks required features: {0:?}")]
    MissingFeatures(wgpu::Features),

    #[error("surface is not supported by the adapter")]
    UnsupportedSurface,

    #[error("could not open the GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("{stage} shader {}: {source}", path.display())]
    ShaderRead {
        stage: ShaderStage,
        path: PathBuf,
        source: io::Error,
    },

    #[error("{stage} Shader Error:\n{diagnostic}")]
    ShaderCompile {
        stage: ShaderStage,
        diagnostic: String,
    },

    #[error("uniform `{name}`: {problem}")]
    Uniform { name: String, problem: String },

    #[error("palette {}: {source}", path.display())]
    Palette {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("palette {} is empty", path.display())]
    EmptyPalette { path: PathBuf },

    #[error("palette {} is {width} texels wide, the GPU allows {max}", path.display())]
    PaletteTooWide { path: PathBuf, width: u32, max: u32 },

    #[error("no palettes configured")]
    NoPalettes,
}
