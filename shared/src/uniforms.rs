use std::mem::offset_of;

use crate::params::RenderParameters;

/// Surface size in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Push-constant block of the fragment shader. Field order and padding
/// follow WGSL layout rules for `struct Params`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Uniforms {
    pub iter: i32,
    pub tex: i32,
    pub freq: f32,
    pub uv_offset: f32,
    pub zoom: f64,
    _pad0: f64,
    pub screen_offset: [f64; 2],
    pub screen_size: [f64; 2],
}

impl Uniforms {
    pub fn new(params: &RenderParameters, palette: usize, viewport: ViewportSize) -> Self {
        Self {
            iter: params.iterations,
            tex: palette as i32,
            freq: params.frequency,
            uv_offset: params.uv_offset,
            zoom: params.zoom,
            _pad0: 0.0,
            screen_offset: [params.offset_x, params.offset_y],
            screen_size: [viewport.width as f64, viewport.height as f64],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformKind {
    Int,
    Float,
    Double,
    Double2,
}

/// A member of the shader's `Params` block as the host writes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformField {
    pub name: &'static str,
    pub offset: u32,
    pub kind: UniformKind,
}

pub const UNIFORM_LAYOUT: [UniformField; 7] = [
    UniformField {
        name: "iter",
        offset: offset_of!(Uniforms, iter) as u32,
        kind: UniformKind::Int,
    },
    UniformField {
        name: "tex",
        offset: offset_of!(Uniforms, tex) as u32,
        kind: UniformKind::Int,
    },
    UniformField {
        name: "freq",
        offset: offset_of!(Uniforms, freq) as u32,
        kind: UniformKind::Float,
    },
    UniformField {
        name: "UVoffset",
        offset: offset_of!(Uniforms, uv_offset) as u32,
        kind: UniformKind::Float,
    },
    UniformField {
        name: "zoom",
        offset: offset_of!(Uniforms, zoom) as u32,
        kind: UniformKind::Double,
    },
    UniformField {
        name: "screenOffset",
        offset: offset_of!(Uniforms, screen_offset) as u32,
        kind: UniformKind::Double2,
    },
    UniformField {
        name: "screenSize",
        offset: offset_of!(Uniforms, screen_size) as u32,
        kind: UniformKind::Double2,
    },
];
