use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::mem;
use std::path::{Path, PathBuf};

use naga::{AddressSpace, Scalar, ScalarKind, TypeInner, VectorSize};
use shared::{UniformKind, Uniforms, UNIFORM_LAYOUT};
use tracing::info;

use crate::error::ViewerError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "Vertex",
            ShaderStage::Fragment => "Fragment",
        })
    }
}

/// A parsed WGSL source file.
pub struct ShaderSource {
    pub stage: ShaderStage,
    pub path: PathBuf,
    text: String,
    module: naga::Module,
}

impl ShaderSource {
    pub fn load(stage: ShaderStage, path: &Path) -> Result<Self, ViewerError> {
        let text = fs::read_to_string(path).map_err(|source| ViewerError::ShaderRead {
            stage,
            path: path.to_owned(),
            source,
        })?;

        Self::parse(stage, path, text)
    }

    fn parse(stage: ShaderStage, path: &Path, text: String) -> Result<Self, ViewerError> {
        let module =
            naga::front::wgsl::parse_str(&text).map_err(|err| ViewerError::ShaderCompile {
                stage,
                diagnostic: err.emit_to_string(&text),
            })?;

        let has_entry_point = module
            .entry_points
            .iter()
            .any(|entry| entry.name == stage.entry_point());
        if !has_entry_point {
            return Err(ViewerError::ShaderCompile {
                stage,
                diagnostic: format!("missing entry point `{}`", stage.entry_point()),
            });
        }

        Ok(Self {
            stage,
            path: path.to_owned(),
            text,
            module,
        })
    }

    /// Checks the `var<push_constant>` block against the layout the host
    /// writes, so a renamed or moved uniform fails at load time instead of
    /// rendering garbage.
    pub fn uniform_layout(&self) -> Result<UniformLayout, ViewerError> {
        let block = self
            .module
            .global_variables
            .iter()
            .find(|(_, var)| var.space == AddressSpace::PushConstant)
            .map(|(_, var)| var.ty)
            .ok_or_else(|| uniform_error("Params", "no push-constant block"))?;

        let TypeInner::Struct { ref members, span } = self.module.types[block].inner else {
            return Err(uniform_error("Params", "push-constant block is not a struct"));
        };

        for field in &UNIFORM_LAYOUT {
            let member = members
                .iter()
                .find(|member| member.name.as_deref() == Some(field.name))
                .ok_or_else(|| uniform_error(field.name, "not declared in the shader"))?;

            if member.offset != field.offset {
                return Err(uniform_error(
                    field.name,
                    &format!("at offset {}, expected {}", member.offset, field.offset),
                ));
            }

            let kind = uniform_kind(&self.module.types[member.ty].inner);
            if kind != Some(field.kind) {
                return Err(uniform_error(
                    field.name,
                    &format!("declared as {kind:?}, expected {:?}", field.kind),
                ));
            }
        }

        let size = mem::size_of::<Uniforms>() as u32;
        if span != size {
            return Err(uniform_error(
                "Params",
                &format!("block is {span} bytes, expected {size}"),
            ));
        }

        Ok(UniformLayout { size })
    }

    /// Creates the GPU module. Validation errors are captured and returned
    /// with the stage label instead of reaching wgpu's default handler.
    pub fn compile(&self, device: &wgpu::Device) -> Result<wgpu::ShaderModule, ViewerError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(self.entry_point()),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(&self.text)),
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(ViewerError::ShaderCompile {
                stage: self.stage,
                diagnostic: err.to_string(),
            });
        }

        info!(stage = %self.stage, path = %self.path.display(), "compiled shader");
        Ok(module)
    }

    pub fn entry_point(&self) -> &'static str {
        self.stage.entry_point()
    }
}

/// Push-constant block as resolved from the fragment shader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformLayout {
    pub size: u32,
}

fn uniform_kind(inner: &TypeInner) -> Option<UniformKind> {
    match *inner {
        TypeInner::Scalar(Scalar {
            kind: ScalarKind::Sint,
            width: 4,
        }) => Some(UniformKind::Int),
        TypeInner::Scalar(Scalar {
            kind: ScalarKind::Float,
            width: 4,
        }) => Some(UniformKind::Float),
        TypeInner::Scalar(Scalar {
            kind: ScalarKind::Float,
            width: 8,
        }) => Some(UniformKind::Double),
        TypeInner::Vector {
            size: VectorSize::Bi,
            scalar:
                Scalar {
                    kind: ScalarKind::Float,
                    width: 8,
                },
        } => Some(UniformKind::Double2),
        _ => None,
    }
}

fn uniform_error(name: &str, problem: &str) -> ViewerError {
    ViewerError::Uniform {
        name: name.to_owned(),
        problem: problem.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    const BLOCK: &str = "
struct Params {
    iter: i32,
    tex: i32,
    freq: f32,
    UVoffset: f32,
    zoom: f64,
    screenOffset: vec2<f64>,
    screenSize: vec2<f64>,
}
var<push_constant> params: Params;
";

    fn fragment(block: &str) -> Result<ShaderSource, ViewerError> {
        let text = format!(
            "{block}
@fragment
fn fs_main() -> @location(0) vec4<f32> {{
    return vec4<f32>(f32(params.iter), 0.0, 0.0, 1.0);
}}"
        );
        ShaderSource::parse(ShaderStage::Fragment, Path::new("test.wgsl"), text)
    }

    #[test]
    fn bundled_shaders_parse() {
        let config = Config::default();

        let vertex = ShaderSource::load(ShaderStage::Vertex, &config.vertex_shader()).unwrap();
        let fragment =
            ShaderSource::load(ShaderStage::Fragment, &config.fragment_shader()).unwrap();

        assert_eq!(vertex.entry_point(), "vs_main");
        assert_eq!(fragment.entry_point(), "fs_main");
    }

    #[test]
    fn bundled_fragment_shader_matches_host_layout() {
        let config = Config::default();
        let fragment =
            ShaderSource::load(ShaderStage::Fragment, &config.fragment_shader()).unwrap();

        let layout = fragment.uniform_layout().unwrap();

        assert_eq!(layout.size, 64);
    }

    #[test]
    fn renamed_uniform_is_reported() {
        let shader = fragment(&BLOCK.replace("UVoffset", "uv_offset")).unwrap();

        let err = shader.uniform_layout().unwrap_err();

        assert!(matches!(err, ViewerError::Uniform { ref name, .. } if name == "UVoffset"));
    }

    #[test]
    fn single_precision_zoom_is_rejected() {
        let shader = fragment(&BLOCK.replace("zoom: f64", "zoom: f32")).unwrap();

        let err = shader.uniform_layout().unwrap_err();

        assert!(matches!(err, ViewerError::Uniform { ref name, .. } if name == "zoom"));
    }

    #[test]
    fn missing_block_is_reported() {
        let shader = ShaderSource::parse(
            ShaderStage::Fragment,
            Path::new("test.wgsl"),
            "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }"
                .to_owned(),
        )
        .unwrap();

        assert!(shader.uniform_layout().is_err());
    }

    #[test]
    fn syntax_errors_carry_the_stage_label() {
        let result = ShaderSource::parse(
            ShaderStage::Vertex,
            Path::new("broken.wgsl"),
            "@vertex fn vs_main( -> {".to_owned(),
        );

        let Err(err) = result else {
            panic!("broken shader parsed");
        };
        assert!(err.to_string().starts_with("Vertex Shader Error:"));
    }

    #[test]
    fn wrong_entry_point_is_reported() {
        let result = ShaderSource::parse(
            ShaderStage::Vertex,
            Path::new("test.wgsl"),
            "@vertex fn main() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0); }"
                .to_owned(),
        );

        assert!(matches!(result, Err(ViewerError::ShaderCompile { .. })));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = ShaderSource::load(ShaderStage::Fragment, Path::new("does/not/exist.wgsl"));

        assert!(matches!(result, Err(ViewerError::ShaderRead { .. })));
    }
}
