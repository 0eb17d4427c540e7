use std::path::{Path, PathBuf};

use image::imageops::flip_vertical_in_place;
use shared::PaletteCursor;
use tracing::info;
use wgpu::util::{DeviceExt, TextureDataOrder};

use crate::error::ViewerError;

/// One decoded color-lookup row, RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteImage {
    pub path: PathBuf,
    pub width: u32,
    pub texels: Vec<u8>,
}

impl PaletteImage {
    /// Decodes `path` and keeps its bottom row, the row a bottom-up 1-D
    /// upload of the image would read.
    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let image = image::open(path).map_err(|source| ViewerError::Palette {
            path: path.to_owned(),
            source,
        })?;

        let mut rgba = image.to_rgba8();
        let width = rgba.width();
        if width == 0 || rgba.height() == 0 {
            return Err(ViewerError::EmptyPalette {
                path: path.to_owned(),
            });
        }

        flip_vertical_in_place(&mut rgba);
        let texels = rgba.as_raw()[..width as usize * 4].to_vec();

        Ok(Self {
            path: path.to_owned(),
            width,
            texels,
        })
    }
}

/// Loads every palette in order. Any failure is fatal, no placeholder is
/// substituted.
pub fn load_all(paths: &[PathBuf]) -> Result<Vec<PaletteImage>, ViewerError> {
    if paths.is_empty() {
        return Err(ViewerError::NoPalettes);
    }
    paths.iter().map(|path| PaletteImage::load(path)).collect()
}

/// GPU-resident palettes with the cursor selecting the active one.
pub struct Palettes {
    layout: wgpu::BindGroupLayout,
    bind_groups: Vec<wgpu::BindGroup>,
    _textures: Vec<wgpu::Texture>,
    cursor: PaletteCursor,
}

impl Palettes {
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        images: &[PaletteImage],
    ) -> Result<Self, ViewerError> {
        let cursor = PaletteCursor::new(images.len()).ok_or(ViewerError::NoPalettes)?;
        let max = device.limits().max_texture_dimension_1d;

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("palette"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D1,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("palette"),
            address_mode_u: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let mut textures = Vec::with_capacity(images.len());
        let mut bind_groups = Vec::with_capacity(images.len());
        for (index, image) in images.iter().enumerate() {
            if image.width > max {
                return Err(ViewerError::PaletteTooWide {
                    path: image.path.clone(),
                    width: image.width,
                    max,
                });
            }

            let texture = device.create_texture_with_data(
                queue,
                &wgpu::TextureDescriptor {
                    label: Some(&format!("palette #{index}")),
                    size: wgpu::Extent3d {
                        width: image.width,
                        height: 1,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D1,
                    format: wgpu::TextureFormat::Rgba8UnormSrgb,
                    usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                    view_formats: &[],
                },
                TextureDataOrder::LayerMajor,
                &image.texels,
            );

            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("palette #{index}")),
                layout: &layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                ],
            });

            info!(
                palette = index,
                path = %image.path.display(),
                width = image.width,
                "loaded palette"
            );

            textures.push(texture);
            bind_groups.push(bind_group);
        }

        Ok(Self {
            layout,
            bind_groups,
            _textures: textures,
            cursor,
        })
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn active(&self) -> &wgpu::BindGroup {
        &self.bind_groups[self.cursor.index()]
    }

    pub fn index(&self) -> usize {
        self.cursor.index()
    }

    pub fn advance(&mut self) -> usize {
        self.cursor.advance()
    }
}
