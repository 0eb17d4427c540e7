use std::path::{Path, PathBuf};
use std::time::Duration;

use shared::TICK_PERIOD;

/// Palette images in cycle order, relative to the asset root.
const PALETTES: [&str; 5] = [
    "img/pal.png",
    "img/pal2.png",
    "img/pal4.png",
    "img/pal5.png",
    "img/pal6.png",
];

/// Startup settings. There is no user-facing configuration surface; this
/// only gathers the fixed values in one place.
#[derive(Clone, Debug)]
pub struct Config {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub asset_root: PathBuf,
    pub animator_period: Duration,
    pub show_overlay: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Mandelbrot".to_owned(),
            width: 800,
            height: 800,
            asset_root: PathBuf::from(env!("CARGO_MANIFEST_DIR")),
            animator_period: TICK_PERIOD,
            show_overlay: true,
        }
    }
}

impl Config {
    pub fn vertex_shader(&self) -> PathBuf {
        self.asset_root.join("shaders/vertex.wgsl")
    }

    pub fn fragment_shader(&self) -> PathBuf {
        self.asset_root.join("shaders/fragment.wgsl")
    }

    pub fn palettes(&self) -> Vec<PathBuf> {
        PALETTES
            .iter()
            .map(|relative| self.asset_root.join(Path::new(relative)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn bundled_assets_exist() {
        let config = Config::default();

        assert!(config.vertex_shader().is_file());
        assert!(config.fragment_shader().is_file());
        for palette in config.palettes() {
            assert!(palette.is_file(), "missing {}", palette.display());
        }
    }

    #[test]
    fn palettes_keep_load_order() {
        let names: Vec<String> = Config::default()
            .palettes()
            .iter()
            .filter_map(|path| path.file_name()?.to_str().map(str::to_owned))
            .collect();

        assert_eq!(
            names,
            ["pal.png", "pal2.png", "pal4.png", "pal5.png", "pal6.png"]
        );
    }
}
