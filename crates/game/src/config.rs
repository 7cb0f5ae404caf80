//! Game configuration (window, background, randomness). Loaded from config.ron at startup.

use procgen::{ScrollClock, MIN_COLS, MIN_ROWS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Window width in logical pixels. Also the playfield width.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels. Also the playfield height.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    #[serde(default = "default_title")]
    pub title: String,
    /// Enable vsync (recommended to avoid tearing).
    #[serde(default = "default_true")]
    pub vsync: bool,
    /// Tileable image wrapped over the terrain.
    #[serde(default = "default_background_texture")]
    pub background_texture: PathBuf,
    /// Fixed RNG seed for reproducible runs. Unset seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub terrain: TerrainSettings,
}

/// Shape and speed of the scrolling background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainSettings {
    #[serde(default = "default_terrain_rows")]
    pub rows: usize,
    #[serde(default = "default_terrain_cols")]
    pub cols: usize,
    /// Ticks per full row of scroll.
    #[serde(default = "default_scrolls_per_step")]
    pub scrolls_per_step: u32,
}

fn default_window_width() -> u32 {
    600
}
fn default_window_height() -> u32 {
    600
}
fn default_title() -> String {
    "OpenGL Integration".to_string()
}
fn default_true() -> bool {
    true
}
fn default_background_texture() -> PathBuf {
    PathBuf::from("media/earth.png")
}
fn default_terrain_rows() -> usize {
    7
}
fn default_terrain_cols() -> usize {
    7
}
fn default_scrolls_per_step() -> u32 {
    ScrollClock::DEFAULT_PERIOD
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            rows: default_terrain_rows(),
            cols: default_terrain_cols(),
            scrolls_per_step: default_scrolls_per_step(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            title: default_title(),
            vsync: default_true(),
            background_texture: default_background_texture(),
            seed: None,
            terrain: TerrainSettings::default(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let config = match std::fs::read_to_string(path) {
            Ok(data) => match ron::from_str::<GameConfig>(&data) {
                Ok(c) => {
                    log::info!("Loaded config from {:?}", path);
                    c
                }
                Err(e) => {
                    log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        };
        config.validated()
    }

    /// Replace values the game cannot run with.
    pub fn validated(mut self) -> Self {
        if self.terrain.rows < MIN_ROWS {
            log::warn!("terrain.rows {} too small, using {}", self.terrain.rows, MIN_ROWS);
            self.terrain.rows = MIN_ROWS;
        }
        if self.terrain.cols < MIN_COLS {
            log::warn!("terrain.cols {} too small, using {}", self.terrain.cols, MIN_COLS);
            self.terrain.cols = MIN_COLS;
        }
        if self.terrain.scrolls_per_step == 0 {
            log::warn!("terrain.scrolls_per_step must be positive, using default");
            self.terrain.scrolls_per_step = default_scrolls_per_step();
        }
        if self.window_width == 0 || self.window_height == 0 {
            log::warn!(
                "window size {}x{} invalid, using default",
                self.window_width,
                self.window_height
            );
            self.window_width = default_window_width();
            self.window_height = default_window_height();
        }
        self
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_demo() {
        let c = GameConfig::default();
        assert_eq!((c.window_width, c.window_height), (600, 600));
        assert_eq!(c.title, "OpenGL Integration");
        assert_eq!(
            c.terrain,
            TerrainSettings {
                rows: 7,
                cols: 7,
                scrolls_per_step: 50
            }
        );
        assert_eq!(c.seed, None);
    }

    #[test]
    fn round_trips_through_ron() {
        let mut c = GameConfig::default();
        c.seed = Some(42);
        c.terrain.rows = 9;
        let text = ron::ser::to_string_pretty(&c, ron::ser::PrettyConfig::default()).unwrap();
        let back: GameConfig = ron::from_str(&text).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let c: GameConfig = ron::from_str("(vsync: false, terrain: (cols: 4))").unwrap();
        assert!(!c.vsync);
        assert_eq!(c.terrain.cols, 4);
        assert_eq!(c.terrain.rows, 7);
        assert_eq!(c.window_width, 600);
    }

    #[test]
    fn validated_fixes_unusable_values() {
        let mut c = GameConfig::default();
        c.terrain = TerrainSettings {
            rows: 1,
            cols: 0,
            scrolls_per_step: 0,
        };
        c.window_height = 0;
        let c = c.validated();
        assert_eq!(c.terrain.rows, 3);
        assert_eq!(c.terrain.cols, 2);
        assert_eq!(c.terrain.scrolls_per_step, 50);
        assert_eq!((c.window_width, c.window_height), (600, 600));
    }

    #[test]
    fn unreadable_file_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join(format!("skyscroll-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.ron");
        std::fs::write(&path, "(window_width: \"wide\")").unwrap();
        assert_eq!(GameConfig::load_from(&path), GameConfig::default());

        assert_eq!(GameConfig::load_from(&dir.join("absent.ron")), GameConfig::default());
        std::fs::remove_dir_all(&dir).ok();
    }
}
