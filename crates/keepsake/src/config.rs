//! Scene configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `keepsake.ron` file (if exists), or an explicit path
//! 3. Environment variables prefixed with `KEEPSAKE_`
//!
//! Example environment variable: `KEEPSAKE_CAMERA__SMOOTHING_RATE=2.0`

use keepsake_core::camera::CameraRigConfig;
use keepsake_core::error::ConfigError;
use keepsake_core::interactables::{GiftBoxConfig, MemoryFieldConfig};
use keepsake_core::particles::{FallingSway, FieldShape, MotionLaw, RisingTumble, Twinkle};
use serde::{Deserialize, Serialize};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "keepsake.ron";

/// Main scene configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Seed for every procedural field
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub camera: CameraRigConfig,
    #[serde(default)]
    pub gift_box: GiftBoxConfig,
    #[serde(default)]
    pub memories: MemoryFieldConfig,
    #[serde(default = "default_starfield")]
    pub starfield: FieldConfig<Twinkle>,
    #[serde(default = "default_sparkles")]
    pub sparkles: FieldConfig<Twinkle>,
    #[serde(default = "default_petals")]
    pub petals: FieldConfig<FallingSway>,
    #[serde(default = "default_hearts")]
    pub hearts: FieldConfig<RisingTumble>,
    #[serde(default)]
    pub constellation: ConstellationConfig,
}

fn default_seed() -> u64 {
    0x6b65_6570
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            camera: CameraRigConfig::default(),
            gift_box: GiftBoxConfig::default(),
            memories: MemoryFieldConfig::default(),
            starfield: default_starfield(),
            sparkles: default_sparkles(),
            petals: default_petals(),
            hearts: default_hearts(),
            constellation: ConstellationConfig::default(),
        }
    }
}

/// One particle field: its shell plus the motion law's parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig<L> {
    pub count: usize,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub motion: L,
}

impl<L: MotionLaw> FieldConfig<L> {
    pub fn shape(&self) -> FieldShape {
        FieldShape::new(self.count, self.inner_radius, self.outer_radius)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shape().validate()?;
        self.motion.validate()
    }
}

fn default_starfield() -> FieldConfig<Twinkle> {
    FieldConfig {
        count: 600,
        inner_radius: 40.0,
        outer_radius: 70.0,
        motion: Twinkle::starfield(),
    }
}

fn default_sparkles() -> FieldConfig<Twinkle> {
    FieldConfig {
        count: 80,
        inner_radius: 15.0,
        outer_radius: 35.0,
        motion: Twinkle::sparkles(),
    }
}

fn default_petals() -> FieldConfig<FallingSway> {
    FieldConfig {
        count: 50,
        inner_radius: 5.0,
        outer_radius: 15.0,
        motion: FallingSway::default(),
    }
}

fn default_hearts() -> FieldConfig<RisingTumble> {
    FieldConfig {
        count: 50,
        inner_radius: 8.0,
        outer_radius: 20.0,
        motion: RisingTumble::default(),
    }
}

/// Constellation lines between memory cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstellationConfig {
    /// Nearest neighbors linked per card
    pub neighbors: usize,
}

impl Default for ConstellationConfig {
    fn default() -> Self {
        Self { neighbors: 3 }
    }
}

impl SceneConfig {
    /// Run every section's validation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.camera.validate()?;
        self.gift_box.validate()?;
        self.memories.validate()?;
        self.starfield.validate()?;
        self.sparkles.validate()?;
        self.petals.validate()?;
        self.hearts.validate()?;
        if self.constellation.neighbors >= self.memories.count {
            return Err(ConfigError::NeighborCount {
                neighbors: self.constellation.neighbors,
                points: self.memories.count,
            });
        }
        Ok(())
    }

    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `path`, or `keepsake.ron` if it exists
    /// 3. Environment variables prefixed with `KEEPSAKE_` (highest priority)
    ///
    /// An explicit `path` must exist; the default file is optional.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: Option<&std::path::Path>) -> anyhow::Result<Self> {
        use anyhow::Context;
        use config::{Config, Environment, File, FileFormat};

        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Ron).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE)
                .format(FileFormat::Ron)
                .required(false),
        };

        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .add_source(Config::try_from(&SceneConfig::default()).context("Failed to encode default configuration")?)
            // Layer 2: Config file
            .add_source(file)
            // Layer 3: Environment variables (KEEPSAKE_CAMERA__SMOOTHING_RATE, etc.)
            .add_source(
                Environment::with_prefix("KEEPSAKE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build().context("Failed to build configuration")?;
        let scene: SceneConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        scene.validate().context("Invalid configuration")?;

        log::info!("configuration loaded (seed {:#x})", scene.seed);
        Ok(scene)
    }
}
