//! Application configuration management.
//!
//! Settings are layered with `figment`, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config FILE`, or `config.toml` in the platform config dir)
//! 3. `ASSETDEDUPE_*` environment variables
//! 4. CLI flags ([`Config::merge_cli`])
//!
//! ```toml
//! supported_extensions = ["jpg", "png", "webp"]
//! markers = ["_ssl=1", "?ssl=1"]
//! uploads_subdir = "wp-content/uploads"
//! safe_zones = ["wp-content/uploads", "images"]
//! gated = true
//! conflict_policy = "overwrite"
//! trash = false
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::actions::delete::DeleteConfig;
use crate::actions::gate::{DeletionGate, SafeZone, DEFAULT_SAFE_ZONES};
use crate::cli::{Cli, Commands, GateArgs, TargetArgs};
use crate::pipeline::DEFAULT_UPLOADS_SUBDIR;
use crate::rename::ConflictPolicy;
use crate::scanner::{AssetRules, DEFAULT_MARKERS, SUPPORTED_EXTENSIONS};

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "ASSETDEDUPE_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extensions treated as media, without the dot
    pub supported_extensions: Vec<String>,
    /// Substrings stripped from file names
    pub markers: Vec<String>,
    /// Uploads folder relative to the backup root
    pub uploads_subdir: PathBuf,
    /// Safe-zone directories relative to the backup root
    pub safe_zones: Vec<PathBuf>,
    /// Restrict duplicate deletion to the safe zone
    pub gated: bool,
    /// Rename conflict policy
    pub conflict_policy: ConflictPolicy,
    /// Move to trash instead of deleting permanently
    pub trash: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            supported_extensions: SUPPORTED_EXTENSIONS.iter().map(|s| (*s).to_string()).collect(),
            markers: DEFAULT_MARKERS.iter().map(|s| (*s).to_string()).collect(),
            uploads_subdir: PathBuf::from(DEFAULT_UPLOADS_SUBDIR),
            safe_zones: DEFAULT_SAFE_ZONES.iter().map(PathBuf::from).collect(),
            gated: false,
            conflict_policy: ConflictPolicy::default(),
            trash: false,
        }
    }
}

impl Config {
    /// Load from `path`, or from the default platform location when `None`.
    #[must_use]
    pub fn load(path: Option<&Path>) -> Self {
        match path.map(Path::to_path_buf).or_else(Self::config_path) {
            Some(path) => Self::load_from_path(path),
            None => Self::from_figment(Self::base().merge(Self::env())),
        }
    }

    /// Load from a specific TOML file, then apply environment overrides.
    ///
    /// A missing file yields the defaults. An invalid file is logged and skipped.
    #[must_use]
    pub fn load_from_path(path: PathBuf) -> Self {
        if path.exists() {
            log::debug!("Loading configuration from {}", path.display());
        }
        let layered = Self::base().merge(Toml::file(&path)).merge(Self::env());
        match layered.extract() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring invalid config file {}: {}", path.display(), e);
                Self::from_figment(Self::base().merge(Self::env()))
            }
        }
    }

    fn base() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
    }

    fn env() -> Env {
        Env::prefixed(ENV_PREFIX)
    }

    fn from_figment(figment: Figment) -> Self {
        figment.extract().unwrap_or_else(|e| {
            log::warn!("Ignoring invalid configuration: {}", e);
            Self::default()
        })
    }

    /// Default platform-specific configuration path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "assetdedupe", "assetdedupe")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply flags given on the command line.
    pub fn merge_cli(&mut self, cli: &Cli) {
        self.merge_target(cli.command.target());
        match &cli.command {
            Commands::Scan(args) => self.merge_gate(&args.gate),
            Commands::Rename(args) => self.merge_conflict(args.conflict),
            Commands::Clean(args) => {
                self.merge_gate(&args.gate);
                self.merge_conflict(args.conflict);
            }
        }
    }

    fn merge_target(&mut self, args: &TargetArgs) {
        if args.trash {
            self.trash = true;
        }
    }

    fn merge_gate(&mut self, args: &GateArgs) {
        if args.gated {
            self.gated = true;
        }
        if !args.safe_zones.is_empty() {
            self.gated = true;
            self.safe_zones = args.safe_zones.clone();
        }
    }

    fn merge_conflict(&mut self, conflict: Option<ConflictPolicy>) {
        if let Some(policy) = conflict {
            self.conflict_policy = policy;
        }
    }

    /// Extension and marker rules.
    #[must_use]
    pub fn rules(&self) -> AssetRules {
        AssetRules::new(self.supported_extensions.clone(), self.markers.clone())
    }

    /// Deletion gate for a backup rooted at `root`.
    #[must_use]
    pub fn gate(&self, root: &Path) -> DeletionGate {
        if self.gated {
            DeletionGate::Gated(SafeZone::under_root(root, &self.safe_zones))
        } else {
            DeletionGate::Ungated
        }
    }

    /// Deletion backend.
    #[must_use]
    pub fn delete_config(&self) -> DeleteConfig {
        if self.trash {
            DeleteConfig::trash()
        } else {
            DeleteConfig::permanent()
        }
    }
}
