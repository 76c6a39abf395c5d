//! Configuration loading, audit rules, and folder resolution
//!
//! Resolution priority for every setting:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or unreadable config file at the default location is never
//! fatal; the compiled defaults are used and an unreadable file is handed
//! back to the caller for reporting. A file the user asked for explicitly
//! must exist and parse.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "DHA_CONFIG";
/// Environment variable overriding the data folder
pub const DATA_FOLDER_ENV_VAR: &str = "DHA_DATA_FOLDER";
/// Environment variable overriding the output folder
pub const OUTPUT_FOLDER_ENV_VAR: &str = "DHA_OUTPUT_FOLDER";

/// Validation rule set handed to the audit engine at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditRules {
    /// Units of measure accepted on items and recipe slots
    pub allowed_units: BTreeSet<String>,
    /// Minimum token-sort ratio (0-100) for two item names to cluster
    pub duplicate_threshold: f64,
    /// Best-N candidate cap applied before duplicate filtering (unset = all)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_candidates: Option<usize>,
    /// Largest sane quantity for a single ingredient slot, per unit
    pub quantity_ceilings: BTreeMap<String, f64>,
}

impl Default for AuditRules {
    fn default() -> Self {
        let allowed_units = ["g", "kg", "ml", "l", "ea"]
            .iter()
            .map(|u| u.to_string())
            .collect();

        let quantity_ceilings = [
            ("g", 10_000.0),  // 10 kg
            ("kg", 50.0),
            ("ml", 20_000.0), // 20 l
            ("l", 200.0),
            ("ea", 1_000.0),
        ]
        .iter()
        .map(|(u, c)| (u.to_string(), *c))
        .collect();

        Self {
            allowed_units,
            duplicate_threshold: 90.0,
            max_candidates: None,
            quantity_ceilings,
        }
    }
}

impl AuditRules {
    /// Check the rule set and return it with unit keys normalized
    ///
    /// Unit keys are lower-cased and trimmed so they compare against
    /// normalized table values.
    pub fn validate(self) -> Result<Self> {
        if !self.duplicate_threshold.is_finite()
            || !(0.0..=100.0).contains(&self.duplicate_threshold)
        {
            return Err(Error::Config(format!(
                "duplicate_threshold must be within 0-100, got {}",
                self.duplicate_threshold
            )));
        }

        if self.max_candidates == Some(0) {
            return Err(Error::Config(
                "max_candidates must be at least 1 when set".to_string(),
            ));
        }

        let allowed_units: BTreeSet<String> = self
            .allowed_units
            .iter()
            .map(|u| u.trim().to_lowercase())
            .filter(|u| !u.is_empty())
            .collect();

        if allowed_units.is_empty() {
            return Err(Error::Config("allowed_units must not be empty".to_string()));
        }

        let mut quantity_ceilings = BTreeMap::new();
        for (unit, ceiling) in &self.quantity_ceilings {
            if !ceiling.is_finite() || *ceiling <= 0.0 {
                return Err(Error::Config(format!(
                    "quantity ceiling for '{}' must be a positive number, got {}",
                    unit, ceiling
                )));
            }
            let unit = unit.trim().to_lowercase();
            if !allowed_units.contains(&unit) {
                warn!(unit = %unit, "Quantity ceiling configured for a unit that is not allowed");
            }
            quantity_ceilings.insert(unit, *ceiling);
        }

        Ok(Self {
            allowed_units,
            duplicate_threshold: self.duplicate_threshold,
            max_candidates: self.max_candidates,
            quantity_ceilings,
        })
    }

    /// Whether `unit` (already normalized) is in the allowed set
    pub fn is_allowed(&self, unit: &str) -> bool {
        self.allowed_units.contains(unit)
    }

    /// Quantity ceiling for `unit`, if one is configured
    pub fn ceiling(&self, unit: &str) -> Option<f64> {
        self.quantity_ceilings.get(unit).copied()
    }
}

/// Logging section of the TOML config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: CompiledDefaults::default().log_level,
        }
    }
}

/// On-disk configuration file (`config.toml`)
///
/// Every field is optional in the file; absent fields take defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Folder holding `items.csv` and `recipes.csv`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_folder: Option<PathBuf>,
    /// Folder receiving the report files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_folder: Option<PathBuf>,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Audit rule set
    pub rules: AuditRules,
}

impl TomlConfig {
    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }
}

/// Compiled fallback values
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledDefaults {
    pub data_folder: PathBuf,
    pub output_folder: PathBuf,
    pub log_level: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            data_folder: PathBuf::from("data"),
            output_folder: PathBuf::from("."),
            log_level: "info".to_string(),
        }
    }
}

/// Default config file path for the platform (`<config dir>/dha/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("dha").join("config.toml"))
}

/// Default-location config file that exists but could not be used
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFallback {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of config resolution
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    /// File the config came from; `None` when compiled defaults are used
    pub source: Option<PathBuf>,
    /// Set when a default-location file was skipped. Logging is usually not
    /// initialized yet while the config loads, so the caller reports this.
    pub fallback: Option<ConfigFallback>,
}

/// Load the TOML config following the resolution priority
pub fn load_config(cli_path: Option<&Path>) -> Result<LoadedConfig> {
    let explicit = cli_path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

    load_config_from(explicit.as_deref(), default_config_path().as_deref())
}

/// Resolution with both candidate paths supplied by the caller
///
/// `explicit` (CLI or env) must load. `default_path` is best effort: a
/// missing file means compiled defaults, an unusable one is recorded in
/// `fallback`.
pub fn load_config_from(
    explicit: Option<&Path>,
    default_path: Option<&Path>,
) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let config = TomlConfig::from_file(path)?;
        debug!(path = %path.display(), "Loaded config file");
        return Ok(LoadedConfig {
            config,
            source: Some(path.to_path_buf()),
            fallback: None,
        });
    }

    let mut loaded = LoadedConfig::default();
    if let Some(path) = default_path.filter(|p| p.exists()) {
        match TomlConfig::from_file(path) {
            Ok(config) => {
                debug!(path = %path.display(), "Loaded config file");
                loaded.config = config;
                loaded.source = Some(path.to_path_buf());
            }
            Err(e) => {
                warn!(path = %path.display(), "Ignoring unreadable config file: {}", e);
                loaded.fallback = Some(ConfigFallback {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(loaded)
}

/// Folder resolution: CLI → ENV → TOML → compiled default
pub struct FolderResolver {
    env_var_name: &'static str,
    toml_value: Option<PathBuf>,
    default: PathBuf,
}

impl FolderResolver {
    /// Resolver for the input data folder
    pub fn data_folder(config: &TomlConfig) -> Self {
        Self {
            env_var_name: DATA_FOLDER_ENV_VAR,
            toml_value: config.data_folder.clone(),
            default: CompiledDefaults::default().data_folder,
        }
    }

    /// Resolver for the report output folder
    pub fn output_folder(config: &TomlConfig) -> Self {
        Self {
            env_var_name: OUTPUT_FOLDER_ENV_VAR,
            toml_value: config.output_folder.clone(),
            default: CompiledDefaults::default().output_folder,
        }
    }

    /// Resolve the folder, `cli_arg` taking precedence over everything
    pub fn resolve(&self, cli_arg: Option<&Path>) -> PathBuf {
        if let Some(path) = cli_arg {
            return path.to_path_buf();
        }

        if let Some(path) = std::env::var_os(self.env_var_name) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_value {
            return path.clone();
        }

        self.default.clone()
    }
}

/// Write a config file atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, target: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut temp_name = target.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    std::fs::write(&temp_path, content)?;
    if let Err(e) = std::fs::rename(&temp_path, target) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e.into());
    }

    debug!(path = %target.display(), "Wrote config file");
    Ok(())
}
