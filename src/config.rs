use crate::error::{FilterError, Result};
use ownerfi_common::{Classifier, ClassifierOptions, PatternTable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides `patterns_file`
pub const PATTERNS_ENV: &str = "OWNERFI_PATTERNS";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Custom pattern table (JSON); builtin table when unset
    #[serde(default)]
    pub patterns_file: Option<PathBuf>,
    #[serde(default)]
    pub classifier: ClassifierOptions,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "config loaded");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| FilterError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("ownerfi-filter").join("config.json"))
    }

    /// Pattern file in effect (environment first)
    pub fn patterns_path(&self) -> Option<PathBuf> {
        match std::env::var(PATTERNS_ENV) {
            Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
            _ => self.patterns_file.clone(),
        }
    }

    /// Build the classifier. Pattern-table errors surface here, before any
    /// listing is processed.
    pub fn classifier(&self) -> Result<Classifier> {
        self.classifier_with(None)
    }

    /// Same as [`Config::classifier`], with an explicit pattern file taking
    /// precedence over configuration.
    pub fn classifier_with(&self, patterns: Option<&Path>) -> Result<Classifier> {
        let path = patterns.map(Path::to_path_buf).or_else(|| self.patterns_path());
        let table = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(FilterError::FileNotFound(path.display().to_string()));
                }
                tracing::info!(path = %path.display(), "loading custom pattern table");
                PatternTable::from_file(&path)?
            }
            None => PatternTable::builtin(),
        };

        Ok(Classifier::new(table, self.classifier))
    }

    pub fn set_look_behind_window(&mut self, window: usize) -> Result<()> {
        if window == 0 {
            return Err(FilterError::Config("look-behind window must be positive".into()));
        }
        self.classifier.matcher.look_behind_window = window;
        Ok(())
    }

    pub fn set_negation_distance(&mut self, distance: usize) -> Result<()> {
        if distance == 0 {
            return Err(FilterError::Config("negation distance must be positive".into()));
        }
        self.classifier.matcher.negation_distance = distance;
        Ok(())
    }

    pub fn set_deep_discount_threshold(&mut self, percent: f64) -> Result<()> {
        if !percent.is_finite() || percent <= 0.0 {
            return Err(FilterError::Config(format!(
                "deep discount threshold must be a positive percentage, got {}",
                percent
            )));
        }
        self.classifier.discount.deep_discount_threshold = percent;
        Ok(())
    }
}
