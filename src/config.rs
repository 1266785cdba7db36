// src/config.rs
use dotenv::dotenv;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use std::fs;
use std::fs::File;
use std::path::Path;

use crate::domain::errors::{AppError, AppResult};
use crate::domain::models::RiskLevel;

/// Default file slot for the persisted settings.
pub const SETTINGS_FILE: &str = "forex-analyzer-settings.json";

/// Feed presets offered by the settings screen.
pub const FEED_PRESETS: &[(&str, &str)] = &[
    ("https://www.forexlive.com/feed", "Général"),
    ("https://www.forexlive.com/feed/news", "Actualités"),
    ("https://www.forexlive.com/feed/technicalanalysis", "Analyse Technique"),
    ("https://www.forexlive.com/feed/centralbank", "Banques Centrales"),
    ("https://www.forexlive.com/feed/cryptocurrency", "Crypto-monnaies"),
];

/// Application settings
///
/// Loaded once at startup, mutated only through an explicit save; never
/// partially applied. The persisted slot uses the same camelCase keys as the
/// front end stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// OpenAI API key; empty means unset
    pub api_key: String,

    /// Display language
    pub language: Language,

    /// Number of feed items handed to the analyzer
    pub news_count: usize,

    /// Chat-completion model identifier
    pub model: String,

    /// News feed URL
    pub feed_url: String,

    /// UI theme
    pub theme: Theme,

    /// Preferred chart timeframe
    pub timeframe: AnalysisTimeframe,

    /// Alerts enabled
    pub alerts_enabled: bool,

    /// Pairs pinned by the user
    pub favorites_pairs: Vec<String>,

    /// Analysis thresholds
    pub analysis: AnalysisSettings,

    /// Notification channels
    pub notifications: NotificationSettings,

    /// Risk management limits
    pub risk_management: RiskSettings,

    /// Delivery-export upstream and relay selection
    pub import: ImportSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Fr,
    Es,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

/// Chart timeframes selectable in the settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisTimeframe {
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "1d")]
    D1,
    #[serde(rename = "1w")]
    W1,
    #[serde(rename = "1m")]
    M1,
}

/// Analysis thresholds and filters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSettings {
    /// Minimum strength difference between two currencies to flag a pair
    pub min_strength_diff: f64,

    /// Minimum model confidence to surface a result
    pub min_confidence: f64,

    /// Highest acceptable risk level for opportunities
    pub max_risk: RiskLevel,

    /// Pairs considered first
    pub preferred_pairs: Vec<String>,

    /// Pairs never surfaced
    pub excluded_pairs: Vec<String>,

    /// Minimum acceptable risk/reward ratio
    pub min_risk_reward_ratio: f64,

    /// Timeframes taken into account
    pub timeframes: Vec<AnalysisTimeframe>,

    /// Relative weights of the fundamental factors
    pub fundamental_factors: FactorWeights,

    /// Volatility bounds for surfaced pairs
    pub volatility_filter: VolatilityFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorWeights {
    pub economic_importance: f64,
    pub monetary_policy_weight: f64,
    pub geopolitical_risk_weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatilityFilter {
    pub min: f64,
    pub max: f64,
}

/// Notification channels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub email: bool,
    pub desktop: bool,
    pub mobile: bool,
    pub telegram: bool,
}

/// Risk management limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSettings {
    /// Maximum number of simultaneous positions
    pub max_positions: usize,

    /// Maximum risk per trade, percent of capital
    pub max_risk_per_trade: Decimal,

    /// Maximum daily loss, percent of capital
    pub max_daily_loss: Decimal,

    /// Risk/reward ratio aimed for
    pub preferred_risk_reward_ratio: Decimal,
}

/// Delivery-export import configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSettings {
    /// Upstream export endpoint
    pub export_url: String,

    /// Portal page the user authenticates against
    pub portal_url: String,

    /// CORS relay used to reach the upstream (e.g. "allorigins")
    pub relay: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingSettings {
    /// Log level (e.g. "info", "debug", "warn", "error")
    pub level: String,

    /// Log to file
    pub to_file: bool,

    /// Log file path
    pub file_path: Option<String>,
}

impl Settings {
    /// Load the persisted settings merged over defaults. A missing or
    /// unreadable slot falls back to defaults; corruption is logged, never
    /// fatal.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("Failed to read settings file: {}", e);
                }
                return Settings::default();
            }
        };

        match Self::merged_over_defaults(&raw) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Stored settings are unreadable, using defaults: {}", e);
                Settings::default()
            }
        }
    }

    /// Stored values win per top-level key; keys the slot does not define come
    /// from defaults. No deep merge below the first level.
    fn merged_over_defaults(raw: &str) -> Result<Self, serde_json::Error> {
        let stored: Value = serde_json::from_str(raw)?;
        let mut merged = serde_json::to_value(Settings::default())?;

        match (merged.as_object_mut(), stored) {
            (Some(base), Value::Object(stored)) => {
                for (key, value) in stored {
                    base.insert(key, value);
                }
            }
            // Not a JSON object: let serde report the shape error.
            _ => return serde_json::from_str(raw),
        }

        serde_json::from_value(merged)
    }

    /// Save the settings to the persisted slot. Values are written as-is; no
    /// validation happens on save.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> AppResult<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize settings: {}", e)))?;

        fs::write(path, contents)
            .map_err(|e| AppError::Config(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Fill the API key from the environment when the stored slot has none.
    pub fn apply_env_overrides(&mut self) {
        // Load .env file if it exists
        dotenv().ok();

        if self.api_key.is_empty() {
            if let Ok(key) = env::var("OPENAI_API_KEY") {
                self.api_key = key;
            }
        }
    }

    /// Initialize logging based on configuration
    pub fn init_logging(&self) -> AppResult<()> {
        let mut builder = env_logger::Builder::new();

        // Set log level
        let log_level = match self.logging.level.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            _ => log::LevelFilter::Info,
        };

        builder.filter_level(log_level);

        // Configure output
        if self.logging.to_file {
            if let Some(file_path) = &self.logging.file_path {
                let file = File::create(file_path)
                    .map_err(|e| AppError::Config(format!("Failed to create log file: {}", e)))?;

                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
        }

        // Initialize the logger
        builder.init();

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: "".to_string(),
            language: Language::Fr,
            news_count: 5,
            model: "gpt-4-turbo-preview".to_string(),
            feed_url: "https://www.forexlive.com/feed/news/".to_string(),
            theme: Theme::Light,
            timeframe: AnalysisTimeframe::H4,
            alerts_enabled: true,
            favorites_pairs: vec![
                "EUR/USD".to_string(),
                "GBP/USD".to_string(),
                "USD/JPY".to_string(),
            ],
            analysis: AnalysisSettings {
                min_strength_diff: 20.0,
                min_confidence: 70.0,
                max_risk: RiskLevel::Modere,
                preferred_pairs: vec![
                    "EUR/USD".to_string(),
                    "GBP/USD".to_string(),
                    "USD/JPY".to_string(),
                    "AUD/USD".to_string(),
                    "USD/CAD".to_string(),
                ],
                excluded_pairs: Vec::new(),
                min_risk_reward_ratio: 2.0,
                timeframes: vec![
                    AnalysisTimeframe::H1,
                    AnalysisTimeframe::H4,
                    AnalysisTimeframe::D1,
                ],
                fundamental_factors: FactorWeights {
                    economic_importance: 40.0,
                    monetary_policy_weight: 35.0,
                    geopolitical_risk_weight: 25.0,
                },
                volatility_filter: VolatilityFilter { min: 0.3, max: 2.0 },
            },
            notifications: NotificationSettings {
                email: false,
                desktop: true,
                mobile: false,
                telegram: false,
            },
            risk_management: RiskSettings {
                max_positions: 3,
                max_risk_per_trade: Decimal::new(2, 0),
                max_daily_loss: Decimal::new(6, 0),
                preferred_risk_reward_ratio: Decimal::new(25, 1),
            },
            import: ImportSettings {
                export_url: "https://etrace.cristalcloud.com/MODULES/Covea/livraison_export.php"
                    .to_string(),
                portal_url: "https://etrace.cristalcloud.com/Pilotage-10/11-livraison.php"
                    .to_string(),
                relay: "allorigins".to_string(),
            },
            logging: LoggingSettings {
                level: "info".to_string(),
                to_file: false,
                file_path: None,
            },
        }
    }
}
