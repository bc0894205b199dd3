use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Default request timeout for the remote recognizer.
const DEFAULT_RECOGNIZER_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct SketchConfig {
    pub common: core_config::Config,
    pub artifact: ArtifactConfig,
    pub recognizer: RecognizerConfig,
    pub request: RequestConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone)]
pub struct ArtifactConfig {
    /// Where the thresholded grid PNG is written. Overwritten on every save.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Largest `/save` body accepted. `None` accepts drawings of any size.
    pub max_body_bytes: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct RecognizerConfig {
    pub kind: RecognizerKind,
    /// Labels returned by the static recognizer.
    pub static_labels: Vec<String>,
    /// Prediction endpoint of the remote model server.
    pub url: Option<String>,
    /// Health endpoint of the remote model server.
    pub health_url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

/// Which recognizer backend to load at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognizerKind {
    Static,
    Http,
}

impl FromStr for RecognizerKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(RecognizerKind::Static),
            "http" => Ok(RecognizerKind::Http),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "Unknown recognizer kind '{}', expected 'static' or 'http'",
                other
            ))),
        }
    }
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            kind: RecognizerKind::Static,
            static_labels: Vec::new(),
            url: None,
            health_url: None,
            timeout_secs: DEFAULT_RECOGNIZER_TIMEOUT_SECS,
        }
    }
}

impl SketchConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let kind: RecognizerKind = get_env("SKETCH_RECOGNIZER", Some("static"), is_prod)?.parse()?;

        let url = match kind {
            RecognizerKind::Http => Some(get_env("SKETCH_RECOGNIZER_URL", None, false)?),
            RecognizerKind::Static => env::var("SKETCH_RECOGNIZER_URL").ok(),
        };

        Ok(SketchConfig {
            common: common_config,
            artifact: ArtifactConfig {
                path: get_env("SKETCH_ARTIFACT_PATH", Some("image.png"), is_prod)?.into(),
            },
            recognizer: RecognizerConfig {
                kind,
                static_labels: parse_labels(&env::var("SKETCH_STATIC_LABELS").unwrap_or_default()),
                url,
                health_url: env::var("SKETCH_RECOGNIZER_HEALTH_URL").ok(),
                timeout_secs: env::var("SKETCH_RECOGNIZER_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_RECOGNIZER_TIMEOUT_SECS),
            },
            request: RequestConfig {
                max_body_bytes: parse_body_limit(env::var("SKETCH_MAX_BODY_BYTES").ok().as_deref())?,
            },
            observability: ObservabilityConfig {
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
            },
        })
    }
}

/// Split a comma-separated label list, dropping blanks.
pub fn parse_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Unset, empty or `0` means unlimited.
pub fn parse_body_limit(raw: Option<&str>) -> Result<Option<usize>, AppError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => {
            let bytes: usize = v.parse().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "SKETCH_MAX_BODY_BYTES must be a byte count, got '{}': {}",
                    v,
                    e
                ))
            })?;
            Ok((bytes > 0).then_some(bytes))
        }
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
