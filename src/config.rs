//! Configuration module

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::features::image::DEFAULT_IMAGE_SIZE;
use crate::inference::tumor::DEFAULT_CLASS_NAMES;

/// Origins allowed to call `/hd` when nothing is configured
pub const DEFAULT_HEART_ORIGINS: &[&str] = &[
    "http://localhost",
    "http://localhost:3000",
    "http://127.0.0.1",
];

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// ONNX tumor model; `None` leaves `/predict` uninitialized
    pub tumor_model_path: Option<PathBuf>,

    /// Tumor class names in model output order
    pub tumor_class_names: Vec<String>,

    /// Square edge the tumor model expects
    pub tumor_image_size: u32,

    /// Heart artifact directory; `None` leaves `/hd` uninitialized
    pub heart_model_dir: Option<PathBuf>,

    /// Symptom artifact directory; `None` leaves `/model` uninitialized
    pub symptom_model_dir: Option<PathBuf>,

    /// CORS allow-list for the clinical endpoint
    pub heart_allowed_origins: Vec<String>,

    /// Max request body size in bytes
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),

            tumor_model_path: path_var("TUMOR_MODEL_PATH"),

            tumor_class_names: list_var("TUMOR_CLASS_NAMES")
                .unwrap_or_else(|| DEFAULT_CLASS_NAMES.iter().map(|s| s.to_string()).collect()),

            tumor_image_size: env::var("TUMOR_IMAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(DEFAULT_IMAGE_SIZE),

            heart_model_dir: path_var("HEART_MODEL_DIR"),

            symptom_model_dir: path_var("SYMPTOM_MODEL_DIR"),

            heart_allowed_origins: list_var("HEART_ALLOWED_ORIGINS")
                .unwrap_or_else(|| DEFAULT_HEART_ORIGINS.iter().map(|s| s.to_string()).collect()),

            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            tumor_model_path: None,
            tumor_class_names: DEFAULT_CLASS_NAMES.iter().map(|s| s.to_string()).collect(),
            tumor_image_size: DEFAULT_IMAGE_SIZE,
            heart_model_dir: None,
            symptom_model_dir: None,
            heart_allowed_origins: DEFAULT_HEART_ORIGINS.iter().map(|s| s.to_string()).collect(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

fn path_var(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Comma separated list; empty entries dropped
fn list_var(key: &str) -> Option<Vec<String>> {
    env::var(key).ok().map(|v| parse_list(&v)).filter(|l| !l.is_empty())
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
