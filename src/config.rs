use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub cors_origin: String,
    pub detector: DetectorConfig,
    pub frame: FrameConfig,
    pub scoring: ScoringEnvConfig,
}

#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub model_path: String,
    pub pool_size: usize,
    pub min_confidence: f32,
}

#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Frames wider than this are downscaled before landmark detection.
    pub max_width: u32,
}

#[derive(Debug, Clone)]
pub struct ScoringEnvConfig {
    pub ear_thresh: f64,
    pub mar_thresh: f64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 8000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            cors_origin: env_or("CORS_ORIGIN", "*"),
            detector: DetectorConfig {
                model_path: env_or("FACE_MESH_MODEL_PATH", "./models/face_mesh.onnx"),
                pool_size: env_or_parse("DETECTOR_POOL_SIZE", 2_usize),
                min_confidence: env_or_parse("DETECTOR_MIN_CONFIDENCE", 0.5_f32),
            },
            frame: FrameConfig {
                max_width: env_or_parse("FRAME_MAX_WIDTH", 960_u32),
            },
            scoring: ScoringEnvConfig {
                ear_thresh: env_or_parse("EAR_THRESH", 0.21_f64),
                mar_thresh: env_or_parse("MAR_THRESH", 0.60_f64),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
