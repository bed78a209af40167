use std::env;

use scene::ViewerOptions;
use thiserror::Error;

pub const DEFAULT_CONTAINER: &str = "contain";
pub const DEFAULT_POSTING_URL: &str = "http://1.221.237.243:9091/svc/auto-posting-anals";
pub const DEFAULT_POSTING_GROUP: &str = "134";
pub const DEFAULT_IMAGERY_URL: &str = "http://t0.tianditu.gov.cn/img_w/wmts?service=WMTS&version=1.0.0&request=GetTile&tilematrixset=w";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: expected WIDTHxHEIGHT, got {value:?}")]
    InvalidCanvas { var: &'static str, value: String },
    #[error("{var}: expected true or false, got {value:?}")]
    InvalidFlag { var: &'static str, value: String },
}

/// Runtime settings, read from `LANDAXIS_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub container: String,
    pub posting_url: String,
    pub posting_group: String,
    pub imagery_url: String,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub pick_supported: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            container: DEFAULT_CONTAINER.to_string(),
            posting_url: DEFAULT_POSTING_URL.to_string(),
            posting_group: DEFAULT_POSTING_GROUP.to_string(),
            imagery_url: DEFAULT_IMAGERY_URL.to_string(),
            canvas_width: 1280,
            canvas_height: 720,
            pick_supported: true,
        }
    }
}

impl MapConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source; unset variables
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = lookup("LANDAXIS_CONTAINER") {
            config.container = v;
        }
        if let Some(v) = lookup("LANDAXIS_POSTING_URL") {
            config.posting_url = v;
        }
        if let Some(v) = lookup("LANDAXIS_POSTING_GROUP") {
            config.posting_group = v;
        }
        if let Some(v) = lookup("LANDAXIS_IMAGERY_URL") {
            config.imagery_url = v;
        }
        if let Some(v) = lookup("LANDAXIS_CANVAS") {
            let (w, h) = parse_canvas(&v).ok_or(ConfigError::InvalidCanvas {
                var: "LANDAXIS_CANVAS",
                value: v.clone(),
            })?;
            config.canvas_width = w;
            config.canvas_height = h;
        }
        if let Some(v) = lookup("LANDAXIS_PICK_SUPPORTED") {
            config.pick_supported = parse_flag(&v).ok_or(ConfigError::InvalidFlag {
                var: "LANDAXIS_PICK_SUPPORTED",
                value: v.clone(),
            })?;
        }
        Ok(config)
    }

    pub fn viewer_options(&self) -> ViewerOptions {
        ViewerOptions {
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            pick_position_supported: self.pick_supported,
            imagery_url: Some(self.imagery_url.clone()),
            ..ViewerOptions::default()
        }
    }
}

fn parse_canvas(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.trim().split_once(['x', 'X'])?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
