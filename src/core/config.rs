use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageConfig,
    pub geocoder: GeocoderConfig,
    pub map: MapConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub max_request_body_size: usize,
}

/// Directories for transient uploads and rendered map documents
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub map_dir: PathBuf,
}

/// Nominatim reverse geocoding settings
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
    /// Nominatim's usage policy requires an identifying User-Agent
    pub user_agent: String,
    /// Value sent as `accept-language`
    pub language: String,
    /// No timeout when unset
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct MapConfig {
    pub zoom: u8,
    pub tile_url: String,
    pub tile_attribution: String,
    /// Stored documents older than this are swept when a new one is written
    pub retention: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            geocoder: GeocoderConfig::from_env()?,
            map: MapConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 32 * 1024 * 1024; // 32MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, String> {
        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());
        let map_dir = env::var("MAP_DIR").unwrap_or_else(|_| "static/maps".to_string());

        if upload_dir.trim().is_empty() || map_dir.trim().is_empty() {
            return Err("UPLOAD_DIR and MAP_DIR must not be empty".to_string());
        }

        Ok(Self {
            upload_dir: PathBuf::from(upload_dir),
            map_dir: PathBuf::from(map_dir),
        })
    }

    /// Create both directories if they don't exist yet
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.upload_dir)?;
        std::fs::create_dir_all(&self.map_dir)
    }
}

impl GeocoderConfig {
    const DEFAULT_BASE_URL: &'static str = "https://nominatim.openstreetmap.org";
    const DEFAULT_USER_AGENT: &'static str = "geo_locator_app";
    const DEFAULT_LANGUAGE: &'static str = "tr";

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("GEOCODER_BASE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let user_agent = env::var("GEOCODER_USER_AGENT")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_USER_AGENT.to_string());

        let language = env::var("GEOCODER_LANGUAGE")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_LANGUAGE.to_string());

        let timeout = match env::var("GEOCODER_TIMEOUT_SECS") {
            Ok(raw) if !raw.trim().is_empty() => Some(Duration::from_secs(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| "GEOCODER_TIMEOUT_SECS must be a valid number".to_string())?,
            )),
            _ => None,
        };

        Ok(Self {
            base_url,
            user_agent,
            language,
            timeout,
        })
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            user_agent: Self::DEFAULT_USER_AGENT.to_string(),
            language: Self::DEFAULT_LANGUAGE.to_string(),
            timeout: None,
        }
    }
}

impl MapConfig {
    const DEFAULT_ZOOM: u8 = 15;
    const DEFAULT_TILE_URL: &'static str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
    const DEFAULT_TILE_ATTRIBUTION: &'static str =
        "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
    const DEFAULT_RETENTION_SECS: u64 = 3600; // 1 hour

    pub fn from_env() -> Result<Self, String> {
        let zoom = env::var("MAP_ZOOM")
            .unwrap_or_else(|_| Self::DEFAULT_ZOOM.to_string())
            .parse::<u8>()
            .map_err(|_| "MAP_ZOOM must be a valid number".to_string())?;

        if zoom > 19 {
            return Err("MAP_ZOOM must be between 0 and 19".to_string());
        }

        let tile_url =
            env::var("MAP_TILE_URL").unwrap_or_else(|_| Self::DEFAULT_TILE_URL.to_string());
        let tile_attribution = env::var("MAP_TILE_ATTRIBUTION")
            .unwrap_or_else(|_| Self::DEFAULT_TILE_ATTRIBUTION.to_string());

        let retention_secs = env::var("MAP_RETENTION_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_RETENTION_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "MAP_RETENTION_SECS must be a valid number".to_string())?;

        Ok(Self {
            zoom,
            tile_url,
            tile_attribution,
            retention: Duration::from_secs(retention_secs),
        })
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom: Self::DEFAULT_ZOOM,
            tile_url: Self::DEFAULT_TILE_URL.to_string(),
            tile_attribution: Self::DEFAULT_TILE_ATTRIBUTION.to_string(),
            retention: Duration::from_secs(Self::DEFAULT_RETENTION_SECS),
        }
    }
}
