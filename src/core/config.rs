use std::env;
use std::time::Duration;

use crate::features::checkin::providers::CameraFacing;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub geofence: GeofenceConfig,
    pub location: LocationConfig,
    pub capture: CaptureConfig,
    pub verifier: VerifierConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

/// Circular boundary that check-in coordinates are measured against
#[derive(Debug, Clone)]
pub struct GeofenceConfig {
    pub anchor_latitude: f64,
    pub anchor_longitude: f64,
    pub radius_meters: f64,
}

/// Options handed to the location provider for every acquisition
#[derive(Debug, Clone)]
pub struct LocationConfig {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub max_cache_age: Duration,
}

/// Video stream parameters requested from the capture device
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub facing: CameraFacing,
    pub width: u32,
    pub height: u32,
}

/// Which face verifier backs the capture step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VerifierMode {
    /// Random outcome with `success_probability`
    Simulated,
    /// Every frame is accepted
    Accept,
    /// Every frame is rejected
    Reject,
}

#[derive(Debug, Clone)]
pub struct VerifierConfig {
    pub mode: VerifierMode,
    pub processing_delay: Duration,
    pub success_probability: f64,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            // Only error if it's not "file not found" - that's acceptable
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            geofence: GeofenceConfig::from_env()?,
            location: LocationConfig::from_env()?,
            capture: CaptureConfig::from_env()?,
            verifier: VerifierConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl GeofenceConfig {
    // Campus anchor of the reference deployment
    const DEFAULT_ANCHOR_LAT: f64 = 10.997201;
    const DEFAULT_ANCHOR_LON: f64 = 76.837499;
    const DEFAULT_RADIUS_METERS: f64 = 200.0;
    /// Anything wider than this no longer describes a physical site
    pub const MAX_RADIUS_METERS: f64 = 50_000.0;

    pub fn from_env() -> Result<Self, String> {
        let anchor_latitude = env::var("GEOFENCE_ANCHOR_LAT")
            .unwrap_or_else(|_| Self::DEFAULT_ANCHOR_LAT.to_string())
            .parse::<f64>()
            .map_err(|_| "GEOFENCE_ANCHOR_LAT must be a valid number".to_string())?;

        let anchor_longitude = env::var("GEOFENCE_ANCHOR_LON")
            .unwrap_or_else(|_| Self::DEFAULT_ANCHOR_LON.to_string())
            .parse::<f64>()
            .map_err(|_| "GEOFENCE_ANCHOR_LON must be a valid number".to_string())?;

        let radius_meters = env::var("GEOFENCE_RADIUS_METERS")
            .unwrap_or_else(|_| Self::DEFAULT_RADIUS_METERS.to_string())
            .parse::<f64>()
            .map_err(|_| "GEOFENCE_RADIUS_METERS must be a valid number".to_string())?;

        Self::new(anchor_latitude, anchor_longitude, radius_meters)
    }

    pub fn new(
        anchor_latitude: f64,
        anchor_longitude: f64,
        radius_meters: f64,
    ) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&anchor_latitude) {
            return Err("GEOFENCE_ANCHOR_LAT must be within [-90, 90]".to_string());
        }
        if !(-180.0..=180.0).contains(&anchor_longitude) {
            return Err("GEOFENCE_ANCHOR_LON must be within [-180, 180]".to_string());
        }
        if !radius_meters.is_finite()
            || radius_meters <= 0.0
            || radius_meters > Self::MAX_RADIUS_METERS
        {
            return Err(format!(
                "GEOFENCE_RADIUS_METERS must be within (0, {}]",
                Self::MAX_RADIUS_METERS
            ));
        }

        Ok(Self {
            anchor_latitude,
            anchor_longitude,
            radius_meters,
        })
    }
}

impl LocationConfig {
    const DEFAULT_TIMEOUT_MS: u64 = 10_000;
    const DEFAULT_MAX_CACHE_AGE_MS: u64 = 0; // force a fresh fix

    pub fn from_env() -> Result<Self, String> {
        let high_accuracy = env::var("LOCATION_HIGH_ACCURACY")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .map_err(|_| "LOCATION_HIGH_ACCURACY must be true or false".to_string())?;

        let timeout_ms = env::var("LOCATION_TIMEOUT_MS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_MS.to_string())
            .parse::<u64>()
            .map_err(|_| "LOCATION_TIMEOUT_MS must be a valid number".to_string())?;

        let max_cache_age_ms = env::var("LOCATION_MAX_CACHE_AGE_MS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CACHE_AGE_MS.to_string())
            .parse::<u64>()
            .map_err(|_| "LOCATION_MAX_CACHE_AGE_MS must be a valid number".to_string())?;

        Ok(Self {
            high_accuracy,
            timeout: Duration::from_millis(timeout_ms),
            max_cache_age: Duration::from_millis(max_cache_age_ms),
        })
    }
}

impl CaptureConfig {
    const DEFAULT_WIDTH: u32 = 640;
    const DEFAULT_HEIGHT: u32 = 480;

    pub fn from_env() -> Result<Self, String> {
        let facing = env::var("CAPTURE_FACING")
            .unwrap_or_else(|_| CameraFacing::User.as_str().to_string())
            .parse::<CameraFacing>()
            .map_err(|e| format!("CAPTURE_FACING: {}", e))?;

        let width = env::var("CAPTURE_WIDTH")
            .unwrap_or_else(|_| Self::DEFAULT_WIDTH.to_string())
            .parse::<u32>()
            .map_err(|_| "CAPTURE_WIDTH must be a valid number".to_string())?;

        let height = env::var("CAPTURE_HEIGHT")
            .unwrap_or_else(|_| Self::DEFAULT_HEIGHT.to_string())
            .parse::<u32>()
            .map_err(|_| "CAPTURE_HEIGHT must be a valid number".to_string())?;

        Ok(Self {
            facing,
            width,
            height,
        })
    }
}

impl VerifierConfig {
    const DEFAULT_PROCESSING_DELAY_MS: u64 = 2_000;
    const DEFAULT_SUCCESS_PROBABILITY: f64 = 0.8;

    pub fn from_env() -> Result<Self, String> {
        let mode = match env::var("FACE_VERIFIER")
            .unwrap_or_else(|_| "simulated".to_string())
            .to_lowercase()
            .as_str()
        {
            "simulated" => VerifierMode::Simulated,
            "accept" => VerifierMode::Accept,
            "reject" => VerifierMode::Reject,
            other => {
                return Err(format!(
                    "FACE_VERIFIER must be simulated, accept or reject (got \"{}\")",
                    other
                ))
            }
        };

        let processing_delay_ms = env::var("VERIFICATION_DELAY_MS")
            .unwrap_or_else(|_| Self::DEFAULT_PROCESSING_DELAY_MS.to_string())
            .parse::<u64>()
            .map_err(|_| "VERIFICATION_DELAY_MS must be a valid number".to_string())?;

        let success_probability = env::var("VERIFICATION_SUCCESS_PROBABILITY")
            .unwrap_or_else(|_| Self::DEFAULT_SUCCESS_PROBABILITY.to_string())
            .parse::<f64>()
            .map_err(|_| "VERIFICATION_SUCCESS_PROBABILITY must be a valid number".to_string())?;

        if !(0.0..=1.0).contains(&success_probability) {
            return Err("VERIFICATION_SUCCESS_PROBABILITY must be within [0, 1]".to_string());
        }

        Ok(Self {
            mode,
            processing_delay: Duration::from_millis(processing_delay_ms),
            success_probability,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Presence API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "Geofenced attendance check-in and reviewer dashboard".to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geofence_config_accepts_realistic_radius() {
        let config = GeofenceConfig::new(10.997201, 76.837499, 150.0).unwrap();
        assert_eq!(config.radius_meters, 150.0);
    }

    #[test]
    fn test_geofence_config_rejects_unbounded_radius() {
        assert!(GeofenceConfig::new(10.997201, 76.837499, 100_000_000.0).is_err());
        assert!(GeofenceConfig::new(10.997201, 76.837499, f64::INFINITY).is_err());
        assert!(GeofenceConfig::new(10.997201, 76.837499, 0.0).is_err());
        assert!(GeofenceConfig::new(10.997201, 76.837499, -5.0).is_err());
    }

    #[test]
    fn test_geofence_config_rejects_invalid_anchor() {
        assert!(GeofenceConfig::new(91.0, 76.8, 100.0).is_err());
        assert!(GeofenceConfig::new(10.9, -180.5, 100.0).is_err());
    }
}
