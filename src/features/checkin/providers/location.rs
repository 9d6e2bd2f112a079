use async_trait::async_trait;
use std::time::Duration;

use crate::core::config::LocationConfig;
use crate::features::geofence::Coordinate;

/// Options for a single location fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationRequest {
    pub high_accuracy: bool,
    /// Upper bound on how long the provider may take
    pub timeout: Duration,
    /// Oldest cached fix the provider may return; zero forces a fresh one
    pub max_cache_age: Duration,
}

impl From<&LocationConfig> for LocationRequest {
    fn from(config: &LocationConfig) -> Self {
        Self {
            high_accuracy: config.high_accuracy,
            timeout: config.timeout,
            max_cache_age: config.max_cache_age,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    #[error("Geolocation is not supported")]
    Unsupported,

    #[error("{0}")]
    Provider(String),

    #[error("Timeout expired after {0} ms")]
    Timeout(u128),

    #[error("Coordinate out of range: {0}")]
    InvalidCoordinate(Coordinate),
}

/// Source of the claimant's current coordinate
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_coordinate(&self, request: &LocationRequest)
        -> Result<Coordinate, LocationError>;
}

/// Acquire a fix, bounded by the request's timeout, and reject impossible coordinates
pub async fn acquire_location(
    provider: &dyn LocationProvider,
    request: &LocationRequest,
) -> Result<Coordinate, LocationError> {
    let coordinate = tokio::time::timeout(request.timeout, provider.current_coordinate(request))
        .await
        .map_err(|_| LocationError::Timeout(request.timeout.as_millis()))??;

    if !coordinate.is_valid() {
        return Err(LocationError::InvalidCoordinate(coordinate));
    }

    Ok(coordinate)
}

/// Position (or positioning failure) reported by the claimant's own device.
///
/// The device performs the actual fix; this adapter hands its answer to the
/// check-in machine through the provider contract.
#[derive(Debug, Clone)]
pub struct ReportedLocation {
    outcome: Result<Coordinate, LocationError>,
}

impl ReportedLocation {
    pub fn fix(coordinate: Coordinate) -> Self {
        Self {
            outcome: Ok(coordinate),
        }
    }

    pub fn failed(error: LocationError) -> Self {
        Self {
            outcome: Err(error),
        }
    }
}

#[async_trait]
impl LocationProvider for ReportedLocation {
    async fn current_coordinate(
        &self,
        _request: &LocationRequest,
    ) -> Result<Coordinate, LocationError> {
        self.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StalledProvider;

    #[async_trait]
    impl LocationProvider for StalledProvider {
        async fn current_coordinate(
            &self,
            _request: &LocationRequest,
        ) -> Result<Coordinate, LocationError> {
            std::future::pending().await
        }
    }

    fn request() -> LocationRequest {
        LocationRequest {
            high_accuracy: true,
            timeout: Duration::from_millis(10_000),
            max_cache_age: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_reported_fix_is_returned() {
        let provider = ReportedLocation::fix(Coordinate::new(10.9972, 76.8375));
        let coordinate = acquire_location(&provider, &request()).await.unwrap();
        assert_eq!(coordinate, Coordinate::new(10.9972, 76.8375));
    }

    #[tokio::test]
    async fn test_reported_failure_is_propagated() {
        let provider = ReportedLocation::failed(LocationError::Provider(
            "User denied Geolocation".to_string(),
        ));
        let err = acquire_location(&provider, &request()).await.unwrap_err();
        assert_eq!(err.to_string(), "User denied Geolocation");
    }

    #[tokio::test]
    async fn test_out_of_range_coordinate_is_rejected() {
        let provider = ReportedLocation::fix(Coordinate::new(123.0, 76.8));
        let err = acquire_location(&provider, &request()).await.unwrap_err();
        assert!(matches!(err, LocationError::InvalidCoordinate(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_provider_times_out() {
        let err = acquire_location(&StalledProvider, &request())
            .await
            .unwrap_err();
        assert_eq!(err, LocationError::Timeout(10_000));
    }
}
