//! One-shot device position reads.

use async_trait::async_trait;
use shared::error::EcoError;
use shared::waste::GeoPoint;
use std::env;

/// Best-effort source of the device's coordinates.
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Fails with `GeolocationDenied` or `GeolocationUnsupported`.
    async fn current_position(&self) -> Result<GeoPoint, EcoError>;
}

/// Position as the host environment reports it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceLocation {
    Granted(GeoPoint),
    Denied,
    Unsupported,
}

impl DeviceLocation {
    /// Reads `ECOLOOP_LAT` / `ECOLOOP_LNG`. Missing or unparsable values mean
    /// the host has no positioning support.
    pub fn from_env() -> Self {
        let read = |key: &str| env::var(key).ok().and_then(|v| v.trim().parse::<f64>().ok());
        match (read("ECOLOOP_LAT"), read("ECOLOOP_LNG")) {
            (Some(lat), Some(lng)) => DeviceLocation::Granted(GeoPoint::new(lat, lng)),
            _ => DeviceLocation::Unsupported,
        }
    }
}

#[async_trait]
impl LocationSource for DeviceLocation {
    async fn current_position(&self) -> Result<GeoPoint, EcoError> {
        match self {
            DeviceLocation::Granted(point) => Ok(*point),
            DeviceLocation::Denied => Err(EcoError::GeolocationDenied),
            DeviceLocation::Unsupported => Err(EcoError::GeolocationUnsupported),
        }
    }
}
