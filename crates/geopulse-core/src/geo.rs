//! Geo-mode resolution: `(lat, lon)` into `(mode, day state, bpm)`.
//!
//! Tempo is always derived from longitude, synchronously. Day/night comes from
//! an external oracle; any oracle failure, and any failure to obtain a position
//! in the first place, falls back to a local timezone heuristic that cannot
//! fail.

use crate::constants::{BPM_MAX, BPM_MIN, DAY_END_HOUR, DAY_START_HOUR, DEGREES_PER_HOUR};
use crate::state::{DayState, GeoCoords, Mode};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("oracle returned HTTP {0}")]
    Status(u16),
    #[error("oracle request failed: {0}")]
    Network(String),
    #[error("malformed oracle payload: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("location unavailable: {0}")]
    LocationUnavailable(String),
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// Where a resolution's day state came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionSource {
    Oracle,
    Heuristic(ResolveError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub coords: GeoCoords,
    pub day: DayState,
    pub bpm: u32,
    pub source: ResolutionSource,
}

impl Resolution {
    pub fn mode(&self) -> Mode {
        self.day.mode()
    }
}

/// External day/night service.
#[allow(async_fn_in_trait)]
pub trait DayNightOracle {
    async fn is_day(&self, coords: GeoCoords) -> Result<bool, OracleError>;
}

/// Longitude to an even tempo in \[BPM_MIN, BPM_MAX\].
pub fn tempo_for_longitude(lon: f64) -> u32 {
    let lon = if lon.is_finite() {
        lon.clamp(-180.0, 180.0)
    } else {
        0.0
    };
    let span = (BPM_MAX - BPM_MIN) as f64;
    let raw = BPM_MIN as f64 + ((lon + 180.0) / 360.0) * span;
    let quantized = (raw / 2.0).round() * 2.0;
    (quantized as u32).clamp(BPM_MIN, BPM_MAX)
}

/// Approximate solar-ish local hour from UTC and longitude.
pub fn local_hour(utc_hour: u32, lon: f64) -> u32 {
    let offset = if lon.is_finite() {
        (lon.clamp(-180.0, 180.0) / DEGREES_PER_HOUR).round() as i64
    } else {
        0
    };
    (utc_hour as i64 % 24 + offset + 24).rem_euclid(24) as u32
}

pub fn heuristic_day_state(utc_hour: u32, lon: f64) -> DayState {
    let hour = local_hour(utc_hour, lon);
    DayState::from_is_day((DAY_START_HOUR..DAY_END_HOUR).contains(&hour))
}

pub fn heuristic_resolution(coords: GeoCoords, utc_hour: u32, reason: ResolveError) -> Resolution {
    Resolution {
        coords,
        day: heuristic_day_state(utc_hour, coords.lon),
        bpm: tempo_for_longitude(coords.lon),
        source: ResolutionSource::Heuristic(reason),
    }
}

/// Ask the oracle; tempo is fixed before the call goes out.
pub async fn query_oracle<O: DayNightOracle>(
    oracle: &O,
    coords: GeoCoords,
) -> Result<Resolution, ResolveError> {
    let bpm = tempo_for_longitude(coords.lon);
    let is_day = oracle.is_day(coords).await?;
    Ok(Resolution {
        coords,
        day: DayState::from_is_day(is_day),
        bpm,
        source: ResolutionSource::Oracle,
    })
}

/// Full resolution cycle. Always terminates with a usable result.
pub async fn resolve<O: DayNightOracle>(
    position: Result<GeoCoords, ResolveError>,
    oracle: &O,
    utc_hour: u32,
) -> Resolution {
    let coords = match position {
        Ok(coords) => coords,
        Err(reason) => {
            log::warn!("[geo] {reason}; using default coordinates");
            return heuristic_resolution(GeoCoords::default(), utc_hour, reason);
        }
    };
    match query_oracle(oracle, coords).await {
        Ok(resolution) => resolution,
        Err(reason) => {
            log::warn!("[geo] {reason}; falling back to timezone heuristic");
            heuristic_resolution(coords, utc_hour, reason)
        }
    }
}

pub fn oracle_url(endpoint: &str, coords: GeoCoords) -> String {
    format!(
        "{}?latitude={:.4}&longitude={:.4}&current=is_day",
        endpoint, coords.lat, coords.lon
    )
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DayFlag {
    Bool(bool),
    Number(f64),
}

#[derive(Deserialize)]
struct CurrentBlock {
    is_day: Option<DayFlag>,
}

#[derive(Deserialize)]
struct OracleReply {
    current: Option<CurrentBlock>,
    is_day: Option<DayFlag>,
}

/// Extract the "is currently daytime" flag from an oracle response body.
pub fn parse_oracle_payload(body: &str) -> Result<bool, OracleError> {
    let reply: OracleReply =
        serde_json::from_str(body).map_err(|e| OracleError::Malformed(e.to_string()))?;
    let flag = reply
        .current
        .and_then(|c| c.is_day)
        .or(reply.is_day)
        .ok_or_else(|| OracleError::Malformed("missing is_day".to_string()))?;
    match flag {
        DayFlag::Bool(b) => Ok(b),
        DayFlag::Number(n) if n == 1.0 => Ok(true),
        DayFlag::Number(n) if n == 0.0 => Ok(false),
        DayFlag::Number(n) => Err(OracleError::Malformed(format!("is_day out of range: {n}"))),
    }
}
