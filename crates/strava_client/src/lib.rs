//! Minimal `StravaClient` trait, stream data model and reqwest-based client
//! for exporting segment elevation profiles.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod config;
pub mod csv_writer;
pub mod http_client;
pub mod observability;
pub mod profile;

pub use profile::{ElevationProfile, fetch_elevation_profile};

#[derive(Debug, Error)]
pub enum StravaError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("authorization failed ({status}): {body}")]
    Auth { status: u16, body: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl StravaError {
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => StravaError::Auth { status, body },
            404 => StravaError::NotFound(body),
            _ => StravaError::Status { status, body },
        }
    }

    /// HTTP status code behind this error, if the API answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            StravaError::Auth { status, .. } | StravaError::Status { status, .. } => Some(*status),
            StravaError::NotFound(_) => Some(404),
            StravaError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Response body carried by an HTTP status error.
    pub fn body(&self) -> Option<&str> {
        match self {
            StravaError::Auth { body, .. } | StravaError::Status { body, .. } => Some(body),
            StravaError::NotFound(body) => Some(body),
            _ => None,
        }
    }
}

/// Stream tags understood by the segment streams endpoint.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StreamType {
    Time,
    Latlng,
    Distance,
    Altitude,
    VelocitySmooth,
    Heartrate,
    Cadence,
    Watts,
    Temp,
    Moving,
    GradeSmooth,
    #[default]
    #[serde(other)]
    Unknown,
}

impl StreamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamType::Time => "time",
            StreamType::Latlng => "latlng",
            StreamType::Distance => "distance",
            StreamType::Altitude => "altitude",
            StreamType::VelocitySmooth => "velocity_smooth",
            StreamType::Heartrate => "heartrate",
            StreamType::Cadence => "cadence",
            StreamType::Watts => "watts",
            StreamType::Temp => "temp",
            StreamType::Moving => "moving",
            StreamType::GradeSmooth => "grade_smooth",
            StreamType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sampling density requested for a stream.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Low,
    #[default]
    Medium,
    High,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Low => "low",
            Resolution::Medium => "medium",
            Resolution::High => "high",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Resolution::Low),
            "medium" => Ok(Resolution::Medium),
            "high" => Ok(Resolution::High),
            other => Err(format!(
                "unknown resolution '{other}' (expected low, medium or high)"
            )),
        }
    }
}

/// A single numeric sample, kept as the JSON number the API sent so it is
/// written back out without reformatting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sample(serde_json::Number);

impl Sample {
    pub fn from_f64(v: f64) -> Option<Self> {
        serde_json::Number::from_f64(v).map(Sample)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.0.as_f64()
    }
}

impl From<i64> for Sample {
    fn from(v: i64) -> Self {
        Sample(v.into())
    }
}

impl From<serde_json::Number> for Sample {
    fn from(n: serde_json::Number) -> Self {
        Sample(n)
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One tagged stream object as returned by `/segments/{id}/streams`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Stream {
    #[serde(rename = "type", default, deserialize_with = "deserialize_stream_type")]
    pub kind: StreamType,
    #[serde(default)]
    pub data: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub series_type: Option<String>,
    #[serde(default)]
    pub original_size: Option<u64>,
    /// Kept as sent; the API may report densities this crate does not request.
    #[serde(default)]
    pub resolution: Option<String>,
}

/// Missing, null or non-string tags become [`StreamType::Unknown`] so one odd
/// object does not reject the whole response.
fn deserialize_stream_type<'de, D>(deserializer: D) -> Result<StreamType, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        Some(v @ serde_json::Value::String(_)) => {
            Ok(serde_json::from_value(v).unwrap_or_default())
        }
        _ => Ok(StreamType::Unknown),
    }
}

impl Stream {
    /// Numeric samples of this stream, or `None` when the object has no `data`.
    pub fn samples(&self) -> Result<Option<Vec<Sample>>, StravaError> {
        let Some(data) = self.data.as_ref() else {
            return Ok(None);
        };
        data.iter()
            .enumerate()
            .map(|(i, v)| match v {
                serde_json::Value::Number(n) => Ok(Sample(n.clone())),
                other => Err(StravaError::InvalidPayload(format!(
                    "{} stream has non-numeric sample at index {i}: {other}",
                    self.kind
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

#[async_trait]
pub trait StravaClient: Send + Sync + 'static {
    /// Fetch the requested streams of a segment.
    async fn get_segment_streams(
        &self,
        segment_id: &str,
        keys: &[StreamType],
        resolution: Resolution,
    ) -> Result<Vec<Stream>, StravaError>;
}
