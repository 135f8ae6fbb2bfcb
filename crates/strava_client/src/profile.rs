//! Extraction of the distance/altitude pair from a segment's stream list.

use crate::{Resolution, Sample, Stream, StravaClient, StravaError, StreamType};

/// Stream keys requested for an elevation profile.
pub const PROFILE_KEYS: [StreamType; 2] = [StreamType::Altitude, StreamType::Distance];

/// Index-aligned distance and altitude samples of one segment. Either side
/// is `None` when the API response did not carry it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElevationProfile {
    pub distance: Option<Vec<Sample>>,
    pub altitude: Option<Vec<Sample>>,
}

impl ElevationProfile {
    /// Pick the `distance` and `altitude` streams out of a response,
    /// warning once for each one that is missing.
    pub fn from_streams(streams: Vec<Stream>) -> Result<Self, StravaError> {
        let mut profile = ElevationProfile::default();
        for stream in &streams {
            match stream.kind {
                StreamType::Altitude => profile.altitude = stream.samples()?,
                StreamType::Distance => profile.distance = stream.samples()?,
                other => tracing::trace!("ignoring {} stream", other),
            }
        }

        if profile.altitude.is_none() {
            tracing::warn!("Altitude data not found in the response.");
        }
        if profile.distance.is_none() {
            tracing::warn!("Distance data not found in the response.");
        }
        Ok(profile)
    }

    /// Both streams present and non-empty.
    pub fn is_complete(&self) -> bool {
        let has_samples = |s: &Option<Vec<Sample>>| s.as_ref().is_some_and(|v| !v.is_empty());
        has_samples(&self.distance) && has_samples(&self.altitude)
    }

    /// Names of the streams this profile is missing.
    pub fn missing(&self) -> Vec<StreamType> {
        let mut missing = Vec::new();
        if self.distance.is_none() {
            missing.push(StreamType::Distance);
        }
        if self.altitude.is_none() {
            missing.push(StreamType::Altitude);
        }
        missing
    }

    /// `(distance, altitude)` when both streams are present and non-empty.
    /// An empty stream has nothing to pair, so it counts as no data.
    pub fn into_complete(self) -> Option<(Vec<Sample>, Vec<Sample>)> {
        match (self.distance, self.altitude) {
            (Some(d), Some(a)) if !d.is_empty() && !a.is_empty() => Some((d, a)),
            _ => None,
        }
    }
}

/// Fetch the altitude and distance streams of `segment_id`.
///
/// A non-success status is logged with its body and returned as an error;
/// missing streams are not an error here, see [`ElevationProfile::missing`].
pub async fn fetch_elevation_profile<C>(
    client: &C,
    segment_id: &str,
    resolution: Resolution,
) -> Result<ElevationProfile, StravaError>
where
    C: StravaClient + ?Sized,
{
    let streams = client
        .get_segment_streams(segment_id, &PROFILE_KEYS, resolution)
        .await
        .inspect_err(|e| match (e.status(), e.body()) {
            (Some(status), Some(body)) => {
                tracing::error!("error fetching segment {}: {}\n{}", segment_id, status, body)
            }
            _ => tracing::error!("error fetching segment {}: {}", segment_id, e),
        })?;
    ElevationProfile::from_streams(streams)
}
