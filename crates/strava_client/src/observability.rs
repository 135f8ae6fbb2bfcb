use crate::StravaError;

pub const STREAM_REQUESTS_TOTAL: &str = "strava_stream_requests_total";
pub const CSV_ROWS_WRITTEN_TOTAL: &str = "strava_csv_rows_written_total";

pub(crate) fn record_stream_request(outcome: &'static str) {
    metrics::counter!(STREAM_REQUESTS_TOTAL, "outcome" => outcome).increment(1);
}

pub(crate) fn record_rows_written(rows: usize) {
    metrics::counter!(CSV_ROWS_WRITTEN_TOTAL).increment(rows as u64);
}

/// Low-cardinality label for a failed stream request.
pub fn outcome_label(err: &StravaError) -> &'static str {
    match err {
        StravaError::Auth { .. } => "unauthorized",
        StravaError::NotFound(_) => "not_found",
        StravaError::Status { .. } => "http_status",
        StravaError::InvalidPayload(_) => "invalid_payload",
        _ => "transport",
    }
}
