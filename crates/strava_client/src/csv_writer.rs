//! Elevation profile CSV output.

use crate::{Sample, StravaError, observability};
use std::io::Write;
use std::path::Path;

pub const HEADER: [&str; 2] = ["distance_m", "altitude_m"];

/// Write the header and one `distance,altitude` row per index to `writer`.
///
/// Rows stop at the shorter of the two sequences. Returns the number of
/// data rows written.
pub fn write_elevation_rows<W: Write>(
    writer: W,
    distance: &[Sample],
    altitude: &[Sample],
) -> Result<usize, StravaError> {
    if distance.len() != altitude.len() {
        tracing::warn!(
            "The distance and altitude data have different lengths ({} vs {}).",
            distance.len(),
            altitude.len()
        );
    }

    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    wtr.write_record(HEADER)?;

    let mut rows = 0usize;
    for (d, a) in distance.iter().zip(altitude) {
        wtr.write_record([d.to_string(), a.to_string()])?;
        rows += 1;
    }
    wtr.flush()?;
    Ok(rows)
}

/// Write an elevation profile CSV to `path`, labelled with `label` in the
/// completion log (usually the segment id).
pub fn write_elevation_csv(
    distance: &[Sample],
    altitude: &[Sample],
    label: &str,
    path: &Path,
) -> Result<usize, StravaError> {
    let file = std::fs::File::create(path)?;
    let rows = write_elevation_rows(std::io::BufWriter::new(file), distance, altitude)?;
    observability::record_rows_written(rows);
    tracing::debug!(
        "elevation profile for segment {} saved to {} ({} rows)",
        label,
        path.display(),
        rows
    );
    Ok(rows)
}
