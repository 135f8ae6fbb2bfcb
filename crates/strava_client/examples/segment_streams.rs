use strava_client::{
    Resolution, StravaClient, config::Config, http_client::ReqwestStravaClient,
    profile::PROFILE_KEYS,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example: expects STRAVA_ACCESS_TOKEN in env
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(());
        }
    };

    let Some(segment_id) = std::env::args().nth(1) else {
        eprintln!(
            "usage: cargo run -p strava_client --example segment_streams -- <segment_id>"
        );
        return Ok(());
    };

    let client = ReqwestStravaClient::new(&cfg.base_url, cfg.access_token);
    let streams = client
        .get_segment_streams(&segment_id, &PROFILE_KEYS, Resolution::Low)
        .await
        .map_err(|e| format!("failed to fetch streams: {}", e))?;

    println!("Segment {segment_id} streams:");
    for s in streams {
        let len = s.data.as_ref().map(Vec::len).unwrap_or(0);
        println!(
            "- {} ({} samples, series {})",
            s.kind,
            len,
            s.series_type.as_deref().unwrap_or("?")
        );
    }
    Ok(())
}
