//! JSON snapshots of a pipeline run.
//!
//! Files are grouped by the local date of the run, one file per source;
//! running the same source twice on one day overwrites its snapshot.

use crate::error::NewsError;
use crate::models::NewsResponse;
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Path of the snapshot for `source_id` on `date`.
pub fn snapshot_path(json_output_dir: &str, date: NaiveDate, source_id: &str) -> PathBuf {
    PathBuf::from(json_output_dir)
        .join(date.to_string())
        .join(format!("{source_id}.json"))
}

/// Write `response` to `{json_output_dir}/{date}/{source_id}.json`.
///
/// Creates the date directory when needed and returns the written path.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir, source = %response.source_id))]
pub async fn write_response(
    response: &NewsResponse,
    json_output_dir: &str,
) -> Result<PathBuf, NewsError> {
    let json = serde_json::to_string_pretty(response)?;
    let path = snapshot_path(json_output_dir, Local::now().date_naive(), &response.source_id);

    if let Some(dir) = path.parent() {
        info!(dir = %dir.display(), "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), items = response.news.len(), "Wrote JSON snapshot");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_snapshot_path() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 6).unwrap();
        let path = snapshot_path("/tmp/json", date, "jtbc");
        assert_eq!(path, PathBuf::from("/tmp/json/2025-05-06/jtbc.json"));
    }

    #[tokio::test]
    async fn test_write_response_round_trips() {
        let dir = std::env::temp_dir().join(format!("headline_relay_json_{}", std::process::id()));
        let response = NewsResponse {
            success: true,
            news: vec![],
            categories: BTreeMap::from([("general".to_string(), 0)]),
            fetched_at: "2025-05-06T05:30:00.000Z".to_string(),
            source: "iFeng Hong Kong".to_string(),
            source_id: "ifeng".to_string(),
            language: "zh".to_string(),
            translated: true,
            methods: vec![],
        };

        let path = write_response(&response, &dir.to_string_lossy()).await.unwrap();
        assert!(path.ends_with("ifeng.json"));
        let written: NewsResponse = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.source, "iFeng Hong Kong");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
