use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::cmp::Reverse;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::SupabaseConfig;
use crate::models::Job;

pub const JOB_COLUMNS: &[&str] = &[
    "id",
    "job_title",
    "Company",
    "job_location",
    "job_type",
    "job_category",
    "whitelist_matches",
    "blacklist_matches",
    "job_details_url",
    "job_description_summary",
    "job_posted_date",
    "Timestamp",
];

pub const FALLBACK_MESSAGE: &str = "Error fetching jobs";

/// The one failure mode of the board: the read did not produce rows.
/// `Display` is what the page shows to the user.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Message reported by the data store, shown verbatim
    #[error("{0}")]
    Provider(String),

    #[error("Error fetching jobs: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Error fetching jobs: unexpected response body ({0})")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to read snapshot {}: {source}", .path.display())]
    Snapshot {
        path: PathBuf,
        source: std::io::Error,
    },
}

// --- Store trait ---

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Jobs with a whitelist match, newest first.
    async fn fetch_jobs(&self) -> Result<Vec<Job>, FetchError>;

    fn describe(&self) -> String;
}

// --- Supabase (PostgREST) store ---

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default, alias = "msg")]
    message: Option<String>,
}

pub fn provider_message(body: &str) -> String {
    serde_json::from_str::<ProviderError>(body)
        .ok()
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
}

#[derive(Debug)]
pub struct SupabaseStore {
    base_url: String,
    anon_key: String,
    table: String,
    client: reqwest::Client,
}

impl SupabaseStore {
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            base_url: config.url.clone(),
            anon_key: config.anon_key.clone(),
            table: config.table.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    pub fn request(&self) -> reqwest::RequestBuilder {
        let select = JOB_COLUMNS.join(",");
        self.client
            .get(self.endpoint())
            .query(&[
                ("select", select.as_str()),
                ("whitelist_matches", "not.is.null"),
                ("whitelist_matches", "neq."),
                ("order", "Timestamp.desc"),
            ])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Accept", "application/json")
    }
}

#[async_trait]
impl JobStore for SupabaseStore {
    async fn fetch_jobs(&self) -> Result<Vec<Job>, FetchError> {
        let response = self.request().send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, "data store returned an error");
            return Err(FetchError::Provider(provider_message(&body)));
        }

        Ok(serde_json::from_str(&body)?)
    }

    fn describe(&self) -> String {
        self.endpoint()
    }
}

// --- Local snapshot store ---

// Postgres `ORDER BY ... DESC` puts NULLs first, then newest first.
// Timestamps that don't parse go last, newest-looking text first.
fn snapshot_order(job: &Job) -> (u8, Reverse<Option<DateTime<Utc>>>, Reverse<Option<String>>) {
    match (&job.timestamp, job.posted_at()) {
        (None, _) => (0, Reverse(None), Reverse(None)),
        (Some(_), Some(at)) => (1, Reverse(Some(at)), Reverse(None)),
        (Some(raw), None) => (2, Reverse(None), Reverse(Some(raw.clone()))),
    }
}

/// Reads a JSON export of the table and applies the same contract the
/// remote query does.
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl JobStore for SnapshotStore {
    async fn fetch_jobs(&self) -> Result<Vec<Job>, FetchError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FetchError::Snapshot {
                path: self.path.clone(),
                source,
            })?;

        let mut jobs: Vec<Job> = serde_json::from_str(&raw)?;
        jobs.retain(Job::has_whitelist_match);
        jobs.sort_by_cached_key(snapshot_order);
        Ok(jobs)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn store() -> SupabaseStore {
        SupabaseStore::new(&SupabaseConfig {
            url: "https://abc.supabase.co".to_string(),
            anon_key: "anon-key".to_string(),
            table: "jobs".to_string(),
        })
    }

    #[tokio::test]
    async fn test_request_targets_jobs_table() {
        let request = store().request().build().unwrap();
        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().host_str(), Some("abc.supabase.co"));
        assert_eq!(request.url().path(), "/rest/v1/jobs");
    }

    #[tokio::test]
    async fn test_request_filters_and_orders() {
        let request = store().request().build().unwrap();
        let pairs: Vec<(String, String)> = request.url().query_pairs().into_owned().collect();

        assert!(pairs.contains(&("select".to_string(), JOB_COLUMNS.join(","))));
        assert!(pairs.contains(&("whitelist_matches".to_string(), "not.is.null".to_string())));
        assert!(pairs.contains(&("whitelist_matches".to_string(), "neq.".to_string())));
        assert!(pairs.contains(&("order".to_string(), "Timestamp.desc".to_string())));
    }

    #[tokio::test]
    async fn test_request_sends_anon_key() {
        let request = store().request().build().unwrap();
        let headers = request.headers();
        assert_eq!(headers["apikey"], "anon-key");
        assert_eq!(headers["authorization"], "Bearer anon-key");
    }

    #[test]
    fn test_provider_message_verbatim() {
        let body = r#"{"code":"42P01","details":null,"hint":null,"message":"relation \"public.jobs\" does not exist"}"#;
        assert_eq!(provider_message(body), "relation \"public.jobs\" does not exist");
        assert_eq!(provider_message(r#"{"msg":"Invalid API key"}"#), "Invalid API key");
    }

    #[test]
    fn test_provider_message_fallback() {
        assert_eq!(provider_message(""), FALLBACK_MESSAGE);
        assert_eq!(provider_message("<html>502</html>"), FALLBACK_MESSAGE);
        assert_eq!(provider_message(r#"{"message":""}"#), FALLBACK_MESSAGE);
    }

    #[test]
    fn test_provider_error_displays_verbatim() {
        let err = FetchError::Provider("permission denied for table jobs".to_string());
        assert_eq!(err.to_string(), "permission denied for table jobs");
    }

    #[tokio::test]
    async fn test_snapshot_applies_whitelist_and_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": 1, "job_title": "Staff Attorney", "whitelist_matches": "attorney", "Timestamp": "2025-01-01T00:00:00Z"}},
                {{"id": 2, "job_title": "Barista", "whitelist_matches": ""}},
                {{"id": 3, "job_title": "Trial Lawyer", "whitelist_matches": "lawyer"}},
                {{"id": 4, "job_title": "Counsel", "whitelist_matches": "counsel", "Timestamp": "2025-06-01T00:00:00Z"}},
                {{"id": 5, "job_title": "Chef", "whitelist_matches": null}},
                {{"id": 6, "job_title": "Deputy Counsel", "whitelist_matches": "counsel", "Timestamp": "2025-06-01 03:00:00+02"}},
                {{"id": 7, "job_title": "Lawyer", "whitelist_matches": "lawyer", "Timestamp": "soon"}}
            ]"#
        )
        .unwrap();

        let jobs = SnapshotStore::new(file.path()).fetch_jobs().await.unwrap();
        let ids: Vec<i64> = jobs.iter().map(|j| j.id).collect();
        // no timestamp first, as Postgres DESC does; 6 is 01:00Z so it beats 4
        assert_eq!(ids, vec![3, 6, 4, 1, 7]);
    }

    #[tokio::test]
    async fn test_snapshot_missing_file() {
        let err = SnapshotStore::new("/nonexistent/gavel.json")
            .fetch_jobs()
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Snapshot { .. }));
        assert!(err.to_string().contains("/nonexistent/gavel.json"));
    }
}
