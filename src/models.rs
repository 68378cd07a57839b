use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub job_title: String,
    #[serde(rename = "Company", default)]
    pub company: Option<String>,
    #[serde(default)]
    pub job_location: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub job_category: Option<String>,
    #[serde(default)]
    pub whitelist_matches: Option<String>, // set upstream, never displayed
    #[serde(default)]
    pub blacklist_matches: Option<String>,
    #[serde(default)]
    pub job_details_url: Option<String>,
    #[serde(default)]
    pub job_description_summary: Option<String>,
    #[serde(default)]
    pub job_posted_date: Option<String>,
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Option<String>,
}

impl Job {
    /// Mirrors the server-side `whitelist_matches IS NOT NULL AND whitelist_matches != ''`.
    pub fn has_whitelist_match(&self) -> bool {
        self.whitelist_matches.as_deref().is_some_and(|m| !m.is_empty())
    }

    pub fn description(&self) -> &str {
        self.job_description_summary.as_deref().unwrap_or("")
    }

    /// `Timestamp` as an instant. Values without an offset are taken as UTC.
    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.timestamp.as_deref()?)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
pub(crate) fn job(id: i64, title: &str) -> Job {
    Job {
        id,
        job_title: title.to_string(),
        company: None,
        job_location: None,
        job_type: None,
        job_category: None,
        whitelist_matches: Some("legal".to_string()),
        blacklist_matches: None,
        job_details_url: None,
        job_description_summary: None,
        job_posted_date: None,
        timestamp: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_remote_column_names() {
        let raw = r#"{
            "id": 7,
            "job_title": "Associate Attorney",
            "Company": "Smith & Lee",
            "job_location": "Denver, CO",
            "job_type": null,
            "whitelist_matches": "attorney",
            "Timestamp": "2025-05-01T12:00:00+00:00"
        }"#;
        let job: Job = serde_json::from_str(raw).unwrap();
        assert_eq!(job.id, 7);
        assert_eq!(job.company.as_deref(), Some("Smith & Lee"));
        assert_eq!(job.job_type, None);
        assert_eq!(job.job_category, None);
        assert_eq!(job.timestamp.as_deref(), Some("2025-05-01T12:00:00+00:00"));
    }

    #[test]
    fn test_serialize_keeps_remote_column_names() {
        let mut j = job(1, "Counsel");
        j.company = Some("Acme".to_string());
        let value = serde_json::to_value(&j).unwrap();
        assert_eq!(value["Company"], "Acme");
        assert!(value.get("company").is_none());
        assert!(value.get("Timestamp").is_some());
    }

    #[test]
    fn test_has_whitelist_match() {
        let mut j = job(1, "Counsel");
        assert!(j.has_whitelist_match());
        j.whitelist_matches = Some(String::new());
        assert!(!j.has_whitelist_match());
        j.whitelist_matches = None;
        assert!(!j.has_whitelist_match());
    }

    #[test]
    fn test_posted_at_compares_instants() {
        let mut early = job(1, "Counsel");
        early.timestamp = Some("2025-05-01T10:00:00+02:00".to_string());
        let mut late = job(2, "Counsel");
        late.timestamp = Some("2025-05-01 09:30:00+00".to_string());
        // lexically "10:00" sorts after "09:30", but 10:00+02 is 08:00 UTC
        assert!(early.posted_at() < late.posted_at());

        late.timestamp = Some("2025-05-01".to_string());
        assert_eq!(
            late.posted_at().map(|d| d.to_rfc3339()).as_deref(),
            Some("2025-05-01T00:00:00+00:00")
        );

        late.timestamp = Some("yesterday".to_string());
        assert_eq!(late.posted_at(), None);
        late.timestamp = None;
        assert_eq!(late.posted_at(), None);
    }
}
