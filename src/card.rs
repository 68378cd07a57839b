use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use crate::models::Job;

pub const NOT_PROVIDED: &str = "Not provided";
pub const NO_DESCRIPTION: &str = "No description available";
pub const NO_RESULTS: &str = "No job postings found.";

/// Display-ready view of a job posting. The whitelist/blacklist columns
/// are deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCard<'a> {
    pub title: &'a str,
    pub company: &'a str,
    pub location: &'a str,
    pub job_type: &'a str,
    pub category: &'a str,
    pub description: &'a str,
    pub url: Option<&'a str>,
    pub posted_on: String,
}

impl<'a> JobCard<'a> {
    pub fn new(job: &'a Job) -> Self {
        Self {
            title: &job.job_title,
            company: job.company.as_deref().unwrap_or(NOT_PROVIDED),
            location: job.job_location.as_deref().unwrap_or(NOT_PROVIDED),
            job_type: job.job_type.as_deref().unwrap_or(NOT_PROVIDED),
            category: job.job_category.as_deref().unwrap_or(NOT_PROVIDED),
            description: job.job_description_summary.as_deref().unwrap_or(NO_DESCRIPTION),
            url: job.job_details_url.as_deref(),
            posted_on: posted_on(job.timestamp.as_deref()),
        }
    }

    pub fn fields(&self) -> [(&'static str, &'a str); 4] {
        [
            ("Company", self.company),
            ("Location", self.location),
            ("Type", self.job_type),
            ("Category", self.category),
        ]
    }

    pub fn to_text(&self, width: usize) -> String {
        let mut out = String::new();
        out.push_str(self.title);
        out.push('\n');
        for (label, value) in self.fields() {
            out.push_str(&format!("{}: {}\n", label, value));
        }
        out.push('\n');
        for line in textwrap::wrap(self.description, width.max(20)) {
            out.push_str(&line);
            out.push('\n');
        }
        if let Some(url) = self.url {
            out.push_str(&format!("\nView Posting: {}\n", url));
        }
        out.push_str(&format!("Posted on: {}\n", self.posted_on));
        out
    }
}

/// Short month/day/year date for a `Timestamp` value, e.g. `5/1/2025`.
/// Unparseable values are shown as-is; absent ones as `Unknown`.
pub fn posted_on(timestamp: Option<&str>) -> String {
    let Some(raw) = timestamp.map(str::trim).filter(|t| !t.is_empty()) else {
        return "Unknown".to_string();
    };

    parse_posted_date(raw)
        .map(|d| d.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_posted_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    // Postgres `timestamptz` text form: "2025-05-01 12:00:00+00"
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
