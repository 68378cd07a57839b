use std::collections::BTreeSet;

use crate::keywords::KeywordGate;
use crate::locations::GeoSelection;
use crate::models::Job;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LocationFilter {
    #[default]
    Any,
    /// Substring match against `job_location`
    Text(String),
    Geo(GeoSelection),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilters {
    pub search: String,
    pub location: LocationFilter,
    pub job_type: String,
    pub category: String,
}

pub fn normalize(s: &str) -> String {
    s.to_lowercase().replace('-', " ").trim().to_string()
}

fn contains_lower(field: Option<&str>, needle_lower: &str) -> bool {
    field.is_some_and(|f| f.to_lowercase().contains(needle_lower))
}

pub fn matches_search(job: &Job, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    [
        Some(job.job_title.as_str()),
        job.company.as_deref(),
        job.job_location.as_deref(),
        job.job_type.as_deref(),
        job.job_category.as_deref(),
        job.job_description_summary.as_deref(),
    ]
    .into_iter()
    .any(|field| contains_lower(field, &term))
}

pub fn matches_location(job: &Job, filter: &LocationFilter) -> bool {
    match filter {
        LocationFilter::Any => true,
        LocationFilter::Text(value) if value.is_empty() => true,
        LocationFilter::Text(value) => contains_lower(job.job_location.as_deref(), &value.to_lowercase()),
        LocationFilter::Geo(selection) => selection.matches(job.job_location.as_deref()),
    }
}

pub fn matches_job_type(job: &Job, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }
    let wanted = normalize(filter);
    job.job_type
        .as_deref()
        .is_some_and(|t| normalize(t).contains(&wanted))
}

pub fn matches_category(job: &Job, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }
    let wanted = filter.trim().to_lowercase();
    job.job_category
        .as_deref()
        .is_some_and(|c| c.trim().to_lowercase() == wanted)
}

impl JobFilters {
    pub fn matches(&self, job: &Job) -> bool {
        matches_search(job, &self.search)
            && matches_location(job, &self.location)
            && matches_job_type(job, &self.job_type)
            && matches_category(job, &self.category)
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.job_type.is_empty()
            && self.category.is_empty()
            && match &self.location {
                LocationFilter::Any => true,
                LocationFilter::Text(value) => value.is_empty(),
                LocationFilter::Geo(selection) => selection.is_empty(),
            }
    }
}

/// Runs the whole pipeline: field filters, then the keyword gate when one
/// is given. Order of `jobs` is preserved.
pub fn apply<'a>(jobs: &'a [Job], filters: &JobFilters, gate: Option<&KeywordGate>) -> Vec<&'a Job> {
    jobs.iter()
        .filter(|job| filters.matches(job))
        .filter(|job| gate.is_none_or(|g| g.passes(job)))
        .collect()
}

pub fn unique_categories(jobs: &[Job]) -> Vec<String> {
    jobs.iter()
        .filter_map(|job| job.job_category.as_deref())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
