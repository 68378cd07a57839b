use clap::ValueEnum;

use crate::keywords::KeywordGate;
use crate::locations;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PageVariant {
    #[default]
    States,
    Geo,
    Minimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

impl FilterOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn plain(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            value: label.clone(),
            label,
        }
    }
}

pub const ALL_LOCATIONS: &str = "All Locations";
pub const ALL_TYPES: &str = "All Types";
pub const ALL_CATEGORIES: &str = "All Categories";
pub const ALL_COUNTRIES: &str = "All Countries";
pub const ALL_REGIONS: &str = "All Regions";
pub const ALL_CITIES: &str = "All Cities";

const MINIMAL_LOCATIONS: &[&str] = &[
    "Remote",
    "New York",
    "California",
    "Texas",
    "Illinois",
    "Florida",
    "District of Columbia",
];

const MINIMAL_CATEGORIES: &[&str] = &["Attorney", "Lawyer", "Counsel", "Compliance", "Litigation"];

impl PageVariant {
    pub fn name(&self) -> &'static str {
        match self {
            PageVariant::States => "states",
            PageVariant::Geo => "geo",
            PageVariant::Minimal => "minimal",
        }
    }

    pub fn keyword_gate(&self) -> Option<KeywordGate> {
        match self {
            PageVariant::States | PageVariant::Minimal => Some(KeywordGate::legal()),
            PageVariant::Geo => None,
        }
    }

    pub fn uses_geo_selector(&self) -> bool {
        matches!(self, PageVariant::Geo)
    }

    pub fn location_options(&self) -> Vec<FilterOption> {
        match self {
            PageVariant::States => locations::us_states().map(FilterOption::plain).collect(),
            PageVariant::Minimal => MINIMAL_LOCATIONS.iter().copied().map(FilterOption::plain).collect(),
            PageVariant::Geo => Vec::new(),
        }
    }

    pub fn job_type_options(&self) -> Vec<FilterOption> {
        vec![
            FilterOption::new("Full Time", "full-time"),
            FilterOption::new("Part Time", "part-time"),
            FilterOption::new("Contract", "contract"),
            FilterOption::new("Part Time Contract", "part time contract"),
        ]
    }

    pub fn category_options(&self, fetched: &[String]) -> Vec<FilterOption> {
        match self {
            PageVariant::Minimal => MINIMAL_CATEGORIES.iter().copied().map(FilterOption::plain).collect(),
            PageVariant::States | PageVariant::Geo => {
                fetched.iter().cloned().map(FilterOption::plain).collect()
            }
        }
    }
}
