use crate::dropdown::{Click, Dropdown};
use crate::filter::{self, JobFilters, LocationFilter};
use crate::locations::{self, GeoSelection};
use crate::models::Job;
use crate::store::FetchError;
use crate::variant::{
    FilterOption, PageVariant, ALL_CATEGORIES, ALL_CITIES, ALL_COUNTRIES, ALL_LOCATIONS, ALL_REGIONS,
    ALL_TYPES,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Location,
    Country,
    Region,
    City,
    JobType,
    Category,
}

pub struct Board {
    variant: PageVariant,
    jobs: Vec<Job>,
    error: Option<String>,
    loading: bool,
    search: String,
    controls: Vec<(Control, Dropdown)>,
}

fn plain_options(names: Vec<String>) -> Vec<FilterOption> {
    names.into_iter().map(FilterOption::plain).collect()
}

impl Board {
    pub fn new(variant: PageVariant) -> Self {
        let mut controls = Vec::new();
        if variant.uses_geo_selector() {
            controls.push((
                Control::Country,
                Dropdown::new(ALL_COUNTRIES, plain_options(locations::country_names())),
            ));
            controls.push((Control::Region, Dropdown::new(ALL_REGIONS, Vec::new())));
            controls.push((Control::City, Dropdown::new(ALL_CITIES, Vec::new())));
        } else {
            controls.push((
                Control::Location,
                Dropdown::new(ALL_LOCATIONS, variant.location_options()),
            ));
        }
        controls.push((Control::JobType, Dropdown::new(ALL_TYPES, variant.job_type_options())));
        controls.push((
            Control::Category,
            Dropdown::new(ALL_CATEGORIES, variant.category_options(&[])),
        ));

        Self {
            variant,
            jobs: Vec::new(),
            error: None,
            loading: true,
            search: String::new(),
            controls,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn on_fetch(&mut self, result: Result<Vec<Job>, FetchError>) {
        self.loading = false;
        match result {
            Ok(jobs) => {
                let options = self.variant.category_options(&filter::unique_categories(&jobs));
                self.jobs = jobs;
                self.error = None;
                if let Some(dropdown) = self.dropdown_mut(Control::Category) {
                    dropdown.set_options(options);
                }
            }
            Err(err) => {
                self.error = Some(err.to_string());
            }
        }
    }

    // --- Search ---

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn push_search(&mut self, c: char) {
        self.search.push(c);
    }

    pub fn pop_search(&mut self) {
        self.search.pop();
    }

    // --- Controls ---

    pub fn controls(&self) -> &[(Control, Dropdown)] {
        &self.controls
    }

    pub fn control_at_mut(&mut self, index: usize) -> Option<&mut Dropdown> {
        self.controls.get_mut(index).map(|(_, d)| d)
    }

    pub fn dropdown(&self, control: Control) -> Option<&Dropdown> {
        self.controls.iter().find(|(c, _)| *c == control).map(|(_, d)| d)
    }

    pub fn dropdown_mut(&mut self, control: Control) -> Option<&mut Dropdown> {
        self.controls
            .iter_mut()
            .find(|(c, _)| *c == control)
            .map(|(_, d)| d)
    }

    pub fn open_control(&self) -> Option<usize> {
        self.controls.iter().position(|(_, d)| d.is_open())
    }

    pub fn close_dropdowns(&mut self) {
        for (_, dropdown) in &mut self.controls {
            dropdown.close();
        }
    }

    pub fn toggle_control(&mut self, index: usize) {
        for (i, (_, dropdown)) in self.controls.iter_mut().enumerate() {
            if i == index {
                dropdown.toggle();
            } else {
                dropdown.close();
            }
        }
    }

    pub fn select_highlighted(&mut self, index: usize) {
        let Some((control, dropdown)) = self.controls.get_mut(index) else {
            return;
        };
        let control = *control;
        if dropdown.select_highlighted() {
            self.cascade(control);
        }
    }

    pub fn select_value(&mut self, control: Control, value: &str) -> bool {
        let changed = self
            .dropdown_mut(control)
            .is_some_and(|d| d.select_value(value));
        if changed {
            self.cascade(control);
        }
        changed
    }

    // An open dropdown under the press takes it alone; otherwise every
    // control sees it, which dismisses the open one.
    pub fn click(&mut self, column: u16, row: u16) {
        let owner = self
            .controls
            .iter()
            .position(|(_, d)| d.is_open() && d.contains(column, row));

        let mut changed = Vec::new();
        for (i, (control, dropdown)) in self.controls.iter_mut().enumerate() {
            if owner.is_some_and(|o| o != i) {
                continue;
            }
            if dropdown.click(column, row) == (Click::Selected { changed: true }) {
                changed.push(*control);
            }
        }
        // Only one dropdown may be open after a press
        if let Some(opened) = self.open_control() {
            for (i, (_, dropdown)) in self.controls.iter_mut().enumerate() {
                if i != opened {
                    dropdown.close();
                }
            }
        }
        for control in changed {
            self.cascade(control);
        }
    }

    // New country resets region and city, new region resets city
    fn cascade(&mut self, control: Control) {
        let country = self.dropdown(Control::Country).map(|d| d.value().to_string());
        let region = self.dropdown(Control::Region).map(|d| d.value().to_string());
        let non_empty = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(String::from);

        match control {
            Control::Country => {
                let regions = plain_options(locations::region_names(non_empty(&country).as_deref()));
                if let Some(d) = self.dropdown_mut(Control::Region) {
                    d.clear();
                    d.set_options(regions);
                }
                if let Some(d) = self.dropdown_mut(Control::City) {
                    d.clear();
                    d.set_options(Vec::new());
                }
            }
            Control::Region => {
                let cities = plain_options(locations::city_names(
                    non_empty(&country).as_deref(),
                    non_empty(&region).as_deref(),
                ));
                if let Some(d) = self.dropdown_mut(Control::City) {
                    d.clear();
                    d.set_options(cities);
                }
            }
            _ => {}
        }
    }

    // --- Pipeline ---

    fn geo_selection(&self) -> GeoSelection {
        let value = |control| {
            self.dropdown(control)
                .map(|d| d.value())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };
        GeoSelection {
            country: value(Control::Country),
            region: value(Control::Region),
            city: value(Control::City),
        }
    }

    pub fn filters(&self) -> JobFilters {
        let location = if self.variant.uses_geo_selector() {
            LocationFilter::Geo(self.geo_selection())
        } else {
            LocationFilter::Text(
                self.dropdown(Control::Location)
                    .map(|d| d.value().to_string())
                    .unwrap_or_default(),
            )
        };

        JobFilters {
            search: self.search.clone(),
            location,
            job_type: self
                .dropdown(Control::JobType)
                .map(|d| d.value().to_string())
                .unwrap_or_default(),
            category: self
                .dropdown(Control::Category)
                .map(|d| d.value().to_string())
                .unwrap_or_default(),
        }
    }

    pub fn visible(&self) -> Vec<&Job> {
        let gate = self.variant.keyword_gate();
        filter::apply(&self.jobs, &self.filters(), gate.as_ref())
    }
}
