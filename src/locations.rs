#[derive(Debug)]
pub struct Region {
    pub name: &'static str,
    pub code: &'static str,
    pub cities: &'static [&'static str],
}

#[derive(Debug)]
pub struct Country {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub regions: &'static [Region],
}

const fn region(name: &'static str, code: &'static str, cities: &'static [&'static str]) -> Region {
    Region { name, code, cities }
}

static US_REGIONS: &[Region] = &[
    region("Alabama", "AL", &["Birmingham", "Montgomery", "Huntsville"]),
    region("Alaska", "AK", &["Anchorage", "Juneau", "Fairbanks"]),
    region("Arizona", "AZ", &["Phoenix", "Tucson", "Scottsdale"]),
    region("Arkansas", "AR", &["Little Rock", "Fayetteville"]),
    region("California", "CA", &["Los Angeles", "San Francisco", "San Diego", "Sacramento", "San Jose"]),
    region("Colorado", "CO", &["Denver", "Boulder", "Colorado Springs"]),
    region("Connecticut", "CT", &["Hartford", "Stamford", "New Haven"]),
    region("Delaware", "DE", &["Wilmington", "Dover"]),
    region("District of Columbia", "DC", &["Washington"]),
    region("Florida", "FL", &["Miami", "Tampa", "Orlando", "Jacksonville", "Tallahassee"]),
    region("Georgia", "GA", &["Atlanta", "Savannah"]),
    region("Hawaii", "HI", &["Honolulu"]),
    region("Idaho", "ID", &["Boise"]),
    region("Illinois", "IL", &["Chicago", "Springfield", "Naperville"]),
    region("Indiana", "IN", &["Indianapolis", "Fort Wayne"]),
    region("Iowa", "IA", &["Des Moines", "Cedar Rapids"]),
    region("Kansas", "KS", &["Wichita", "Topeka", "Overland Park"]),
    region("Kentucky", "KY", &["Louisville", "Lexington", "Frankfort"]),
    region("Louisiana", "LA", &["New Orleans", "Baton Rouge"]),
    region("Maine", "ME", &["Portland", "Augusta"]),
    region("Maryland", "MD", &["Baltimore", "Annapolis", "Bethesda"]),
    region("Massachusetts", "MA", &["Boston", "Cambridge", "Worcester"]),
    region("Michigan", "MI", &["Detroit", "Ann Arbor", "Grand Rapids", "Lansing"]),
    region("Minnesota", "MN", &["Minneapolis", "Saint Paul"]),
    region("Mississippi", "MS", &["Jackson", "Gulfport"]),
    region("Missouri", "MO", &["Kansas City", "St. Louis", "Jefferson City"]),
    region("Montana", "MT", &["Billings", "Helena"]),
    region("Nebraska", "NE", &["Omaha", "Lincoln"]),
    region("Nevada", "NV", &["Las Vegas", "Reno", "Carson City"]),
    region("New Hampshire", "NH", &["Manchester", "Concord"]),
    region("New Jersey", "NJ", &["Newark", "Jersey City", "Trenton"]),
    region("New Mexico", "NM", &["Albuquerque", "Santa Fe"]),
    region("New York", "NY", &["New York City", "Brooklyn", "Albany", "Buffalo"]),
    region("North Carolina", "NC", &["Charlotte", "Raleigh", "Durham"]),
    region("North Dakota", "ND", &["Fargo", "Bismarck"]),
    region("Ohio", "OH", &["Columbus", "Cleveland", "Cincinnati"]),
    region("Oklahoma", "OK", &["Oklahoma City", "Tulsa"]),
    region("Oregon", "OR", &["Portland", "Salem", "Eugene"]),
    region("Pennsylvania", "PA", &["Philadelphia", "Pittsburgh", "Harrisburg"]),
    region("Rhode Island", "RI", &["Providence"]),
    region("South Carolina", "SC", &["Charleston", "Columbia", "Greenville"]),
    region("South Dakota", "SD", &["Sioux Falls", "Pierre"]),
    region("Tennessee", "TN", &["Nashville", "Memphis", "Knoxville"]),
    region("Texas", "TX", &["Houston", "Dallas", "Austin", "San Antonio", "Fort Worth"]),
    region("Utah", "UT", &["Salt Lake City", "Provo"]),
    region("Vermont", "VT", &["Burlington", "Montpelier"]),
    region("Virginia", "VA", &["Richmond", "Arlington", "Virginia Beach", "McLean"]),
    region("Washington", "WA", &["Seattle", "Spokane", "Tacoma", "Olympia"]),
    region("West Virginia", "WV", &["Charleston", "Morgantown"]),
    region("Wisconsin", "WI", &["Milwaukee", "Madison"]),
    region("Wyoming", "WY", &["Cheyenne", "Casper"]),
];

static CANADA_REGIONS: &[Region] = &[
    region("Alberta", "AB", &["Calgary", "Edmonton"]),
    region("British Columbia", "BC", &["Vancouver", "Victoria"]),
    region("Manitoba", "MB", &["Winnipeg"]),
    region("New Brunswick", "NB", &["Fredericton", "Moncton"]),
    region("Newfoundland and Labrador", "NL", &["St. John's"]),
    region("Nova Scotia", "NS", &["Halifax"]),
    region("Ontario", "ON", &["Toronto", "Ottawa", "Mississauga", "Hamilton"]),
    region("Prince Edward Island", "PE", &["Charlottetown"]),
    region("Quebec", "QC", &["Montreal", "Quebec City"]),
    region("Saskatchewan", "SK", &["Regina", "Saskatoon"]),
];

static UK_REGIONS: &[Region] = &[
    region("England", "ENG", &["London", "Manchester", "Birmingham", "Leeds", "Bristol"]),
    region("Scotland", "SCT", &["Edinburgh", "Glasgow", "Aberdeen"]),
    region("Wales", "WLS", &["Cardiff", "Swansea"]),
    region("Northern Ireland", "NIR", &["Belfast"]),
];

static AUSTRALIA_REGIONS: &[Region] = &[
    region("Australian Capital Territory", "ACT", &["Canberra"]),
    region("New South Wales", "NSW", &["Sydney", "Newcastle"]),
    region("Queensland", "QLD", &["Brisbane", "Gold Coast"]),
    region("South Australia", "SA", &["Adelaide"]),
    region("Tasmania", "TAS", &["Hobart"]),
    region("Victoria", "VIC", &["Melbourne", "Geelong"]),
    region("Western Australia", "WA", &["Perth"]),
];

pub static COUNTRIES: &[Country] = &[
    Country {
        name: "United States",
        aliases: &["USA", "US"],
        regions: US_REGIONS,
    },
    Country {
        name: "Canada",
        aliases: &[],
        regions: CANADA_REGIONS,
    },
    Country {
        name: "United Kingdom",
        aliases: &["UK", "GB"],
        regions: UK_REGIONS,
    },
    Country {
        name: "Australia",
        aliases: &["AUS"],
        regions: AUSTRALIA_REGIONS,
    },
];

pub fn us_states() -> impl Iterator<Item = &'static str> {
    US_REGIONS.iter().map(|r| r.name)
}

pub fn find_country(name: &str) -> Option<&'static Country> {
    let wanted = normalize_name(name);
    COUNTRIES.iter().find(|c| normalize_name(c.name) == wanted)
}

pub fn find_region(country: &'static Country, name: &str) -> Option<&'static Region> {
    let wanted = normalize_name(name);
    country
        .regions
        .iter()
        .find(|r| normalize_name(r.name) == wanted)
}

pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

// Case-sensitive, so that `IN` does not fire on "in"
fn has_token(location: &str, token: &str) -> bool {
    !token.is_empty()
        && location
            .split(|c: char| !c.is_alphanumeric())
            .any(|part| part == token)
}

fn has_word(haystack: &str, word: &str) -> bool {
    !word.is_empty()
        && haystack.match_indices(word).any(|(i, _)| {
            let before = haystack[..i].chars().next_back();
            let after = haystack[i + word.len()..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        })
}

fn names_region(location: &str, lower: &str, region: &Region) -> bool {
    has_word(lower, &normalize_name(region.name)) || has_token(location, region.code)
}

fn names_country(location: &str, lower: &str, country: &Country) -> bool {
    has_word(lower, &normalize_name(country.name)) || country.aliases.iter().any(|a| has_token(location, a))
}

fn names_other_country(location: &str, lower: &str, country: &Country) -> bool {
    !names_country(location, lower, country)
        && COUNTRIES
            .iter()
            .filter(|c| c.name != country.name)
            .any(|c| names_country(location, lower, c))
}

// A city alone is enough unless the posting names a different region of
// the same country ("Portland, ME" is not Oregon).
fn region_matches(location: &str, lower: &str, country: &Country, region: &Region) -> bool {
    // "West Virginia" must not count as naming Virginia
    let name = normalize_name(region.name);
    let mut scrubbed = lower.to_string();
    for other in country.regions.iter().map(|r| normalize_name(r.name)) {
        if other != name && has_word(&other, &name) {
            scrubbed = scrubbed.replace(&other, " ");
        }
    }
    if names_region(location, &scrubbed, region) {
        return true;
    }
    region.cities.iter().any(|c| has_word(lower, &normalize_name(c)))
        && !country
            .regions
            .iter()
            .filter(|r| r.name != region.name)
            .any(|r| names_region(location, lower, r))
}

fn country_matches(location: &str, lower: &str, country: &Country) -> bool {
    names_country(location, lower, country)
        || country.regions.iter().any(|r| names_region(location, lower, r))
}

/// Cascading country → region → city selection. The most specific level
/// that is set decides the match, and a posting that names some other
/// country never matches a selected country.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoSelection {
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
}

impl GeoSelection {
    pub fn is_empty(&self) -> bool {
        self.country.is_none() && self.region.is_none() && self.city.is_none()
    }

    pub fn matches(&self, location: Option<&str>) -> bool {
        if self.is_empty() {
            return true;
        }
        let Some(location) = location else {
            return false;
        };
        let lower = location.to_lowercase();

        let country = self.country.as_deref().and_then(find_country);
        if country.is_some_and(|c| names_other_country(location, &lower, c)) {
            return false;
        }

        if let Some(city) = &self.city {
            return has_word(&lower, &normalize_name(city));
        }

        if let Some(region_name) = &self.region {
            return match country.and_then(|c| find_region(c, region_name).map(|r| (c, r))) {
                Some((country, region)) => region_matches(location, &lower, country, region),
                None => has_word(&lower, &normalize_name(region_name)),
            };
        }

        match (country, &self.country) {
            (Some(country), _) => country_matches(location, &lower, country),
            (None, Some(name)) => has_word(&lower, &normalize_name(name)),
            (None, None) => true,
        }
    }
}

pub fn country_names() -> Vec<String> {
    COUNTRIES.iter().map(|c| c.name.to_string()).collect()
}

pub fn region_names(country: Option<&str>) -> Vec<String> {
    country
        .and_then(find_country)
        .map(|c| c.regions.iter().map(|r| r.name.to_string()).collect())
        .unwrap_or_default()
}

pub fn city_names(country: Option<&str>, region: Option<&str>) -> Vec<String> {
    let Some(country) = country.and_then(find_country) else {
        return Vec::new();
    };
    region
        .and_then(|r| find_region(country, r))
        .map(|r| r.cities.iter().map(|c| c.to_string()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo(country: Option<&str>, region: Option<&str>, city: Option<&str>) -> GeoSelection {
        GeoSelection {
            country: country.map(String::from),
            region: region.map(String::from),
            city: city.map(String::from),
        }
    }

    #[test]
    fn test_us_states_list() {
        let states: Vec<_> = us_states().collect();
        assert_eq!(states.len(), 51);
        assert_eq!(states[0], "Alabama");
        assert!(states.contains(&"District of Columbia"));
        assert_eq!(states[50], "Wyoming");
    }

    #[test]
    fn test_empty_selection_matches_everything() {
        let sel = GeoSelection::default();
        assert!(sel.matches(None));
        assert!(sel.matches(Some("Anywhere")));
    }

    #[test]
    fn test_city_match() {
        let sel = geo(Some("United States"), Some("Texas"), Some("Austin"));
        assert!(sel.matches(Some("Austin, TX")));
        assert!(!sel.matches(Some("Houston, TX")));
        assert!(!sel.matches(None));
    }

    #[test]
    fn test_region_by_name_code_or_city() {
        let sel = geo(Some("United States"), Some("Texas"), None);
        assert!(sel.matches(Some("Remote - Texas")));
        assert!(sel.matches(Some("Dallas")));
        assert!(sel.matches(Some("Plano, TX 75024")));
        assert!(!sel.matches(Some("Chicago, IL")));
    }

    #[test]
    fn test_region_code_is_case_sensitive_token() {
        let sel = geo(Some("United States"), Some("Indiana"), None);
        assert!(sel.matches(Some("Carmel, IN")));
        assert!(!sel.matches(Some("Remote in Ohio")));
    }

    #[test]
    fn test_country_matches_alias_and_regions() {
        let sel = geo(Some("United States"), None, None);
        assert!(sel.matches(Some("Remote, USA")));
        assert!(sel.matches(Some("Boston, MA")));
        assert!(sel.matches(Some("Washington, DC")));
        assert!(!sel.matches(Some("Toronto, ON")));

        let sel = geo(Some("Canada"), None, None);
        assert!(sel.matches(Some("Toronto, ON")));
        assert!(sel.matches(Some("Vancouver, British Columbia")));
    }

    #[test]
    fn test_country_does_not_leak_across_borders() {
        let us = geo(Some("United States"), None, None);
        assert!(!us.matches(Some("Vancouver, British Columbia")));
        assert!(!us.matches(Some("Manchester, United Kingdom")));
        assert!(!us.matches(Some("Perth, WA, Australia")));

        let canada = geo(Some("Canada"), None, None);
        assert!(!canada.matches(Some("Melbourne, Victoria")));

        let washington = geo(Some("United States"), Some("Washington"), None);
        assert!(washington.matches(Some("Seattle, WA")));
        assert!(!washington.matches(Some("Perth, WA, Australia")));
    }

    #[test]
    fn test_names_match_whole_words() {
        let sel = geo(Some("United States"), Some("Kansas"), None);
        assert!(!sel.matches(Some("Little Rock, Arkansas")));
        assert!(sel.matches(Some("Wichita")));

        let sel = geo(Some("United States"), Some("Oregon"), None);
        assert!(sel.matches(Some("Portland")));
        assert!(!sel.matches(Some("Portland, ME")));

        let sel = geo(Some("United States"), Some("Virginia"), None);
        assert!(!sel.matches(Some("Charleston, West Virginia")));
    }

    #[test]
    fn test_cascading_option_lists() {
        assert_eq!(country_names().len(), COUNTRIES.len());
        assert!(region_names(None).is_empty());
        assert!(region_names(Some("canada")).contains(&"Ontario".to_string()));
        assert!(city_names(Some("Canada"), None).is_empty());
        assert_eq!(
            city_names(Some("United Kingdom"), Some("Scotland")),
            vec!["Edinburgh", "Glasgow", "Aberdeen"]
        );
    }
}
