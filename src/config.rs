use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_TABLE: &str = "jobs";

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub table: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` when the REST credentials are not set; only needed for
    /// network fetches.
    pub supabase: Option<SupabaseConfig>,
    pub log_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // .env is optional
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let supabase = match (get("SUPABASE_URL"), get("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => Some(SupabaseConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key,
                table: get("GAVEL_JOBS_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            }),
            _ => None,
        };

        let log_file = match get("GAVEL_LOG_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_log_path(),
        };

        Ok(Self { supabase, log_file })
    }

    pub fn require_supabase(&self) -> Result<&SupabaseConfig> {
        self.supabase.as_ref().context(
            "SUPABASE_URL and SUPABASE_ANON_KEY environment variables must be set \
             (or pass --from-file to read a local snapshot)",
        )
    }
}

fn default_log_path() -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "gavel") {
        proj_dirs.data_dir().join("gavel.log")
    } else {
        PathBuf::from("gavel.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_supabase_from_env() {
        let config = Config::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://abc.supabase.co/"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap();
        let supabase = config.require_supabase().unwrap();
        assert_eq!(supabase.url, "https://abc.supabase.co");
        assert_eq!(supabase.anon_key, "anon");
        assert_eq!(supabase.table, DEFAULT_TABLE);
    }

    #[test]
    fn test_table_override() {
        let config = Config::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("GAVEL_JOBS_TABLE", "legal_jobs"),
        ]))
        .unwrap();
        assert_eq!(config.require_supabase().unwrap().table, "legal_jobs");
    }

    #[test]
    fn test_missing_credentials() {
        let config = Config::from_lookup(lookup(&[("SUPABASE_URL", "https://abc.supabase.co")])).unwrap();
        assert!(config.supabase.is_none());
        let err = config.require_supabase().unwrap_err().to_string();
        assert!(err.contains("SUPABASE_ANON_KEY"));
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let config = Config::from_lookup(lookup(&[
            ("SUPABASE_URL", "  "),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap();
        assert!(config.supabase.is_none());
    }

    #[test]
    fn test_log_file_override() {
        let config = Config::from_lookup(lookup(&[("GAVEL_LOG_FILE", "/tmp/gavel-test.log")])).unwrap();
        assert_eq!(config.log_file, PathBuf::from("/tmp/gavel-test.log"));
    }
}
