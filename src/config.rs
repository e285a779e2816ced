use std::env;
use std::time::Duration;

use anyhow::{Result, bail};

const URL_KEYS: &[&str] = &["WC22_SUPABASE_URL", "SUPABASE_URL", "VITE_SUPABASE_URL"];
const KEY_KEYS: &[&str] = &[
    "WC22_SUPABASE_ANON_KEY",
    "SUPABASE_ANON_KEY",
    "VITE_SUPABASE_ANON_KEY",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendChoice {
    /// Hosted backend when a URL is configured, demo data otherwise.
    Auto,
    Supabase,
    Demo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendTarget {
    Supabase { url: String, anon_key: String },
    Demo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub backend: BackendChoice,
    pub http_timeout: Duration,
    pub start_route: String,
    pub show_fetch_errors: bool,
    pub tick_rate: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Loads `.env.local` first so it wins over `.env`; real environment
/// variables win over both.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let backend = match opt_value(&lookup, "WC22_BACKEND")
            .map(|v| v.to_lowercase())
            .as_deref()
        {
            Some("supabase") => BackendChoice::Supabase,
            Some("demo") => BackendChoice::Demo,
            _ => BackendChoice::Auto,
        };
        Self {
            supabase_url: first_value(&lookup, URL_KEYS),
            supabase_anon_key: first_value(&lookup, KEY_KEYS),
            backend,
            http_timeout: Duration::from_secs(parse_u64_or(&lookup, "WC22_HTTP_TIMEOUT_SECS", 10, 1)),
            start_route: opt_value(&lookup, "WC22_START_ROUTE").unwrap_or_else(|| "/".to_string()),
            show_fetch_errors: parse_bool_or(&lookup, "WC22_SHOW_FETCH_ERRORS", false),
            tick_rate: Duration::from_millis(parse_u64_or(&lookup, "WC22_TICK_MS", 250, 50)),
        }
    }

    pub fn backend_target(&self) -> Result<BackendTarget> {
        match (self.backend, &self.supabase_url) {
            (BackendChoice::Demo, _) | (BackendChoice::Auto, None) => Ok(BackendTarget::Demo),
            (_, Some(url)) => Ok(BackendTarget::Supabase {
                url: url.clone(),
                anon_key: self.supabase_anon_key.clone().unwrap_or_default(),
            }),
            (BackendChoice::Supabase, None) => {
                bail!("WC22_BACKEND=supabase but no WC22_SUPABASE_URL is set")
            }
        }
    }
}

fn opt_value(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).and_then(|val| {
        let trimmed = val.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn first_value(lookup: &impl Fn(&str) -> Option<String>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| opt_value(lookup, key))
}

fn parse_u64_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64, min: u64) -> u64 {
    opt_value(lookup, key)
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
        .max(min)
}

fn parse_bool_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    match opt_value(lookup, key).map(|v| v.to_lowercase()).as_deref() {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => default,
    }
}
