//! Runtime configuration.
//!
//! Values come from `EVENTIQ_*` environment variables; anything unset falls back to the built-in
//! defaults and is logged.  Callers such as the CLI override individual fields afterwards.

use std::env;
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;

use log::{info, warn};

use crate::builder::{RendererBuilder, DEFAULT_MARGIN_IN};
use crate::error::RosterError;
use crate::fonts::FONTS_DIR_ENV;
use crate::model::inches;
use crate::record::{
    CertificateRequest, DEFAULT_EVENT_NAME, DEFAULT_ORGANIZATION, DEFAULT_SERVICE_PERIOD,
};
use crate::repository::InMemoryVolunteerStore;

pub const ROSTER_ENV: &str = "EVENTIQ_ROSTER";
pub const EVENT_NAME_ENV: &str = "EVENTIQ_EVENT_NAME";
pub const ORGANIZATION_ENV: &str = "EVENTIQ_ORGANIZATION";
pub const SERVICE_PERIOD_ENV: &str = "EVENTIQ_SERVICE_PERIOD";
pub const MARGIN_ENV: &str = "EVENTIQ_MARGIN_IN";

/// Accepted page margins in inches.  Below the lower bound the content runs into the inner border
/// line (0.6 in from the edge); above the upper bound the certificate no longer fits on one page.
pub const MARGIN_RANGE_IN: RangeInclusive<f64> = 0.6..=1.0;

/// Settings shared by the renderer and the certificate service.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Directory searched first for the certificate fonts.
    pub fonts_dir: Option<PathBuf>,
    /// JSON roster to load instead of the sample volunteers.
    pub roster: Option<PathBuf>,
    /// Page margin in inches.
    pub margin_in: f64,
    /// Texts used when a request does not supply its own.
    pub request: CertificateRequest,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fonts_dir: None,
            roster: None,
            margin_in: DEFAULT_MARGIN_IN,
            request: CertificateRequest::default(),
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            fonts_dir: var(FONTS_DIR_ENV).map(PathBuf::from),
            roster: var(ROSTER_ENV).map(PathBuf::from).or_else(|| {
                info!("{ROSTER_ENV} not set, using the sample roster");
                None
            }),
            margin_in: load_margin(var(MARGIN_ENV)),
            request: CertificateRequest::new()
                .with_event_name(text_or_default(
                    var(EVENT_NAME_ENV),
                    EVENT_NAME_ENV,
                    DEFAULT_EVENT_NAME,
                ))
                .with_organization(text_or_default(
                    var(ORGANIZATION_ENV),
                    ORGANIZATION_ENV,
                    DEFAULT_ORGANIZATION,
                ))
                .with_service_period(text_or_default(
                    var(SERVICE_PERIOD_ENV),
                    SERVICE_PERIOD_ENV,
                    DEFAULT_SERVICE_PERIOD,
                )),
        }
    }

    /// A renderer builder with this configuration's margins and fonts directory.
    pub fn renderer(&self) -> RendererBuilder {
        let builder = RendererBuilder::new().with_margin_mm(inches(self.margin_in));
        match &self.fonts_dir {
            Some(dir) => builder.with_fonts_dir(dir),
            None => builder,
        }
    }

    /// Loads the configured roster, or the sample volunteers when none is configured.
    pub fn load_roster(&self) -> Result<InMemoryVolunteerStore, RosterError> {
        match &self.roster {
            Some(path) => InMemoryVolunteerStore::from_json_file(path),
            None => Ok(InMemoryVolunteerStore::sample()),
        }
    }
}

fn text_or_default(value: Option<String>, key: &str, default: &str) -> String {
    value.unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_owned()
    })
}

fn load_margin(value: Option<String>) -> f64 {
    let margin = try_load(value, MARGIN_ENV, DEFAULT_MARGIN_IN);
    if MARGIN_RANGE_IN.contains(&margin) {
        margin
    } else {
        warn!(
            "{MARGIN_ENV} value {margin} is outside {:?}, using default: {DEFAULT_MARGIN_IN}",
            MARGIN_RANGE_IN
        );
        DEFAULT_MARGIN_IN
    }
}

fn try_load<T>(value: Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match value {
        Some(raw) => raw.trim().parse().unwrap_or_else(|err| {
            warn!("Invalid {key} value {raw:?} ({err}), using default: {default}");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = Config::from_lookup(lookup(&[
            (FONTS_DIR_ENV, "/srv/fonts"),
            (ROSTER_ENV, "roster.json"),
            (EVENT_NAME_ENV, "Spring Expo"),
            (ORGANIZATION_ENV, "Campus Guild"),
            (SERVICE_PERIOD_ENV, "April 2025"),
            (MARGIN_ENV, "1.0"),
        ]));

        assert_eq!(config.fonts_dir, Some(PathBuf::from("/srv/fonts")));
        assert_eq!(config.roster, Some(PathBuf::from("roster.json")));
        assert_eq!(config.margin_in, 1.0);
        assert_eq!(config.request.event_name, "Spring Expo");
        assert_eq!(config.request.organization, "Campus Guild");
        assert_eq!(config.request.service_period, "April 2025");
        assert_eq!(config.request.performance_rating, "Excellent");
    }

    #[test]
    fn blank_and_invalid_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            (EVENT_NAME_ENV, "   "),
            (MARGIN_ENV, "wide"),
        ]));

        assert_eq!(config.request.event_name, DEFAULT_EVENT_NAME);
        assert_eq!(config.margin_in, DEFAULT_MARGIN_IN);
    }

    #[test]
    fn margins_outside_the_page_frame_fall_back() {
        for raw in ["-20", "0", "0.25", "3", "NaN", "inf"] {
            let config = Config::from_lookup(lookup(&[(MARGIN_ENV, raw)]));
            assert_eq!(config.margin_in, DEFAULT_MARGIN_IN, "margin {raw:?}");
        }
        let config = Config::from_lookup(lookup(&[(MARGIN_ENV, "0.6")]));
        assert_eq!(config.margin_in, 0.6);
    }

    #[test]
    fn sample_roster_without_path() {
        let store = Config::default().load_roster().expect("sample roster");
        assert_eq!(store.len(), 3);
    }
}
