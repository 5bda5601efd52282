pub mod tcp;

pub use multi_try::MultiTry;

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use log::{warn, error};
use snafu::{Snafu, ResultExt};

pub fn init_logging(default_filters: &str) {
    let (filters, source) = resolve_filters(env::var("RUST_LOG"), default_filters);

    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&filters)
        .init();

    match source {
        FilterSource::NotUnicode =>
            error!("Failed to read 'RUST_LOG' due to invalid Unicode. Using default instead: '{}'", default_filters),

        FilterSource::Missing =>
            warn!("Missing 'RUST_LOG'. Using default instead: '{}'", default_filters),

        FilterSource::Empty =>
            warn!("Got empty 'RUST_LOG'. Using default instead: '{}'", default_filters),

        FilterSource::Env => (),
    }
}

#[derive(Debug, Eq, PartialEq)]
enum FilterSource {
    Env,
    Missing,
    Empty,
    NotUnicode,
}

fn resolve_filters(raw: Result<String, env::VarError>, default_filters: &str) -> (String, FilterSource) {
    match raw {
        Ok(s) if !s.trim().is_empty() => (s, FilterSource::Env),
        Ok(_) => (default_filters.to_owned(), FilterSource::Empty),
        Err(env::VarError::NotPresent) => (default_filters.to_owned(), FilterSource::Missing),
        Err(env::VarError::NotUnicode(..)) => (default_filters.to_owned(), FilterSource::NotUnicode),
    }
}

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("'{}' missing or unset in '.env' file: {}", name, source))]
    BadVariable {
        name: String,
        source: env::VarError,
    },

    #[snafu(display("'{}' has invalid value '{}': {}", name, input, reason))]
    BadValue {
        name: String,
        input: String,
        reason: String,
    },

    #[snafu(display("{} errors occurred attempting to read config: {}", errors.len(), join_errors(errors)))]
    ErrorCollection {
        errors: Vec<ConfigError>,
    }
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors.iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub trait IntoConfigResult<T> {
    fn into_config_result(self) -> Result<T, ConfigError>;
}

/// Errors gathered by [`MultiTry::and_try`] become one `ErrorCollection`.
/// Nested collections are flattened so every problem is listed once.
impl<T> IntoConfigResult<T> for Result<T, Vec<ConfigError>> {
    fn into_config_result(self) -> Result<T, ConfigError> {
        self.map_err(|e| ConfigError::ErrorCollection { errors: flatten_errors(e) })
    }
}

fn flatten_errors(errors: Vec<ConfigError>) -> Vec<ConfigError> {
    errors.into_iter()
        .flat_map(|e| match e {
            ConfigError::ErrorCollection { errors } => flatten_errors(errors),
            other => vec![other],
        })
        .collect()
}

pub struct ConfigContext {
    prefix: String,
}

impl ConfigContext {
    pub fn new(prefix: impl AsRef<str>) -> ConfigContext {
        ConfigContext {
            prefix: prefix.as_ref().to_owned(),
        }
    }

    pub fn name_of(&self, name: impl AsRef<str>) -> String {
        format!("{}_{}", self.prefix, name.as_ref())
    }

    pub fn var(&self, name: impl AsRef<str>) -> Result<String, ConfigError> {
        let name = self.name_of(name);
        env::var(&name)
            .context(BadVariableSnafu { name })
    }

    /// Unset and empty variables both read as `None`.
    pub fn var_opt(&self, name: impl AsRef<str>) -> Option<String> {
        env::var(self.name_of(name)).ok()
            .filter(|s| !s.trim().is_empty())
    }

    pub fn parse<T>(&self, name: impl AsRef<str>) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let input = self.var(name.as_ref())?;
        self.parse_value(name, input)
    }

    pub fn parse_or<T>(&self, name: impl AsRef<str>, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.var_opt(name.as_ref()) {
            None => Ok(default),
            Some(input) => self.parse_value(name, input),
        }
    }

    pub fn flag_or(&self, name: impl AsRef<str>, default: bool) -> Result<bool, ConfigError> {
        let input = match self.var_opt(name.as_ref()) {
            None => return Ok(default),
            Some(x) => x,
        };

        parse_flag(&input).ok_or_else(|| ConfigError::BadValue {
            name: self.name_of(name),
            input,
            reason: "Expected boolean".into(),
        })
    }

    /// Reads a duration such as `30s` or `1500ms`. `0`, `none` and `off`
    /// turn the duration off and yield `None`.
    pub fn duration_or(&self, name: impl AsRef<str>, default: Option<Duration>) -> Result<Option<Duration>, ConfigError> {
        let input = match self.var_opt(name.as_ref()) {
            None => return Ok(default),
            Some(x) => x,
        };

        match input.trim().to_ascii_lowercase().as_str() {
            "0" | "none" | "off" => return Ok(None),
            _ => (),
        }

        match parse_duration::parse(&input) {
            Ok(d) if d == Duration::from_secs(0) => Ok(None),
            Ok(d) => Ok(Some(d)),
            Err(e) => Err(ConfigError::BadValue {
                name: self.name_of(name),
                input,
                reason: e.to_string(),
            }),
        }
    }

    fn parse_value<T>(&self, name: impl AsRef<str>, input: String) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        input.trim().parse::<T>().map_err(|e| ConfigError::BadValue {
            name: self.name_of(name),
            reason: e.to_string(),
            input,
        })
    }
}

pub fn parse_flag(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "t"
        | "true"
        | "y"
        | "yes"
        | "1" => Some(true),

        "f"
        | "false"
        | "n"
        | "no"
        | "0" => Some(false),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test owns a distinct prefix since the process environment is shared.

    #[test]
    fn filters_fall_back_to_default() {
        assert_eq!(resolve_filters(Ok("debug".into()), "info"), ("debug".into(), FilterSource::Env));
        assert_eq!(resolve_filters(Ok("  ".into()), "info"), ("info".into(), FilterSource::Empty));
        assert_eq!(resolve_filters(Err(env::VarError::NotPresent), "info"), ("info".into(), FilterSource::Missing));
    }

    #[test]
    fn var_reports_full_name() {
        let config = ConfigContext::new("RELAY_TEST_MISSING");
        let err = config.var("DB_USER").unwrap_err();
        assert!(matches!(err, ConfigError::BadVariable { ref name, .. } if name == "RELAY_TEST_MISSING_DB_USER"));
    }

    #[test]
    fn parses_values_and_defaults() {
        env::set_var("RELAY_TEST_PARSE_PORT", "8080");
        env::set_var("RELAY_TEST_PARSE_BAD_PORT", "eighty");
        env::set_var("RELAY_TEST_PARSE_EMPTY", "");

        let config = ConfigContext::new("RELAY_TEST_PARSE");
        assert_eq!(config.parse::<u16>("PORT").unwrap(), 8080);
        assert_eq!(config.parse_or::<u32>("EMPTY", 5).unwrap(), 5);
        assert_eq!(config.parse_or::<u32>("UNSET", 7).unwrap(), 7);

        let err = config.parse::<u16>("BAD_PORT").unwrap_err();
        assert!(matches!(err, ConfigError::BadValue { ref input, .. } if input == "eighty"));
    }

    #[test]
    fn reads_flags() {
        env::set_var("RELAY_TEST_FLAG_ON", "Yes");
        env::set_var("RELAY_TEST_FLAG_OFF", "0");
        env::set_var("RELAY_TEST_FLAG_BAD", "maybe");

        let config = ConfigContext::new("RELAY_TEST_FLAG");
        assert_eq!(config.flag_or("ON", false).unwrap(), true);
        assert_eq!(config.flag_or("OFF", true).unwrap(), false);
        assert_eq!(config.flag_or("UNSET", true).unwrap(), true);
        assert!(config.flag_or("BAD", false).is_err());
    }

    #[test]
    fn reads_durations() {
        env::set_var("RELAY_TEST_DUR_SHORT", "1500ms");
        env::set_var("RELAY_TEST_DUR_OFF", "none");
        env::set_var("RELAY_TEST_DUR_ZERO", "0");
        env::set_var("RELAY_TEST_DUR_BAD", "soon");

        let config = ConfigContext::new("RELAY_TEST_DUR");
        let default = Some(Duration::from_secs(30));
        assert_eq!(config.duration_or("SHORT", default).unwrap(), Some(Duration::from_millis(1500)));
        assert_eq!(config.duration_or("OFF", default).unwrap(), None);
        assert_eq!(config.duration_or("ZERO", default).unwrap(), None);
        assert_eq!(config.duration_or("UNSET", default).unwrap(), default);
        assert!(config.duration_or("BAD", default).is_err());
    }

    #[test]
    fn collects_all_errors() {
        let config = ConfigContext::new("RELAY_TEST_COLLECT");
        let result = config.var("USER")
            .and_try(config.parse::<u16>("PORT"))
            .into_config_result();

        match result {
            Err(ConfigError::ErrorCollection { errors }) => assert_eq!(errors.len(), 2),
            other => panic!("Expected ErrorCollection, got: {:?}", other),
        }
    }

    #[test]
    fn chained_values_come_back_in_order() {
        env::set_var("RELAY_TEST_CHAIN_USER", "relay");
        env::set_var("RELAY_TEST_CHAIN_PORT", "5432");

        let config = ConfigContext::new("RELAY_TEST_CHAIN");
        let (user, port, verbose) = config.var("USER")
            .and_try(config.parse::<u16>("PORT"))
            .and_try(config.flag_or("VERBOSE", false))
            .into_config_result()
            .unwrap();

        assert_eq!(user, "relay");
        assert_eq!(port, 5432);
        assert!(!verbose);
    }

    #[test]
    fn nested_collections_are_flattened() {
        let config = ConfigContext::new("RELAY_TEST_NESTED");
        let inner = config.var("A")
            .and_try(config.var("B"))
            .into_config_result();

        let outer = inner
            .and_try(config.var("C"))
            .into_config_result();

        match outer {
            Err(ConfigError::ErrorCollection { errors }) => {
                assert_eq!(errors.len(), 3);
                assert!(errors.iter().all(|e| matches!(e, ConfigError::BadVariable { .. })));
            },
            other => panic!("Expected ErrorCollection, got: {:?}", other),
        }
    }
}
