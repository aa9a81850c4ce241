//! Run configuration: defaults, environment overrides.
//!
//! Environment values that fail to parse or fall outside their valid range
//! are ignored and the default is kept.

pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_WINDOW_PERCENT: f64 = 1.0;
pub const DEFAULT_KEY_WIDTH: usize = 64;
pub const DEFAULT_PREVIEW_COUNT: usize = 3;

pub const DEFAULT_INPUT_PATH: &str = "prevsolv.txt";
pub const DEFAULT_RECORDS_PATH: &str = "cleaned_puzzles.json";
pub const DEFAULT_SUMMARY_PATH: &str = "puzzle_analysis.json";

pub const ENV_TOP_N: &str = "KEYSPAN_TOP_N";
pub const ENV_WINDOW_PERCENT: &str = "KEYSPAN_WINDOW_PERCENT";
pub const ENV_KEY_WIDTH: &str = "KEYSPAN_KEY_WIDTH";

#[derive(Clone, Debug, PartialEq)]
pub struct ReportConfig {
    /// Leaderboard size.
    pub top_n: usize,
    /// Half-width of a projection's search window, in percent of the range.
    pub window_percent: f64,
    /// Hex width used when printing padded keys.
    pub key_width: usize,
    /// Number of range patterns shown in the console summary.
    pub preview_count: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            window_percent: DEFAULT_WINDOW_PERCENT,
            key_width: DEFAULT_KEY_WIDTH,
            preview_count: DEFAULT_PREVIEW_COUNT,
        }
    }
}

impl ReportConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(top_n) = lookup(ENV_TOP_N).and_then(|v| v.trim().parse::<usize>().ok()) {
            if top_n > 0 {
                config.top_n = top_n;
            }
        }
        if let Some(window) = lookup(ENV_WINDOW_PERCENT).and_then(|v| v.trim().parse::<f64>().ok())
        {
            if (0.0..=100.0).contains(&window) {
                config.window_percent = window;
            }
        }
        if let Some(width) = lookup(ENV_KEY_WIDTH).and_then(|v| v.trim().parse::<usize>().ok()) {
            config.key_width = width;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        assert_eq!(ReportConfig::from_lookup(lookup(&[])), ReportConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let config = ReportConfig::from_lookup(lookup(&[
            (ENV_TOP_N, "10"),
            (ENV_WINDOW_PERCENT, " 2.5 "),
            (ENV_KEY_WIDTH, "32"),
        ]));
        assert_eq!(config.top_n, 10);
        assert_eq!(config.window_percent, 2.5);
        assert_eq!(config.key_width, 32);
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let config = ReportConfig::from_lookup(lookup(&[
            (ENV_TOP_N, "0"),
            (ENV_WINDOW_PERCENT, "150"),
            (ENV_KEY_WIDTH, "wide"),
        ]));
        assert_eq!(config, ReportConfig::default());
    }
}
