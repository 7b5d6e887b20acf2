use anyhow::Context;
use oxdatetime::{
    DEFAULT_TWO_DIGIT_YEAR_PIVOT, DstMode, ParseOptions, TimeZoneEntry, TimeZoneTable,
    VirtualDateResolver,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// The content of the `--config` JSON file.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub two_digit_year_pivot: u8,
    pub virtual_dates: BTreeMap<String, String>,
    pub time_zones: Vec<TimeZoneConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            two_digit_year_pivot: DEFAULT_TWO_DIGIT_YEAR_PIVOT,
            virtual_dates: BTreeMap::new(),
            time_zones: Vec::new(),
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct TimeZoneConfig {
    pub abbreviation: String,
    #[serde(default)]
    pub description: String,
    pub offset_minutes: i32,
    #[serde(default)]
    pub dst: DstConfig,
    #[serde(default = "default_dst_minutes")]
    pub dst_minutes: i32,
}

#[derive(Deserialize, Debug, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum DstConfig {
    #[default]
    None,
    AlwaysOn,
    LocalAuto,
}

impl From<DstConfig> for DstMode {
    fn from(dst: DstConfig) -> Self {
        match dst {
            DstConfig::None => Self::None,
            DstConfig::AlwaysOn => Self::AlwaysOn,
            DstConfig::LocalAuto => Self::LocalAuto,
        }
    }
}

fn default_dst_minutes() -> i32 {
    60
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read the configuration file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid configuration file {}", path.display()))
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::default().with_two_digit_year_pivot(self.two_digit_year_pivot)
    }

    /// The built-in zones extended with the configured ones.
    pub fn time_zones(&self) -> TimeZoneTable {
        let mut table = TimeZoneTable::builtin();
        for zone in &self.time_zones {
            table.push(TimeZoneEntry::new(
                zone.abbreviation.clone(),
                zone.description.clone(),
                zone.offset_minutes,
                zone.dst.into(),
                zone.dst_minutes,
            ));
        }
        table
    }

    pub fn resolver(&self) -> VirtualDateResolver<&BTreeMap<String, String>> {
        VirtualDateResolver::new()
            .with_source(&self.virtual_dates)
            .with_parse_options(self.parse_options())
            .with_time_zones(self.time_zones())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxdatetime::DateTime;

    #[test]
    fn full_config() -> anyhow::Result<()> {
        let config: Config = serde_json::from_str(
            r#"{
                "two_digit_year_pivot": 50,
                "virtual_dates": { "InputStart": "2020-01-01 00:00" },
                "time_zones": [
                    { "abbreviation": "XST", "description": "Example", "offset_minutes": -300, "dst": "local_auto" }
                ]
            }"#,
        )?;
        assert_eq!(config.parse_options().expand_two_digit_year(45), 2045);
        let zone = config
            .time_zones()
            .get("XST")
            .cloned()
            .context("XST is not registered")?;
        assert_eq!(zone.dst(), DstMode::LocalAuto);
        assert_eq!(zone.dst_minutes(), 60);
        assert_eq!(
            config.resolver().resolve("InputStart")?,
            DateTime::new(2020, 1, 1, 0, 0, 0)?
        );
        Ok(())
    }

    #[test]
    fn empty_config() -> anyhow::Result<()> {
        let config: Config = serde_json::from_str("{}")?;
        assert_eq!(config.two_digit_year_pivot, DEFAULT_TWO_DIGIT_YEAR_PIVOT);
        assert!(config.virtual_dates.is_empty());
        Ok(())
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<Config>(r#"{ "pivot": 50 }"#).is_err());
        assert!(
            serde_json::from_str::<Config>(
                r#"{ "time_zones": [{ "abbreviation": "X", "offset_minutes": 0, "foo": 1 }] }"#
            )
            .is_err()
        );
    }
}
