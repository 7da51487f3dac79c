use std::{cmp::Reverse, collections::HashMap};

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

/// Weather for one sol as reported by the InSight lander.
#[derive(Debug, Clone)]
pub struct MarsSol {
    /// The sol number, as labelled in the source payload.
    pub sol: String,
    pub earth_date: String,
    pub temperature: MarsTemperature,
}

/// Air temperatures in Fahrenheit. Celsius values are derived on demand so
/// the two units can never drift apart.
#[derive(Deserialize, Debug, Clone)]
pub struct MarsTemperature {
    #[serde(rename = "av")]
    pub average_f: f64,
    #[serde(rename = "mn")]
    pub min_f: f64,
    #[serde(rename = "mx")]
    pub max_f: f64,
}

impl MarsTemperature {
    pub fn average_celsius(&self) -> f64 {
        to_celsius(self.average_f)
    }

    pub fn min_celsius(&self) -> f64 {
        to_celsius(self.min_f)
    }

    pub fn max_celsius(&self) -> f64 {
        to_celsius(self.max_f)
    }
}

fn to_celsius(fahrenheit: f64) -> f64 {
    (((fahrenheit - 32.0) * (5.0 / 9.0)) * 1000.0).round() / 1000.0
}

/// Weather report for the most recent sols, newest first.
///
/// The source JSON keys each sol's data by its sol number, with a sibling
/// `sol_keys` array enumerating which keys are present. Decoding reads
/// `sol_keys` first and then resolves each key against the surrounding
/// object, so the sol entries themselves stay schema-free at the top level.
#[derive(Debug, Clone)]
pub struct MarsWeatherReport {
    pub sols: Vec<MarsSol>,
}

#[derive(Deserialize)]
struct RawReport {
    sol_keys: Vec<String>,
    #[serde(flatten)]
    entries: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct RawSol {
    #[serde(rename = "First_UTC")]
    first_utc: String,
    #[serde(rename = "AT")]
    temperature: MarsTemperature,
}

impl<'de> Deserialize<'de> for MarsWeatherReport {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawReport::deserialize(deserializer)?;

        // Sol numbers compared numerically, newest first. Non-numeric keys
        // would sort last; the API only emits numeric ones.
        let mut keys = raw.sol_keys;
        keys.sort_by_key(|key| Reverse(key.parse::<u64>().unwrap_or(0)));

        let mut sols = Vec::with_capacity(keys.len());
        for key in keys {
            let entry = raw
                .entries
                .get(&key)
                .ok_or_else(|| de::Error::custom(format!("missing sol entry for key {key}")))?;
            let sol = RawSol::deserialize(entry).map_err(de::Error::custom)?;
            sols.push(MarsSol {
                sol: key,
                earth_date: sol.first_utc,
                temperature: sol.temperature,
            });
        }

        Ok(MarsWeatherReport { sols })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARS_WEATHER_JSON: &str = r#"
    {
        "289": {
          "AT": {
            "av": -73.447,
            "ct": 104016,
            "mn": -102.842,
            "mx": -27.301
          },
          "First_UTC": "2019-09-19T03:51:37Z",
          "Last_UTC": "2019-09-20T04:31:11Z",
          "PRE": {
            "av": 742.051,
            "ct": 103812,
            "mn": 721.2357,
            "mx": 757.1103
          },
          "Season": "spring"
        },
        "sol_keys": [
          "289"
        ]
    }"#;

    fn sol_entry(sol: &str, utc: &str) -> String {
        format!(
            r#""{sol}": {{
                "AT": {{ "av": -70.0, "mn": -100.0, "mx": -20.0 }},
                "First_UTC": "{utc}"
            }}"#
        )
    }

    #[test]
    fn decodes_insight_payload() {
        let report: MarsWeatherReport = serde_json::from_str(MARS_WEATHER_JSON).unwrap();

        assert_eq!(report.sols.len(), 1);
        let sol = &report.sols[0];
        assert_eq!(sol.sol, "289");
        assert_eq!(sol.earth_date, "2019-09-19T03:51:37Z");
        assert_eq!(sol.temperature.average_f, -73.447);
        assert_eq!(sol.temperature.min_f, -102.842);
        assert_eq!(sol.temperature.max_f, -27.301);
    }

    #[test]
    fn sols_are_ordered_newest_first() {
        let json = format!(
            r#"{{
                {},
                {},
                {},
                "sol_keys": ["289", "288", "290"]
            }}"#,
            sol_entry("289", "2019-09-19T03:51:37Z"),
            sol_entry("288", "2019-09-18T03:12:00Z"),
            sol_entry("290", "2019-09-20T04:31:11Z"),
        );

        let report: MarsWeatherReport = serde_json::from_str(&json).unwrap();
        let order: Vec<&str> = report.sols.iter().map(|s| s.sol.as_str()).collect();

        assert_eq!(order, ["290", "289", "288"]);
    }

    #[test]
    fn numeric_ordering_survives_digit_length_changes() {
        let json = format!(
            r#"{{
                {},
                {},
                "sol_keys": ["999", "1000"]
            }}"#,
            sol_entry("999", "2021-10-01T00:00:00Z"),
            sol_entry("1000", "2021-10-02T00:00:00Z"),
        );

        let report: MarsWeatherReport = serde_json::from_str(&json).unwrap();
        let order: Vec<&str> = report.sols.iter().map(|s| s.sol.as_str()).collect();

        assert_eq!(order, ["1000", "999"]);
    }

    #[test]
    fn listed_key_without_entry_fails_decode() {
        let json = r#"{ "sol_keys": ["289"] }"#;

        assert!(serde_json::from_str::<MarsWeatherReport>(json).is_err());
    }

    #[test]
    fn celsius_is_derived_from_fahrenheit() {
        let report: MarsWeatherReport = serde_json::from_str(MARS_WEATHER_JSON).unwrap();
        let temperature = &report.sols[0].temperature;

        for (fahrenheit, celsius) in [
            (temperature.average_f, temperature.average_celsius()),
            (temperature.min_f, temperature.min_celsius()),
            (temperature.max_f, temperature.max_celsius()),
        ] {
            let expected = (((fahrenheit - 32.0) * (5.0 / 9.0)) * 1000.0).round() / 1000.0;
            assert_eq!(celsius, expected);
        }

        // -73.447F -> -58.582C after rounding to three decimals
        assert_eq!(temperature.average_celsius(), -58.582);
    }
}
