//! # Properties
//!
//! Read-only key/value configuration consumed by the abstraction methods when they are
//! constructed. Values are stored as strings and parsed on demand by the typed getters;
//! a missing key or an unparsable value silently falls back to the compiled-in default
//! (a warning is logged) and is never reported as an error.
//!
//! ## File format
//! ```json
//! {
//!   "reb2sac.abstraction.method": "modifier-structure-transformer, distribute-transformer",
//!   "reb2sac.degradation.stoichiometry.amplifier": 4,
//!   "reb2sac.max.species.oscillation.amount.S": 3
//! }
//! ```
//! Numbers and booleans are accepted as well as strings.
use log::warn;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// comma-separated list of abstraction method ids
pub const ABSTRACTION_METHOD_KEY: &str = "reb2sac.abstraction.method";
pub const MAX_ABSTRACTION_PASSES_KEY: &str = "reb2sac.abstraction.max.passes";
pub const STOICHIOMETRY_AMPLIFIER_KEY: &str = "reb2sac.stoichiometry.amplifier";
pub const DEGRADATION_STOICHIOMETRY_AMPLIFIER_KEY: &str =
    "reb2sac.degradation.stoichiometry.amplifier";
/// followed by the species name
pub const MAX_SPECIES_OSCILLATION_AMOUNT_KEY_PREFIX: &str =
    "reb2sac.max.species.oscillation.amount.";
pub const MAX_SPECIES_OSCILLATION_REACTION_RATE_KEY: &str =
    "reb2sac.max.species.oscillation.reaction.rate";
/// comma-separated list of species names
pub const INTERESTING_SPECIES_KEY: &str = "reb2sac.interesting.species";
pub const POW_KINETIC_LAW_MAX_EXPONENT_KEY: &str = "reb2sac.pow.kinetic.law.max.exponent";

pub const DEFAULT_STOICHIOMETRY_AMPLIFIER: i64 = 2;
pub const DEFAULT_DEGRADATION_STOICHIOMETRY_AMPLIFIER: i64 = 2;
pub const DEFAULT_MAX_SPECIES_OSCILLATION_AMOUNT: i64 = 1;
pub const DEFAULT_MAX_SPECIES_OSCILLATION_REACTION_RATE: f64 = 0.0;
pub const DEFAULT_POW_KINETIC_LAW_MAX_EXPONENT: i64 = 8;
pub const DEFAULT_MAX_ABSTRACTION_PASSES: i64 = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    values: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON object. Non-string scalars are kept in their JSON text form.
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        let map: BTreeMap<String, Value> = serde_json::from_str(content)?;
        let values = map
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, text)
            })
            .collect();
        Ok(Self { values })
    }

    /// Missing or unreadable files give empty properties.
    pub fn load_from_file(path: &str) -> Self {
        Self::try_load(path).unwrap_or_default()
    }

    fn try_load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        if Path::new(path).exists() {
            let content = fs::read_to_string(path)?;
            match Self::from_json_str(&content) {
                Ok(properties) => Ok(properties),
                Err(e) => {
                    warn!("properties file {} is not a JSON object ({}), using defaults", path, e);
                    Err(Box::new(e))
                }
            }
        } else {
            Ok(Self::default())
        }
    }

    pub fn set(&mut self, key: &str, value: impl ToString) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            None => default,
            Some(text) => match text.trim().parse::<i64>() {
                Ok(value) => value,
                // "4.0" is accepted when it is integral
                Err(_) => match text.trim().parse::<f64>() {
                    Ok(value) if value.fract() == 0.0 => value as i64,
                    _ => {
                        warn!("property {} = '{}' is not an integer, using {}", key, text, default);
                        default
                    }
                },
            },
        }
    }

    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        match self.get(key) {
            None => default,
            Some(text) => text.trim().parse::<f64>().unwrap_or_else(|_| {
                warn!("property {} = '{}' is not a number, using {}", key, text, default);
                default
            }),
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key).map(|t| t.trim().to_lowercase()) {
            None => default,
            Some(text) => match text.as_str() {
                "true" | "yes" | "1" => true,
                "false" | "no" | "0" => false,
                _ => {
                    warn!("property {} = '{}' is not a boolean, using {}", key, text, default);
                    default
                }
            },
        }
    }

    /// comma-separated values with surrounding blanks removed, empty items skipped
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|text| {
                text.split(',')
                    .map(|item| item.trim().to_string())
                    .filter(|item| !item.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn max_species_oscillation_amount(&self, species_name: &str) -> i64 {
        self.get_int(
            &format!("{}{}", MAX_SPECIES_OSCILLATION_AMOUNT_KEY_PREFIX, species_name),
            DEFAULT_MAX_SPECIES_OSCILLATION_AMOUNT,
        )
    }
}
