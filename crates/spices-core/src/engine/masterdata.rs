use super::error::EngineError;
use nalgebra::{Point3, Quaternion};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

pub const MASTERDATA_VERSION: &str = "1.0.0.0";
pub const ASYMMETRIC_UNIT: &str = "Asymmetric Unit";

/// Masterdata keys.
pub mod keys {
    pub const ACTIVE_CHAINS: &str = "ACTIVE_CHAINS";
    pub const AMINO_ACIDS_DEFINITION: &str = "AMINO_ACIDS_DEFINITION";
    pub const BACKBONE_PARTICLE_SEGMENTS: &str = "BACKBONE_PARTICLE_SEGMENTS";
    pub const BACKBONE_PARTICLE_STATUS: &str = "BACKBONE_PARTICLE_STATUS";
    pub const BIOLOGICAL_ASSEMBLY: &str = "BIOLOGICAL_ASSEMBLY";
    pub const BIOLOGICAL_ASSEMBLY_FILTER: &str = "BIOLOGICAL_ASSEMBLY_FILTER";
    pub const CA_ATOM_INDEX_PROBE_MAP: &str = "CA_ATOM_INDEX_PROBE_MAP";
    pub const CENTER: &str = "CENTER";
    pub const DEFAULT_ROTATION: &str = "DEFAULT_ROTATION";
    pub const IS_CIRCULAR: &str = "IS_CIRCULAR";
    pub const LAST_CALPHA_INDEX: &str = "LAST_CALPHA_INDEX";
    pub const LAST_INDEX: &str = "LAST_INDEX";
    pub const NUMBER_OF_DECIMALS_FOR_COORDINATES: &str = "NUMBER_OF_DECIMALS_FOR_COORDINATES";
    pub const NUMBER_OF_MODELS_ASSEMBLY: &str = "NUMBER_OF_MODELS_ASSEMBLY";
    pub const ORIGINAL_PDB: &str = "ORIGINAL_PDB";
    pub const OVERRIDDEN_SEQUENCES: &str = "OVERRIDDEN_SEQUENCES";
    pub const PH_VALUE: &str = "PH_VALUE";
    pub const RADIUS: &str = "RADIUS";
    pub const ROTATION: &str = "ROTATION";
    pub const SEED: &str = "SEED";
    pub const USE_FSMILES_FREQUENCIES: &str = "USE_FSMILES_FREQUENCIES";
    pub const VERSION: &str = "VERSION";
}

/// Persistent state of a structure mapper.
///
/// All values are strings; lists are written as `item;item;` and vectors as
/// `x;y;z`. Keys are kept in alphabetical order, so equal states serialize to
/// equal text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Masterdata {
    entries: BTreeMap<String, String>,
}

fn malformed(key: &'static str, value: &str) -> EngineError {
    EngineError::Masterdata {
        key,
        value: value.to_string(),
    }
}

fn format_list<T: ToString>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| format!("{};", item.to_string()))
        .collect()
}

impl Masterdata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml(text: &str) -> Result<Self, EngineError> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml(&self) -> Result<String, EngineError> {
        Ok(toml::to_string(self)?)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn parsed<T: FromStr>(&self, key: &'static str) -> Result<Option<T>, EngineError> {
        self.get(key)
            .map(|value| value.trim().parse().map_err(|_| malformed(key, value)))
            .transpose()
    }

    pub fn set_value<T: ToString>(&mut self, key: &str, value: T) {
        self.set(key, value.to_string());
    }

    pub fn list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|value| {
                value
                    .split(';')
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn parsed_list<T: FromStr>(&self, key: &'static str) -> Result<Option<Vec<T>>, EngineError> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        value
            .split(';')
            .filter(|item| !item.is_empty())
            .map(|item| item.trim().parse().map_err(|_| malformed(key, value)))
            .collect::<Result<Vec<T>, _>>()
            .map(Some)
    }

    pub fn set_list<T: ToString>(&mut self, key: &str, items: impl IntoIterator<Item = T>) {
        self.set(key, format_list(items));
    }

    /// Key/value pairs stored as `key_value;` items.
    pub fn pairs(&self, key: &'static str) -> Result<BTreeMap<String, String>, EngineError> {
        self.list(key)
            .into_iter()
            .map(|item| {
                item.rsplit_once('_')
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .ok_or_else(|| malformed(key, &item))
            })
            .collect()
    }

    pub fn set_pairs(&mut self, key: &str, pairs: &BTreeMap<String, String>) {
        self.set_list(key, pairs.iter().map(|(k, v)| format!("{}_{}", k, v)));
    }

    pub fn point(&self, key: &'static str) -> Result<Option<Point3<f64>>, EngineError> {
        match self.parsed_list::<f64>(key)? {
            None => Ok(None),
            Some(values) if values.len() == 3 => {
                Ok(Some(Point3::new(values[0], values[1], values[2])))
            }
            Some(_) => Err(malformed(key, self.get(key).unwrap_or_default())),
        }
    }

    pub fn set_point(&mut self, key: &str, point: &Point3<f64>) {
        self.set(key, format!("{:.6};{:.6};{:.6}", point.x, point.y, point.z));
    }

    /// Quaternion stored as `x;y;z;w`.
    pub fn quaternion(&self, key: &'static str) -> Result<Option<Quaternion<f64>>, EngineError> {
        match self.parsed_list::<f64>(key)? {
            None => Ok(None),
            Some(v) if v.len() == 4 => Ok(Some(Quaternion::new(v[3], v[0], v[1], v[2]))),
            Some(_) => Err(malformed(key, self.get(key).unwrap_or_default())),
        }
    }

    pub fn set_quaternion(&mut self, key: &str, q: &Quaternion<f64>) {
        self.set(
            key,
            format!("{:.6};{:.6};{:.6};{:.6}", q.i, q.j, q.k, q.w),
        );
    }

    pub fn flag(&self, key: &'static str) -> Result<Option<bool>, EngineError> {
        self.parsed(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_are_semicolon_terminated() {
        let mut data = Masterdata::new();
        data.set_list(keys::ACTIVE_CHAINS, ["A", "B"]);
        assert_eq!(data.get(keys::ACTIVE_CHAINS), Some("A;B;"));
        assert_eq!(data.list(keys::ACTIVE_CHAINS), vec!["A", "B"]);
        assert!(data.list(keys::SEED).is_empty());

        data.set_list(keys::BACKBONE_PARTICLE_STATUS, [true, false]);
        assert_eq!(
            data.parsed_list::<bool>(keys::BACKBONE_PARTICLE_STATUS).unwrap(),
            Some(vec![true, false])
        );
    }

    #[test]
    fn malformed_values_name_their_key() {
        let mut data = Masterdata::new();
        data.set(keys::RADIUS, "wide");
        match data.parsed::<f64>(keys::RADIUS) {
            Err(EngineError::Masterdata { key, value }) => {
                assert_eq!(key, keys::RADIUS);
                assert_eq!(value, "wide");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        data.set(keys::CENTER, "1.0;2.0");
        assert!(data.point(keys::CENTER).is_err());
    }

    #[test]
    fn points_and_quaternions_use_fixed_precision() {
        let mut data = Masterdata::new();
        data.set_point(keys::CENTER, &Point3::new(1.0, 2.5, -3.0));
        assert_eq!(data.get(keys::CENTER), Some("1.000000;2.500000;-3.000000"));
        assert_eq!(data.point(keys::CENTER).unwrap(), Some(Point3::new(1.0, 2.5, -3.0)));

        let q = Quaternion::new(0.5, 0.5, -0.5, 0.5);
        data.set_quaternion(keys::ROTATION, &q);
        assert_eq!(data.get(keys::ROTATION), Some("0.500000;-0.500000;0.500000;0.500000"));
        assert_eq!(data.quaternion(keys::ROTATION).unwrap(), Some(q));
    }

    #[test]
    fn probe_pairs_split_on_the_last_underscore() {
        let mut data = Masterdata::new();
        let mut pairs = BTreeMap::new();
        pairs.insert("[ALA]1:A.CA #2".to_string(), "Pr1".to_string());
        data.set_pairs(keys::CA_ATOM_INDEX_PROBE_MAP, &pairs);
        assert_eq!(data.get(keys::CA_ATOM_INDEX_PROBE_MAP), Some("[ALA]1:A.CA #2_Pr1;"));
        assert_eq!(data.pairs(keys::CA_ATOM_INDEX_PROBE_MAP).unwrap(), pairs);
    }

    #[test]
    fn toml_round_trip_preserves_multiline_values() {
        let mut data = Masterdata::new();
        data.set(keys::ORIGINAL_PDB, "HEADER    TEST\nATOM      1  CA  GLY A   1\n");
        data.set(keys::VERSION, MASTERDATA_VERSION);
        let text = data.to_toml().unwrap();
        assert_eq!(Masterdata::from_toml(&text).unwrap(), data);
        assert!(Masterdata::from_toml("RADIUS = [1]").is_err());
    }
}
