//! Named sets of pre-validated placement coordinates.
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::geometry::CoordinateList;

/// Fishnets keyed by storm name, storm type, or an override key.
#[derive(Clone, Debug, Default)]
pub struct FishnetMap {
    by_key: HashMap<String, CoordinateList>,
}

impl FishnetMap {
    pub fn new() -> Self {
        Self {
            by_key: HashMap::new(),
        }
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        coordinates: CoordinateList,
    ) -> Option<CoordinateList> {
        self.by_key.insert(key.into(), coordinates)
    }

    /// Builder-style [`FishnetMap::insert`].
    pub fn with(mut self, key: impl Into<String>, coordinates: CoordinateList) -> Self {
        self.insert(key, coordinates);
        self
    }

    /// Looks up the fishnet for `key`.
    pub fn get(&self, key: &str) -> Result<&CoordinateList> {
        self.by_key.get(key).ok_or_else(|| Error::MissingFishnet {
            key: key.to_owned(),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.by_key.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CoordinateList)> {
        self.by_key.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Adds a fishnet parsed from an `x,y` table, keyed by the table's file stem.
    pub fn insert_csv(&mut self, table_path: &str, text: &str) -> Result<String> {
        let key = table_key(table_path).to_owned();
        let coordinates = CoordinateList::from_csv(text)?;
        self.insert(key.clone(), coordinates);
        Ok(key)
    }
}

impl FromIterator<(String, CoordinateList)> for FishnetMap {
    fn from_iter<I: IntoIterator<Item = (String, CoordinateList)>>(iter: I) -> Self {
        Self {
            by_key: iter.into_iter().collect(),
        }
    }
}

/// Lookup key of a table stored at `path`: the file name up to its first `.`.
///
/// Both `/` and `\` count as directory separators.
pub fn table_key(path: &str) -> &str {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    name.split('.').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;

    #[test]
    fn missing_key_is_a_lookup_error() {
        let map = FishnetMap::new().with("ST2", CoordinateList::from(vec![DVec2::ONE]));
        assert_eq!(map.get("ST2").expect("present").len(), 1);
        match map.get("ST3") {
            Err(Error::MissingFishnet { key }) => assert_eq!(key, "ST3"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn table_key_is_the_file_stem() {
        assert_eq!(
            table_key("fishnets/19990101_24hr_precip_ST2_01.csv"),
            "19990101_24hr_precip_ST2_01"
        );
        assert_eq!(table_key("C:\\data\\ST1.dist.csv"), "ST1");
        assert_eq!(table_key("ST4"), "ST4");
    }

    #[test]
    fn insert_csv_keys_by_stem() {
        let mut map = FishnetMap::new();
        let key = map
            .insert_csv("tables/ST1.csv", "x,y\n10,20\n30,40\n")
            .expect("parses");
        assert_eq!(key, "ST1");
        assert_eq!(
            map.get("ST1").expect("present").coordinates,
            vec![DVec2::new(10.0, 20.0), DVec2::new(30.0, 40.0)]
        );
        assert_eq!(map.keys(), vec!["ST1"]);
    }
}
