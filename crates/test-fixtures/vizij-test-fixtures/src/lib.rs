//! Shared JSON fixtures for the motion crates' tests and benches.
//!
//! `fixtures/manifest.json` names every rig description and gesture table; callers look
//! them up by key and deserialize into their own types.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    rigs: BTreeMap<String, String>,
    gestures: BTreeMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn read(rel: &str) -> Result<String> {
    let path = fixtures_root().join(rel);
    fs::read_to_string(&path).with_context(|| format!("reading fixture {}", path.display()))
}

fn parse<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read(rel)?;
    serde_json::from_str(&text).with_context(|| format!("parsing fixture {rel}"))
}

fn entry<'a>(map: &'a BTreeMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("no {kind} fixture named '{name}'"))
}

/// Rig descriptions: bone list, optional expression channels, optional bind rotations.
pub mod rigs {
    use super::*;

    /// Sorted fixture keys.
    pub fn keys() -> Vec<String> {
        MANIFEST.rigs.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        read(entry(&MANIFEST.rigs, "rig", name)?)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        parse(entry(&MANIFEST.rigs, "rig", name)?)
    }
}

/// Gesture tables as JSON arrays of named partial poses.
pub mod gestures {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.gestures.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        read(entry(&MANIFEST.gestures, "gesture", name)?)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(fixtures_root().join(entry(&MANIFEST.gestures, "gesture", name)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_manifest_entry_is_readable_json() {
        for key in rigs::keys() {
            let value: serde_json::Value = rigs::load(&key).unwrap();
            assert!(value["bones"].is_array(), "rig {key} lacks bones");
        }
        for key in gestures::keys() {
            let value: serde_json::Value = serde_json::from_str(&gestures::json(&key).unwrap())
                .unwrap();
            assert!(value.is_array(), "gesture table {key} is not an array");
            assert!(gestures::path(&key).unwrap().exists());
        }
    }

    #[test]
    fn unknown_key_is_an_error() {
        let err = rigs::json("missing").unwrap_err();
        assert!(err.to_string().contains("missing"));
    }
}
