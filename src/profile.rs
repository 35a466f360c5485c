use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

use crate::inference::Arch;

pub const DEFAULT_PROFILE: &str = "indo-hoax";

#[derive(Debug, Clone, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    pub repo: String,
    pub arch: Arch,
}

/// One comparison variant: a label vocabulary and the two checkpoints
/// compared under it.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    #[serde(default)]
    name: String,
    vocabulary: String,
    models: [ModelSpec; 2],
}

impl Profile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vocabulary(&self) -> &str {
        &self.vocabulary
    }

    pub fn models(&self) -> &[ModelSpec; 2] {
        &self.models
    }
}

static PROFILES: Lazy<HashMap<String, Profile>> = Lazy::new(|| {
    let raw = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/profiles.json"));
    let mut parsed: HashMap<String, Profile> =
        serde_json::from_str(raw).expect("invalid profile config");
    for (key, profile) in parsed.iter_mut() {
        profile.name = key.clone();
    }
    parsed
});

pub fn profile(name: &str) -> Option<&'static Profile> {
    PROFILES.get(name)
}

pub fn profile_names() -> Vec<&'static str> {
    let mut names: Vec<&str> = PROFILES.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
}
