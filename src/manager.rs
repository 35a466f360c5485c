use anyhow::{Context, Result};

use crate::inference::{hub, ClassifierService};
use crate::profile::Profile;

pub struct LoadedClassifier {
    pub name: String,
    pub service: ClassifierService,
}

/// Both classifiers of a profile, loaded once at startup and passed by
/// reference into each comparison. Read-only after construction.
pub struct ModelManager {
    profile: &'static Profile,
    classifiers: Vec<LoadedClassifier>,
}

impl ModelManager {
    pub fn new(profile: &'static Profile) -> Result<Self> {
        let device = hub::build_device()?;

        let mut classifiers = Vec::with_capacity(2);
        for spec in profile.models() {
            println!("🟦 Loading {} ({})", spec.name, spec.repo);
            let service = ClassifierService::load(spec, &device)
                .with_context(|| format!("failed to load classifier '{}'", spec.name))?;
            classifiers.push(LoadedClassifier {
                name: spec.name.clone(),
                service,
            });
        }

        Ok(Self {
            profile,
            classifiers,
        })
    }

    pub fn profile(&self) -> &Profile {
        self.profile
    }

    pub fn classifiers(&self) -> &[LoadedClassifier] {
        &self.classifiers
    }
}
