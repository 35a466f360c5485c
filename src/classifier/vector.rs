use anyhow::{anyhow, Result};

use super::labels::Taxonomy;

/// Two probabilities positionally aligned to the taxonomy's class pair.
/// Components sum to 1.0; this only holds because the task is strictly
/// two-class.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ConfidenceVector(pub [f32; 2]);

impl ConfidenceVector {
    /// Probability of the taxonomy's first / second class respectively.
    pub fn first(&self) -> f32 {
        self.0[0]
    }

    pub fn second(&self) -> f32 {
        self.0[1]
    }
}

/// The element matching `canonical_label` equals `confidence`, the other its
/// binary complement. A label outside the taxonomy would make the vector
/// meaningless, so it is rejected rather than silently trusted.
pub fn build_vector(
    canonical_label: &str,
    confidence: f32,
    taxonomy: &Taxonomy,
) -> Result<ConfidenceVector> {
    let position = taxonomy.position(canonical_label).ok_or_else(|| {
        anyhow!(
            "unrecognized canonical class '{}' (expected '{}' or '{}')",
            canonical_label,
            taxonomy.classes()[0],
            taxonomy.classes()[1],
        )
    })?;

    let mut components = [1.0 - confidence; 2];
    components[position] = confidence;
    Ok(ConfidenceVector(components))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::labels::vocabulary;

    #[test]
    fn first_class_keeps_confidence_in_slot_zero() {
        let taxonomy = vocabulary("fake_real").taxonomy();
        let v = build_vector("FAKE", 0.9, taxonomy).unwrap();
        assert_eq!(v.0, [0.9, 1.0 - 0.9]);
    }

    #[test]
    fn second_class_keeps_confidence_in_slot_one() {
        let taxonomy = vocabulary("fake_real").taxonomy();
        let v = build_vector("REAL", 0.6, taxonomy).unwrap();
        assert!((v.first() - 0.4).abs() < 1e-6);
        assert!((v.second() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn components_sum_to_one() {
        let taxonomy = vocabulary("hoax").taxonomy();
        for c in [0.0f32, 0.13, 0.5, 0.87, 1.0] {
            let v = build_vector("NON-HOAX", c, taxonomy).unwrap();
            assert!((v.first() + v.second() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn non_member_label_is_rejected() {
        let taxonomy = vocabulary("fake_real").taxonomy();
        let err = build_vector("UNEXPECTED", 0.5, taxonomy).unwrap_err();
        assert!(err.to_string().contains("unrecognized canonical class"));
    }
}
