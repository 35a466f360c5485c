pub mod labels;
pub mod vector;

use anyhow::Result;
use serde::Serialize;

use crate::inference::Prediction;
use crate::manager::ModelManager;

use labels::{vocabulary, LabelVocabulary};
use vector::{build_vector, ConfidenceVector};

/// One model's contribution to a comparison: the raw token it emitted, the
/// canonical class it normalized to, and the confidence vector over the
/// taxonomy.
#[derive(Debug, Clone, Serialize)]
pub struct ModelVerdict {
    pub model: String,
    pub raw_label: String,
    pub canonical_label: String,
    pub confidence: f32,
    pub vector: ConfidenceVector,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub profile: String,
    pub classes: [String; 2],
    pub verdicts: Vec<ModelVerdict>,
}

/// Text in, two independent classifier calls, two independent
/// normalize-and-vectorize passes. Stateless; nothing survives the call.
pub fn run_comparison(models: &ModelManager, text: &str) -> Result<ComparisonReport> {
    let vocab = vocabulary(models.profile().vocabulary());

    let mut verdicts = Vec::with_capacity(2);
    for classifier in models.classifiers() {
        let prediction = classifier.service.classify(text)?;
        verdicts.push(verdict_for(&classifier.name, &prediction, vocab)?);
    }

    Ok(ComparisonReport {
        profile: models.profile().name().to_string(),
        classes: vocab.taxonomy().classes().clone(),
        verdicts,
    })
}

fn verdict_for(
    model: &str,
    prediction: &Prediction,
    vocab: &LabelVocabulary,
) -> Result<ModelVerdict> {
    let canonical_label = vocab.normalize(&prediction.raw_label);
    let vector = build_vector(&canonical_label, prediction.confidence, vocab.taxonomy())?;
    Ok(ModelVerdict {
        model: model.to_string(),
        raw_label: prediction.raw_label.to_string(),
        canonical_label,
        confidence: prediction.confidence,
        vector,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use labels::RawLabel;

    #[test]
    fn placeholder_token_against_hoax_vocabulary() {
        let prediction = Prediction {
            raw_label: RawLabel::Text("LABEL_0".into()),
            confidence: 0.87,
        };
        let verdict = verdict_for("XLM-RoBERTa", &prediction, vocabulary("hoax")).unwrap();
        assert_eq!(verdict.canonical_label, "HOAX");
        assert!((verdict.vector.first() - 0.87).abs() < 1e-6);
        assert!((verdict.vector.second() - 0.13).abs() < 1e-6);
    }

    #[test]
    fn index_token_against_fake_real_vocabulary() {
        let prediction = Prediction {
            raw_label: RawLabel::Index(1),
            confidence: 0.6,
        };
        let verdict = verdict_for("BERT", &prediction, vocabulary("fake_real")).unwrap();
        assert_eq!(verdict.canonical_label, "REAL");
        assert!((verdict.vector.first() - 0.4).abs() < 1e-6);
        assert!((verdict.vector.second() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn passthrough_token_fails_vector_construction() {
        let prediction = Prediction {
            raw_label: RawLabel::Text("UNEXPECTED".into()),
            confidence: 0.5,
        };
        let err = verdict_for("BERT", &prediction, vocabulary("fake_real")).unwrap_err();
        assert!(err.to_string().contains("UNEXPECTED"));
    }
}
