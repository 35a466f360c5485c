pub mod bert;
pub mod hub;
pub mod xlm_roberta;

use anyhow::{anyhow, Result};
use candle::{Device, Tensor};
use serde::Deserialize;
use std::collections::HashMap;
use tokenizers::Tokenizer;

use crate::classifier::labels::RawLabel;
use crate::profile::ModelSpec;

/// Raw top-1 output of one classifier call: whatever token the checkpoint
/// emits plus the softmax probability assigned to it.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub raw_label: RawLabel,
    pub confidence: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Arch {
    Bert,
    XlmRoberta,
}

pub enum ClassifierService {
    Bert(bert::BertSequenceClassifier),
    XlmRoberta(xlm_roberta::XlmRobertaSequenceClassifier),
}

impl ClassifierService {
    pub fn load(spec: &ModelSpec, device: &Device) -> Result<Self> {
        let snapshot = hub::resolve_snapshot(&spec.repo)?;
        match spec.arch {
            Arch::Bert => Ok(Self::Bert(bert::BertSequenceClassifier::load(
                snapshot, device,
            )?)),
            Arch::XlmRoberta => Ok(Self::XlmRoberta(
                xlm_roberta::XlmRobertaSequenceClassifier::load(snapshot, device)?,
            )),
        }
    }

    pub fn classify(&self, text: &str) -> Result<Prediction> {
        match self {
            Self::Bert(service) => service.classify(text),
            Self::XlmRoberta(service) => service.classify(text),
        }
    }
}

/// The checkpoint's `id2label` table, when the config carries one. Class
/// indices without an entry stay bare indices.
#[derive(Default)]
pub struct LabelTable {
    id2label: HashMap<usize, String>,
}

#[derive(Deserialize)]
struct LabelTableConfig {
    #[serde(default)]
    id2label: Option<HashMap<String, String>>,
}

impl LabelTable {
    pub fn from_config(raw: &[u8]) -> Self {
        let parsed: LabelTableConfig = match serde_json::from_slice(raw) {
            Ok(parsed) => parsed,
            Err(_) => return Self::default(),
        };
        let id2label = parsed
            .id2label
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(idx, label)| idx.parse::<usize>().ok().map(|idx| (idx, label)))
            .collect();
        Self { id2label }
    }

    pub fn raw_label(&self, idx: usize) -> RawLabel {
        match self.id2label.get(&idx) {
            Some(label) => RawLabel::Text(label.clone()),
            None => RawLabel::Index(idx),
        }
    }

    pub fn num_labels(&self, fallback: usize) -> usize {
        if self.id2label.is_empty() {
            fallback
        } else {
            self.id2label.len()
        }
    }
}

pub(crate) fn encode_truncated(
    tokenizer: &Tokenizer,
    text: &str,
    max_len: usize,
) -> Result<Vec<u32>> {
    let enc = tokenizer
        .encode(text, true)
        .map_err(|e| anyhow!("Tokenizer encode error: {e}"))?;
    let mut ids = enc.get_ids().to_vec();
    if ids.is_empty() {
        ids.push(0);
    }
    if ids.len() > max_len {
        ids.truncate(max_len);
    }
    Ok(ids)
}

pub(crate) fn softmax_top1(logits: &Tensor) -> Result<(usize, f32)> {
    let last_dim = logits.dims().len().saturating_sub(1);
    let probs = candle_nn::ops::softmax(logits, last_dim)?;
    let values = probs.to_vec1::<f32>()?;
    let (idx, conf) = values
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .ok_or_else(|| anyhow!("empty logits"))?;
    Ok((idx, *conf))
}
