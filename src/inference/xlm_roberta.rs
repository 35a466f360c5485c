use anyhow::{anyhow, Result};
use candle::{DType, Device, IndexOp, Tensor};
use candle_transformers::models::xlm_roberta::{Config, XLMRobertaModel};
use std::path::PathBuf;
use tokenizers::Tokenizer;

use super::{encode_truncated, hub, softmax_top1, LabelTable, Prediction};

/// XLM-RoBERTa checkpoint with the RoBERTa classification head
/// (classifier.dense + tanh + classifier.out_proj over the CLS token).
pub struct XlmRobertaSequenceClassifier {
    model: XLMRobertaModel,
    dense_w: Tensor,
    dense_b: Tensor,
    out_w: Tensor,
    out_b: Tensor,
    labels: LabelTable,
    tokenizer: Tokenizer,
    device: Device,
    max_len: usize,
}

impl XlmRobertaSequenceClassifier {
    pub fn load(snapshot: PathBuf, device: &Device) -> Result<Self> {
        let tokenizer_path = snapshot.join("tokenizer.json");
        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Tokenizer load failed ({}): {e}", tokenizer_path.display()))?;
        tokenizer.with_padding(None);
        let _ = tokenizer.with_truncation(None);

        let raw_config = hub::read_config(&snapshot)?;
        let config: Config = serde_json::from_slice(&raw_config)?;
        let labels = LabelTable::from_config(&raw_config);
        let num_labels = labels.num_labels(2);
        let max_len = config.max_position_embeddings.saturating_sub(2).max(16);

        let weights = hub::find_model_weights(&snapshot)
            .ok_or_else(|| anyhow!("no model weights found under {}", snapshot.display()))?;
        let vb = hub::build_var_builder(&weights, DType::F32, device)?;

        let model = XLMRobertaModel::new(&config, vb.pp("roberta"))?;
        let dense_w = vb
            .pp("classifier.dense")
            .get((config.hidden_size, config.hidden_size), "weight")?;
        let dense_b = vb.pp("classifier.dense").get(config.hidden_size, "bias")?;
        let out_w = vb
            .pp("classifier.out_proj")
            .get((num_labels, config.hidden_size), "weight")?;
        let out_b = vb.pp("classifier.out_proj").get(num_labels, "bias")?;

        Ok(Self {
            model,
            dense_w,
            dense_b,
            out_w,
            out_b,
            labels,
            tokenizer,
            device: device.clone(),
            max_len,
        })
    }

    pub fn classify(&self, text: &str) -> Result<Prediction> {
        let ids = encode_truncated(&self.tokenizer, text, self.max_len)?;
        let seq_len = ids.len();
        let attention_mask = vec![1u32; seq_len];
        let token_type_ids = vec![0u32; seq_len];

        let ids_tensor = Tensor::new(ids.as_slice(), &self.device)?.reshape((1, seq_len))?;
        let mask_tensor =
            Tensor::new(attention_mask.as_slice(), &self.device)?.reshape((1, seq_len))?;
        let tt_tensor =
            Tensor::new(token_type_ids.as_slice(), &self.device)?.reshape((1, seq_len))?;

        let hidden = self
            .model
            .forward(&ids_tensor, &mask_tensor, &tt_tensor, None, None, None)?
            .to_dtype(DType::F32)?;
        let cls = hidden.i((0, 0))?;

        let pooled = cls
            .unsqueeze(0)?
            .matmul(&self.dense_w.t()?)?
            .broadcast_add(&self.dense_b)?
            .tanh()?;
        let logits = pooled
            .matmul(&self.out_w.t()?)?
            .broadcast_add(&self.out_b)?
            .squeeze(0)?;

        let (idx, confidence) = softmax_top1(&logits)?;
        Ok(Prediction {
            raw_label: self.labels.raw_label(idx),
            confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_xlm_roberta_classification() {
        let snapshot =
            PathBuf::from("models/xlmroberta-large-fine-tuned-indo-hoax-classification");
        if !snapshot.join("model.safetensors").exists() {
            eprintln!(
                "xlm-roberta snapshot missing under {}, skipping test",
                snapshot.display()
            );
            return;
        }
        let classifier = XlmRobertaSequenceClassifier::load(snapshot, &Device::Cpu)
            .expect("failed to load xlm-roberta classifier");
        let prediction = classifier
            .classify("Vaksin COVID-19 mengandung chip untuk melacak masyarakat.")
            .expect("xlm-roberta inference failed");
        assert!(prediction.confidence > 0.0 && prediction.confidence <= 1.0);
    }
}
