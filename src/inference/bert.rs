use anyhow::{anyhow, Result};
use candle::{DType, Device, IndexOp, Tensor};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use std::path::PathBuf;
use tokenizers::Tokenizer;

use super::{encode_truncated, hub, softmax_top1, LabelTable, Prediction};

/// BERT checkpoint with a sequence-classification head (pooler + single
/// linear layer), the layout IndoBERT-style fine-tunes ship with.
pub struct BertSequenceClassifier {
    model: BertModel,
    pooler_w: Tensor,
    pooler_b: Tensor,
    head_w: Tensor,
    head_b: Tensor,
    labels: LabelTable,
    tokenizer: Tokenizer,
    device: Device,
    max_len: usize,
}

impl BertSequenceClassifier {
    pub fn load(snapshot: PathBuf, device: &Device) -> Result<Self> {
        let tokenizer_path = snapshot.join("tokenizer.json");
        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Tokenizer load failed ({}): {e}", tokenizer_path.display()))?;
        tokenizer.with_padding(None);
        let _ = tokenizer.with_truncation(None);

        let raw_config = hub::read_config(&snapshot)?;
        let config: BertConfig = serde_json::from_slice(&raw_config)?;
        let labels = LabelTable::from_config(&raw_config);
        let num_labels = labels.num_labels(2);
        let max_len = config.max_position_embeddings.saturating_sub(2).max(16);

        let weights = hub::find_model_weights(&snapshot)
            .ok_or_else(|| anyhow!("no model weights found under {}", snapshot.display()))?;
        let vb = hub::build_var_builder(&weights, DType::F32, device)?;

        let model = BertModel::load(vb.pp("bert"), &config)?;
        let pooler_w = vb
            .pp("bert.pooler.dense")
            .get((config.hidden_size, config.hidden_size), "weight")?;
        let pooler_b = vb.pp("bert.pooler.dense").get(config.hidden_size, "bias")?;
        let head_w = vb
            .pp("classifier")
            .get((num_labels, config.hidden_size), "weight")?;
        let head_b = vb.pp("classifier").get(num_labels, "bias")?;

        Ok(Self {
            model,
            pooler_w,
            pooler_b,
            head_w,
            head_b,
            labels,
            tokenizer,
            device: device.clone(),
            max_len,
        })
    }

    pub fn classify(&self, text: &str) -> Result<Prediction> {
        let ids = encode_truncated(&self.tokenizer, text, self.max_len)?;
        let seq_len = ids.len();

        let input = Tensor::new(ids.as_slice(), &self.device)?.unsqueeze(0)?;
        let mask = Tensor::ones(&[1, seq_len], DType::I64, &self.device)?;
        let token_type_ids = Tensor::zeros(input.dims(), DType::I64, &self.device)?;
        let hidden = self.model.forward(&input, &token_type_ids, Some(&mask))?;
        let cls = hidden.i((0, 0))?;

        let pooled = cls
            .unsqueeze(0)?
            .matmul(&self.pooler_w.t()?)?
            .broadcast_add(&self.pooler_b)?
            .tanh()?;
        let logits = pooled
            .matmul(&self.head_w.t()?)?
            .broadcast_add(&self.head_b)?
            .squeeze(0)?;

        let (idx, confidence) = softmax_top1(&logits)?;
        Ok(Prediction {
            raw_label: self.labels.raw_label(idx),
            confidence,
        })
    }
}
