use anyhow::{anyhow, Context, Result};
use candle::{DType, Device};
use candle_nn::VarBuilder;
use hf_hub::api::sync::Api;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Resolve the snapshot directory holding a checkpoint's config, tokenizer
/// and weights. Order: a local `models/<name>` directory, then the local
/// Hugging Face cache, then a fresh hub download.
pub fn resolve_snapshot(repo: &str) -> Result<PathBuf> {
    let short_name = repo.rsplit('/').next().unwrap_or(repo);
    let local = PathBuf::from("models").join(short_name);
    if local.join("config.json").exists() {
        return Ok(local);
    }

    if let Some(snapshot) = find_cached_snapshot(repo) {
        return Ok(snapshot);
    }

    println!("📥 Fetching {repo} from the Hugging Face hub...");
    let api = Api::new().context("failed to initialize hub client")?;
    let model = api.model(repo.to_string());
    let config = model
        .get("config.json")
        .with_context(|| format!("failed to fetch config.json for {repo}"))?;
    model
        .get("tokenizer.json")
        .with_context(|| format!("failed to fetch tokenizer.json for {repo}"))?;
    model
        .get("model.safetensors")
        .with_context(|| format!("failed to fetch model.safetensors for {repo}"))?;

    config
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("hub returned a rootless path for {repo}"))
}

/// Hub cache layout: models--owner--name/snapshots/<revision>/.
fn find_cached_snapshot(repo: &str) -> Option<PathBuf> {
    let base = dirs::home_dir()?
        .join(".cache/huggingface/hub")
        .join(format!("models--{}", repo.replace('/', "--")))
        .join("snapshots");

    for entry in fs::read_dir(&base).ok()? {
        let path = entry.ok()?.path();
        if path.is_dir() && path.join("config.json").exists() {
            return Some(path);
        }
    }
    None
}

pub fn find_model_weights(snapshot: &Path) -> Option<PathBuf> {
    let candidates = ["model.safetensors", "pytorch_model.bin", "model.bin"];
    for candidate in candidates {
        let path = snapshot.join(candidate);
        if path.exists() {
            return Some(path);
        }
    }
    None
}

pub fn read_config(snapshot: &Path) -> Result<Vec<u8>> {
    let path = snapshot.join("config.json");
    if !path.exists() {
        return Err(anyhow!("config.json not found under {}", snapshot.display()));
    }
    fs::read(&path).with_context(|| format!("failed to read {}", path.display()))
}

pub fn build_var_builder(path: &Path, dtype: DType, device: &Device) -> Result<VarBuilder<'static>> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    if ext == "safetensors" {
        let files = vec![path.to_path_buf()];
        unsafe {
            VarBuilder::from_mmaped_safetensors(&files, dtype, device)
                .map_err(|e| anyhow!("failed to load {}: {e}", path.display()))
        }
    } else {
        VarBuilder::from_pth(path, dtype, device)
            .map_err(|e| anyhow!("failed to load {}: {e}", path.display()))
    }
}

pub fn build_device() -> Result<Device> {
    match std::env::var("HOAXLENS_DEVICE")
        .ok()
        .filter(|s| !s.trim().is_empty())
    {
        Some(pref) => parse_device_preference(pref),
        None => Ok(try_cuda_device(0)),
    }
}

fn parse_device_preference(value: String) -> Result<Device> {
    let trimmed = value.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower == "cpu" {
        Ok(Device::Cpu)
    } else if lower.starts_with("cuda") || lower.starts_with("gpu") {
        let ordinal = trimmed
            .split(':')
            .nth(1)
            .and_then(|part| part.parse::<usize>().ok())
            .unwrap_or(0);
        Device::new_cuda(ordinal).map_err(|err| {
            anyhow!(
                "requested CUDA device {} but initialization failed: {err}",
                ordinal
            )
        })
    } else {
        warn!(
            "unrecognized HOAXLENS_DEVICE value '{}', defaulting to auto",
            trimmed
        );
        Ok(try_cuda_device(0))
    }
}

fn try_cuda_device(device_id: usize) -> Device {
    match Device::new_cuda(device_id) {
        Ok(device) => device,
        Err(err) => {
            warn!("CUDA device {device_id} unavailable ({err}), running on CPU");
            Device::Cpu
        }
    }
}
