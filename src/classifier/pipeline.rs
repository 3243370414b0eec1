//! Token-classification pipeline: BERT encoder plus a linear tag head,
//! loaded from Hugging Face artifacts and executed on CPU via candle.

use std::collections::HashMap;

use candle::{Device, Tensor, D};
use candle_nn::ops::softmax;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use serde::Deserialize;
use tokenizers::{Tokenizer, TruncationParams};

use super::error::{ClassifierError, Result};
use super::fetch::ModelFiles;
use crate::protocol::TaggedToken;

/// A loaded model, reused across requests for the worker's lifetime.
pub struct TokenClassificationPipeline {
    model: BertModel,
    classifier: Linear,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    device: Device,
}

// candle's `BertConfig` keeps its fields private, so the handful we need
// beyond model loading is read from the raw config.json a second time.
#[derive(Deserialize)]
struct ModelDims {
    hidden_size: usize,
    max_position_embeddings: usize,
}

#[derive(Deserialize)]
struct LabelTable {
    #[serde(default)]
    id2label: HashMap<String, String>,
}

impl TokenClassificationPipeline {
    /// Load tokenizer, encoder weights and classification head from disk.
    /// CPU-heavy (weights are mmapped but the graph is built eagerly).
    pub fn load(files: &ModelFiles) -> Result<Self> {
        let device = Device::Cpu;

        let config_text = std::fs::read_to_string(&files.config)?;
        let config: BertConfig = serde_json::from_str(&config_text)?;
        let dims: ModelDims = serde_json::from_str(&config_text)?;
        let labels = parse_labels(&config_text)?;

        let mut tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| ClassifierError::Tokenizer(e.to_string()))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: dims.max_position_embeddings,
                ..Default::default()
            }))
            .map_err(|e| ClassifierError::Tokenizer(e.to_string()))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[files.weights.clone()], DTYPE, &device)?
        };
        let classifier = candle_nn::linear(dims.hidden_size, labels.len(), vb.pp("classifier"))?;
        let model = BertModel::load(vb, &config)?;

        log::info!("model loaded with {} labels", labels.len());
        Ok(Self {
            model,
            classifier,
            tokenizer,
            labels,
            device,
        })
    }

    /// Classify `text`, returning every non-special token with its raw
    /// label string and winning-label probability. `O` tokens are kept.
    pub fn predict(&self, text: &str) -> Result<Vec<TaggedToken>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| ClassifierError::Tokenizer(e.to_string()))?;
        let ids = encoding.get_ids();

        let input_ids = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;

        let started = std::time::Instant::now();
        let hidden = self.model.forward(&input_ids, &token_type_ids, None)?;
        let logits = self.classifier.forward(&hidden)?;
        let probs = softmax(&logits, D::Minus1)?.squeeze(0)?;
        let label_ids = probs.argmax(D::Minus1)?.to_vec1::<u32>()?;
        let scores = probs.max(D::Minus1)?.to_vec1::<f32>()?;
        log::info!(
            "classified {} tokens in {:?}",
            ids.len(),
            started.elapsed()
        );

        Ok(assemble_tokens(
            encoding.get_tokens(),
            encoding.get_special_tokens_mask(),
            &label_ids,
            &scores,
            &self.labels,
        ))
    }
}

/// Largest id accepted from `id2label`. Token-classification tag sets
/// have at most a few hundred entries; the list is allocated densely up
/// to the highest id, so an absurd id means a corrupt config.
const MAX_LABEL_ID: usize = 4096;

/// Build the dense id-indexed label list from `config.json`'s `id2label`
/// table. Ids missing from the table keep the `LABEL_<id>` convention.
fn parse_labels(config_text: &str) -> Result<Vec<String>> {
    let hub: LabelTable = serde_json::from_str(config_text)?;
    if hub.id2label.is_empty() {
        return Err(ClassifierError::Config(
            "config.json has no id2label table".into(),
        ));
    }

    let mut entries = Vec::with_capacity(hub.id2label.len());
    for (id, label) in hub.id2label {
        let id: usize = id
            .parse()
            .map_err(|_| ClassifierError::Config(format!("non-numeric label id {id:?}")))?;
        if id > MAX_LABEL_ID {
            return Err(ClassifierError::Config(format!(
                "label id {id} is out of range"
            )));
        }
        entries.push((id, label));
    }

    let size = entries.iter().map(|(id, _)| id + 1).max().unwrap_or(0);
    let mut labels: Vec<String> = (0..size).map(|id| format!("LABEL_{id}")).collect();
    for (id, label) in entries {
        labels[id] = label;
    }
    Ok(labels)
}

/// Pair up tokenizer output with per-position predictions, dropping
/// special tokens ([CLS]/[SEP]/padding).
fn assemble_tokens(
    words: &[String],
    special_mask: &[u32],
    label_ids: &[u32],
    scores: &[f32],
    labels: &[String],
) -> Vec<TaggedToken> {
    let mut out = Vec::new();
    for (i, word) in words.iter().enumerate() {
        if special_mask.get(i).copied().unwrap_or(0) == 1 {
            continue;
        }
        let Some(&id) = label_ids.get(i) else { continue };
        let entity = labels
            .get(id as usize)
            .cloned()
            .unwrap_or_else(|| format!("LABEL_{id}"));
        out.push(TaggedToken {
            word: word.clone(),
            entity,
            score: scores.get(i).copied().unwrap_or(0.0),
        });
    }
    out
}
