//! Model artifact retrieval from the Hugging Face Hub.
//!
//! Each model needs three files: `config.json`, `tokenizer.json` and
//! `model.safetensors`. Files are cached on disk and re-downloaded only
//! when absent; every file emits an `Initiate`/`Done` pair (with
//! `Progress` events in between while bytes are actually moving) so the
//! UI can show one progress row per file.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

use super::error::{ClassifierError, Result};
use crate::config::Config;
use crate::protocol::WorkerEvent;

const HUB_BASE: &str = "https://huggingface.co";

pub const CONFIG_FILE: &str = "config.json";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const WEIGHTS_FILE: &str = "model.safetensors";

const MODEL_FILES: [&str; 3] = [CONFIG_FILE, TOKENIZER_FILE, WEIGHTS_FILE];

/// Paths to the three artifacts a pipeline is loaded from.
#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: PathBuf,
}

impl ModelFiles {
    /// Resolve against an existing directory, without any fetch.
    fn from_dir(dir: &Path) -> Result<Self> {
        let resolve = |file: &str| {
            let path = dir.join(file);
            if path.exists() {
                Ok(path)
            } else {
                Err(ClassifierError::MissingFile(path))
            }
        };
        Ok(Self {
            config: resolve(CONFIG_FILE)?,
            tokenizer: resolve(TOKENIZER_FILE)?,
            weights: resolve(WEIGHTS_FILE)?,
        })
    }
}

/// Directory for cached model artifacts: ~/.local/share/entity-lens/models/
fn models_dir() -> PathBuf {
    let mut p = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    p.push("entity-lens");
    p.push("models");
    p
}

/// Cache directory for one model id ('/' is not a valid path element).
pub fn model_cache_dir(model_id: &str) -> PathBuf {
    models_dir().join(model_id.replace('/', "--"))
}

/// Download URL for one artifact, hub `resolve` scheme.
pub fn hub_file_url(model_id: &str, revision: &str, file: &str) -> String {
    format!("{HUB_BASE}/{model_id}/resolve/{revision}/{file}")
}

/// Ensure all artifacts for the configured model are present locally,
/// reporting per-file lifecycle events through `on_event`.
pub async fn fetch_model<F>(config: &Config, mut on_event: F) -> Result<ModelFiles>
where
    F: FnMut(WorkerEvent),
{
    if config.allow_local_models {
        let local = PathBuf::from(&config.model_id);
        if local.is_dir() {
            log::info!("loading model from local directory {}", local.display());
            return ModelFiles::from_dir(&local);
        }
    }

    let dir = model_cache_dir(&config.model_id);
    tokio::fs::create_dir_all(&dir).await?;

    for file in MODEL_FILES {
        let dest = dir.join(file);
        on_event(WorkerEvent::Initiate { file: file.into() });
        if dest.exists() {
            log::debug!("{file} already cached");
        } else {
            let url = hub_file_url(&config.model_id, &config.model_revision, file);
            download_file(&url, &dest, file, &mut on_event).await?;
        }
        on_event(WorkerEvent::Done { file: file.into() });
    }

    ModelFiles::from_dir(&dir)
}

/// Stream one file to disk, emitting `Progress` on whole-percent steps.
/// A failed download removes the partial file so a retry starts clean.
async fn download_file<F>(url: &str, dest: &Path, file: &str, on_event: &mut F) -> Result<()>
where
    F: FnMut(WorkerEvent),
{
    log::info!("downloading {url}");
    let result = stream_to_file(url, dest, file, on_event).await;
    if result.is_err() {
        let _ = tokio::fs::remove_file(dest).await;
    }
    result
}

async fn stream_to_file<F>(url: &str, dest: &Path, file: &str, on_event: &mut F) -> Result<()>
where
    F: FnMut(WorkerEvent),
{
    let response = reqwest::get(url).await?;
    if !response.status().is_success() {
        return Err(ClassifierError::Fetch {
            file: file.into(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let total = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;
    let mut last_percent: u64 = 0;

    let mut out = tokio::fs::File::create(dest).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        out.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;
        if total > 0 {
            let percent = downloaded * 100 / total;
            if percent > last_percent {
                last_percent = percent;
                log::trace!("{file}: {percent}%");
                on_event(WorkerEvent::Progress {
                    file: file.into(),
                    progress: percent as f32,
                });
            }
        }
    }

    out.flush().await?;
    log::info!("{} downloaded ({downloaded} bytes)", dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hub_urls_use_the_resolve_scheme() {
        assert_eq!(
            hub_file_url("dslim/bert-base-NER", "main", "model.safetensors"),
            "https://huggingface.co/dslim/bert-base-NER/resolve/main/model.safetensors"
        );
        assert_eq!(
            hub_file_url("acme/custom-ner", "refs/pr/4", "config.json"),
            "https://huggingface.co/acme/custom-ner/resolve/refs/pr/4/config.json"
        );
    }

    #[test]
    fn cache_dir_flattens_the_model_id() {
        let dir = model_cache_dir("dslim/bert-base-NER");
        assert!(dir.ends_with("entity-lens/models/dslim--bert-base-NER"));
    }

    #[test]
    fn local_resolution_requires_all_three_files() {
        let dir = std::env::temp_dir().join("entity-lens-test-model");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(CONFIG_FILE), "{}").unwrap();
        std::fs::write(dir.join(TOKENIZER_FILE), "{}").unwrap();

        let err = ModelFiles::from_dir(&dir).unwrap_err();
        assert!(matches!(err, ClassifierError::MissingFile(p) if p.ends_with(WEIGHTS_FILE)));

        std::fs::write(dir.join(WEIGHTS_FILE), "").unwrap();
        let files = ModelFiles::from_dir(&dir).unwrap();
        assert!(files.weights.ends_with(WEIGHTS_FILE));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
