use serde::{Deserialize, Serialize};

/// A single classification request sent from the UI to the worker.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    /// Raw text to classify.
    pub input: String,
}

/// One classified (sub)token as produced by the pipeline.
///
/// `entity` is the raw label string from the model's `id2label` table:
/// `"O"` for no entity, or a BIO tag such as `"B-LOC"` / `"I-PER"` for the
/// default CoNLL-2003 model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub word: String,
    pub entity: String,
    /// Softmax probability of the winning label.
    pub score: f32,
}

/// The result of one classification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResponse {
    pub tokens: Vec<TaggedToken>,
}

/// Events sent from the classifier worker thread to the GTK main thread.
///
/// Each request produces a sequence of lifecycle events (one
/// `Initiate`/`Progress`.../`Done` run per model file on first use, then
/// `Ready` once the pipeline is loaded) followed by exactly one terminal
/// event, `Success` or `Failure`.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// A model file fetch has started.
    Initiate { file: String },
    /// Download progress for a model file, in percent (0-100).
    Progress { file: String, progress: f32 },
    /// A model file is fully fetched (or was already cached).
    Done { file: String },
    /// The pipeline is loaded and will be reused for later requests.
    Ready,
    /// Terminal: classification finished.
    Success(InferenceResponse),
    /// Terminal: pipeline construction or inference failed.
    Failure { reason: String },
}
