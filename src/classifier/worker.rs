//! Request loop for the classifier thread. Requests are drained one at
//! a time, so the pipeline is only ever used from here.

use async_channel::{Receiver, Sender};

use super::error::Result;
use super::fetch;
use super::pipeline::TokenClassificationPipeline;
use crate::config::Config;
use crate::protocol::{InferenceRequest, InferenceResponse, WorkerEvent};

struct Worker {
    config: Config,
    events: Sender<WorkerEvent>,
    pipeline: Option<TokenClassificationPipeline>,
}

/// Serve classification requests until the request channel closes,
/// which happens when the UI side drops its sender on shutdown.
pub async fn run(
    config: Config,
    requests: Receiver<InferenceRequest>,
    events: Sender<WorkerEvent>,
) {
    let mut worker = Worker {
        config,
        events,
        pipeline: None,
    };
    while let Ok(request) = requests.recv().await {
        worker.handle(request).await;
    }
    log::info!("request channel closed, classifier worker exiting");
}

impl Worker {
    async fn handle(&mut self, request: InferenceRequest) {
        match self.classify(&request).await {
            Ok(response) => {
                let _ = self.events.try_send(WorkerEvent::Success(response));
            }
            Err(e) => {
                log::error!("classification failed: {e}");
                let _ = self.events.try_send(WorkerEvent::Failure {
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Run one request against the cached pipeline, building it on first
    /// use. A failed build leaves the slot empty so the next request
    /// starts over; a failed prediction keeps the pipeline.
    async fn classify(&mut self, request: &InferenceRequest) -> Result<InferenceResponse> {
        let pipeline = match self.pipeline.take() {
            Some(pipeline) => pipeline,
            None => self.build_pipeline().await?,
        };
        let tokens = pipeline.predict(&request.input);
        self.pipeline = Some(pipeline);
        Ok(InferenceResponse { tokens: tokens? })
    }

    async fn build_pipeline(&mut self) -> Result<TokenClassificationPipeline> {
        log::info!("initializing pipeline for {}", self.config.model_id);
        let events = self.events.clone();
        let files = fetch::fetch_model(&self.config, move |event| {
            let _ = events.try_send(event);
        })
        .await?;
        let pipeline = TokenClassificationPipeline::load(&files)?;
        let _ = self.events.try_send(WorkerEvent::Ready);
        log::info!("pipeline ready");
        Ok(pipeline)
    }
}
