//! Named-entity classifier backend. Everything here runs off the GTK
//! main thread; the UI talks to it only through channels.

mod error;
mod fetch;
mod pipeline;
mod worker;

use async_channel::Sender;

use crate::config::Config;
use crate::protocol::{InferenceRequest, WorkerEvent};

/// Spawn the classifier worker thread and hand back the request side of
/// its channel. The model is not touched until the first request.
pub fn start(config: Config, events: Sender<WorkerEvent>) -> Sender<InferenceRequest> {
    let (request_tx, request_rx) = async_channel::unbounded::<InferenceRequest>();

    std::thread::Builder::new()
        .name("classifier-worker".into())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Failed to start classifier runtime: {e}");
                    let _ = events.send_blocking(WorkerEvent::Failure {
                        reason: format!("classifier runtime: {e}"),
                    });
                    return;
                }
            };
            rt.block_on(worker::run(config, request_rx, events));
        })
        .expect("Failed to spawn classifier worker thread");

    request_tx
}
