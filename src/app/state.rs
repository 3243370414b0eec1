use crate::config::Config;
use crate::protocol::{InferenceRequest, InferenceResponse};
use crate::ui::window::WindowWidgets;

/// One model artifact currently being downloaded, mirrored by a row in
/// the progress list.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressItem {
    pub file: String,
    /// Percentage, 0.0 to 100.0.
    pub progress: f32,
}

/// Central application state. Lives on the GTK main thread inside Rc<RefCell<>>.
pub struct AppState {
    /// The worker has a loaded pipeline and answers promptly.
    pub model_ready: bool,
    /// A request is in flight; input is locked until Success or Failure.
    pub model_busy: bool,
    pub progress_items: Vec<ProgressItem>,
    pub response: Option<InferenceResponse>,
    pub last_error: Option<String>,
    pub text_input: String,
    pub config: Config,
    pub request_sender: async_channel::Sender<InferenceRequest>,

    // UI handles
    pub window: Option<WindowWidgets>,
}

impl AppState {
    pub fn new(config: Config, request_sender: async_channel::Sender<InferenceRequest>) -> Self {
        Self {
            model_ready: false,
            model_busy: false,
            progress_items: Vec::new(),
            response: None,
            last_error: None,
            text_input: String::new(),
            config,
            request_sender,
            window: None,
        }
    }
}
