mod event_handler;
mod inference;
mod state;

pub use event_handler::handle_worker_event;
pub use inference::submit;
pub use state::AppState;
