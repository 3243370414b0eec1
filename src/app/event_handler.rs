use std::cell::RefCell;
use std::rc::Rc;

use super::state::{AppState, ProgressItem};
use crate::protocol::WorkerEvent;
use crate::ui;

/// Handle a worker event. This is the core state machine.
pub fn handle_worker_event(state: &Rc<RefCell<AppState>>, event: WorkerEvent) {
    match event {
        WorkerEvent::Initiate { file } => {
            log::info!("fetching {file}");
            let mut s = state.borrow_mut();
            s.model_ready = false;
            s.progress_items.push(ProgressItem {
                file: file.clone(),
                progress: 0.0,
            });
            if let Some(ref win) = s.window {
                ui::window::add_progress_row(win, &file);
                win.status_label.set_text("Downloading model...");
            }
        }
        WorkerEvent::Progress { file, progress } => {
            let mut s = state.borrow_mut();
            match s.progress_items.iter_mut().find(|item| item.file == file) {
                Some(item) => {
                    item.progress = progress;
                    if let Some(ref win) = s.window {
                        ui::window::update_progress_row(win, &file, progress);
                    }
                }
                None => {
                    log::debug!("progress for unknown file {file}");
                }
            }
        }
        WorkerEvent::Done { file } => {
            let mut s = state.borrow_mut();
            s.progress_items.retain(|item| item.file != file);
            if let Some(ref win) = s.window {
                ui::window::remove_progress_row(win, &file);
            }
        }
        WorkerEvent::Ready => {
            log::info!("model ready");
            let mut s = state.borrow_mut();
            s.model_ready = true;
            if let Some(ref win) = s.window {
                let text = if s.model_busy { "Classifying..." } else { "Ready" };
                win.status_label.set_text(text);
            }
        }
        WorkerEvent::Success(response) => {
            log::info!("classification complete: {} tokens", response.tokens.len());
            let mut s = state.borrow_mut();
            s.model_busy = false;
            if let Some(ref win) = s.window {
                ui::tokens::show_response(win, &response);
                ui::window::set_controls_sensitive(win, true);
                win.status_label.set_text("Ready");
            }
            s.response = Some(response);
        }
        WorkerEvent::Failure { reason } => {
            log::error!("worker error: {reason}");
            let mut s = state.borrow_mut();
            s.model_busy = false;
            s.progress_items.clear();
            if let Some(ref win) = s.window {
                ui::window::clear_progress_rows(win);
                ui::window::set_controls_sensitive(win, true);
                win.status_label.set_text(&format!("Error: {reason}"));
            }
            s.last_error = Some(reason);
        }
    }
}
