use std::cell::RefCell;
use std::rc::Rc;

use super::state::AppState;
use crate::protocol::InferenceRequest;
use crate::ui;

/// Send the current input to the classifier worker and lock the input
/// controls until a terminal event comes back.
pub fn submit(state: &Rc<RefCell<AppState>>) {
    if state.borrow().model_busy {
        log::info!("Ignoring submit while a request is in flight");
        return;
    }

    let input = state.borrow().text_input.clone();
    log::info!("submitting {} chars for classification", input.len());

    let mut s = state.borrow_mut();
    if let Err(e) = s.request_sender.try_send(InferenceRequest { input }) {
        // The worker thread is gone, so no terminal event would ever
        // unlock the input. Fail here instead of locking up.
        log::error!("could not reach the classifier worker: {e}");
        let reason = "classifier worker is not running".to_string();
        if let Some(ref win) = s.window {
            win.status_label.set_text(&format!("Error: {reason}"));
        }
        s.last_error = Some(reason);
        return;
    }
    s.model_busy = true;
    s.last_error = None;

    if let Some(ref win) = s.window {
        ui::window::set_controls_sensitive(win, false);
        let text = if s.model_ready {
            "Classifying..."
        } else {
            "Preparing model..."
        };
        win.status_label.set_text(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::handle_worker_event;
    use crate::config::Config;
    use crate::protocol::WorkerEvent;

    fn test_state() -> (Rc<RefCell<AppState>>, async_channel::Receiver<InferenceRequest>) {
        let (tx, rx) = async_channel::unbounded();
        let state = Rc::new(RefCell::new(AppState::new(Config::default(), tx)));
        state.borrow_mut().text_input = "John lives in Paris.".into();
        (state, rx)
    }

    #[test]
    fn submit_sends_the_current_input_and_locks() {
        let (state, rx) = test_state();

        submit(&state);

        let request = rx.try_recv().unwrap();
        assert_eq!(request.input, "John lives in Paris.");
        assert!(state.borrow().model_busy);
    }

    #[test]
    fn a_busy_state_swallows_repeat_submits() {
        let (state, rx) = test_state();

        submit(&state);
        submit(&state);

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn submit_clears_a_previous_error() {
        let (state, _rx) = test_state();
        state.borrow_mut().last_error = Some("download of model.safetensors failed".into());

        submit(&state);

        assert_eq!(state.borrow().last_error, None);
    }

    #[test]
    fn submits_flow_again_after_a_terminal_event() {
        let (state, rx) = test_state();

        submit(&state);
        handle_worker_event(&state, WorkerEvent::Failure {
            reason: "no network".into(),
        });
        submit(&state);

        assert_eq!(rx.len(), 2);
    }

    #[test]
    fn submit_to_a_dead_worker_reports_the_error_without_locking() {
        let (state, rx) = test_state();
        drop(rx);

        submit(&state);

        let s = state.borrow();
        assert!(!s.model_busy);
        assert_eq!(s.last_error.as_deref(), Some("classifier worker is not running"));
    }

    #[test]
    fn a_dead_worker_does_not_engage_the_busy_guard() {
        let (state, rx) = test_state();
        drop(rx);

        submit(&state);
        submit(&state);

        let s = state.borrow();
        assert!(!s.model_busy);
        assert!(s.last_error.is_some());
    }
}
