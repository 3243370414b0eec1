mod app;
mod classifier;
mod config;
mod labels;
mod protocol;
mod ui;

use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;
use libadwaita::prelude::*;

use app::AppState;
use protocol::WorkerEvent;

fn main() {
    env_logger::init();
    log::info!("Entity Lens starting");

    let application = libadwaita::Application::builder()
        .application_id("com.github.entity-lens.app")
        .build();

    application.connect_activate(on_activate);
    application.run();
}

fn on_activate(app: &libadwaita::Application) {
    // Create the async channel for worker → UI communication
    let (event_tx, event_rx) = async_channel::unbounded::<WorkerEvent>();

    let config = config::Config::load();
    if let Err(e) = config.save() {
        log::warn!("Failed to save config: {e}");
    }

    // Spawn the classifier thread; it stays idle until the first request
    let request_tx = classifier::start(config.clone(), event_tx);

    // Build app state and UI
    let state = Rc::new(RefCell::new(AppState::new(config, request_tx)));
    let window = ui::window::build_window(app, &state.borrow().config);

    // Mirror the text buffer into state
    {
        let state_clone = state.clone();
        window.input_view.buffer().connect_changed(move |buffer| {
            let (start, end) = buffer.bounds();
            state_clone.borrow_mut().text_input =
                buffer.text(&start, &end, false).to_string();
        });
    }

    // Wire up the submit button
    {
        let state_clone = state.clone();
        window.submit_button.connect_clicked(move |_| {
            app::submit(&state_clone);
        });
    }

    // Store UI handles in state and show the window
    let main_window = window.window.clone();
    state.borrow_mut().window = Some(window);
    main_window.present();

    // Attach worker event handler
    {
        let state_clone = state.clone();
        gtk4::glib::spawn_future_local(async move {
            while let Ok(event) = event_rx.recv().await {
                app::handle_worker_event(&state_clone, event);
            }
        });
    }
}
