use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gtk4::prelude::*;
use libadwaita::prelude::*;

use crate::config::Config;

/// Handles returned from building the main window.
pub struct WindowWidgets {
    pub window: libadwaita::ApplicationWindow,
    pub status_label: gtk4::Label,
    pub progress_group: libadwaita::PreferencesGroup,
    pub progress_rows: Rc<RefCell<HashMap<String, (libadwaita::ActionRow, gtk4::ProgressBar)>>>,
    pub input_view: gtk4::TextView,
    pub submit_button: gtk4::Button,
    pub result_group: libadwaita::PreferencesGroup,
    pub result_flow: gtk4::FlowBox,
}

/// Build the main window.
pub fn build_window(app: &libadwaita::Application, config: &Config) -> WindowWidgets {
    let window = libadwaita::ApplicationWindow::builder()
        .application(app)
        .title("Entity Lens")
        .default_width(520)
        .default_height(680)
        .build();

    let css_provider = gtk4::CssProvider::new();
    css_provider.load_from_string(
        r#"
        .entity-pill {
            border-radius: 8px;
            padding: 2px 8px;
            color: #111111;
            font-weight: 600;
        }
        .entity-misc {
            background-color: rgba(210, 39, 39, 0.76);
            border: 1px solid rgb(210, 39, 39);
        }
        .entity-per {
            background-color: rgba(39, 99, 210, 0.76);
            border: 1px solid rgb(39, 99, 210);
        }
        .entity-org {
            background-color: rgba(39, 210, 79, 0.76);
            border: 1px solid rgb(39, 210, 79);
        }
        .entity-loc {
            background-color: rgba(222, 215, 91, 0.76);
            border: 1px solid rgb(222, 215, 91);
        }
        .entity-tag {
            background-color: white;
            color: black;
            border-radius: 4px;
            padding: 0 3px;
            font-size: 9px;
            font-weight: bold;
        }
        .token-plain {
            padding: 2px 0;
        }
        .token-flow {
            border: 2px solid @borders;
            border-radius: 12px;
            padding: 10px;
        }
        "#,
    );
    gtk4::style_context_add_provider_for_display(
        &gtk4::gdk::Display::default().unwrap(),
        &css_provider,
        gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );

    let toolbar_view = libadwaita::ToolbarView::new();
    let header = libadwaita::HeaderBar::new();
    toolbar_view.add_top_bar(&header);

    let content = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    content.set_margin_start(16);
    content.set_margin_end(16);
    content.set_margin_top(12);
    content.set_margin_bottom(12);

    // --- Model group ---
    let model_group = libadwaita::PreferencesGroup::new();
    model_group.set_title("Model");

    let status_row = libadwaita::ActionRow::builder()
        .title("Status")
        .build();
    let status_label = gtk4::Label::new(Some("Idle"));
    status_label.add_css_class("dim-label");
    status_row.add_suffix(&status_label);
    model_group.add(&status_row);

    let model_row = libadwaita::ActionRow::builder()
        .title("Checkpoint")
        .build();
    let model_link = gtk4::LinkButton::builder()
        .uri(config.model_page_url())
        .label(config.model_id.as_str())
        .valign(gtk4::Align::Center)
        .build();
    model_row.add_suffix(&model_link);
    model_group.add(&model_row);

    let legend_row = libadwaita::ActionRow::builder()
        .title("Entities")
        .build();
    legend_row.add_suffix(&super::tokens::build_legend());
    model_group.add(&legend_row);

    content.append(&model_group);
    content.append(&gtk4::Separator::new(gtk4::Orientation::Horizontal));

    // --- Download progress group (rows appear per artifact) ---
    let progress_group = libadwaita::PreferencesGroup::new();
    progress_group.set_title("Download");
    progress_group.set_margin_top(12);
    progress_group.set_visible(false);
    content.append(&progress_group);

    // --- Input group ---
    let input_group = libadwaita::PreferencesGroup::new();
    input_group.set_title("Input");
    input_group.set_description(Some("Enter some text you wish to classify"));
    input_group.set_margin_top(12);

    let input_view = gtk4::TextView::new();
    input_view.set_wrap_mode(gtk4::WrapMode::WordChar);
    input_view.set_top_margin(8);
    input_view.set_bottom_margin(8);
    input_view.set_left_margin(8);
    input_view.set_right_margin(8);

    let input_scroll = gtk4::ScrolledWindow::builder()
        .hscrollbar_policy(gtk4::PolicyType::Never)
        .min_content_height(110)
        .child(&input_view)
        .build();
    input_scroll.add_css_class("card");
    input_group.add(&input_scroll);

    let submit_button = gtk4::Button::builder()
        .label("Find Named Entities")
        .halign(gtk4::Align::End)
        .margin_top(8)
        .build();
    submit_button.add_css_class("suggested-action");
    input_group.add(&submit_button);

    content.append(&input_group);
    content.append(&gtk4::Separator::new(gtk4::Orientation::Horizontal));

    // --- Result group ---
    let result_group = libadwaita::PreferencesGroup::new();
    result_group.set_title("Result");
    result_group.set_margin_top(12);
    result_group.set_visible(false);

    let result_flow = gtk4::FlowBox::new();
    result_flow.set_selection_mode(gtk4::SelectionMode::None);
    result_flow.set_column_spacing(6);
    result_flow.set_row_spacing(6);
    result_flow.set_max_children_per_line(30);
    result_flow.add_css_class("token-flow");
    result_group.add(&result_flow);

    content.append(&result_group);

    // Assemble
    let scrolled = gtk4::ScrolledWindow::builder()
        .hscrollbar_policy(gtk4::PolicyType::Never)
        .child(&content)
        .build();
    toolbar_view.set_content(Some(&scrolled));
    window.set_content(Some(&toolbar_view));

    WindowWidgets {
        window,
        status_label,
        progress_group,
        progress_rows: Rc::new(RefCell::new(HashMap::new())),
        input_view,
        submit_button,
        result_group,
        result_flow,
    }
}

/// Add a download row for `file`, or reset it if one already exists.
pub fn add_progress_row(win: &WindowWidgets, file: &str) {
    let mut rows = win.progress_rows.borrow_mut();
    if let Some((_, bar)) = rows.get(file) {
        bar.set_fraction(0.0);
        return;
    }

    let row = libadwaita::ActionRow::builder().title(file).build();
    let bar = gtk4::ProgressBar::new();
    bar.set_valign(gtk4::Align::Center);
    bar.set_show_text(true);
    row.add_suffix(&bar);

    win.progress_group.add(&row);
    win.progress_group.set_visible(true);
    rows.insert(file.to_string(), (row, bar));
}

/// `progress` is a percentage, 0.0 to 100.0.
pub fn update_progress_row(win: &WindowWidgets, file: &str, progress: f32) {
    if let Some((_, bar)) = win.progress_rows.borrow().get(file) {
        bar.set_fraction(f64::from(progress) / 100.0);
    }
}

pub fn remove_progress_row(win: &WindowWidgets, file: &str) {
    let mut rows = win.progress_rows.borrow_mut();
    if let Some((row, _)) = rows.remove(file) {
        win.progress_group.remove(&row);
    }
    if rows.is_empty() {
        win.progress_group.set_visible(false);
    }
}

pub fn clear_progress_rows(win: &WindowWidgets) {
    let mut rows = win.progress_rows.borrow_mut();
    for (_, (row, _)) in rows.drain() {
        win.progress_group.remove(&row);
    }
    win.progress_group.set_visible(false);
}

/// Lock or unlock the text input and submit button.
pub fn set_controls_sensitive(win: &WindowWidgets, sensitive: bool) {
    win.input_view.set_sensitive(sensitive);
    win.submit_button.set_sensitive(sensitive);
}
