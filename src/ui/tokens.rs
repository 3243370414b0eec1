use gtk4::prelude::*;

use crate::labels::{group_tokens, EntityKind, TokenGroup};
use crate::protocol::{InferenceResponse, TaggedToken};
use crate::ui::window::WindowWidgets;

/// Replace the result flow with the rendered response and reveal it.
pub fn show_response(win: &WindowWidgets, response: &InferenceResponse) {
    win.result_flow.remove_all();
    for group in group_tokens(&response.tokens) {
        match group {
            TokenGroup::Plain(token) => {
                let word = gtk4::Label::new(Some(&token.word));
                word.add_css_class("token-plain");
                win.result_flow.append(&word);
            }
            TokenGroup::Entity { kind, tokens } => {
                win.result_flow.append(&entity_pill(kind, &tokens));
            }
        }
    }
    win.result_group.set_visible(true);
}

/// A colored pill holding one entity span: each word followed by its raw
/// tag badge, the way the model emitted it.
fn entity_pill(kind: EntityKind, tokens: &[TaggedToken]) -> gtk4::Box {
    let pill = gtk4::Box::new(gtk4::Orientation::Horizontal, 4);
    pill.add_css_class("entity-pill");
    pill.add_css_class(kind.css_class());

    for token in tokens {
        let word = gtk4::Label::new(Some(&token.word));
        pill.append(&word);

        let tag = gtk4::Label::new(Some(&token.entity));
        tag.add_css_class("entity-tag");
        tag.set_tooltip_text(Some(&format!("score {:.3}", token.score)));
        pill.append(&tag);
    }
    pill
}

/// One chip per entity kind, colored like the output pills.
pub fn build_legend() -> gtk4::Box {
    let legend = gtk4::Box::new(gtk4::Orientation::Horizontal, 6);
    legend.set_valign(gtk4::Align::Center);
    for kind in EntityKind::ALL {
        let chip = gtk4::Label::new(Some(kind.short_name()));
        chip.add_css_class("entity-pill");
        chip.add_css_class(kind.css_class());
        legend.append(&chip);
    }
    legend
}
