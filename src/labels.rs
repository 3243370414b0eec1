//! Entity label handling: BIO tag parsing and span grouping.
//!
//! The pipeline reports raw label strings; everything the UI needs to know
//! about them lives here, so an unexpected label degrades to plain text
//! instead of breaking rendering.

use crate::protocol::TaggedToken;

/// The coarse entity categories of the CoNLL-2003 label set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Location,
    Organization,
    Miscellaneous,
    Person,
}

impl EntityKind {
    /// All kinds, in the order the legend lists them.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Location,
        EntityKind::Organization,
        EntityKind::Miscellaneous,
        EntityKind::Person,
    ];

    /// The label suffix, e.g. `LOC` in `B-LOC`.
    pub fn short_name(self) -> &'static str {
        match self {
            EntityKind::Location => "LOC",
            EntityKind::Organization => "ORG",
            EntityKind::Miscellaneous => "MISC",
            EntityKind::Person => "PER",
        }
    }

    /// CSS class carrying this kind's highlight color.
    pub fn css_class(self) -> &'static str {
        match self {
            EntityKind::Location => "entity-loc",
            EntityKind::Organization => "entity-org",
            EntityKind::Miscellaneous => "entity-misc",
            EntityKind::Person => "entity-per",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "LOC" => Some(EntityKind::Location),
            "ORG" => Some(EntityKind::Organization),
            "MISC" => Some(EntityKind::Miscellaneous),
            "PER" => Some(EntityKind::Person),
            _ => None,
        }
    }
}

/// A parsed BIO tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// `O`: not part of any entity.
    Outside,
    /// `B-<kind>`: first token of an entity span.
    Begin(EntityKind),
    /// `I-<kind>`: continuation of an entity span.
    Inside(EntityKind),
    /// Anything else. Rendered unstyled.
    Unknown,
}

impl Tag {
    pub fn parse(label: &str) -> Tag {
        if label == "O" {
            return Tag::Outside;
        }
        match label.split_once('-') {
            Some(("B", suffix)) => EntityKind::from_suffix(suffix).map_or(Tag::Unknown, Tag::Begin),
            Some(("I", suffix)) => EntityKind::from_suffix(suffix).map_or(Tag::Unknown, Tag::Inside),
            _ => Tag::Unknown,
        }
    }
}

/// A run of tokens rendered as one visual unit.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenGroup {
    /// An `O` or unrecognized-label token, rendered as plain text.
    Plain(TaggedToken),
    /// A contiguous entity span, rendered as one colored pill.
    Entity {
        kind: EntityKind,
        tokens: Vec<TaggedToken>,
    },
}

/// Group consecutive same-entity tokens into spans.
///
/// `B-X` always opens a new span; `I-X` extends the immediately preceding
/// span of kind X and otherwise opens its own (models do emit dangling
/// `I-` tags). `O` and unknown labels break any open span.
pub fn group_tokens(tokens: &[TaggedToken]) -> Vec<TokenGroup> {
    let mut groups: Vec<TokenGroup> = Vec::new();
    for token in tokens {
        match Tag::parse(&token.entity) {
            Tag::Outside | Tag::Unknown => groups.push(TokenGroup::Plain(token.clone())),
            Tag::Begin(kind) => groups.push(TokenGroup::Entity {
                kind,
                tokens: vec![token.clone()],
            }),
            Tag::Inside(kind) => match groups.last_mut() {
                Some(TokenGroup::Entity {
                    kind: open_kind,
                    tokens: span,
                }) if *open_kind == kind => span.push(token.clone()),
                _ => groups.push(TokenGroup::Entity {
                    kind,
                    tokens: vec![token.clone()],
                }),
            },
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tk(word: &str, entity: &str) -> TaggedToken {
        TaggedToken {
            word: word.to_string(),
            entity: entity.to_string(),
            score: 0.99,
        }
    }

    #[test]
    fn parses_known_tags() {
        assert_eq!(Tag::parse("O"), Tag::Outside);
        assert_eq!(Tag::parse("B-LOC"), Tag::Begin(EntityKind::Location));
        assert_eq!(Tag::parse("I-PER"), Tag::Inside(EntityKind::Person));
        assert_eq!(Tag::parse("B-ORG"), Tag::Begin(EntityKind::Organization));
        assert_eq!(Tag::parse("I-MISC"), Tag::Inside(EntityKind::Miscellaneous));
    }

    #[test]
    fn unexpected_labels_fall_back_to_unknown() {
        assert_eq!(Tag::parse(""), Tag::Unknown);
        assert_eq!(Tag::parse("B-DATE"), Tag::Unknown);
        assert_eq!(Tag::parse("E-LOC"), Tag::Unknown);
        assert_eq!(Tag::parse("LABEL_7"), Tag::Unknown);
        assert_eq!(Tag::parse("o"), Tag::Unknown);
    }

    #[test]
    fn css_classes_cover_every_kind() {
        for kind in EntityKind::ALL {
            assert!(kind.css_class().starts_with("entity-"));
        }
        assert_eq!(EntityKind::Person.css_class(), "entity-per");
    }

    #[test]
    fn groups_contiguous_entity_span_and_leaves_plain_tokens_alone() {
        let tokens = [
            tk("Paris", "B-LOC"),
            tk("France", "I-LOC"),
            tk("is", "O"),
            tk("nice", "O"),
        ];
        let groups = group_tokens(&tokens);
        assert_eq!(groups.len(), 3);
        assert_eq!(
            groups[0],
            TokenGroup::Entity {
                kind: EntityKind::Location,
                tokens: vec![tk("Paris", "B-LOC"), tk("France", "I-LOC")],
            }
        );
        assert_eq!(groups[1], TokenGroup::Plain(tk("is", "O")));
        assert_eq!(groups[2], TokenGroup::Plain(tk("nice", "O")));
    }

    #[test]
    fn begin_tag_opens_a_new_span_even_after_same_kind() {
        let tokens = [tk("Rome", "B-LOC"), tk("Paris", "B-LOC")];
        let groups = group_tokens(&tokens);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn dangling_inside_tag_starts_its_own_span() {
        let tokens = [tk("went", "O"), tk("York", "I-LOC")];
        let groups = group_tokens(&tokens);
        assert_eq!(groups.len(), 2);
        assert!(matches!(
            &groups[1],
            TokenGroup::Entity { kind: EntityKind::Location, tokens } if tokens.len() == 1
        ));
    }

    #[test]
    fn inside_tag_of_a_different_kind_breaks_the_span() {
        let tokens = [tk("John", "B-PER"), tk("Madrid", "I-LOC")];
        let groups = group_tokens(&tokens);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn unknown_labels_render_plain() {
        let tokens = [tk("today", "B-DATE"), tk("John", "B-PER")];
        let groups = group_tokens(&tokens);
        assert_eq!(groups[0], TokenGroup::Plain(tk("today", "B-DATE")));
        assert!(matches!(groups[1], TokenGroup::Entity { .. }));
    }

    #[test]
    fn sentence_with_person_and_location_spans() {
        let tokens = [
            tk("John", "B-PER"),
            tk("lives", "O"),
            tk("in", "O"),
            tk("Paris", "B-LOC"),
            tk(".", "O"),
        ];
        let groups = group_tokens(&tokens);
        assert_eq!(groups.len(), 5);
        assert!(matches!(
            groups[0],
            TokenGroup::Entity { kind: EntityKind::Person, .. }
        ));
        assert!(matches!(
            groups[3],
            TokenGroup::Entity { kind: EntityKind::Location, .. }
        ));
        for plain in [&groups[1], &groups[2], &groups[4]] {
            assert!(matches!(plain, TokenGroup::Plain(_)));
        }
    }
}
