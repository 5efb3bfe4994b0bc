// Named-entity highlighting: split the analysed text into plain runs and
// entity spans.

use crate::api::models::Entity;

/// NER labels with a legend entry, in display order.
pub const NER_LEGEND: &[(&str, &str)] = &[
    ("PERSON", "Person"),
    ("ORG", "Organization"),
    ("GPE", "Geopolitical Entity"),
    ("MONEY", "Money"),
    ("DATE", "Date"),
    ("TIME", "Time"),
    ("PERCENT", "Percentage"),
    ("LOC", "Location"),
    ("EVENT", "Event"),
    ("WORK_OF_ART", "Work of Art"),
];

/// Human-readable name for an entity label, falling back to the label itself.
pub fn label_description(label: &str) -> &str {
    NER_LEGEND
        .iter()
        .find(|(code, _)| *code == label)
        .map(|(_, desc)| *desc)
        .unwrap_or(label)
}

/// One piece of highlighted output. Offsets are character offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    Entity {
        text: String,
        label: String,
        start: usize,
        end: usize,
    },
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Plain(text) => text,
            Segment::Entity { text, .. } => text,
        }
    }
}

/// Segment `text` by `entities`.
///
/// Entities are clamped to the text; empty or out-of-range ones are dropped.
/// Candidates are taken by start offset, longest first, and any entity that
/// overlaps an already accepted one is skipped. Every character of `text`
/// appears in exactly one segment.
pub fn segment(text: &str, entities: &[Entity]) -> Vec<Segment> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    let mut order: Vec<usize> = (0..entities.len()).collect();
    order.sort_by(|&a, &b| {
        let (ea, eb) = (&entities[a], &entities[b]);
        ea.start
            .cmp(&eb.start)
            .then_with(|| eb.end.saturating_sub(eb.start).cmp(&ea.end.saturating_sub(ea.start)))
    });

    // owner[i] = accepted (start, end, entity index) covering char i
    let mut owner: Vec<Option<(usize, usize, usize)>> = vec![None; len];
    for idx in order {
        let e = &entities[idx];
        let start = e.start.min(len);
        let end = e.end.min(len);
        if start >= end {
            continue;
        }
        if owner[start..end].iter().any(Option::is_some) {
            continue;
        }
        for slot in &mut owner[start..end] {
            *slot = Some((start, end, idx));
        }
    }

    let mut segments = Vec::new();
    let mut i = 0;
    while i < len {
        match owner[i] {
            Some((start, end, idx)) => {
                segments.push(Segment::Entity {
                    text: chars[start..end].iter().collect(),
                    label: entities[idx].label.clone(),
                    start,
                    end,
                });
                i = end;
            }
            None => {
                let run_start = i;
                while i < len && owner[i].is_none() {
                    i += 1;
                }
                segments.push(Segment::Plain(chars[run_start..i].iter().collect()));
            }
        }
    }
    segments
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
