// Part-of-speech legend and token detail rows.

use crate::api::models::PosToken;

/// Universal POS tags shown in the legend.
pub const POS_LEGEND: &[(&str, &str)] = &[
    ("NOUN", "Noun"),
    ("VERB", "Verb"),
    ("ADJ", "Adjective"),
    ("ADV", "Adverb"),
    ("PRON", "Pronoun"),
    ("DET", "Determiner"),
    ("ADP", "Preposition"),
    ("CONJ", "Conjunction"),
    ("NUM", "Number"),
    ("PUNCT", "Punctuation"),
    ("PART", "Particle"),
    ("AUX", "Auxiliary"),
    ("SCONJ", "Subordinating Conjunction"),
    ("CCONJ", "Coordinating Conjunction"),
    ("INTJ", "Interjection"),
    ("SYM", "Symbol"),
    ("X", "Other"),
];

pub fn pos_description(pos: &str) -> &str {
    POS_LEGEND
        .iter()
        .find(|(tag, _)| *tag == pos)
        .map(|(_, desc)| *desc)
        .unwrap_or(pos)
}

/// Label/value rows describing one token, as shown in the detail box.
pub fn token_detail(token: &PosToken) -> Vec<(&'static str, String)> {
    vec![
        ("Token", token.text.clone()),
        (
            "POS",
            format!("{} ({})", token.pos, pos_description(&token.pos)),
        ),
        ("Tag", token.tag.clone()),
        ("Lemma", token.lemma.clone()),
        ("Dependency", token.dep.clone()),
        ("Position", format!("{}-{}", token.start, token.end)),
    ]
}

/// Count tokens per POS tag, ordered by legend position (unknown tags last).
pub fn tag_counts(tokens: &[PosToken]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for t in tokens {
        match counts.iter_mut().find(|(pos, _)| *pos == t.pos) {
            Some((_, n)) => *n += 1,
            None => counts.push((t.pos.clone(), 1)),
        }
    }
    let rank = |pos: &str| {
        POS_LEGEND
            .iter()
            .position(|(tag, _)| *tag == pos)
            .unwrap_or(POS_LEGEND.len())
    };
    counts.sort_by_key(|(pos, _)| rank(pos));
    counts
}
