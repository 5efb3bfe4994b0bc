// Formatting for the model-written explanations attached to CFG and
// semantic-role results.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Plain(String),
    Bold(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    Bullets {
        intro: Option<String>,
        items: Vec<Vec<Inline>>,
    },
}

const BULLET_MARKER: &str = "\n-   ";

/// Text to show for an explanation that may itself be JSON.
///
/// An object with a non-empty `justification` shows that field, a JSON string
/// is unwrapped, any other object is pretty-printed. Non-JSON is used as-is.
pub fn display_text(content: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<Value>(content) else {
        return content.to_string();
    };
    match &parsed {
        Value::Object(map) => match map.get("justification") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(v) if is_truthy(v) => v.to_string(),
            _ => serde_json::to_string_pretty(&parsed).unwrap_or_else(|_| content.to_string()),
        },
        Value::String(s) => s.clone(),
        Value::Array(_) => {
            serde_json::to_string_pretty(&parsed).unwrap_or_else(|_| content.to_string())
        }
        other => other.to_string(),
    }
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Split an explanation into paragraphs and bullet lists.
pub fn format_help(content: &str) -> Vec<Block> {
    let text = display_text(content).replace("\\n", "\n");

    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|para| {
            if para.contains(BULLET_MARKER) {
                let mut parts = para.split(BULLET_MARKER);
                let intro = parts
                    .next()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string);
                let items = parts.map(bold_spans).collect();
                Block::Bullets { intro, items }
            } else {
                Block::Paragraph(bold_spans(para))
            }
        })
        .collect()
}

/// Split `**bold**` runs out of a line of text. Bold runs do not cross
/// newlines; an unmatched `**` is left as plain text.
pub fn bold_spans(text: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find("**") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("**") else {
            break;
        };
        let inner = &after_open[..close];
        if inner.contains('\n') {
            // Not a bold run; keep the opener as text and move past it.
            out.push(Inline::Plain(rest[..open + 2].to_string()));
            rest = after_open;
            continue;
        }
        if open > 0 {
            out.push(Inline::Plain(rest[..open].to_string()));
        }
        if !inner.is_empty() {
            out.push(Inline::Bold(inner.to_string()));
        }
        rest = &after_open[close + 2..];
    }
    if !rest.is_empty() {
        out.push(Inline::Plain(rest.to_string()));
    }
    merge_plain(out)
}

fn merge_plain(spans: Vec<Inline>) -> Vec<Inline> {
    let mut merged: Vec<Inline> = Vec::with_capacity(spans.len());
    for span in spans {
        match (merged.last_mut(), span) {
            (Some(Inline::Plain(prev)), Inline::Plain(next)) => prev.push_str(&next),
            (_, span) => merged.push(span),
        }
    }
    merged
}
