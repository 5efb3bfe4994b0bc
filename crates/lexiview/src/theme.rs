// Colour palettes for the dashboard plus the POS-tag and entity-label colour
// tables used by the highlighting views.

use ratatui::style::Color;

/// Which palette is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}

impl ThemeMode {
    /// Parse a config / persisted value. Case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(ThemeMode::Dark),
            "light" => Some(ThemeMode::Light),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }
}

/// Resolved terminal colours for one theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub background: Color,
    pub surface: Color,
    pub surface_secondary: Color,
    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub border: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Palette {
                primary: hex("#6366f1"),
                secondary: hex("#8b5cf6"),
                background: hex("#f8fafc"),
                surface: hex("#ffffff"),
                surface_secondary: hex("#f1f5f9"),
                text: hex("#1e293b"),
                text_secondary: hex("#64748b"),
                text_muted: hex("#94a3b8"),
                border: hex("#e2e8f0"),
                success: hex("#10b981"),
                warning: hex("#f59e0b"),
                error: hex("#ef4444"),
                info: hex("#3b82f6"),
            },
            ThemeMode::Dark => Palette {
                primary: hex("#818cf8"),
                secondary: hex("#a78bfa"),
                background: hex("#0f172a"),
                surface: hex("#1e293b"),
                surface_secondary: hex("#334155"),
                text: hex("#f1f5f9"),
                text_secondary: hex("#cbd5e1"),
                text_muted: hex("#64748b"),
                border: hex("#334155"),
                success: hex("#34d399"),
                warning: hex("#fbbf24"),
                error: hex("#f87171"),
                info: hex("#60a5fa"),
            },
        }
    }
}

/// Fallback colour for unknown POS tags and entity labels.
const DEFAULT_TAG_HEX: &str = "#64748b";

/// Colour for a universal POS tag.
pub fn pos_color(pos: &str) -> Color {
    let h = match pos {
        "NOUN" | "NUM" | "PART" => "#fbbf24",
        "VERB" | "AUX" => "#34d399",
        "ADJ" => "#f87171",
        "ADV" => "#60a5fa",
        "PRON" | "INTJ" => "#a78bfa",
        "DET" => "#fb7185",
        "ADP" => "#fde047",
        "CONJ" | "CCONJ" | "SCONJ" => "#86efac",
        "PUNCT" | "SYM" => "#94a3b8",
        _ => DEFAULT_TAG_HEX,
    };
    hex(h)
}

/// Colour for a named-entity label.
pub fn entity_color(label: &str) -> Color {
    let h = match label {
        "PERSON" => "#ef4444",
        "ORG" => "#3b82f6",
        "GPE" => "#10b981",
        "MONEY" => "#f59e0b",
        "DATE" => "#8b5cf6",
        "TIME" => "#06b6d4",
        "PERCENT" => "#84cc16",
        _ => DEFAULT_TAG_HEX,
    };
    hex(h)
}

/// Parse `#rrggbb` into an RGB colour. Anything else maps to `Color::Reset`.
pub fn hex(s: &str) -> Color {
    let Some(digits) = s.strip_prefix('#') else {
        return Color::Reset;
    };
    if digits.len() != 6 || !digits.is_ascii() {
        return Color::Reset;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Reset,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
