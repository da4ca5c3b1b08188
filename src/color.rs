use std::str::FromStr;

use eframe::egui::Color32;
use palette::Srgb;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Colour constants
// ---------------------------------------------------------------------------

pub const RED_HEX: &str = "#ff0000";
pub const BLUE_HEX: &str = "#0000ff";
pub const YELLOW_HEX: &str = "#ffff00";
pub const NEUTRAL_HEX: &str = "#808080";

/// Colours handed out, in order, to columns carrying no colour hint.
pub const FALLBACK_PALETTE: [&str; 20] = [
    "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231",
    "#911eb4", "#46f0f0", "#f032e6", "#bcf60c", "#fabebe",
    "#008080", "#e6beff", "#9a6324", "#fffac8", "#800000",
    "#aaffc3", "#808000", "#ffd8b1", "#000075", "#808080",
];

/// Opacity suffix appended to `#RRGGBB` to form the fill colour.
pub const FILL_ALPHA_HEX: &str = "66";
const FILL_ALPHA: u8 = 0x66;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Semantic colour bucket of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Red,
    Blue,
    Yellow,
    Neutral,
    Other,
}

impl Category {
    /// Category for a marker letter, case-insensitive.
    fn from_marker(ch: char) -> Option<Self> {
        match ch.to_ascii_uppercase() {
            'R' => Some(Category::Red),
            'B' => Some(Category::Blue),
            'Y' => Some(Category::Yellow),
            'N' => Some(Category::Neutral),
            _ => None,
        }
    }

    /// Fixed colour of a named category; `None` for `Other`.
    pub fn named_hex(self) -> Option<&'static str> {
        match self {
            Category::Red => Some(RED_HEX),
            Category::Blue => Some(BLUE_HEX),
            Category::Yellow => Some(YELLOW_HEX),
            Category::Neutral => Some(NEUTRAL_HEX),
            Category::Other => None,
        }
    }
}

/// Result of classifying one column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnColor {
    pub category: Category,
    pub hex: &'static str,
}

// ---------------------------------------------------------------------------
// Classifier session
// ---------------------------------------------------------------------------

/// Fallback-palette cursor shared by all columns of one chart generation.
///
/// The counter only grows; the palette position is taken modulo its length
/// when read, so the 21st unhinted column reuses the first fallback colour.
#[derive(Debug, Clone, Default)]
pub struct ClassifierSession {
    next_fallback: usize,
}

impl ClassifierSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fallback colours handed out so far.
    pub fn fallbacks_used(&self) -> usize {
        self.next_fallback
    }

    fn take_fallback(&mut self) -> &'static str {
        let hex = FALLBACK_PALETTE[self.next_fallback % FALLBACK_PALETTE.len()];
        self.next_fallback = self.next_fallback.wrapping_add(1);
        hex
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Map a column name to its colour.
///
/// Rules, first match wins:
/// 1. trailing `(X)` or `[X]`
/// 2. trailing `_X` / `-X` / `.X` / ` X`, or leading `X_` / `X-` / `X.` / `X `
/// 3. a token equal to `red`/`r`, then `blue`/`b`, then `yellow`/`y`,
///    then `neutral`/`n`/`gray`/`grey`
/// 4. next fallback colour from `session`
///
/// where `X` is one of R, B, Y, N in any case.  Only rule 4 touches the session.
pub fn classify(name: &str, session: &mut ClassifierSession) -> ColumnColor {
    let trimmed = name.trim();

    let category = bracket_marker(trimmed)
        .or_else(|| delimited_marker(trimmed))
        .or_else(|| token_match(trimmed));

    match category.and_then(|c| c.named_hex().map(|hex| (c, hex))) {
        Some((category, hex)) => ColumnColor { category, hex },
        None => ColumnColor {
            category: Category::Other,
            hex: session.take_fallback(),
        },
    }
}

fn is_marker_delimiter(ch: char) -> bool {
    matches!(ch, '_' | '-' | '.') || ch.is_whitespace()
}

/// `...(R)` or `...[b]` at the very end.
fn bracket_marker(s: &str) -> Option<Category> {
    let mut tail = s.chars().rev();
    let close = tail.next()?;
    let letter = tail.next()?;
    let open = tail.next()?;
    match (open, close) {
        ('(', ')') | ('[', ']') => Category::from_marker(letter),
        _ => None,
    }
}

/// `..._R` at the end, else `R-...` at the start.
fn delimited_marker(s: &str) -> Option<Category> {
    let suffix = {
        let mut tail = s.chars().rev();
        match (tail.next(), tail.next()) {
            (Some(letter), Some(delim)) if is_marker_delimiter(delim) => {
                Category::from_marker(letter)
            }
            _ => None,
        }
    };

    suffix.or_else(|| {
        let mut head = s.chars();
        match (head.next(), head.next()) {
            (Some(letter), Some(delim)) if is_marker_delimiter(delim) => {
                Category::from_marker(letter)
            }
            _ => None,
        }
    })
}

/// Whole-token colour words; `bright` or `tempr` never match.
fn token_match(s: &str) -> Option<Category> {
    let tokens: Vec<String> = s
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();
    let has_any = |words: &[&str]| tokens.iter().any(|t| words.contains(&t.as_str()));

    if has_any(&["red", "r"]) {
        Some(Category::Red)
    } else if has_any(&["blue", "b"]) {
        Some(Category::Blue)
    } else if has_any(&["yellow", "y"]) {
        Some(Category::Yellow)
    } else if has_any(&["neutral", "n", "gray", "grey"]) {
        Some(Category::Neutral)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Styling helpers
// ---------------------------------------------------------------------------

/// Fill colour for a border colour: `#RRGGBB` gains the opacity suffix,
/// any other form is returned unchanged.
pub fn fill_color(hex: &str) -> String {
    if hex.len() == 7 && hex.starts_with('#') {
        format!("{hex}{FILL_ALPHA_HEX}")
    } else {
        hex.to_string()
    }
}

/// Parse a `#RRGGBB` string into an egui colour, grey when unparseable.
pub fn hex_to_color32(hex: &str) -> Color32 {
    match Srgb::<u8>::from_str(hex) {
        Ok(rgb) => Color32::from_rgb(rgb.red, rgb.green, rgb.blue),
        Err(_) => {
            log::warn!("Unparseable colour {hex:?}, using grey");
            Color32::GRAY
        }
    }
}

/// Translucent variant of [`hex_to_color32`] used for filled areas.
pub fn hex_to_fill_color32(hex: &str) -> Color32 {
    let c = hex_to_color32(hex);
    Color32::from_rgba_unmultiplied(c.r(), c.g(), c.b(), FILL_ALPHA)
}
