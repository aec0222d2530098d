//! Text measurement hook, greedy wrapping, truncation, and number formats.

use crate::board_ir::{FontRole, TextSize};

/// Marker appended to truncated strings.
pub const ELLIPSIS: &str = "...";

/// Separator between min and max in a temperature range string.
///
/// The separator is a fixed convention of the board format, not a per-call
/// choice; it reads unambiguously next to signed temperatures.
pub const RANGE_SEPARATOR: &str = "..";

/// Text measurement hook for pixel-accurate line fitting.
pub trait TextMeasurer: Send + Sync {
    /// Measure rendered text extent for the provided role.
    fn measure(&self, text: &str, role: FontRole) -> TextSize;
}

/// Greedy word-wrap of `text` into lines no wider than `max_width`.
///
/// Whitespace-delimited words accumulate into the current line while the
/// measured candidate still fits. A single word wider than `max_width` is
/// emitted alone on its own line, never split. Empty input produces zero
/// lines. No hyphenation.
pub fn wrap_words(
    measurer: &dyn TextMeasurer,
    text: &str,
    role: FontRole,
    max_width: u32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let mut candidate = String::with_capacity(line.len() + 1 + word.len());
        candidate.push_str(&line);
        candidate.push(' ');
        candidate.push_str(word);
        if measurer.measure(&candidate, role).width <= max_width {
            line = candidate;
        } else {
            lines.push(core::mem::replace(&mut line, word.to_string()));
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Bound `text` to at most `max_chars` code points, appending [`ELLIPSIS`]
/// when truncated.
///
/// The boundary is inclusive of equality: text whose code-point count equals
/// `max_chars` is still truncated and grows by the ellipsis length. Tests
/// lock this asymmetry; it is part of the board's observable output.
pub fn truncate_chars(text: &str, max_chars: usize) -> std::borrow::Cow<'_, str> {
    if text.chars().count() < max_chars {
        return std::borrow::Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len().min(max_chars * 4) + ELLIPSIS.len());
    out.extend(text.chars().take(max_chars));
    out.push_str(ELLIPSIS);
    std::borrow::Cow::Owned(out)
}

/// Render a temperature as a signed, rounded integer string.
///
/// Rounds half away from zero. Zero renders as the bare digit `0` with no
/// sign, including negative values that round to zero.
pub fn format_temperature(value: f32) -> String {
    let rounded = value.round();
    if rounded == 0.0 {
        "0".to_string()
    } else if rounded > 0.0 {
        format!("+{}", rounded as i64)
    } else {
        format!("{}", rounded as i64)
    }
}

/// Compose a min/max temperature range string.
pub fn format_range(min: f32, max: f32) -> String {
    let mut out = format_temperature(min);
    out.push_str(RANGE_SEPARATOR);
    out.push_str(&format_temperature(max));
    out
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::TextMeasurer;
    use crate::board_ir::{FontRole, TextSize};

    /// Fixed-advance measurer: every code point is `advance` px wide and
    /// every line is `line_height` px tall, regardless of role.
    pub(crate) struct FixedMeasurer {
        pub advance: u32,
        pub line_height: u32,
    }

    impl TextMeasurer for FixedMeasurer {
        fn measure(&self, text: &str, _role: FontRole) -> TextSize {
            TextSize {
                width: text.chars().count() as u32 * self.advance,
                height: self.line_height,
            }
        }
    }
}
