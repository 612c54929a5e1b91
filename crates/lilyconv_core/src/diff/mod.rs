//! Text diff rendering: side-by-side HTML and unified diff.
mod escape;
mod matcher;
mod side_by_side;
mod unified;

pub use escape::{escape_html, expand_tabs};
pub use matcher::{Match, Opcode, SequenceMatcher, Tag};
pub use side_by_side::{side_by_side_html, SideBySideOptions};
pub use unified::{highlight_unified, unified_diff, unified_diff_lines, UNIFIED_CONTEXT};

/// The unified diff of a conversion in both of its presentations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnifiedDiff {
    /// Plain text, lines joined with `'\n'`.
    pub text: String,
    /// Escaped, colourised spans joined with `<br>`.
    pub html: String,
}

impl UnifiedDiff {
    pub fn compute(original: &str, converted: &str, from_label: &str, to_label: &str) -> Self {
        let lines = unified_diff_lines(original, converted, from_label, to_label);
        Self {
            html: highlight_unified(&lines),
            text: lines.join("\n"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
