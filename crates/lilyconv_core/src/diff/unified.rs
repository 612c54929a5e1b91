use super::escape::escape_html;
use super::matcher::{SequenceMatcher, Tag};

/// Context lines around each hunk.
pub const UNIFIED_CONTEXT: usize = 3;

/// Unified diff lines (without terminators) of `original` against
/// `converted`, both split on `'\n'`.
///
/// Identical texts produce an empty list.
pub fn unified_diff_lines(
    original: &str,
    converted: &str,
    from_label: &str,
    to_label: &str,
) -> Vec<String> {
    let a: Vec<&str> = original.split('\n').collect();
    let b: Vec<&str> = converted.split('\n').collect();
    let matcher = SequenceMatcher::new(&a, &b);

    let mut lines = Vec::new();
    for group in matcher.grouped_opcodes(UNIFIED_CONTEXT) {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        if lines.is_empty() {
            lines.push(format!("--- {from_label}"));
            lines.push(format!("+++ {to_label}"));
        }
        lines.push(format!(
            "@@ -{} +{} @@",
            format_range(first.i1, last.i2),
            format_range(first.j1, last.j2)
        ));

        for code in &group {
            if code.tag == Tag::Equal {
                lines.extend(a[code.i1..code.i2].iter().map(|line| format!(" {line}")));
                continue;
            }
            if matches!(code.tag, Tag::Replace | Tag::Delete) {
                lines.extend(a[code.i1..code.i2].iter().map(|line| format!("-{line}")));
            }
            if matches!(code.tag, Tag::Replace | Tag::Insert) {
                lines.extend(b[code.j1..code.j2].iter().map(|line| format!("+{line}")));
            }
        }
    }
    lines
}

/// Plain-text unified diff, lines joined with `'\n'`.
pub fn unified_diff(original: &str, converted: &str, from_label: &str, to_label: &str) -> String {
    unified_diff_lines(original, converted, from_label, to_label).join("\n")
}

/// Colourise unified diff lines for a rich-text view.
///
/// Each line is escaped and wrapped in a `span`; deletions are red,
/// insertions green. Lines are joined with `<br>`.
pub fn highlight_unified(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| {
            let style = if line.starts_with('-') {
                "color: red; white-space: pre-wrap;"
            } else if line.starts_with('+') {
                "color: green; white-space: pre-wrap;"
            } else {
                "white-space: pre-wrap;"
            };
            format!("<span style=\"{style}\">{}</span>", escape_html(line))
        })
        .collect::<Vec<_>>()
        .join("<br>")
}

fn format_range(start: usize, stop: usize) -> String {
    // Ranges are 1-based; an empty range names the line before it.
    let length = stop - start;
    match length {
        0 => format!("{start},0"),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, length),
    }
}

#[cfg(test)]
mod tests {
    use super::{format_range, highlight_unified};

    #[test]
    fn ranges_follow_unified_conventions() {
        assert_eq!(format_range(0, 0), "0,0");
        assert_eq!(format_range(4, 4), "4,0");
        assert_eq!(format_range(2, 3), "3");
        assert_eq!(format_range(0, 7), "1,7");
    }

    #[test]
    fn highlight_escapes_before_wrapping() {
        let lines = vec!["-a < b".to_string(), "+a & b".to_string(), " >".to_string()];
        assert_eq!(
            highlight_unified(&lines),
            "<span style=\"color: red; white-space: pre-wrap;\">-a &lt; b</span><br>\
             <span style=\"color: green; white-space: pre-wrap;\">+a &amp; b</span><br>\
             <span style=\"white-space: pre-wrap;\"> &gt;</span>"
        );
    }
}
