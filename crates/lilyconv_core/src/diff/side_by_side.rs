//! Two-column HTML diff with intraline highlighting.

use super::escape::{escape_html, expand_tabs};
use super::matcher::{Opcode, SequenceMatcher, Tag};

const ADDED_STYLE: &str = "background-color:#aaffaa";
const CHANGED_STYLE: &str = "background-color:#ffff77";
const REMOVED_STYLE: &str = "background-color:#ffaaaa";
const HEADER_STYLE: &str = "background-color:#e0e0e0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideBySideOptions {
    /// Wrap cell text after this many characters; `None` disables wrapping.
    pub wrap_column: Option<usize>,
    pub tab_size: usize,
}

impl Default for SideBySideOptions {
    fn default() -> Self {
        Self {
            wrap_column: None,
            tab_size: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Same,
    Added,
    Removed,
    Changed,
}

impl Mark {
    fn style(self) -> Option<&'static str> {
        match self {
            Mark::Same => None,
            Mark::Added => Some(ADDED_STYLE),
            Mark::Removed => Some(REMOVED_STYLE),
            Mark::Changed => Some(CHANGED_STYLE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    mark: Mark,
    text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LineNumber {
    Number(usize),
    Continuation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Cell {
    number: LineNumber,
    segments: Vec<Segment>,
}

type Row = (Option<Cell>, Option<Cell>);

/// Render `original` and `converted` side by side as an HTML table.
pub fn side_by_side_html(
    original: &str,
    converted: &str,
    from_desc: &str,
    to_desc: &str,
    options: SideBySideOptions,
) -> String {
    let a: Vec<String> = original
        .lines()
        .map(|line| expand_tabs(line, options.tab_size))
        .collect();
    let b: Vec<String> = converted
        .lines()
        .map(|line| expand_tabs(line, options.tab_size))
        .collect();

    let mut html = String::new();
    html.push_str("<table cellspacing=\"0\" cellpadding=\"0\" rules=\"groups\">\n");
    html.push_str("<colgroup></colgroup><colgroup></colgroup>");
    html.push_str("<colgroup></colgroup><colgroup></colgroup>\n");
    html.push_str(&format!(
        "<thead><tr><th colspan=\"2\" style=\"{HEADER_STYLE}\">{}</th>\
         <th colspan=\"2\" style=\"{HEADER_STYLE}\">{}</th></tr></thead>\n",
        escape_html(from_desc),
        escape_html(to_desc)
    ));
    html.push_str("<tbody>\n");
    for (left, right) in build_rows(&a, &b, options.wrap_column) {
        html.push_str("<tr>");
        render_cell(&mut html, left.as_ref());
        render_cell(&mut html, right.as_ref());
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>");
    html
}

fn build_rows(a: &[String], b: &[String], wrap_column: Option<usize>) -> Vec<Row> {
    let matcher = SequenceMatcher::new(a, b);
    let mut rows = Vec::new();
    for code in matcher.opcodes() {
        for (left, right) in aligned_cells(a, b, &code) {
            push_wrapped(&mut rows, left, right, wrap_column);
        }
    }
    rows
}

fn aligned_cells(a: &[String], b: &[String], code: &Opcode) -> Vec<Row> {
    let whole = |mark: Mark, number: usize, text: &str| Cell {
        number: LineNumber::Number(number + 1),
        segments: vec![Segment {
            mark,
            text: text.to_string(),
        }],
    };

    match code.tag {
        Tag::Equal => (code.i1..code.i2)
            .zip(code.j1..code.j2)
            .map(|(i, j)| (Some(whole(Mark::Same, i, &a[i])), Some(whole(Mark::Same, j, &b[j]))))
            .collect(),
        Tag::Delete => (code.i1..code.i2)
            .map(|i| (Some(whole(Mark::Removed, i, &a[i])), None))
            .collect(),
        Tag::Insert => (code.j1..code.j2)
            .map(|j| (None, Some(whole(Mark::Added, j, &b[j]))))
            .collect(),
        Tag::Replace => {
            let paired = (code.i2 - code.i1).min(code.j2 - code.j1);
            let mut rows = Vec::with_capacity((code.i2 - code.i1).max(code.j2 - code.j1));
            for k in 0..paired {
                let (i, j) = (code.i1 + k, code.j1 + k);
                let (left, right) = intraline(&a[i], &b[j]);
                rows.push((
                    Some(Cell {
                        number: LineNumber::Number(i + 1),
                        segments: left,
                    }),
                    Some(Cell {
                        number: LineNumber::Number(j + 1),
                        segments: right,
                    }),
                ));
            }
            for i in code.i1 + paired..code.i2 {
                rows.push((Some(whole(Mark::Removed, i, &a[i])), None));
            }
            for j in code.j1 + paired..code.j2 {
                rows.push((None, Some(whole(Mark::Added, j, &b[j]))));
            }
            rows
        }
    }
}

/// Character-level highlighting of one replaced line pair.
fn intraline(old: &str, new: &str) -> (Vec<Segment>, Vec<Segment>) {
    let a: Vec<char> = old.chars().collect();
    let b: Vec<char> = new.chars().collect();
    let matcher = SequenceMatcher::new(&a, &b);

    let mut left = Vec::new();
    let mut right = Vec::new();
    for code in matcher.opcodes() {
        let old_part: String = a[code.i1..code.i2].iter().collect();
        let new_part: String = b[code.j1..code.j2].iter().collect();
        let (left_mark, right_mark) = match code.tag {
            Tag::Equal => (Mark::Same, Mark::Same),
            Tag::Replace => (Mark::Changed, Mark::Changed),
            Tag::Delete => (Mark::Removed, Mark::Same),
            Tag::Insert => (Mark::Same, Mark::Added),
        };
        push_segment(&mut left, left_mark, old_part);
        push_segment(&mut right, right_mark, new_part);
    }
    (left, right)
}

fn push_segment(segments: &mut Vec<Segment>, mark: Mark, text: String) {
    if text.is_empty() {
        return;
    }
    match segments.last_mut() {
        Some(last) if last.mark == mark => last.text.push_str(&text),
        _ => segments.push(Segment { mark, text }),
    }
}

fn push_wrapped(rows: &mut Vec<Row>, left: Option<Cell>, right: Option<Cell>, wrap: Option<usize>) {
    let left = left.map(|cell| wrap_cell(cell, wrap)).unwrap_or_default();
    let right = right.map(|cell| wrap_cell(cell, wrap)).unwrap_or_default();
    let count = left.len().max(right.len());
    let mut left = left.into_iter();
    let mut right = right.into_iter();
    for _ in 0..count {
        rows.push((left.next(), right.next()));
    }
}

fn wrap_cell(cell: Cell, wrap: Option<usize>) -> Vec<Cell> {
    let Some(width) = wrap.filter(|w| *w > 0) else {
        return vec![cell];
    };

    let mut chunks = vec![Cell {
        number: cell.number,
        segments: Vec::new(),
    }];
    let mut used = 0;
    for segment in cell.segments {
        let mut rest: Vec<char> = segment.text.chars().collect();
        while !rest.is_empty() {
            if used == width {
                chunks.push(Cell {
                    number: LineNumber::Continuation,
                    segments: Vec::new(),
                });
                used = 0;
            }
            let take = (width - used).min(rest.len());
            let piece: String = rest.drain(..take).collect();
            used += take;
            if let Some(current) = chunks.last_mut() {
                push_segment(&mut current.segments, segment.mark, piece);
            }
        }
    }
    chunks
}

fn render_cell(html: &mut String, cell: Option<&Cell>) {
    let Some(cell) = cell else {
        html.push_str(&format!("<td style=\"{HEADER_STYLE}\"></td><td></td>"));
        return;
    };

    let number = match cell.number {
        LineNumber::Number(n) => n.to_string(),
        LineNumber::Continuation => "&gt;".to_string(),
    };
    html.push_str(&format!(
        "<td style=\"{HEADER_STYLE}\">{number}</td><td nowrap=\"nowrap\">"
    ));
    for segment in &cell.segments {
        let text = escape_html(&segment.text).replace(' ', "&nbsp;");
        match segment.mark.style() {
            Some(style) => html.push_str(&format!("<span style=\"{style}\">{text}</span>")),
            None => html.push_str(&text),
        }
    }
    html.push_str("</td>");
}
