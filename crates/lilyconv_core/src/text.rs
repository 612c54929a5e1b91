/// Column used when tool messages are folded into a document comment.
pub const COMMENT_FILL_WIDTH: usize = 70;

const FILL_TAB_SIZE: usize = 8;

/// Wrap `text` into lines of at most `width` columns.
///
/// Tabs are expanded and every whitespace character becomes a space; runs of
/// spaces inside a line are kept, the ones at a line break are dropped.
/// Words longer than `width` are split.
pub fn fill(text: &str, width: usize) -> String {
    let width = width.max(1);
    let mut chunks = chunks(&flatten_whitespace(text));
    chunks.reverse();

    let mut lines: Vec<String> = Vec::new();
    while !chunks.is_empty() {
        if !lines.is_empty() && chunks.last().is_some_and(|c| is_blank(c)) {
            chunks.pop();
        }

        let mut line: Vec<String> = Vec::new();
        let mut line_len = 0;
        while let Some(len) = chunks.last().map(|c| c.chars().count()) {
            if line_len + len > width {
                break;
            }
            line_len += len;
            line.extend(chunks.pop());
        }

        if let Some(chunk) = chunks.last_mut() {
            let room = width - line_len;
            if chunk.chars().count() > width && room > 0 {
                let split = chunk
                    .char_indices()
                    .nth(room)
                    .map_or(chunk.len(), |(at, _)| at);
                let rest = chunk.split_off(split);
                line.push(std::mem::replace(chunk, rest));
            }
        }

        if line.last().is_some_and(|c| is_blank(c)) {
            line.pop();
        }
        if !line.is_empty() {
            lines.push(line.concat());
        }
    }
    lines.join("\n")
}

fn flatten_whitespace(text: &str) -> String {
    let mut flat = String::with_capacity(text.len());
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                let pad = FILL_TAB_SIZE - column % FILL_TAB_SIZE;
                flat.extend(std::iter::repeat(' ').take(pad));
                column += pad;
            }
            '\n' | '\r' => {
                flat.push(' ');
                column = 0;
            }
            '\x0b' | '\x0c' => {
                flat.push(' ');
                column += 1;
            }
            _ => {
                flat.push(c);
                column += 1;
            }
        }
    }
    flat
}

/// Alternating runs of spaces and of everything else.
fn chunks(text: &str) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    for c in text.chars() {
        match chunks.last_mut() {
            Some(last) if last.starts_with(' ') == (c == ' ') => last.push(c),
            _ => chunks.push(c.to_string()),
        }
    }
    chunks
}

fn is_blank(chunk: &str) -> bool {
    chunk.starts_with(' ')
}

/// `converted` followed by the tool messages in a LilyPond block comment.
pub fn append_messages_comment(converted: &str, messages: &str) -> String {
    format!(
        "{converted}\n\n%{{\n{}\n%}}\n",
        fill(messages, COMMENT_FILL_WIDTH)
    )
}
