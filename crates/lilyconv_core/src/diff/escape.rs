/// Escape `&`, `<` and `>`, in that order.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Replace tabs with spaces up to the next multiple of `tab_size`.
pub fn expand_tabs(line: &str, tab_size: usize) -> String {
    if !line.contains('\t') || tab_size == 0 {
        return line.to_string();
    }
    let mut expanded = String::with_capacity(line.len() + tab_size);
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = tab_size - column % tab_size;
            expanded.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            expanded.push(c);
            column += 1;
        }
    }
    expanded
}
