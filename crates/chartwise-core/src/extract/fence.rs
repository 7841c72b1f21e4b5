//! Code-fence stripping and balanced JSON span search.

const FENCE: &str = "```";

/// Trim `text` and strip a leading fence (optionally tagged `json`) and a trailing fence.
pub fn strip_code_fences(text: &str) -> &str {
    let mut s = text.trim();

    if let Some(rest) = s.strip_prefix(FENCE) {
        s = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
        s = s.trim_start();
    }

    if let Some(rest) = s.strip_suffix(FENCE) {
        s = rest;
    }

    s.trim()
}

/// Find the first balanced `open ... close` span in `text`.
///
/// Brackets inside JSON string literals are ignored. Returns `None` if no
/// opening bracket has a matching close.
pub fn find_balanced(text: &str, open: char, close: char) -> Option<&str> {
    balanced_spans(text, open, close).next()
}

/// Every balanced span in `text`, in order of their opening bracket.
pub(crate) fn balanced_spans(
    text: &str,
    open: char,
    close: char,
) -> impl Iterator<Item = &str> + '_ {
    text.char_indices()
        .filter(move |&(_, c)| c == open)
        .filter_map(move |(start, _)| {
            span_end(&text[start..], open, close).map(|len| &text[start..start + len])
        })
}

/// Byte length of the balanced span at the start of `s`, which begins with `open`.
fn span_end(s: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        if c == '"' {
            in_string = true;
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(i + c.len_utf8());
            }
        }
    }

    None
}
