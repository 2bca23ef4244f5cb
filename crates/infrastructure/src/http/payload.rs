//! Splitting of bodies that hold several JSON-like payloads.

/// Splits `body` into independent payloads.
///
/// Tracks brace/bracket depth and string-literal state character by
/// character. A split happens at a newline outside any payload, or right
/// after a closing `}`/`]` that returns to depth zero and is followed by a
/// line break or the end of input. Brackets inside strings (including after
/// `\"`) are ignored. Segments are trimmed and empty ones dropped.
#[must_use]
pub fn split_payloads(body: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if in_string {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                current.push(c);
            }
            '{' | '[' => {
                depth += 1;
                current.push(c);
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                current.push(c);
                if depth == 0 && matches!(chars.peek(), None | Some('\n' | '\r')) {
                    flush(&mut segments, &mut current);
                }
            }
            '\n' if depth == 0 => flush(&mut segments, &mut current),
            _ => current.push(c),
        }
    }
    flush(&mut segments, &mut current);

    segments
}

fn flush(segments: &mut Vec<String>, current: &mut String) {
    let segment = current.trim();
    if !segment.is_empty() {
        segments.push(segment.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_two_objects() {
        assert_eq!(split_payloads("{\"a\":1}\n{\"b\":2}"), vec!["{\"a\":1}", "{\"b\":2}"]);
    }

    #[test]
    fn test_brace_inside_string() {
        assert_eq!(split_payloads(r#"{"a":"x}y"}"#), vec![r#"{"a":"x}y"}"#]);
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let body = r#"{"a":"say \"}\" now"}"#;
        assert_eq!(split_payloads(body), vec![body]);
    }

    #[test]
    fn test_multiline_object_stays_whole() {
        let body = "{\n  \"a\": [1,\n 2]\n}\r\n[3]\r\n\r\n";
        assert_eq!(split_payloads(body), vec!["{\n  \"a\": [1,\n 2]\n}", "[3]"]);
    }

    #[test]
    fn test_plain_lines_and_empty_input() {
        assert_eq!(split_payloads("one\n\ntwo"), vec!["one", "two"]);
        assert!(split_payloads("").is_empty());
        assert!(split_payloads("\n\n").is_empty());
    }
}
