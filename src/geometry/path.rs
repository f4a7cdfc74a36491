/// Command letters recognized by the tokenizer, either case.
const COMMANDS: &[char] = &['M', 'L', 'H', 'V', 'C', 'S', 'Q', 'T', 'A', 'Z'];

fn is_command(c: char) -> bool {
    COMMANDS.contains(&c.to_ascii_uppercase())
}

/// Splits a raw path string into tokens: command letters and numbers.
///
/// Whitespace and commas separate tokens; a command letter is always its own
/// token; a `-` starts a new number unless it follows an exponent marker, so
/// compact forms like `M10-20` survive.
pub(crate) fn tokenize(path: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut buf = String::new();

    let flush = |buf: &mut String, tokens: &mut Vec<String>| {
        if !buf.is_empty() {
            tokens.push(std::mem::take(buf));
        }
    };

    for c in path.chars() {
        if is_command(c) {
            flush(&mut buf, &mut tokens);
            tokens.push(c.to_string());
        } else if c.is_whitespace() || c == ',' {
            flush(&mut buf, &mut tokens);
        } else if c == '-' && !buf.is_empty() && !buf.ends_with(['e', 'E']) {
            flush(&mut buf, &mut tokens);
            buf.push(c);
        } else {
            buf.push(c);
        }
    }
    flush(&mut buf, &mut tokens);
    tokens
}

/// Splits a raw path string into closed sub-contour strings.
///
/// Every move command starts a new sub-contour and every close command
/// terminates the current one. Any sub-contour lacking a close command gets
/// a `Z` appended; malformed input is normalized, never rejected. Empty
/// input yields an empty list.
#[must_use]
pub fn split_contours(path: &str) -> Vec<String> {
    let mut contours = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for token in tokenize(path) {
        if token.eq_ignore_ascii_case("m") {
            if !current.is_empty() {
                current.push("Z".to_string());
                contours.push(current.join(" "));
                current.clear();
            }
            current.push(token);
        } else if token.eq_ignore_ascii_case("z") {
            if !current.is_empty() {
                current.push("Z".to_string());
                contours.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(token);
        }
    }

    if !current.is_empty() {
        current.push("Z".to_string());
        contours.push(current.join(" "));
    }

    contours
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn single_closed_contour_passes_through() {
        let contours = split_contours("M 0 0 L 10 0 L 10 10 Z");
        assert_eq!(contours, vec!["M 0 0 L 10 0 L 10 10 Z"]);
    }

    #[test]
    fn move_starts_new_contour() {
        let contours = split_contours("M 0 0 L 10 0 Z M 20 20 L 30 20 Z");
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0], "M 0 0 L 10 0 Z");
        assert_eq!(contours[1], "M 20 20 L 30 20 Z");
    }

    #[test]
    fn trailing_contour_gets_forced_close() {
        let contours = split_contours("M 0 0 L 10 0 L 10 10");
        assert_eq!(contours, vec!["M 0 0 L 10 0 L 10 10 Z"]);
    }

    #[test]
    fn unclosed_middle_contour_gets_forced_close() {
        let contours = split_contours("M 0 0 L 1 1 M 2 2 L 3 3 Z");
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0], "M 0 0 L 1 1 Z");
        assert_eq!(contours[1], "M 2 2 L 3 3 Z");
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(split_contours("").is_empty());
        assert!(split_contours("   ").is_empty());
    }

    #[test]
    fn stray_close_before_any_move_ignored() {
        let contours = split_contours("Z M 0 0 L 1 0 Z");
        assert_eq!(contours, vec!["M 0 0 L 1 0 Z"]);
    }

    #[test]
    fn commas_and_packed_commands_tolerated() {
        let contours = split_contours("M0,0L10,0L10,10z");
        assert_eq!(contours, vec!["M 0 0 L 10 0 L 10 10 Z"]);
    }

    #[test]
    fn compact_negative_coordinates_split() {
        let contours = split_contours("M10-20L30-40Z");
        assert_eq!(contours, vec!["M 10 -20 L 30 -40 Z"]);
    }

    #[test]
    fn relative_commands_keep_their_case() {
        let contours = split_contours("m 5 5 l 1 0 l 0 1 z");
        assert_eq!(contours, vec!["m 5 5 l 1 0 l 0 1 Z"]);
    }

    #[test]
    fn exponent_numbers_stay_whole() {
        let tokens = tokenize("M 1e-3 2.5E-2 L 1 1");
        assert_eq!(tokens, vec!["M", "1e-3", "2.5E-2", "L", "1", "1"]);
    }
}
