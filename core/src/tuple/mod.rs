//! Tuple literal codec for state-manager argument text
//!
//! The remote service expresses the arguments a state-manager invocation
//! consumes as a flat tuple literal, e.g. `"(prev!(position), velocity)"`.
//! This module isolates that syntax into one reversible pair of pure
//! functions plus two positional helpers used by the editing layer.
//!
//! # Edge case policy
//!
//! Malformed text never raises. Anything that is not a parenthesized
//! comma-separated list decodes to "no arguments", which lets a user
//! recover from a typo by simply retyping the field.

/// Decode a tuple literal into its trimmed elements
///
/// Returns an empty vector when `text` is not of the form
/// `( elem, elem, ... )`. The empty tuple `"()"` also decodes to an
/// empty vector. Elements are trimmed but otherwise untouched, so a
/// trailing comma yields a trailing empty element, exactly as the wire
/// syntax treats it.
///
/// # Example
/// ```
/// use nbody_studio_core::tuple;
///
/// assert_eq!(tuple::decode("(a, b)"), vec!["a", "b"]);
/// assert_eq!(tuple::decode("not-a-tuple"), Vec::<String>::new());
/// assert_eq!(tuple::decode("()"), Vec::<String>::new());
/// ```
pub fn decode(text: &str) -> Vec<String> {
    let trimmed = text.trim();

    let inner = match trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        Some(inner) => inner,
        None => return Vec::new(),
    };

    if inner.is_empty() {
        return Vec::new();
    }

    inner.split(',').map(|part| part.trim().to_string()).collect()
}

/// Encode elements into the canonical tuple literal form
///
/// Elements are joined with `", "` and wrapped in parentheses. The
/// output is the canonical form: for elements with no embedded commas
/// or parentheses, `decode(encode(parts)) == parts`.
///
/// # Example
/// ```
/// use nbody_studio_core::tuple;
///
/// assert_eq!(tuple::encode(&["a".into(), "b".into()]), "(a, b)");
/// ```
pub fn encode(parts: &[String]) -> String {
    format!("({})", parts.join(", "))
}

/// Sparse-safe positional getter
///
/// Returns the decoded element at `index`, or an empty string when the
/// decoded sequence is shorter. Used by the editing layer to render an
/// argument field that has not been filled in yet.
pub fn part(text: &str, index: usize) -> String {
    decode(text).into_iter().nth(index).unwrap_or_default()
}

/// Replace one positional element, re-encoding the whole literal
///
/// Decodes `text`, grows the element sequence with empty strings up to
/// `index`, sets the element, and re-encodes. The caller replaces the
/// whole `consumed` field with the returned text, so observers never
/// see a partial update.
pub fn set_part(text: &str, index: usize, value: &str) -> String {
    let mut parts = decode(text);
    if parts.len() <= index {
        parts.resize(index + 1, String::new());
    }
    parts[index] = value.to_string();
    encode(&parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_unbalanced_parens() {
        assert!(decode("(a, b").is_empty());
        assert!(decode("a, b)").is_empty());
    }

    #[test]
    fn decode_keeps_trailing_empty_element() {
        assert_eq!(decode("(a,)"), vec!["a".to_string(), String::new()]);
    }

    #[test]
    fn decode_handles_multiline_literals() {
        let text = "(\n  prev!(time),\n  timeStep\n)";
        assert_eq!(decode(text), vec!["prev!(time)", "timeStep"]);
    }

    #[test]
    fn set_part_pads_with_empties() {
        assert_eq!(set_part("", 2, "c"), "(, , c)");
    }
}
