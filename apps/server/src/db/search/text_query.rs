//! Free-text query compilation.
//!
//! Compiles user input into a `to_tsquery('simple', …)` expression where
//! every token is a prefix match: `red shoes` → `red:* & shoes:*`. Maximal
//! runs of ASCII letters/digits become tokens; everything else is a
//! separator and is dropped, never escaped. An empty result means "no text
//! filter" and the composer must not emit a text predicate for it.

/// Compile `input` into an AND-joined prefix tsquery string.
///
/// Never fails: input with no alphanumeric content yields an empty string.
pub fn compile_prefix_query(input: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            current.push(c.to_ascii_lowercase());
        } else if !current.is_empty() {
            parts.push(format!("{current}:*"));
            current.clear();
        }
    }
    if !current.is_empty() {
        parts.push(format!("{current}:*"));
    }

    parts.join(" & ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_compiles_to_nothing() {
        assert_eq!(compile_prefix_query(""), "");
        assert_eq!(compile_prefix_query("   "), "");
    }

    #[test]
    fn punctuation_only_compiles_to_nothing() {
        assert_eq!(compile_prefix_query("!!! ???"), "");
        assert_eq!(compile_prefix_query("&|:*()"), "");
    }

    #[test]
    fn tokens_are_lowercased_prefix_matches() {
        assert_eq!(compile_prefix_query("Red Shoes"), "red:* & shoes:*");
    }

    #[test]
    fn punctuation_splits_tokens() {
        assert_eq!(compile_prefix_query("usb-c hub"), "usb:* & c:* & hub:*");
        assert_eq!(compile_prefix_query("4k@60Hz"), "4k:* & 60hz:*");
    }

    #[test]
    fn non_ascii_characters_are_separators() {
        // Unicode letters are not tokens; only the ASCII runs survive.
        assert_eq!(compile_prefix_query("café au lait"), "caf:* & au:* & lait:*");
    }

    #[test]
    fn injection_characters_cannot_reach_the_query() {
        // tsquery metacharacters are separators, so hostile input degrades
        // to plain tokens.
        assert_eq!(
            compile_prefix_query("shoes' | (droptable:*"),
            "shoes:* & droptable:*"
        );
    }
}
