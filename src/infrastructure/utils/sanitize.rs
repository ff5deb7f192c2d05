use ammonia::Builder;

/// Upper bound on clean/decode rounds before falling back to escaped output.
const MAX_PASSES: usize = 8;

fn clean(input: &str) -> String {
    Builder::empty()
        .add_clean_content_tags(["script", "style"])
        .clean(input)
        .to_string()
}

fn decode_text_entities(input: &str) -> String {
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

/// Removes every HTML tag (and the content of `script`/`style`) from
/// free-form text, returning plain text.
///
/// Decoding can turn entity-encoded markup back into tags, so cleaning is
/// repeated until the text stops changing. Input that never settles is
/// returned in ammonia's escaped form.
pub fn strip_markup(input: &str) -> String {
    let mut current = input.to_string();
    for _ in 0..MAX_PASSES {
        let next = decode_text_entities(&clean(&current));
        if next == current {
            return next;
        }
        current = next;
    }
    clean(&current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_removed_text_is_kept() {
        assert_eq!(strip_markup("<b>Hello</b> world"), "Hello world");
        assert_eq!(strip_markup("Hi<script>alert(1)</script>!"), "Hi!");
    }

    #[test]
    fn plain_text_round_trips() {
        assert_eq!(strip_markup("Tom & Jerry's 3 > 2"), "Tom & Jerry's 3 > 2");
    }

    #[test]
    fn entity_encoded_markup_is_stripped() {
        let out = strip_markup("&lt;script&gt;alert(1)&lt;/script&gt; hello");
        assert_eq!(out.trim(), "hello");

        let doubled = strip_markup("&amp;lt;img src=x onerror=alert(1)&amp;gt;hi");
        assert!(!doubled.contains('<'));
        assert!(doubled.ends_with("hi"));
    }
}
