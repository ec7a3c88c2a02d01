/// Turn heading text into a navigation anchor
///
/// Lowercases, then joins the alphanumeric runs with `-`. Punctuation and
/// whitespace never survive, so the result is stable when fed back in.
pub fn slug(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
