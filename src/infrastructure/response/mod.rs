use once_cell::sync::Lazy;
use regex::Regex;

static CODE_FENCE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"```json|```").unwrap());

/// Removes Markdown code-fence markers and surrounding whitespace from an LLM
/// reply so the remainder can be decoded as JSON.
pub fn strip_code_fences(response: &str) -> String {
    CODE_FENCE_PATTERN
        .replace_all(response, "")
        .trim()
        .to_string()
}
