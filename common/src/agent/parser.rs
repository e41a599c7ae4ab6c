use once_cell::sync::Lazy;
use regex::Regex;

static FENCE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"```[a-zA-Z]*").unwrap());

/// remove markdown code-fence markers (with or without a language tag) and trim
pub fn strip_code_fences(raw: &str) -> String {
    let text = FENCE_REGEX.replace_all(raw.trim(), "");
    text.replace("```", "").trim().to_string()
}
