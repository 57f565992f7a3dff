use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_ALNUM: Regex = Regex::new(r"[^\p{L}\p{N}]+").expect("valid regex");
}

/// Lowercase and collapse every run of non-alphanumeric characters into one space.
///
/// This is the rule shared by the vocabulary builder and the embedding loader;
/// both sides must agree or lookups silently miss.
pub fn clean_text(text: &str) -> String {
    NON_ALNUM.replace_all(&text.to_lowercase(), " ").into_owned()
}

/// Cleaned, whitespace-separated tokens in document order.
pub fn tokenize(text: &str) -> Vec<String> {
    clean_text(text).split_whitespace().map(str::to_owned).collect()
}
