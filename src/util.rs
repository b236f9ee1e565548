use once_cell::sync::Lazy;
use regex::Regex;

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("invalid regex")
}

static BOLD: Lazy<Regex> = Lazy::new(|| re(r"\*\*(.*?)\*\*"));
static EMPHASIS: Lazy<Regex> = Lazy::new(|| re(r"\*(.*?)\*"));
static ITALIC: Lazy<Regex> = Lazy::new(|| re(r"_(.*?)_"));
static CODE: Lazy<Regex> = Lazy::new(|| re(r"`(.*?)`"));
static HEADING: Lazy<Regex> = Lazy::new(|| re(r"(?m)^#{1,6}\s*"));
// "and ## Head": two or more hashes mid-line, directly before a word
static INLINE_HEADING: Lazy<Regex> = Lazy::new(|| re(r"([ \t])#{2,6}[ \t]+(\w)"));
static BLANK_RUN: Lazy<Regex> = Lazy::new(|| re(r"\n{3,}"));

/// Strip lightweight markdown decorations from model output, leaving prose.
pub fn clean_markdown(text: &str) -> String {
    let text = BOLD.replace_all(text, "$1");
    let text = EMPHASIS.replace_all(&text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = CODE.replace_all(&text, "$1");
    let text = HEADING.replace_all(&text, "");
    let text = INLINE_HEADING.replace_all(&text, "${1}${2}");
    let text = BLANK_RUN.replace_all(&text, "\n\n");
    text.trim().to_string()
}
