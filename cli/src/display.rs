use anyhow::Result;
use regex::{Regex, RegexBuilder};

const SNIPPET_BEFORE: usize = 100;
const SNIPPET_AFTER: usize = 200;
const HIGHLIGHT_OPEN: &str = "\x1b[1m";
const HIGHLIGHT_CLOSE: &str = "\x1b[0m";

/// Case-insensitive whole-word matcher for a set of query terms.
pub struct Highlighter {
    re: Option<Regex>,
}

impl Highlighter {
    pub fn new(terms: &[String]) -> Result<Self> {
        let alternation: Vec<String> = terms
            .iter()
            .filter(|t| !t.trim().is_empty())
            .map(|t| regex::escape(t))
            .collect();
        if alternation.is_empty() {
            return Ok(Self { re: None });
        }
        let re = RegexBuilder::new(&format!(r"\b(?:{})\b", alternation.join("|")))
            .case_insensitive(true)
            .build()?;
        Ok(Self { re: Some(re) })
    }

    /// A window of `text` around the first matching term, or its beginning.
    pub fn snippet(&self, text: &str) -> String {
        let first = self.re.as_ref().and_then(|re| re.find(text)).map(|m| m.start());
        let window = match first {
            Some(idx) => {
                let start = floor_boundary(text, idx.saturating_sub(SNIPPET_BEFORE));
                let end = ceil_boundary(text, (idx + SNIPPET_AFTER).min(text.len()));
                &text[start..end]
            }
            None => &text[..ceil_boundary(text, SNIPPET_AFTER.min(text.len()))],
        };
        let flat = window.split_whitespace().collect::<Vec<_>>().join(" ");
        self.highlight(&flat)
    }

    pub fn highlight(&self, text: &str) -> String {
        match &self.re {
            Some(re) => re
                .replace_all(text, |caps: &regex::Captures| {
                    format!("{HIGHLIGHT_OPEN}{}{HIGHLIGHT_CLOSE}", &caps[0])
                })
                .into_owned(),
            None => text.to_string(),
        }
    }
}

fn floor_boundary(text: &str, mut i: usize) -> usize {
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_boundary(text: &str, mut i: usize) -> usize {
    while !text.is_char_boundary(i) {
        i += 1;
    }
    i
}
