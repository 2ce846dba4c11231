use std::collections::{HashMap, HashSet};

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

pub const MIN_WORD_LENGTH: usize = 4;
pub const TOP_KEYWORDS_COUNT: usize = 15;

const STOPWORDS: &[&str] = &[
    "this", "that", "with", "from", "have", "will", "your", "they", "been", "were", "their",
    "there", "these", "those", "would", "could", "should", "about", "which", "where", "when",
    "what", "them", "then", "than", "into", "through", "during", "before", "after", "above",
    "below", "between", "under", "again", "further", "once", "here", "more", "most", "other",
    "some", "such", "only", "same", "also", "very", "just", "each", "being", "doing", "make",
    "made", "uses", "used", "using", "example", "code", "like", "well",
];

#[must_use]
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Prose text of a markdown body. Code blocks, inline code and link
/// destinations are dropped; link text is kept.
#[must_use]
pub fn extract_text(markdown: &str) -> String {
    let mut text = String::new();
    let mut in_code_block = false;
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Text(chunk) if !in_code_block => {
                text.push_str(&chunk);
                text.push(' ');
            }
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text
}

/// Lowercased words that pass the length and stopword filters.
///
/// A word is a run of alphanumerics and `_`; runs holding anything other
/// than ASCII letters (`rust2024`, `snake_case`) are dropped whole.
#[must_use]
pub fn content_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| word.chars().all(|c| c.is_ascii_lowercase()))
        .filter(|word| word.len() >= MIN_WORD_LENGTH && !is_stopword(word))
        .map(ToString::to_string)
        .collect()
}

/// The `count` most frequent words; ties keep first-occurrence order.
#[must_use]
pub fn top_keywords(words: &[String], count: usize) -> Vec<String> {
    let mut order = Vec::<&str>::new();
    let mut frequency = HashMap::<&str, usize>::new();
    for word in words {
        let seen = frequency.entry(word.as_str()).or_insert(0);
        if *seen == 0 {
            order.push(word.as_str());
        }
        *seen += 1;
    }
    // Stable sort keeps first-occurrence order among equal counts.
    order.sort_by(|a, b| frequency[b].cmp(&frequency[a]));
    order
        .into_iter()
        .take(count)
        .map(ToString::to_string)
        .collect()
}

/// Lowercase alphanumeric runs of a title.
#[must_use]
pub fn title_words(title: &str) -> Vec<String> {
    title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Tags, then title words, then content keywords; lowercased, first
/// occurrence wins.
#[must_use]
pub fn article_keywords(tags: &[String], title: &str, body: &str) -> Vec<String> {
    let content = top_keywords(&content_words(&extract_text(body)), TOP_KEYWORDS_COUNT);
    let mut seen = HashSet::new();
    tags.iter()
        .map(|tag| tag.trim().to_lowercase())
        .chain(title_words(title))
        .chain(content)
        .filter(|keyword| !keyword.is_empty() && seen.insert(keyword.clone()))
        .collect()
}
