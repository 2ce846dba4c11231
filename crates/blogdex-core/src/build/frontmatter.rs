use serde::Deserialize;
use serde_norway::Value;

use crate::error::{Result, SearchError};

/// Fields read from an article's YAML header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub date: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFrontmatter {
    title: Option<Value>,
    description: Option<Value>,
    tags: Vec<Value>,
    date: Option<Value>,
}

/// Split a markdown document into its frontmatter and body.
///
/// Documents without a leading `---` block yield empty frontmatter and the
/// whole input as body. A header that is present but not valid YAML is an
/// error.
pub fn split_frontmatter(content: &str) -> Result<(Frontmatter, &str)> {
    let Some((header, body)) = header_and_body(content) else {
        return Ok((Frontmatter::default(), content));
    };
    if header.trim().is_empty() {
        return Ok((Frontmatter::default(), body));
    }
    let raw = serde_norway::from_str::<RawFrontmatter>(header)
        .map_err(|err| SearchError::Validation(format!("invalid frontmatter: {err}")))?;
    Ok((
        Frontmatter {
            title: scalar_text(raw.title.as_ref()),
            description: scalar_text(raw.description.as_ref()),
            tags: raw
                .tags
                .iter()
                .map(|tag| scalar_text(Some(tag)))
                .filter(|tag| !tag.is_empty())
                .collect(),
            date: scalar_text(raw.date.as_ref()),
        },
        body,
    ))
}

fn header_and_body(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    let rest = rest.trim_start_matches([' ', '\t', '\r']);
    let rest = rest.strip_prefix('\n')?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" && line.starts_with("---") {
            let header = rest[..offset].trim_end_matches(['\r', '\n']);
            let body = &rest[offset + line.len()..];
            return Some((header, body));
        }
        offset += line.len();
    }
    None
}

fn scalar_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}
