//! Case-insensitive substring search with a context snippet around the hit.
//!
//! Positions are counted in `char`s, never bytes, so snippets are always cut
//! on character boundaries regardless of script.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::Task;

const ELLIPSIS: &str = "...";

/// One matching task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub task_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_name: Option<String>,
    pub context: String,
}

/// Reject empty or whitespace-only queries
pub fn validate_query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "search text cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Char index of the first case-insensitive occurrence of `query` in `text`
pub fn find_match(text: &str, query: &str) -> Option<usize> {
    let haystack: Vec<char> = text.chars().collect();
    let needle: Vec<char> = query.chars().collect();
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }

    (0..=haystack.len() - needle.len()).find(|&start| {
        haystack[start..start + needle.len()]
            .iter()
            .zip(&needle)
            .all(|(a, b)| chars_match(*a, *b))
    })
}

fn chars_match(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Up to `context_chars` on each side of the match at `start..start + len`,
/// with `...` marking each side that was cut.
pub fn context_snippet(text: &str, start: usize, len: usize, context_chars: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let end = (start + len).min(chars.len());
    let left = start.saturating_sub(context_chars);
    let right = end.saturating_add(context_chars).min(chars.len());

    let mut snippet = String::new();
    if left > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.extend(&chars[left..right]);
    if right < chars.len() {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}

/// Search the active tasks of one collection, in collection order
pub fn search_tasks(tasks: &[Task], query: &str, context_chars: usize) -> Vec<SearchHit> {
    let query_len = query.chars().count();
    tasks
        .iter()
        .filter(|task| task.is_active())
        .filter_map(|task| {
            let start = find_match(&task.text, query)?;
            Some(SearchHit {
                task_id: task.id,
                workspace_id: None,
                workspace_name: None,
                context: context_snippet(&task.text, start, query_len, context_chars),
            })
        })
        .collect()
}
