//! Hashtag normalization applied before anything is shown or copied.

use std::collections::HashSet;

/// How two normalized hashtags are compared when merging.
///
/// Case-sensitive is the default: `#Build` and `#build` are both kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupPolicy {
    #[default]
    CaseSensitive,
    CaseInsensitive,
}

impl DedupPolicy {
    fn key(self, tag: &str) -> String {
        match self {
            DedupPolicy::CaseSensitive => tag.to_string(),
            DedupPolicy::CaseInsensitive => tag.to_lowercase(),
        }
    }
}

/// Normalizes one raw tag to `#Word`, or `None` when nothing usable is left.
///
/// Leading `#`s, whitespace and every character outside letters, numbers and
/// `_` are removed, then a single `#` is prefixed. Idempotent.
pub fn format_hashtag(tag: &str) -> Option<String> {
    let cleaned: String = tag
        .trim()
        .trim_start_matches('#')
        .chars()
        .filter(|c| !c.is_whitespace())
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();

    (!cleaned.is_empty()).then(|| format!("#{cleaned}"))
}

/// Normalizes and deduplicates `tags`, keeping the first-seen form of each.
pub fn merge_hashtags<'a, I>(tags: I, policy: DedupPolicy) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    tags.into_iter()
        .filter_map(format_hashtag)
        .filter(|tag| seen.insert(policy.key(tag)))
        .collect()
}
