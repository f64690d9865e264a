//! Resource URI parsing.
//!
//! URIs take the form `taskport://collection[/id][/sub-path]`. The collection
//! prefix selects a registered resource handler; a trailing id segment
//! addresses a single item; an optional sub-path addresses a nested
//! sub-resource (e.g. `taskport://tasks/t-1/subtasks`).

pub const SCHEME_PREFIX: &str = "taskport://";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceUri<'a> {
    pub collection: &'a str,
    pub id: Option<&'a str>,
    pub sub: Option<&'a str>,
}

impl<'a> ResourceUri<'a> {
    /// Parse a URI; `None` means the string is not a taskport resource URI.
    pub fn parse(uri: &'a str) -> Option<Self> {
        let rest = uri.strip_prefix(SCHEME_PREFIX)?.trim_end_matches('/');
        if rest.is_empty() {
            return None;
        }

        let mut parts = rest.splitn(3, '/');
        let collection = parts.next().filter(|s| !s.is_empty())?;
        let id = parts.next().filter(|s| !s.is_empty());
        let sub = parts.next().filter(|s| !s.is_empty());

        Some(Self {
            collection,
            id,
            sub,
        })
    }
}

/// Canonical URI for a bare collection.
pub fn collection_uri(collection: &str) -> String {
    format!("{SCHEME_PREFIX}{collection}")
}
