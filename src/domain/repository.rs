use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoName {
    pub owner: String,
    pub name: String,
}

impl RepoName {
    /// Accepts exactly `owner/name` with both halves non-empty.
    pub fn parse(full_name: &str) -> Option<Self> {
        let mut parts = full_name.trim().split('/');
        let owner = parts.next()?.trim();
        let name = parts.next()?.trim();
        if parts.next().is_some() || owner.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Validated repository selection. Malformed identifiers are kept aside so
/// callers can report them instead of dropping them silently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoSelection {
    pub repos: Vec<RepoName>,
    pub skipped: Vec<String>,
}

impl RepoSelection {
    pub fn from_identifiers<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::default();
        for identifier in identifiers {
            let raw = identifier.as_ref();
            match RepoName::parse(raw) {
                Some(repo) if !selection.repos.contains(&repo) => selection.repos.push(repo),
                Some(_) => {}
                None => selection.skipped.push(raw.to_string()),
            }
        }
        selection
    }
}
