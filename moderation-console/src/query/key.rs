use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered segments identifying one cached fetch, e.g.
/// `["admin", "searchUsers", "ali"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// First segment, used as a metrics label.
    pub fn namespace(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or("")
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_compare_by_segments() {
        let a = QueryKey::new(["admin", "searchUsers", "ali"]);
        let b = QueryKey::new(vec!["admin".to_string(), "searchUsers".into(), "ali".into()]);
        assert_eq!(a, b);
        assert_ne!(a, QueryKey::new(["admin", "searchUsers", "alic"]));
        assert_eq!(a.namespace(), "admin");
        assert_eq!(a.to_string(), "[admin, searchUsers, ali]");
    }
}
