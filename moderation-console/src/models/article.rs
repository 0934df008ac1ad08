use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Summary of an article under moderator review.
///
/// Only the fields the console shows are read; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeratorArticle {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reference: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Go backends send nil slices and empty pointers as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerates_missing_optional_fields() {
        let article: ModeratorArticle = serde_json::from_value(serde_json::json!({
            "id": "a1",
            "title": "Article v1",
            "politicians": [{"firstName": "Emmanuel"}]
        }))
        .unwrap();

        assert_eq!(article.title, "Article v1");
        assert!(article.status.is_empty());
        assert!(article.tags.is_empty());
        assert!(article.updated_at.is_none());
    }

    #[test]
    fn null_fields_read_as_empty() {
        let article: ModeratorArticle = serde_json::from_value(serde_json::json!({
            "id": "a2",
            "title": "Article v2",
            "status": null,
            "reference": null,
            "tags": null,
            "updatedAt": null
        }))
        .unwrap();

        assert!(article.status.is_empty());
        assert!(article.reference.is_empty());
        assert!(article.tags.is_empty());
        assert!(article.updated_at.is_none());
    }
}
