use super::role::UserRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User as returned by `GET admin/users/{tag}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserJson {
    pub tag: String,
    pub created_at: String,
    #[serde(default)]
    pub roles: Option<Vec<UserRole>>,
}

#[derive(Debug, Error)]
pub enum UserParseError {
    #[error("invalid createdAt timestamp {value:?}: {source}")]
    CreatedAt {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// A platform user as seen by the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub tag: String,
    pub created_at: DateTime<Utc>,
    pub roles: Vec<UserRole>,
}

impl User {
    /// Build a user from its wire shape.
    ///
    /// Missing or `null` roles become an empty list and repeated roles are
    /// collapsed, keeping the first occurrence.
    pub fn from_json(json: UserJson) -> Result<Self, UserParseError> {
        let created_at = DateTime::parse_from_rfc3339(&json.created_at)
            .map_err(|source| UserParseError::CreatedAt {
                value: json.created_at.clone(),
                source,
            })?
            .with_timezone(&Utc);

        let mut roles: Vec<UserRole> = Vec::new();
        for role in json.roles.unwrap_or_default() {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }

        Ok(Self {
            tag: json.tag,
            created_at,
            roles,
        })
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.contains(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parse(value: serde_json::Value) -> Result<User, UserParseError> {
        let json: UserJson = serde_json::from_value(value).unwrap();
        User::from_json(json)
    }

    #[test]
    fn parses_wire_user() {
        let user = parse(serde_json::json!({
            "tag": "alice01",
            "createdAt": "2024-03-05T10:20:30.123456Z",
            "roles": ["MODERATOR", "REDACTOR"]
        }))
        .unwrap();

        assert_eq!(user.tag, "alice01");
        assert_eq!(
            user.created_at.date_naive(),
            Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap().date_naive()
        );
        assert_eq!(user.roles, vec![UserRole::Moderator, UserRole::Redactor]);
        assert!(user.has_role(UserRole::Moderator));
        assert!(!user.has_role(UserRole::Admin));
    }

    #[test]
    fn offset_timestamps_are_normalized_to_utc() {
        let user = parse(serde_json::json!({
            "tag": "bob03",
            "createdAt": "2024-03-05T01:00:00+02:00",
            "roles": []
        }))
        .unwrap();

        assert_eq!(
            user.created_at,
            Utc.with_ymd_and_hms(2024, 3, 4, 23, 0, 0).unwrap()
        );
    }

    #[test]
    fn null_roles_become_empty() {
        let user = parse(serde_json::json!({
            "tag": "bob03",
            "createdAt": "2024-03-05T10:20:30Z",
            "roles": null
        }))
        .unwrap();
        assert!(user.roles.is_empty());
    }

    #[test]
    fn duplicate_roles_are_collapsed() {
        let user = parse(serde_json::json!({
            "tag": "bob03",
            "createdAt": "2024-03-05T10:20:30Z",
            "roles": ["REDACTOR", "ADMIN", "REDACTOR"]
        }))
        .unwrap();
        assert_eq!(user.roles, vec![UserRole::Redactor, UserRole::Admin]);
    }

    #[test]
    fn bad_timestamp_is_rejected() {
        let err = parse(serde_json::json!({
            "tag": "bob03",
            "createdAt": "yesterday",
            "roles": []
        }))
        .unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn unknown_role_fails_deserialization() {
        let result: Result<UserJson, _> = serde_json::from_value(serde_json::json!({
            "tag": "bob03",
            "createdAt": "2024-03-05T10:20:30Z",
            "roles": ["ROOT"]
        }));
        assert!(result.is_err());
    }
}
