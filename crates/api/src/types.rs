//! Records returned by the Dradis Pro REST API.
//!
//! Only `id`, `title` and `text` drive the search; the rest is decoded so the
//! records mirror what the API sends. Every non-id field tolerates absence or `null`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit JSON `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Project {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub client: Option<Client>,
    #[serde(default)]
    pub team: Option<Team>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: Vec<Account>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owners: Vec<Account>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Client {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Team {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Account {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Issue {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Structured fields parsed out of `text` (Title, Description, ...).
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: BTreeMap<String, Option<String>>,
    /// Raw body holding every field in Dradis markup.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Tag {
    #[serde(default, deserialize_with = "null_as_default")]
    pub color: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_full_record() {
        let project: Project = serde_json::from_value(json!({
            "id": 7,
            "name": "Acme external",
            "client": {"id": 1, "name": "Acme"},
            "team": {"id": 2, "name": "Red"},
            "created_at": "2024-03-01T10:00:00.000Z",
            "updated_at": "2024-03-02T11:30:00.000Z",
            "authors": [{"id": 3, "email": "a@example.com"}],
            "owners": [{"id": 4, "email": "o@example.com"}],
            "custom_fields": []
        }))
        .unwrap();

        assert_eq!(project.id, 7);
        assert_eq!(project.client.unwrap().name, "Acme");
        assert_eq!(project.authors[0].email, "a@example.com");
        assert!(project.created_at.is_some());
    }

    #[test]
    fn test_project_minimal_record() {
        let project: Project = serde_json::from_value(json!({"id": 1})).unwrap();
        assert_eq!(project.id, 1);
        assert!(project.name.is_empty());
        assert!(project.team.is_none());
        assert!(project.owners.is_empty());
    }

    #[test]
    fn test_issue_record() {
        let issue: Issue = serde_json::from_value(json!({
            "id": 20,
            "title": "SQL injection",
            "fields": {"Title": "SQL injection", "Type": "Internal"},
            "text": "#[Title]#\nSQL injection\n\n#[Type]#\nInternal",
            "tags": [{"color": "#d62728", "display_name": "Critical"}]
        }))
        .unwrap();

        assert_eq!(issue.id, 20);
        assert_eq!(issue.fields["Type"].as_deref(), Some("Internal"));
        assert!(issue.text.contains("#[Title]#"));
        assert_eq!(issue.tags[0].display_name, "Critical");
        assert!(issue.updated_at.is_none());
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let issue: Issue = serde_json::from_value(json!({
            "id": 1,
            "title": null,
            "fields": {"References": null, "Title": "SQL injection"},
            "text": null,
            "tags": null
        }))
        .unwrap();

        assert!(issue.title.is_empty());
        assert!(issue.text.is_empty());
        assert!(issue.tags.is_empty());
        assert_eq!(issue.fields["References"], None);
        assert_eq!(issue.fields["Title"].as_deref(), Some("SQL injection"));

        let project: Project = serde_json::from_value(json!({
            "id": 2,
            "name": null,
            "client": null,
            "authors": null,
            "owners": [{"id": 3, "email": null}]
        }))
        .unwrap();

        assert!(project.name.is_empty());
        assert!(project.client.is_none());
        assert!(project.authors.is_empty());
        assert!(project.owners[0].email.is_empty());
    }

    #[test]
    fn test_issue_requires_id() {
        let result: Result<Issue, _> = serde_json::from_value(json!({"title": "no id"}));
        assert!(result.is_err());
    }
}
