use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use bookshelf_http::extract::{require, Validate};

/// Stored author record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Author {
    /// Opaque identifier generated at creation
    pub id: String,
    /// Display name, unique across authors
    pub name: String,
    pub bio: String,
    /// Birth date as supplied by the client
    pub birth_date: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Author {
    /// New author with a fresh identifier and creation timestamp.
    pub fn from_request(request: AuthorRequest) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            bio: request.bio,
            birth_date: request.birth_date,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Overlay the mutable fields; `id` and `created_at` never change.
    pub fn apply(&mut self, update: &AuthorUpdate) {
        self.name = update.name.clone();
        self.bio = update.bio.clone();
        self.birth_date = update.birth_date.clone();
    }
}

/// Partial update of an author's mutable fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorUpdate {
    pub name: String,
    pub bio: String,
    pub birth_date: String,
}

impl From<AuthorRequest> for AuthorUpdate {
    fn from(request: AuthorRequest) -> Self {
        Self {
            name: request.name,
            bio: request.bio,
            birth_date: request.birth_date,
        }
    }
}

/// Body of `POST /authors` and `PUT /authors/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub birth_date: String,
}

impl Validate for AuthorRequest {
    fn validate(&self) -> Vec<serde_json::Value> {
        let mut details = Vec::new();
        require("name", &self.name, &mut details);
        require("bio", &self.bio, &mut details);
        require("birth_date", &self.birth_date, &mut details);
        details
    }
}

/// Author as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: String,
    pub name: String,
    pub bio: String,
    pub birth_date: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Author> for AuthorResponse {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: author.name,
            bio: author.bio,
            birth_date: author.birth_date,
            created_at: author.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AuthorRequest {
        AuthorRequest {
            name: "Orwell".to_string(),
            bio: "English novelist".to_string(),
            birth_date: "1903-06-25".to_string(),
        }
    }

    #[test]
    fn new_authors_get_distinct_ids() {
        let first = Author::from_request(request());
        let second = Author::from_request(request());
        assert!(!first.id.is_empty());
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn apply_keeps_identity() {
        let mut author = Author::from_request(request());
        let (id, created_at) = (author.id.clone(), author.created_at);

        author.apply(&AuthorUpdate {
            name: "Eric Blair".to_string(),
            bio: "Also Orwell".to_string(),
            birth_date: "1903-06-25".to_string(),
        });

        assert_eq!(author.id, id);
        assert_eq!(author.created_at, created_at);
        assert_eq!(author.name, "Eric Blair");
    }

    #[test]
    fn blank_fields_fail_validation() {
        let invalid = AuthorRequest {
            name: " ".to_string(),
            bio: String::new(),
            birth_date: "1903-06-25".to_string(),
        };
        let fields: Vec<_> = invalid
            .validate()
            .into_iter()
            .map(|detail| detail["field"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(fields, vec!["name", "bio"]);
        assert!(request().validate().is_empty());
    }
}
