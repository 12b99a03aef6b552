use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use bookshelf_http::extract::{require, Validate};

/// Book row as written to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: String,
    /// Unique across books
    pub title: String,
    pub description: String,
    pub publish_date: String,
    /// Reference to an author; not enforced by the schema
    pub author_id: String,
    pub created_at: OffsetDateTime,
}

impl Book {
    pub fn from_request(request: BookRequest) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: request.title,
            description: request.description,
            publish_date: request.publish_date,
            author_id: request.author_id,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookUpdate {
    pub title: String,
    pub description: String,
    pub publish_date: String,
    pub author_id: String,
}

impl From<BookRequest> for BookUpdate {
    fn from(request: BookRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            publish_date: request.publish_date,
            author_id: request.author_id,
        }
    }
}

/// Body of `POST /books` and `PUT /books/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub publish_date: String,
}

impl Validate for BookRequest {
    fn validate(&self) -> Vec<serde_json::Value> {
        let mut details = Vec::new();
        require("title", &self.title, &mut details);
        require("description", &self.description, &mut details);
        require("author_id", &self.author_id, &mut details);
        require("publish_date", &self.publish_date, &mut details);
        details
    }
}

/// Book read shape, with the author's name joined in.
///
/// `author_name` is absent when the referenced author does not exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BookResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub publish_date: String,
    pub author_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
}

impl BookResponse {
    /// Overlay an update. The joined author name is kept only while the
    /// author stays the same; a reassigned book carries no name until reread.
    pub fn apply(&mut self, update: &BookUpdate) {
        if self.author_id.as_deref() != Some(update.author_id.as_str()) {
            self.author_name = None;
        }
        self.title = update.title.clone();
        self.description = update.description.clone();
        self.publish_date = update.publish_date.clone();
        self.author_id = Some(update.author_id.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> BookRequest {
        BookRequest {
            title: "1984".to_string(),
            description: "Dystopia".to_string(),
            author_id: "author-1".to_string(),
            publish_date: "1949-06-08".to_string(),
        }
    }

    #[test]
    fn new_books_get_fresh_ids() {
        let book = Book::from_request(request());
        assert!(!book.id.is_empty());
        assert_ne!(book.id, Book::from_request(request()).id);
        assert_eq!(book.author_id, "author-1");
    }

    #[test]
    fn missing_author_name_is_omitted_from_json() {
        let response = BookResponse {
            id: "b1".to_string(),
            title: "1984".to_string(),
            description: "Dystopia".to_string(),
            publish_date: "1949-06-08".to_string(),
            author_id: Some("gone".to_string()),
            author_name: None,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("author_name").is_none());

        let decoded: BookResponse = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, response);
    }

    fn joined(author_id: &str, author_name: &str) -> BookResponse {
        BookResponse {
            id: "b1".to_string(),
            title: "1984".to_string(),
            description: "Dystopia".to_string(),
            publish_date: "1949-06-08".to_string(),
            author_id: Some(author_id.to_string()),
            author_name: Some(author_name.to_string()),
        }
    }

    #[test]
    fn reassigning_author_drops_the_joined_name() {
        let mut book = joined("author-1", "Orwell");
        book.apply(&BookUpdate::from(BookRequest {
            author_id: "author-2".to_string(),
            ..request()
        }));
        assert_eq!(book.author_id.as_deref(), Some("author-2"));
        assert_eq!(book.author_name, None);
    }

    #[test]
    fn same_author_keeps_the_joined_name() {
        let mut book = joined("author-1", "Orwell");
        book.apply(&BookUpdate::from(BookRequest {
            title: "Nineteen Eighty-Four".to_string(),
            ..request()
        }));
        assert_eq!(book.title, "Nineteen Eighty-Four");
        assert_eq!(book.author_name.as_deref(), Some("Orwell"));
    }

    #[test]
    fn every_field_is_required() {
        let fields: Vec<_> = BookRequest {
            title: String::new(),
            description: String::new(),
            author_id: String::new(),
            publish_date: String::new(),
        }
        .validate()
        .into_iter()
        .map(|detail| detail["field"].as_str().unwrap().to_string())
        .collect();
        assert_eq!(fields, vec!["title", "description", "author_id", "publish_date"]);
        assert!(request().validate().is_empty());
    }
}
