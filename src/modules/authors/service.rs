use std::sync::Arc;

use serde_json::json;
use thiserror::Error;

use bookshelf_db::DbError;
use bookshelf_http::AppError;

use super::models::{Author, AuthorRequest, AuthorResponse, AuthorUpdate};
use super::repository::AuthorRepository;

/// Outcomes of author operations that are not a plain success.
#[derive(Debug, Error)]
pub enum AuthorServiceError {
    #[error("author name '{name}' already exists")]
    Conflict { name: String },

    #[error("author '{id}' not found")]
    NotFound { id: String },

    /// The insert committed, the follow-up read did not.
    #[error("author '{id}' was created but could not be read back: {source}")]
    ReadBack {
        id: String,
        #[source]
        source: DbError,
    },

    #[error(transparent)]
    Persistence(#[from] DbError),
}

impl From<AuthorServiceError> for AppError {
    fn from(err: AuthorServiceError) -> Self {
        match err {
            AuthorServiceError::Conflict { ref name } => AppError::conflict(
                vec![json!({"field": "name", "error": "already exists", "value": name})],
                "Author name already exists",
            ),
            AuthorServiceError::NotFound { .. } => AppError::not_found("Author not found"),
            AuthorServiceError::ReadBack { .. } => AppError::partial_success(format!(
                "Successfully created author, but failed to get the created author. Error: {err}"
            )),
            AuthorServiceError::Persistence(source) => AppError::Internal(source.into()),
        }
    }
}

type Result<T> = std::result::Result<T, AuthorServiceError>;

/// Author use cases: uniqueness checks, persistence and response shaping.
pub struct AuthorService {
    repository: Arc<dyn AuthorRepository>,
}

impl AuthorService {
    pub fn new(repository: Arc<dyn AuthorRepository>) -> Self {
        Self { repository }
    }

    /// Reject duplicate names, insert, then read the row back.
    ///
    /// Two concurrent creates with one name can both pass the pre-check; the
    /// unique index on `authors.name` turns the loser into a `Conflict` too.
    pub async fn create(&self, request: AuthorRequest) -> Result<AuthorResponse> {
        if let Some(name) = self.repository.find_name(&request.name).await? {
            return Err(AuthorServiceError::Conflict { name });
        }

        let author = Author::from_request(request);
        self.repository
            .create(&author)
            .await
            .map_err(|err| conflict_or(err, &author.name))?;

        let created = self
            .repository
            .find_by_id(&author.id)
            .await
            .map_err(|source| {
                tracing::error!(id = %author.id, error = %source, "author read-back failed");
                AuthorServiceError::ReadBack {
                    id: author.id.clone(),
                    source,
                }
            })?;

        tracing::info!(id = %created.id, "author created");
        Ok(created.into())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<AuthorResponse> {
        let author = self.load(id).await?;
        Ok(author.into())
    }

    /// Overlay the request on the stored author and persist it.
    ///
    /// Returns the overlaid record without re-reading it.
    pub async fn update(&self, id: &str, request: AuthorRequest) -> Result<AuthorResponse> {
        let mut author = self.load(id).await?;
        let update = AuthorUpdate::from(request);

        self.repository
            .update(id, &update)
            .await
            .map_err(|err| conflict_or(err, &update.name))?;

        author.apply(&update);
        Ok(author.into())
    }

    pub async fn find_all(&self) -> Result<Vec<AuthorResponse>> {
        let authors = self.repository.find_all().await?;
        Ok(authors.into_iter().map(AuthorResponse::from).collect())
    }

    /// Delete and return the record as it was before deletion.
    pub async fn delete(&self, id: &str) -> Result<AuthorResponse> {
        let author = self.load(id).await?;
        self.repository.delete(id).await?;
        tracing::info!(id, "author deleted");
        Ok(author.into())
    }

    async fn load(&self, id: &str) -> Result<Author> {
        self.repository.find_by_id(id).await.map_err(|err| match err {
            DbError::NotFound => AuthorServiceError::NotFound { id: id.to_string() },
            other => AuthorServiceError::Persistence(other),
        })
    }
}

fn conflict_or(err: DbError, name: &str) -> AuthorServiceError {
    if err.is_unique_violation() {
        AuthorServiceError::Conflict {
            name: name.to_string(),
        }
    } else {
        AuthorServiceError::Persistence(err)
    }
}
