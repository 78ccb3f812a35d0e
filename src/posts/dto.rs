use serde::{Deserialize, Serialize};

use super::repo_types::{Page, Post, PostChanges};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

impl CreatePostRequest {
    pub fn normalize(&mut self) -> Result<(), AppError> {
        self.title = required_text(&self.title, "Title")?;
        self.content = required_text(&self.content, "Content")?;
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdatePostRequest {
    pub fn into_changes(self) -> Result<PostChanges, AppError> {
        Ok(PostChanges {
            title: self.title.map(|t| required_text(&t, "Title")).transpose()?,
            content: self.content.map(|c| required_text(&c, "Content")).transpose()?,
        })
    }
}

fn required_text(raw: &str, field: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: i64,
}

impl Pagination {
    pub fn into_page(self) -> Result<Page, AppError> {
        if self.limit.is_some_and(|l| l < 0) || self.offset < 0 {
            return Err(AppError::validation("limit and offset must not be negative"));
        }
        Ok(Page { limit: self.limit, offset: self.offset })
    }
}

#[derive(Debug, Serialize)]
pub struct PostData {
    pub post: Post,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub status: &'static str,
    pub data: PostData,
}

impl PostResponse {
    pub fn success(post: Post) -> Self {
        Self { status: "success", data: PostData { post } }
    }
}

#[derive(Debug, Serialize)]
pub struct PostsData {
    pub posts: Vec<Post>,
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub status: &'static str,
    pub results: usize,
    pub data: PostsData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_trims_and_requires_text() {
        let mut req = CreatePostRequest { title: "  Hi ".into(), content: " body".into() };
        req.normalize().unwrap();
        assert_eq!(req.title, "Hi");
        assert_eq!(req.content, "body");

        let mut req = CreatePostRequest { title: "   ".into(), content: "x".into() };
        let err = req.normalize().unwrap_err();
        assert!(err.to_string().contains("Title cannot be empty"));
    }

    #[test]
    fn update_fields_are_optional_but_not_blank() {
        let changes = UpdatePostRequest::default().into_changes().unwrap();
        assert!(changes.is_empty());

        let changes = UpdatePostRequest { title: Some(" New ".into()), content: None }
            .into_changes()
            .unwrap();
        assert_eq!(changes.title.as_deref(), Some("New"));

        let err = UpdatePostRequest { title: None, content: Some("".into()) }
            .into_changes()
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn negative_pagination_is_rejected() {
        assert!(Pagination { limit: Some(-1), offset: 0 }.into_page().is_err());
        assert!(Pagination { limit: None, offset: -5 }.into_page().is_err());
        let page = Pagination { limit: Some(10), offset: 20 }.into_page().unwrap();
        assert_eq!((page.limit, page.offset), (Some(10), 20));
    }
}
