use tracing::{info, warn};
use uuid::Uuid;

use super::{
    repo::PostRepo,
    repo_types::{NewPost, Post, PostChanges},
};
use crate::{
    auth::{guard::assert_ownership, PublicUser},
    error::AppError,
};

pub fn parse_post_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::Validation(format!("Invalid post ID format: {raw}")))
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("No post found with ID: {id}"))
}

pub async fn get_post(posts: &dyn PostRepo, id: Uuid) -> Result<Post, AppError> {
    posts.find_by_id(id).await?.ok_or_else(|| not_found(id))
}

pub async fn create_post(
    posts: &dyn PostRepo,
    author: &PublicUser,
    title: String,
    content: String,
) -> Result<Post, AppError> {
    let post = posts
        .create(NewPost { author: author.id, title, content })
        .await?;
    info!(post_id = %post.id, user_id = %author.id, "post created");
    Ok(post)
}

/// Existence first (404), then ownership (403), then the write.
pub async fn update_post(
    posts: &dyn PostRepo,
    identity: &PublicUser,
    id: Uuid,
    changes: PostChanges,
) -> Result<Post, AppError> {
    let current = get_post(posts, id).await?;
    assert_ownership(identity, current.author).map_err(|e| {
        warn!(post_id = %id, user_id = %identity.id, "update denied");
        e
    })?;

    let changes = changes.against(&current);
    if changes.is_empty() {
        return Ok(current);
    }

    let post = posts.update(id, changes).await?.ok_or_else(|| not_found(id))?;
    info!(post_id = %id, user_id = %identity.id, "post updated");
    Ok(post)
}

pub async fn delete_post(
    posts: &dyn PostRepo,
    identity: &PublicUser,
    id: Uuid,
) -> Result<(), AppError> {
    let current = get_post(posts, id).await?;
    assert_ownership(identity, current.author).map_err(|e| {
        warn!(post_id = %id, user_id = %identity.id, "delete denied");
        e
    })?;

    if !posts.delete(id).await? {
        return Err(not_found(id));
    }
    info!(post_id = %id, user_id = %identity.id, "post deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryPostRepo;
    use time::OffsetDateTime;

    fn user() -> PublicUser {
        PublicUser {
            id: Uuid::new_v4(),
            username: "writer".into(),
            email: "writer@x.com".into(),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn malformed_id_is_a_validation_error() {
        let err = parse_post_id("123").unwrap_err();
        assert_eq!(err.to_string(), "Invalid post ID format: 123");
    }

    #[tokio::test]
    async fn owner_can_update_and_author_is_unchanged() {
        let repo = MemoryPostRepo::default();
        let owner = user();
        let post = create_post(&repo, &owner, "t".into(), "c".into()).await.unwrap();

        let changes = PostChanges { title: Some("t2".into()), content: None };
        let updated = update_post(&repo, &owner, post.id, changes).await.unwrap();
        assert_eq!(updated.title, "t2");
        assert_eq!(updated.content, "c");
        assert_eq!(updated.author, owner.id);
    }

    #[tokio::test]
    async fn no_op_update_keeps_timestamp() {
        let repo = MemoryPostRepo::default();
        let owner = user();
        let post = create_post(&repo, &owner, "t".into(), "c".into()).await.unwrap();

        let changes = PostChanges { title: Some("t".into()), content: None };
        let same = update_post(&repo, &owner, post.id, changes).await.unwrap();
        assert_eq!(same.updated_at, post.updated_at);
    }

    #[tokio::test]
    async fn non_owner_is_forbidden_and_post_survives() {
        let repo = MemoryPostRepo::default();
        let owner = user();
        let post = create_post(&repo, &owner, "t".into(), "c".into()).await.unwrap();

        let intruder = user();
        let err = update_post(&repo, &intruder, post.id, PostChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        let err = delete_post(&repo, &intruder, post.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        assert!(get_post(&repo, post.id).await.is_ok());
    }

    #[tokio::test]
    async fn missing_post_is_not_found_before_ownership() {
        let repo = MemoryPostRepo::default();
        let anyone = user();
        let err = delete_post(&repo, &anyone, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = update_post(&repo, &anyone, Uuid::new_v4(), PostChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
