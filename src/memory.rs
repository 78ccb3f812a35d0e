//! In-process repositories used to run the service without PostgreSQL.
//!
//! Writes happen under one lock, so the duplicate check and the insert are a
//! single step, the same guarantee the unique indexes give in Postgres.

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    auth::{
        repo::UserRepo,
        repo_types::{NewUser, PublicUser, UserCredentials},
    },
    db::RepoError,
    posts::{
        repo::PostRepo,
        repo_types::{NewPost, Page, Post, PostChanges},
    },
};

#[derive(Default)]
pub struct MemoryUserRepo {
    users: RwLock<Vec<UserCredentials>>,
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PublicUser>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|c| c.user.id == id).map(|c| c.user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|c| c.user.email == email).cloned())
    }

    async fn exists_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<bool, RepoError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .any(|c| c.user.email == email || c.user.username == username))
    }

    async fn create(&self, new: NewUser) -> Result<PublicUser, RepoError> {
        let mut users = self.users.write().await;
        if users.iter().any(|c| c.user.email == new.email) {
            return Err(RepoError::Duplicate("users_email_key".into()));
        }
        if users.iter().any(|c| c.user.username == new.username) {
            return Err(RepoError::Duplicate("users_username_key".into()));
        }

        let now = OffsetDateTime::now_utc();
        let user = PublicUser {
            id: Uuid::new_v4(),
            username: new.username,
            email: new.email,
            created_at: now,
            updated_at: now,
        };
        users.push(UserCredentials {
            user: user.clone(),
            password_hash: new.password_hash,
        });
        Ok(user)
    }
}

impl MemoryUserRepo {
    /// Removes a user. Lets tests simulate an account disappearing while a
    /// token for it is still live.
    pub async fn remove(&self, id: Uuid) -> bool {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|c| c.user.id != id);
        users.len() != before
    }
}

/// Posts kept in insertion order, which is also creation order.
#[derive(Default)]
pub struct MemoryPostRepo {
    posts: RwLock<Vec<Post>>,
}

#[async_trait]
impl PostRepo for MemoryPostRepo {
    async fn list(&self, page: Page) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        let newest_first = posts.iter().rev().skip(page.offset.max(0) as usize);
        Ok(match page.limit {
            Some(limit) => newest_first.take(limit.max(0) as usize).cloned().collect(),
            None => newest_first.cloned().collect(),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, new: NewPost) -> Result<Post, RepoError> {
        let now = OffsetDateTime::now_utc();
        let post = Post {
            id: Uuid::new_v4(),
            title: new.title,
            content: new.content,
            author: new.author,
            created_at: now,
            updated_at: now,
        };
        self.posts.write().await.push(post.clone());
        Ok(post)
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, RepoError> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        post.updated_at = OffsetDateTime::now_utc();
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok(posts.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::HashedPassword;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.into(),
            email: email.into(),
            password_hash: HashedPassword::from_stored("$argon2id$stub".into()),
        }
    }

    #[tokio::test]
    async fn create_enforces_unique_email_and_username() {
        let repo = MemoryUserRepo::default();
        repo.create(new_user("a", "a@x.com")).await.unwrap();

        let err = repo.create(new_user("b", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(ref c) if c == "users_email_key"));
        let err = repo.create(new_user("a", "b@x.com")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(ref c) if c == "users_username_key"));
    }

    #[tokio::test]
    async fn list_is_newest_first_and_paginated() {
        let repo = MemoryPostRepo::default();
        let author = Uuid::new_v4();
        for i in 0..3 {
            repo.create(NewPost { author, title: format!("p{i}"), content: "c".into() })
                .await
                .unwrap();
        }

        let all = repo.list(Page::default()).await.unwrap();
        let titles: Vec<_> = all.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["p2", "p1", "p0"]);

        let page = repo.list(Page { limit: Some(1), offset: 1 }).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "p1");
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let repo = MemoryPostRepo::default();
        let post = repo
            .create(NewPost { author: Uuid::new_v4(), title: "t".into(), content: "c".into() })
            .await
            .unwrap();
        assert!(repo.delete(post.id).await.unwrap());
        assert!(!repo.delete(post.id).await.unwrap());
    }
}
