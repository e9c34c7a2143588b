//! Post lifecycle: listing, reading, and author-only mutation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use super::{DEFAULT_STORE_TIMEOUT, bounded};
use crate::domain::{
    AuthorSummary, Caller, NewPost, Page, PageRequest, Post, PostChanges, PostView,
};
use crate::error::{DomainError, RepoError};
use crate::ports::{PostRepository, UserRepository};

/// Post operations with ownership enforcement.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    store_timeout: Duration,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            posts,
            users,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    /// Published posts, newest first.
    pub async fn list(&self, request: PageRequest) -> Result<Page<PostView>, DomainError> {
        let posts = bounded(
            self.store_timeout,
            self.posts
                .find_published(request.offset(), request.per_page()),
        )
        .await?;
        let total = bounded(self.store_timeout, self.posts.count_published()).await?;

        let views = self.resolve_authors(posts).await?;
        Ok(Page::new(views, request, total))
    }

    /// Any post by id, published or not.
    pub async fn get(&self, id: Uuid) -> Result<PostView, DomainError> {
        let post = self.load(id).await?;
        self.resolve_author(post).await
    }

    pub async fn create(&self, caller: &Caller, input: NewPost) -> Result<PostView, DomainError> {
        let post = Post::create(caller.user_id, input)?;
        let saved = bounded(self.store_timeout, self.posts.insert(post)).await?;

        tracing::info!(post_id = %saved.id, author_id = %caller.user_id, "Post created");
        self.resolve_author(saved).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: Uuid,
        changes: PostChanges,
    ) -> Result<PostView, DomainError> {
        let current = self.load_owned(caller, id).await?;
        let next = current.apply(changes)?;

        let saved = bounded(self.store_timeout, self.posts.update(next))
            .await
            .map_err(|e| not_found_as_post(e, id))?;

        tracing::info!(post_id = %id, "Post updated");
        self.resolve_author(saved).await
    }

    pub async fn delete(&self, caller: &Caller, id: Uuid) -> Result<(), DomainError> {
        self.load_owned(caller, id).await?;

        bounded(self.store_timeout, self.posts.delete(id))
            .await
            .map_err(|e| not_found_as_post(e, id))?;

        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    /// All of the caller's posts, drafts included, newest first.
    pub async fn list_own(&self, caller: &Caller) -> Result<Vec<PostView>, DomainError> {
        let posts = bounded(self.store_timeout, self.posts.find_by_author(caller.user_id)).await?;
        self.resolve_authors(posts).await
    }

    async fn load(&self, id: Uuid) -> Result<Post, DomainError> {
        bounded(self.store_timeout, self.posts.find_by_id(id))
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    /// Load a post and confirm the caller wrote it. Nothing is written
    /// before this returns.
    async fn load_owned(&self, caller: &Caller, id: Uuid) -> Result<Post, DomainError> {
        let post = self.load(id).await?;

        if !post.is_authored_by(caller) {
            tracing::warn!(
                post_id = %id,
                caller_id = %caller.user_id,
                "Rejected mutation by non-author"
            );
            return Err(DomainError::Forbidden("post"));
        }

        Ok(post)
    }

    async fn resolve_author(&self, post: Post) -> Result<PostView, DomainError> {
        let mut views = self.resolve_authors(vec![post]).await?;
        views
            .pop()
            .ok_or_else(|| DomainError::Internal("author resolution dropped a post".into()))
    }

    async fn resolve_authors(&self, posts: Vec<Post>) -> Result<Vec<PostView>, DomainError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids: Vec<Uuid> = posts.iter().map(|p| p.author_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let users = bounded(self.store_timeout, self.users.find_by_ids(&ids)).await?;
        let authors: HashMap<Uuid, AuthorSummary> = users
            .iter()
            .map(|u| (u.id, AuthorSummary::from(u)))
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| {
                let author = authors
                    .get(&post.author_id)
                    .cloned()
                    .unwrap_or_else(|| AuthorSummary::unknown(post.author_id));
                PostView { post, author }
            })
            .collect())
    }
}

/// A row that disappears between the ownership check and the write is
/// reported the same way as one that never existed.
fn not_found_as_post(err: RepoError, id: Uuid) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::post_not_found(id),
        other => other.into(),
    }
}
