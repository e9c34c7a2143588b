use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{AuthorSummary, Caller};
use crate::error::{DomainError, ValidationErrors};

pub const TITLE_MAX_CHARS: usize = 200;
pub const EXCERPT_MAX_CHARS: usize = 500;
/// Length of the content prefix used when no excerpt is supplied.
pub const DERIVED_EXCERPT_CHARS: usize = 200;
pub const EXCERPT_ELLIPSIS: &str = "...";

/// Post entity - a single authored blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tags as they arrive from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagsInput {
    /// `"rust, web ,api"`
    Csv(String),
    List(Vec<String>),
}

impl TagsInput {
    pub fn into_tags(self) -> Vec<String> {
        match self {
            TagsInput::Csv(raw) => split_tags(&raw),
            TagsInput::List(items) => items
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Input for creating a post. Fields stay optional so a missing field is
/// reported as a validation failure instead of a decode error.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub tags: Option<TagsInput>,
    pub is_published: Option<bool>,
}

/// Input for updating a post. `None` keeps the stored value, except for
/// `tags`, which are always replaced (`None` clears them).
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub tags: Option<TagsInput>,
    pub is_published: Option<bool>,
}

/// A post together with its author's public identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    pub post: Post,
    pub author: AuthorSummary,
}

impl Post {
    /// Build a new post owned by `author_id`, deriving slug and excerpt.
    pub fn create(author_id: Uuid, input: NewPost) -> Result<Self, DomainError> {
        let title = input.title.map(|t| t.trim().to_string()).unwrap_or_default();
        let content = input.content.unwrap_or_default();
        let excerpt = match input.excerpt {
            Some(excerpt) if !excerpt.trim().is_empty() => excerpt,
            _ => derive_excerpt(&content),
        };
        let now = Utc::now();

        let post = Self {
            id: Uuid::new_v4(),
            author_id,
            slug: derive_slug(&title),
            title,
            content,
            excerpt,
            tags: input.tags.map(TagsInput::into_tags).unwrap_or_default(),
            is_published: input.is_published.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        post.validate()?;
        Ok(post)
    }

    /// Merge `changes` into a copy of this post and re-validate the result.
    ///
    /// Identity fields (`id`, `author_id`, `created_at`) are carried over
    /// untouched. `self` is never modified, so a failed merge leaves nothing
    /// half-applied.
    pub fn apply(&self, changes: PostChanges) -> Result<Self, DomainError> {
        let mut next = self.clone();

        if let Some(title) = changes.title {
            let title = title.trim().to_string();
            if title != next.title {
                next.slug = derive_slug(&title);
                next.title = title;
            }
        }
        if let Some(content) = changes.content {
            next.content = content;
        }
        if let Some(excerpt) = changes.excerpt {
            next.excerpt = if excerpt.trim().is_empty() {
                derive_excerpt(&next.content)
            } else {
                excerpt
            };
        }
        next.tags = changes
            .tags
            .map(TagsInput::into_tags)
            .unwrap_or_default();
        if let Some(is_published) = changes.is_published {
            next.is_published = is_published;
        }
        next.updated_at = Utc::now().max(self.updated_at);

        next.validate()?;
        Ok(next)
    }

    /// Presence and length rules, enforced on every create and update.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = ValidationErrors::new();

        if self.title.trim().is_empty() {
            errors.add("title", "Please provide a title");
        } else if self.title.chars().count() > TITLE_MAX_CHARS {
            errors.add(
                "title",
                format!("Title cannot be more than {TITLE_MAX_CHARS} characters"),
            );
        }
        if self.content.trim().is_empty() {
            errors.add("content", "Please provide content");
        }
        if self.excerpt.chars().count() > EXCERPT_MAX_CHARS {
            errors.add(
                "excerpt",
                format!("Excerpt cannot be more than {EXCERPT_MAX_CHARS} characters"),
            );
        }

        errors.into_result()
    }

    /// Ownership check: only the stored author may mutate the post.
    pub fn is_authored_by(&self, caller: &Caller) -> bool {
        self.author_id == caller.user_id
    }
}

/// URL-safe form of a title: lowercase ASCII alphanumerics separated by
/// single hyphens, with no hyphen at either end.
pub fn derive_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// First `DERIVED_EXCERPT_CHARS` characters of `content` plus an ellipsis.
pub fn derive_excerpt(content: &str) -> String {
    let mut excerpt: String = content.chars().take(DERIVED_EXCERPT_CHARS).collect();
    excerpt.push_str(EXCERPT_ELLIPSIS);
    excerpt
}

/// Split a comma-separated tag string into trimmed, non-empty tags.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
