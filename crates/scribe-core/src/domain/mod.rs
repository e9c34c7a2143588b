//! Domain entities - the core business objects.

mod page;
mod post;
mod user;

pub use page::{Page, PageRequest};
pub use post::{
    DERIVED_EXCERPT_CHARS, EXCERPT_ELLIPSIS, EXCERPT_MAX_CHARS, NewPost, Post, PostChanges,
    PostView, TITLE_MAX_CHARS, TagsInput, derive_excerpt, derive_slug, split_tags,
};
pub use user::{AuthorSummary, Caller, UNKNOWN_AUTHOR, User};
