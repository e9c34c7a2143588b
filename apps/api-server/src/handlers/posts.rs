//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use scribe_core::domain::{NewPost, PageRequest, PostChanges, PostView, TagsInput};
use scribe_shared::dto::{
    AuthorResponse, ListPostsQuery, MessageResponse, PostListResponse, PostRequest, PostResponse,
    TagList,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn post_response(view: PostView) -> PostResponse {
    let PostView { post, author } = view;
    PostResponse {
        id: post.id,
        title: post.title,
        slug: post.slug,
        content: post.content,
        excerpt: post.excerpt,
        tags: post.tags,
        author: AuthorResponse {
            id: author.id,
            username: author.username,
        },
        is_published: post.is_published,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn tags_input(tags: TagList) -> TagsInput {
    match tags {
        TagList::Csv(raw) => TagsInput::Csv(raw),
        TagList::Items(items) => TagsInput::List(items),
    }
}

/// Ids that do not parse can never match a post.
fn post_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Post not found".to_string()))
}

/// GET /api/posts?page=&limit=
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let request = PageRequest::parse(query.page.as_deref(), query.limit.as_deref());
    let page = state.posts.list(request).await?;

    Ok(HttpResponse::Ok().json(PostListResponse {
        current_page: page.current_page,
        total_pages: page.total_pages,
        total_posts: page.total_items,
        posts: page.items.into_iter().map(post_response).collect(),
    }))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = post_id(&path)?;
    let view = state.posts.get(id).await?;

    Ok(HttpResponse::Ok().json(post_response(view)))
}

/// POST /api/posts - Protected route
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let input = NewPost {
        title: req.title,
        content: req.content,
        excerpt: req.excerpt,
        tags: req.tags.map(tags_input),
        is_published: req.is_published,
    };

    let view = state.posts.create(&identity.caller(), input).await?;

    Ok(HttpResponse::Created().json(post_response(view)))
}

/// PUT /api/posts/{id} - Protected route, author only
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let id = post_id(&path)?;
    let req = body.into_inner();
    let changes = PostChanges {
        title: req.title,
        content: req.content,
        excerpt: req.excerpt,
        tags: req.tags.map(tags_input),
        is_published: req.is_published,
    };

    let view = state.posts.update(&identity.caller(), id, changes).await?;

    Ok(HttpResponse::Ok().json(post_response(view)))
}

/// DELETE /api/posts/{id} - Protected route, author only
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = post_id(&path)?;
    state.posts.delete(&identity.caller(), id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post removed successfully")))
}

/// GET /api/posts/user/my-posts - Protected route
pub async fn my_posts(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let views = state.posts.list_own(&identity.caller()).await?;
    let posts: Vec<PostResponse> = views.into_iter().map(post_response).collect();

    Ok(HttpResponse::Ok().json(posts))
}

#[cfg(test)]
mod tests {
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use serde_json::{Value, json};

    use crate::handlers::configure_routes;
    use crate::test_support::TestContext;

    macro_rules! app {
        ($ctx:expr) => {
            test::init_service(
                App::new()
                    .app_data($ctx.state.clone())
                    .app_data($ctx.tokens.clone())
                    .configure(configure_routes),
            )
            .await
        };
    }

    fn bearer(token: &str) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {token}"))
    }

    #[actix_web::test]
    async fn test_empty_listing_shape() {
        let ctx = TestContext::new();
        let app = app!(ctx);

        let req = test::TestRequest::get()
            .uri("/api/posts?page=1&limit=10")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(
            body,
            json!({"posts": [], "currentPage": 1, "totalPages": 0, "totalPosts": 0})
        );
    }

    #[actix_web::test]
    async fn test_junk_paging_falls_back_to_defaults() {
        let ctx = TestContext::new();
        let app = app!(ctx);

        let req = test::TestRequest::get()
            .uri("/api/posts?page=-3&limit=abc")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["currentPage"], 1);
    }

    #[actix_web::test]
    async fn test_create_requires_token() {
        let ctx = TestContext::new();
        let app = app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({"title": "Hi", "content": "Body"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_create_and_fetch_post() {
        let ctx = TestContext::new();
        let (alice_id, token) = ctx.user("alice").await;
        let app = app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .set_json(json!({
                "title": "Hello, World!",
                "content": "Body",
                "tags": "a, b ,c",
                "author": "00000000-0000-0000-0000-000000000000"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;

        assert_eq!(created["slug"], "hello-world");
        assert_eq!(created["tags"], json!(["a", "b", "c"]));
        assert_eq!(created["author"]["id"], alice_id.to_string());
        assert_eq!(created["author"]["username"], "alice");
        assert_eq!(created["isPublished"], true);

        let id = created["id"].as_str().unwrap();
        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{id}"))
            .to_request();
        let fetched: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched["title"], "Hello, World!");
    }

    #[actix_web::test]
    async fn test_missing_title_is_unprocessable() {
        let ctx = TestContext::new();
        let (_, token) = ctx.user("alice").await;
        let app = app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .set_json(json!({"content": "Body"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"], json!(["title: Please provide a title"]));
    }

    #[actix_web::test]
    async fn test_other_user_cannot_delete() {
        let ctx = TestContext::new();
        let (_, alice) = ctx.user("alice").await;
        let (_, bob) = ctx.user("bob").await;
        let app = app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&alice))
            .set_json(json!({"title": "Mine", "content": "Body"}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let uri = format!("/api/posts/{}", created["id"].as_str().unwrap());

        let req = test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&bob))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&alice))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Post removed successfully");
    }

    #[actix_web::test]
    async fn test_update_by_author() {
        let ctx = TestContext::new();
        let (_, token) = ctx.user("alice").await;
        let app = app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .set_json(json!({"title": "Draft title", "content": "Body"}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", created["id"].as_str().unwrap()))
            .insert_header(bearer(&token))
            .set_json(json!({"title": "Final Title", "isPublished": false}))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(updated["slug"], "final-title");
        assert_eq!(updated["content"], "Body");
        assert_eq!(updated["isPublished"], false);
    }

    #[actix_web::test]
    async fn test_unknown_and_malformed_ids_are_not_found() {
        let ctx = TestContext::new();
        let app = app!(ctx);

        for uri in [
            format!("/api/posts/{}", uuid::Uuid::new_v4()),
            "/api/posts/not-a-uuid".to_string(),
        ] {
            let req = test::TestRequest::get().uri(&uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        }
    }

    #[actix_web::test]
    async fn test_my_posts_lists_only_own() {
        let ctx = TestContext::new();
        let (_, alice) = ctx.user("alice").await;
        let (_, bob) = ctx.user("bob").await;
        let app = app!(ctx);

        for (token, title, published) in [
            (&alice, "Alice draft", false),
            (&bob, "Bob post", true),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/posts")
                .insert_header(bearer(token))
                .set_json(json!({"title": title, "content": "Body", "isPublished": published}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get()
            .uri("/api/posts/user/my-posts")
            .insert_header(bearer(&alice))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let posts = body.as_array().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0]["title"], "Alice draft");
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let ctx = TestContext::new();
        let (_, token) = ctx.user("alice").await;
        let app = app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
