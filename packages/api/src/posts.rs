//! Blog/post service: the main consumer of the Request Client.
//!
//! Every call goes through [`ApiClient::execute`], so an expired credential is
//! recovered transparently and a rejected session ends it. Other failures
//! come back unchanged for the view to report (a failed comment shows a
//! message; it does not sign anyone out).

use chrono::NaiveDate;
use store::KeyValueStore;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{
    CommentDraft, CursorPage, LikeStatus, Post, PostDraft, PostPage, PostSearch, PostSummary,
};
use crate::transport::{ApiRequest, ReqwestTransport, Transport};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Clone)]
pub struct PostService<S, T = ReqwestTransport> {
    client: ApiClient<S, T>,
}

impl<S: KeyValueStore, T: Transport> ApiClient<S, T> {
    pub fn posts(&self) -> PostService<S, T> {
        PostService {
            client: self.clone(),
        }
    }
}

impl<S: KeyValueStore, T: Transport> PostService<S, T> {
    /// Offset page of all posts; `page` is zero-based.
    pub async fn list_page(&self, page: u32, size: u32) -> Result<PostPage, ApiError> {
        self.client
            .execute(ApiRequest::get("/posts").query("page", page).query("size", size))
            .await?
            .json()
    }

    /// Cursor page of all posts; `None` starts from the newest.
    pub async fn list_cursor(&self, cursor: Option<i64>) -> Result<CursorPage, ApiError> {
        let mut request = ApiRequest::get("/posts/cursor");
        if let Some(cursor) = cursor {
            request = request.query("cursor", cursor);
        }
        self.client.execute(request).await?.json()
    }

    pub async fn get(&self, id: i64) -> Result<Post, ApiError> {
        self.client.get(&format!("/posts/{id}")).await
    }

    pub async fn create(&self, draft: &PostDraft) -> Result<Post, ApiError> {
        validate_draft(draft)?;
        self.client.post("/posts", draft).await
    }

    pub async fn update(&self, id: i64, draft: &PostDraft) -> Result<Post, ApiError> {
        validate_draft(draft)?;
        self.client.put(&format!("/posts/{id}"), draft).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.call(ApiRequest::delete(format!("/posts/{id}"))).await
    }

    pub async fn my_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.client.get("/posts/my").await
    }

    pub async fn user_posts(
        &self,
        username: &str,
        search: &PostSearch,
        today: NaiveDate,
    ) -> Result<PostPage, ApiError> {
        let request =
            ApiRequest::get(format!("/posts/user/{username}")).queries(search.query(today));
        self.client.execute(request).await?.json()
    }

    pub async fn user_likes(&self, username: &str) -> Result<Vec<PostSummary>, ApiError> {
        self.client.get(&format!("/posts/user/{username}/likes")).await
    }

    /// Add a comment, or a reply when `parent` is set.
    pub async fn create_comment(
        &self,
        post_id: i64,
        content: &str,
        parent: Option<i64>,
    ) -> Result<(), ApiError> {
        let draft = comment_draft(content, parent)?;
        self.client
            .call(ApiRequest::post(format!("/posts/{post_id}/comments")).json(&draft)?)
            .await
    }

    pub async fn update_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        content: &str,
    ) -> Result<(), ApiError> {
        let draft = comment_draft(content, None)?;
        self.client
            .call(ApiRequest::put(format!("/posts/{post_id}/comments/{comment_id}")).json(&draft)?)
            .await
    }

    pub async fn delete_comment(&self, post_id: i64, comment_id: i64) -> Result<(), ApiError> {
        self.client
            .call(ApiRequest::delete(format!("/posts/{post_id}/comments/{comment_id}")))
            .await
    }

    pub async fn toggle_like(&self, post_id: i64) -> Result<LikeStatus, ApiError> {
        self.client
            .execute(ApiRequest::post(format!("/posts/{post_id}/like")))
            .await?
            .json()
    }

    /// Fetch the next cursor page into `feed`. Returns `false` when nothing was
    /// requested because a load is in flight or the feed is exhausted.
    pub async fn load_more(&self, feed: &mut CursorFeed) -> Result<bool, ApiError> {
        let Some(cursor) = feed.begin_load() else {
            return Ok(false);
        };
        match self.list_cursor(cursor).await {
            Ok(page) => {
                feed.finish(page);
                Ok(true)
            }
            Err(e) => {
                feed.abort();
                Err(e)
            }
        }
    }
}

fn validate_draft(draft: &PostDraft) -> Result<(), ApiError> {
    if draft.title.trim().is_empty() {
        return Err(ApiError::Validation("title is required".to_string()));
    }
    if draft.content.trim().is_empty() {
        return Err(ApiError::Validation("content is required".to_string()));
    }
    Ok(())
}

fn comment_draft(content: &str, parent: Option<i64>) -> Result<CommentDraft, ApiError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ApiError::Validation("comment is empty".to_string()));
    }
    Ok(CommentDraft {
        content: content.to_string(),
        parent_comment_id: parent,
    })
}

/// Accumulated cursor pages for an infinite-scroll feed.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorFeed {
    items: Vec<PostSummary>,
    next_cursor: Option<i64>,
    has_next: bool,
    loading: bool,
    started: bool,
}

impl Default for CursorFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorFeed {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
            has_next: true,
            loading: false,
            started: false,
        }
    }

    pub fn items(&self) -> &[PostSummary] {
        &self.items
    }

    pub fn has_more(&self) -> bool {
        self.has_next
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Cursor to request next, or `None` if no load should start. The inner
    /// `None` means "first page".
    pub fn begin_load(&mut self) -> Option<Option<i64>> {
        if self.loading || !self.has_next {
            return None;
        }
        if self.started && self.next_cursor.is_none() {
            return None;
        }
        self.loading = true;
        Some(self.next_cursor)
    }

    pub fn finish(&mut self, page: CursorPage) {
        self.items.extend(page.items);
        self.next_cursor = page.next_cursor;
        self.has_next = page.has_next && page.next_cursor.is_some();
        self.loading = false;
        self.started = true;
    }

    /// End a failed load; the same cursor is retried next time.
    pub fn abort(&mut self) {
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Author;
    use crate::testing::{Harness, Reply};
    use reqwest::Method;

    fn summary(id: i64) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": format!("post {id}"),
            "user": {"id": 1, "username": "alice", "name": "Alice"},
            "createdAt": "2025-01-01T00:00:00"
        })
    }

    fn cursor_page(ids: &[i64], next: Option<i64>, has_next: bool) -> CursorPage {
        CursorPage {
            items: ids
                .iter()
                .map(|&id| PostSummary {
                    id,
                    title: format!("post {id}"),
                    user: Author {
                        id: 1,
                        username: "alice".to_string(),
                        name: "Alice".to_string(),
                    },
                    likes: 0,
                    comment_count: 0,
                    created_at: String::new(),
                })
                .collect(),
            next_cursor: next,
            has_next,
        }
    }

    #[test]
    fn test_feed_refuses_overlapping_loads() {
        let mut feed = CursorFeed::new();
        assert_eq!(feed.begin_load(), Some(None));
        assert!(feed.is_loading());
        assert_eq!(feed.begin_load(), None);

        feed.finish(cursor_page(&[10, 9], Some(9), true));
        assert_eq!(feed.begin_load(), Some(Some(9)));
        feed.abort();
        assert_eq!(feed.begin_load(), Some(Some(9)));
        feed.finish(cursor_page(&[8], None, false));

        assert_eq!(feed.items().len(), 3);
        assert!(!feed.has_more());
        assert_eq!(feed.begin_load(), None);
    }

    #[tokio::test]
    async fn test_load_more_stops_at_end() {
        let h = Harness::at("/posts/grid");
        h.transport
            .on(
                Method::GET,
                "/posts/cursor",
                Reply::ok().json(serde_json::json!({
                    "items": [summary(3), summary(2)], "nextCursor": 2, "hasNext": true
                })),
            )
            .on(
                Method::GET,
                "/posts/cursor",
                Reply::ok().json(serde_json::json!({
                    "items": [summary(1)], "nextCursor": null, "hasNext": false
                })),
            );

        let posts = h.client.posts();
        let mut feed = CursorFeed::new();
        assert!(posts.load_more(&mut feed).await.unwrap());
        assert!(posts.load_more(&mut feed).await.unwrap());
        assert!(!posts.load_more(&mut feed).await.unwrap());

        let ids: Vec<_> = feed.items().iter().map(|p| p.id).collect();
        assert_eq!(ids, [3, 2, 1]);
        let calls = h.transport.calls(Method::GET, "/posts/cursor");
        assert_eq!(calls.len(), 2);
        assert!(calls[0].query.is_empty());
        assert_eq!(calls[1].query, [("cursor".to_string(), "2".to_string())]);
    }

    #[tokio::test]
    async fn test_user_posts_query() {
        let h = Harness::at("/alice/posts");
        h.transport.on(
            Method::GET,
            "/posts/user/alice",
            Reply::ok().json(serde_json::json!({
                "content": [summary(1)], "totalPages": 1, "totalElements": 1, "number": 0, "size": 10
            })),
        );

        let search = PostSearch {
            keyword: Some("rust".to_string()),
            ..PostSearch::page(0)
        };
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let page = h.client.posts().user_posts("alice", &search, today).await.unwrap();

        assert_eq!(page.content.len(), 1);
        let sent = &h.transport.calls(Method::GET, "/posts/user/alice")[0];
        assert!(sent
            .query
            .contains(&("searchKeyword".to_string(), "rust".to_string())));
    }

    #[tokio::test]
    async fn test_failed_comment_keeps_session() {
        let h = Harness::signed_in("/posts/7", "alice", "abc123").await;
        h.transport
            .on(Method::POST, "/posts/7/comments", Reply::status(500));

        let err = h
            .client
            .posts()
            .create_comment(7, "nice post", None)
            .await
            .unwrap_err();
        assert_eq!(err.class(), crate::ErrorClass::Unclassified);
        assert!(h.client.session().current().is_authenticated());

        let body = h.transport.sent()[0].body.clone().unwrap();
        assert_eq!(body["parentCommentId"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_like_recovers_expired_credential() {
        let h = Harness::signed_in("/posts/7", "alice", "old").await;
        h.transport
            .on(Method::POST, "/posts/7/like", Reply::status(401).reissue())
            .on(
                Method::POST,
                "/posts/7/like",
                Reply::ok().json(serde_json::json!({"liked": true, "likeCount": 4})),
            )
            .on(Method::POST, crate::client::REISSUE_PATH, Reply::ok().bearer("fresh"));

        let status = h.client.posts().toggle_like(7).await.unwrap();
        assert_eq!(
            status,
            LikeStatus {
                liked: true,
                like_count: 4
            }
        );
    }

    #[tokio::test]
    async fn test_empty_drafts_are_rejected_locally() {
        let h = Harness::signed_in("/posts/new", "alice", "abc123").await;
        let draft = PostDraft {
            title: " ".to_string(),
            content: "<p>body</p>".to_string(),
        };
        assert!(matches!(
            h.client.posts().create(&draft).await,
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            h.client.posts().create_comment(1, "  ", None).await,
            Err(ApiError::Validation(_))
        ));
        assert!(h.transport.sent().is_empty());
    }
}
