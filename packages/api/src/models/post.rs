//! # Blog models: posts, comments, likes and pagination
//!
//! Wire types for the `/posts` endpoints plus the small amount of pure logic
//! the list views need:
//!
//! - [`PageWindow`]: which page buttons to show for offset pagination
//!   (groups of nine with jumps to the neighbouring group).
//! - [`DateRange`]: turns "last week / month / year / custom" into the
//!   `startDate`/`endDate` query parameters of a user's post search.
//! - [`Comment::thread_len`]: counts a comment together with its nested replies.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Author reference embedded in posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    pub name: String,
}

/// A full post with its comment tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    /// Rich-text HTML produced by the editor; rendered as-is.
    pub content: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub is_liked: bool,
    pub user: Author,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: String,
    pub modified_at: String,
}

impl Post {
    /// Number of comments including every nested reply.
    pub fn comment_count(&self) -> usize {
        self.comments.iter().map(Comment::thread_len).sum()
    }

    pub fn is_written_by(&self, username: &str) -> bool {
        self.user.username == username
    }
}

/// A comment; replies nest arbitrarily deep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub user: Author,
    pub parent_comment_id: Option<i64>,
    #[serde(default)]
    pub replies: Vec<Comment>,
    pub created_at: String,
    pub modified_at: String,
}

impl Comment {
    pub fn is_reply(&self) -> bool {
        self.parent_comment_id.is_some()
    }

    /// This comment plus all replies below it.
    pub fn thread_len(&self) -> usize {
        1 + self.replies.iter().map(Comment::thread_len).sum::<usize>()
    }
}

/// List entry used by the paged and cursor feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    pub user: Author,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comment_count: u64,
    pub created_at: String,
}

/// Spring-style offset page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub content: Vec<PostSummary>,
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
    /// Zero-based index of this page.
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

/// Cursor page for the infinite-scroll grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPage {
    pub items: Vec<PostSummary>,
    pub next_cursor: Option<i64>,
    pub has_next: bool,
}

/// Body of post create/update.
#[derive(Debug, Clone, Serialize)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
}

/// Body of comment creation. `parentCommentId` is sent as `null` for top-level comments.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDraft {
    pub content: String,
    pub parent_comment_id: Option<i64>,
}

/// Result of toggling a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    pub liked: bool,
    pub like_count: u64,
}

/// Page buttons to render for offset pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    /// Zero-based page numbers in the current group.
    pub pages: std::ops::Range<u32>,
    /// Last page of the previous group, if there is one.
    pub previous_group: Option<u32>,
    /// First page of the next group, if there is one.
    pub next_group: Option<u32>,
}

impl PageWindow {
    pub const DEFAULT_GROUP: u32 = 9;

    pub fn new(current: u32, total_pages: u32, group_size: u32) -> Self {
        let group_size = group_size.max(1);
        let group = current / group_size;
        let start = group * group_size;
        let end = (start + group_size).min(total_pages).max(start);
        let next_start = (group + 1) * group_size;

        Self {
            pages: start..end,
            previous_group: (group > 0).then(|| start - 1),
            next_group: (next_start < total_pages).then_some(next_start),
        }
    }
}

/// Which field the keyword search applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Title,
    Content,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Title => "title",
            SearchType::Content => "content",
        }
    }
}

/// Creation-date filter for a user's posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateRange {
    #[default]
    All,
    Week,
    Month,
    Year,
    Custom {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl DateRange {
    /// `(startDate, endDate)` relative to `today`.
    pub fn bounds(&self, today: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
        match *self {
            DateRange::All => (None, None),
            DateRange::Week => (today.checked_sub_days(Days::new(7)), Some(today)),
            DateRange::Month => (today.checked_sub_months(Months::new(1)), Some(today)),
            DateRange::Year => (today.checked_sub_months(Months::new(12)), Some(today)),
            DateRange::Custom { start, end } => (start, end),
        }
    }
}

/// Search parameters for `GET /posts/user/{username}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostSearch {
    pub page: u32,
    pub search_type: SearchType,
    pub keyword: Option<String>,
    pub range: DateRange,
}

impl PostSearch {
    pub fn page(page: u32) -> Self {
        Self {
            page,
            ..Default::default()
        }
    }

    /// Query string pairs; blank keywords and open date bounds are omitted.
    pub fn query(&self, today: NaiveDate) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page.to_string()),
            ("searchType".to_string(), self.search_type.as_str().to_string()),
        ];
        if let Some(keyword) = self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            query.push(("searchKeyword".to_string(), keyword.to_string()));
        }
        let (start, end) = self.range.bounds(today);
        if let Some(start) = start {
            query.push(("startDate".to_string(), start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = end {
            query.push(("endDate".to_string(), end.format("%Y-%m-%d").to_string()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_page_window_groups() {
        let first = PageWindow::new(0, 25, PageWindow::DEFAULT_GROUP);
        assert_eq!(first.pages, 0..9);
        assert_eq!(first.previous_group, None);
        assert_eq!(first.next_group, Some(9));

        let middle = PageWindow::new(12, 25, 9);
        assert_eq!(middle.pages, 9..18);
        assert_eq!(middle.previous_group, Some(8));
        assert_eq!(middle.next_group, Some(18));

        let last = PageWindow::new(20, 25, 9);
        assert_eq!(last.pages, 18..25);
        assert_eq!(last.next_group, None);

        let empty = PageWindow::new(0, 0, 9);
        assert!(empty.pages.is_empty());
        assert_eq!(empty.next_group, None);
    }

    #[test]
    fn test_date_range_bounds() {
        let today = date(2024, 3, 31);
        assert_eq!(DateRange::All.bounds(today), (None, None));
        assert_eq!(DateRange::Week.bounds(today), (Some(date(2024, 3, 24)), Some(today)));
        // Month subtraction clamps to the end of February
        assert_eq!(DateRange::Month.bounds(today), (Some(date(2024, 2, 29)), Some(today)));
        assert_eq!(DateRange::Year.bounds(today), (Some(date(2023, 3, 31)), Some(today)));
    }

    #[test]
    fn test_search_query() {
        let search = PostSearch {
            page: 2,
            search_type: SearchType::Content,
            keyword: Some("  rust ".to_string()),
            range: DateRange::Custom {
                start: Some(date(2024, 1, 1)),
                end: None,
            },
        };
        let query = search.query(date(2024, 6, 1));
        assert_eq!(
            query,
            vec![
                ("page".to_string(), "2".to_string()),
                ("searchType".to_string(), "content".to_string()),
                ("searchKeyword".to_string(), "rust".to_string()),
                ("startDate".to_string(), "2024-01-01".to_string()),
            ]
        );
        assert_eq!(PostSearch::page(0).query(date(2024, 6, 1)).len(), 2);
    }

    #[test]
    fn test_comment_thread_counting() {
        let post: Post = serde_json::from_value(serde_json::json!({
            "id": 1, "title": "t", "content": "<p>c</p>", "likes": 3,
            "user": {"id": 1, "username": "alice", "name": "Alice"},
            "createdAt": "2024-01-01T00:00:00", "modifiedAt": "2024-01-01T00:00:00",
            "comments": [{
                "id": 10, "content": "top", "user": {"id": 2, "name": "Bob"},
                "parentCommentId": null, "createdAt": "x", "modifiedAt": "x",
                "replies": [{
                    "id": 11, "content": "reply", "user": {"id": 1, "name": "Alice"},
                    "parentCommentId": 10, "createdAt": "x", "modifiedAt": "x",
                    "replies": [{
                        "id": 12, "content": "nested", "user": {"id": 2, "name": "Bob"},
                        "parentCommentId": 11, "createdAt": "x", "modifiedAt": "x"
                    }]
                }]
            }, {
                "id": 13, "content": "second", "user": {"id": 3, "name": "Carol"},
                "parentCommentId": null, "createdAt": "x", "modifiedAt": "x"
            }]
        }))
        .unwrap();

        assert_eq!(post.comment_count(), 4);
        assert!(!post.comments[0].is_reply());
        assert!(post.comments[0].replies[0].is_reply());
        assert!(post.is_written_by("alice"));
        assert!(!post.is_liked);
    }

    #[test]
    fn test_comment_draft_sends_null_parent() {
        let draft = CommentDraft {
            content: "hi".to_string(),
            parent_comment_id: None,
        };
        assert_eq!(
            serde_json::to_string(&draft).unwrap(),
            r#"{"content":"hi","parentCommentId":null}"#
        );
    }
}
