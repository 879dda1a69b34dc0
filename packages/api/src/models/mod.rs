pub mod post;
pub mod user;

pub use post::{
    Author, Comment, CommentDraft, CursorPage, DateRange, LikeStatus, PageWindow, Post, PostDraft,
    PostPage, PostSearch, PostSummary, SearchType,
};
pub use user::{
    JoinRequest, LoginRequest, PublicProfile, UserIdentity, UserUpdateRequest,
    DEFAULT_PROFILE_IMAGE,
};
