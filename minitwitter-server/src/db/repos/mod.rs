//! Entity gateways
//!
//! Each gateway follows these patterns:
//! - One connection acquired per operation, dropped on return
//! - Partial updates only touch supplied fields; an empty patch runs nothing
//! - Update/delete of a missing id is a silent no-op reported as `false`
//! - Lookups return `Option`, absence is not an error

pub mod users;
pub mod tweets;
pub mod comments;
pub mod likes;

pub use users::{NewUser, User, UserPatch, UserRepo};
pub use tweets::{NewTweet, Tweet, TweetPatch, TweetRepo};
pub use comments::{Comment, CommentPatch, CommentRepo, NewComment};
pub use likes::{Like, LikeOutcome, LikePatch, LikeRepo, NewLike};
