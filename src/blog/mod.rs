//! Blog module for blogd.
//!
//! Posts are public to read; only the administrator writes them.

mod post;
mod repository;

pub use post::{NewPost, Post, PostFilter, PostUpdate, MAX_TITLE_LENGTH};
pub use repository::PostRepository;
