//! Blog index and article pages, served from the local dataset.

use mercado_core::{BlogPost, BlogPostId};
use serde::Serialize;
use tracing::instrument;

use super::PageView;
use crate::catalog::Dataset;
use crate::error::BrowseError;
use crate::routing::blog_post_path;

pub const POST_NOT_FOUND: &str = "Artículo no encontrado";

/// Recent articles listed under an open article.
const RECENT_POSTS_COUNT: usize = 3;

/// Article as shown on cards and on its own page.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: BlogPostId,
    pub title: String,
    pub summary: String,
    pub author: String,
    /// Long Spanish date, e.g. `5 de marzo de 2024`.
    pub date: String,
    pub image: String,
    pub tags: Vec<String>,
    pub link: String,
}

impl From<&BlogPost> for PostView {
    fn from(post: &BlogPost) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            summary: post.summary.clone(),
            author: post.author.clone(),
            date: post.display_date(),
            image: post.image.clone(),
            tags: post.tags.clone(),
            link: blog_post_path(post.id),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogIndexPage {
    /// Newest first.
    pub posts: Vec<PostView>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogPostPage {
    pub post: PostView,
    pub paragraphs: Vec<String>,
    pub recent: Vec<PostView>,
}

/// Every article, optionally only those tagged `tag`.
#[instrument(skip(dataset))]
pub fn load_blog(dataset: &Dataset, tag: Option<&str>) -> BlogIndexPage {
    BlogIndexPage {
        posts: dataset
            .posts()
            .iter()
            .filter(|post| tag.is_none_or(|t| post.has_tag(t)))
            .map(PostView::from)
            .collect(),
        tags: dataset.post_tags(),
    }
}

/// Article `id`, with a few other recent ones.
#[instrument(skip(dataset))]
pub fn load_blog_post(dataset: &Dataset, id: BlogPostId) -> PageView<BlogPostPage> {
    let result = dataset
        .post(id)
        .ok_or_else(|| BrowseError::NotFound(format!("blog post {id}")))
        .map(|post| BlogPostPage {
            post: PostView::from(post),
            paragraphs: post.paragraphs().map(str::to_string).collect(),
            recent: dataset
                .recent_posts(RECENT_POSTS_COUNT, Some(id))
                .into_iter()
                .map(PostView::from)
                .collect(),
        });

    PageView::from_result(result, POST_NOT_FOUND)
}
