use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    common,
    errors::StoreError,
    models::{ContentMap, Post, PostStatus},
    storage::{self, keys, Storage},
};

/// Fields accepted when creating or editing a post. `id: None` creates,
/// `id: Some` edits; absent optional fields default on create and are left
/// untouched on edit.
#[derive(Clone, Debug, Default)]
pub struct PostInput {
    pub id: Option<String>,
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<PostStatus>,
    pub published_at: Option<DateTime<Utc>>,
}

/// CMS store: blog posts plus a free-form key/value content map for site
/// copy. The only invariant is slug uniqueness across posts.
#[derive(Clone)]
pub struct CmsService {
    storage: Arc<dyn Storage>,
}

impl CmsService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// All posts, most recently updated first. Individually malformed
    /// persisted entries are skipped.
    pub fn load_posts(&self) -> Vec<Post> {
        let raw: Vec<Value> = storage::load_json(self.storage.as_ref(), keys::CMS_POSTS);
        let mut posts: Vec<Post> = raw
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();
        posts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        posts
    }

    pub fn save_posts(&self, posts: &[Post]) {
        storage::save_json(self.storage.as_ref(), keys::CMS_POSTS, &posts);
    }

    /// Creates or edits a post, enforcing slug uniqueness by suffixing
    /// `-2`, `-3`, ... past any taken slug (the post's own slug excluded).
    #[instrument(skip(self, input), fields(post_id = input.id.as_deref().unwrap_or("new")))]
    pub fn upsert_post(&self, input: PostInput) -> Result<Post, StoreError> {
        if input.title.trim().is_empty() {
            return Err(StoreError::Validation("post title is required".into()));
        }

        let mut posts = self.load_posts();
        let now = Utc::now();

        if let Some(id) = &input.id {
            let idx = posts
                .iter()
                .position(|p| &p.id == id)
                .ok_or_else(|| StoreError::NotFound(format!("Post {} not found", id)))?;

            let base_slug = input
                .slug
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| posts[idx].slug.clone());
            let slug = ensure_unique_slug(&posts, &base_slug, Some(id));

            let post = &mut posts[idx];
            post.title = input.title;
            post.slug = slug;
            if let Some(excerpt) = input.excerpt {
                post.excerpt = excerpt;
            }
            if let Some(content) = input.content {
                post.content = content;
            }
            if let Some(cover_image) = input.cover_image {
                post.cover_image = cover_image;
            }
            if let Some(tags) = input.tags {
                post.tags = tags;
            }
            if let Some(status) = input.status {
                post.status = status;
            }
            if input.published_at.is_some() {
                post.published_at = input.published_at;
            }
            post.updated_at = now;
            let updated = post.clone();
            self.save_posts(&posts);
            return Ok(updated);
        }

        let base_slug = input
            .slug
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| common::slugify(&input.title));
        let slug = ensure_unique_slug(&posts, &base_slug, None);
        let post = Post {
            id: Uuid::new_v4().to_string(),
            slug,
            title: input.title,
            excerpt: input.excerpt.unwrap_or_default(),
            content: input.content.unwrap_or_default(),
            cover_image: input.cover_image.unwrap_or_default(),
            tags: input.tags.unwrap_or_default(),
            status: input.status.unwrap_or_default(),
            published_at: input.published_at,
            created_at: now,
            updated_at: now,
        };
        posts.insert(0, post.clone());
        self.save_posts(&posts);
        Ok(post)
    }

    pub fn delete_post(&self, id: &str) -> Vec<Post> {
        let mut posts = self.load_posts();
        posts.retain(|p| p.id != id);
        self.save_posts(&posts);
        posts
    }

    pub fn publish_post(&self, id: &str) -> Result<Post, StoreError> {
        self.set_status(id, PostStatus::Published)
    }

    pub fn unpublish_post(&self, id: &str) -> Result<Post, StoreError> {
        self.set_status(id, PostStatus::Draft)
    }

    fn set_status(&self, id: &str, status: PostStatus) -> Result<Post, StoreError> {
        let mut posts = self.load_posts();
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("Post {} not found", id)))?;
        let now = Utc::now();
        post.status = status;
        if status == PostStatus::Published {
            post.published_at = Some(now);
        }
        post.updated_at = now;
        let updated = post.clone();
        self.save_posts(&posts);
        Ok(updated)
    }

    pub fn get_post_by_slug(&self, slug: &str) -> Option<Post> {
        self.load_posts().into_iter().find(|p| p.slug == slug)
    }

    /// Case-insensitive search over title, excerpt, and tags, optionally
    /// restricted to one status.
    pub fn search_posts(&self, query: &str, status: Option<PostStatus>) -> Vec<Post> {
        let q = query.to_lowercase();
        self.load_posts()
            .into_iter()
            .filter(|p| {
                if let Some(wanted) = status {
                    if p.status != wanted {
                        return false;
                    }
                }
                p.title.to_lowercase().contains(&q)
                    || p.excerpt.to_lowercase().contains(&q)
                    || p.tags.iter().any(|t| t.to_lowercase().contains(&q))
            })
            .collect()
    }

    pub fn load_content(&self) -> ContentMap {
        storage::load_json(self.storage.as_ref(), keys::CMS_CONTENT)
    }

    pub fn save_content(&self, content: &ContentMap) {
        storage::save_json(self.storage.as_ref(), keys::CMS_CONTENT, content);
    }

    pub fn get_content(&self, key: &str, fallback: &str) -> String {
        self.load_content()
            .get(key)
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn set_content(&self, key: &str, value: &str) {
        let mut content = self.load_content();
        content.insert(key.to_string(), value.to_string());
        self.save_content(&content);
    }
}

fn ensure_unique_slug(posts: &[Post], base: &str, exclude_id: Option<&str>) -> String {
    let slug = {
        let s = common::slugify(base);
        if s.is_empty() {
            "post".to_string()
        } else {
            s
        }
    };
    let taken: HashSet<&str> = posts
        .iter()
        .filter(|p| exclude_id != Some(p.id.as_str()))
        .map(|p| p.slug.as_str())
        .collect();
    if !taken.contains(slug.as_str()) {
        return slug;
    }
    let mut n = 2;
    while taken.contains(format!("{}-{}", slug, n).as_str()) {
        n += 1;
    }
    format!("{}-{}", slug, n)
}
