//! Post entity <-> model mapper

use blog_core::entities::Post;
use blog_core::value_objects::{PostId, UserId};

use crate::models::PostModel;

/// Convert PostModel to Post entity
impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        Post {
            id: PostId::new(model.id),
            author_id: UserId::new(model.author_id),
            author_name: model.author_name,
            title: model.title,
            content: model.content,
            popularity: model.popularity,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
