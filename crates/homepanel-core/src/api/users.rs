//! User management; the backend rejects these for non-admin sessions

use super::HomeApi;
use crate::cache::{CacheKey, Resource};
use crate::ports::ApiRequest;
use crate::Result;
use homepanel_types::{User, UserUpdate};

impl HomeApi {
    pub async fn users(&self) -> Result<Vec<User>> {
        self.query(CacheKey::list(Resource::Users), "/users".into())
            .await
    }

    pub async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<User> {
        self.mutate(
            ApiRequest::patch(format!("/users/{}", id)).json(update)?,
            &[CacheKey::list(Resource::Users)],
        )
        .await
    }

    pub async fn set_user_enabled(&self, id: i64, enabled: bool) -> Result<User> {
        self.update_user(
            id,
            &UserUpdate {
                enabled: Some(enabled),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn delete_user(&self, id: i64) -> Result<()> {
        self.mutate_empty(
            ApiRequest::delete(format!("/users/{}", id)),
            &[CacheKey::list(Resource::Users)],
        )
        .await
    }
}
