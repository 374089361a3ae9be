/// Business logic over the repository ports
///
/// Each service is cheap to clone and shares the store through an `Arc`, so
/// the binary builds one [`Services`] bundle at startup and hands it to the
/// HTTP layer.
///
/// Every operation returns [`ServiceResult`]: storage faults are converted at
/// the `?` boundary, so nothing unmapped leaves a service.

use std::sync::Arc;

use validator::Validate;

use crate::error::{ServiceError, ServiceResult};
use crate::repository::Store;

pub mod comment;
pub mod feed;
pub mod membership;
pub mod user;

pub use comment::CommentService;
pub use feed::{FeedService, MAX_PAGE_LIMIT};
pub use membership::{DefaultRolePolicy, MembershipService, RolePolicy};
pub use user::UserService;

/// Runs `validator` rules and turns a failure into `BadRequest`
pub(crate) fn validate_input<T: Validate>(input: &T) -> ServiceResult<()> {
    input
        .validate()
        .map_err(|errors| ServiceError::bad_request(errors.to_string()))
}

/// Fails with `UserNotFound` unless `user_id` names a live user
///
/// Memberships, feeds and comments of a deleted user stay stored, so every
/// path acting on a user's behalf checks this first.
pub(crate) async fn ensure_live_user(store: &dyn Store, user_id: i64) -> ServiceResult<()> {
    match store.find_user(user_id).await? {
        Some(_) => Ok(()),
        None => Err(ServiceError::UserNotFound),
    }
}

/// All services, wired to one store
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub memberships: MembershipService,
    pub feeds: FeedService,
    pub comments: CommentService,
}

impl Services {
    /// Wires every service with the default role policy
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_role_policy(store, Arc::new(DefaultRolePolicy))
    }

    pub fn with_role_policy(store: Arc<dyn Store>, policy: Arc<dyn RolePolicy>) -> Self {
        let feeds = FeedService::new(store.clone());

        Self {
            users: UserService::new(store.clone()),
            memberships: MembershipService::new(store.clone(), policy),
            comments: CommentService::new(store, feeds.clone()),
            feeds,
        }
    }
}
