/// Service behaviour against the in-memory store
///
/// Run with: cargo test --test service_tests

use std::sync::Arc;

use clubhouse_shared::error::ServiceError;
use clubhouse_shared::models::{
    CreateClub, CreateComment, CreateFeed, CreateUser, NewUser, Role, UpdateClub, UpdateComment,
    UpdateFeed,
};
use clubhouse_shared::repository::{MemoryStore, UserRepository};
use clubhouse_shared::services::Services;

struct Fixture {
    store: Arc<MemoryStore>,
    services: Services,
}

impl Fixture {
    fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let services = Services::new(store.clone());
        Self { store, services }
    }

    /// Inserts a user straight into the store, skipping password hashing
    async fn user(&self, name: &str) -> i64 {
        self.store
            .insert_user(NewUser {
                password_hash: "not-a-real-hash".to_string(),
                social_id: format!("social-{}", name),
                email: format!("{}@example.com", name),
                name: name.to_string(),
                sex: true,
                phone: "010-0000-0000".to_string(),
            })
            .await
            .expect("Failed to insert user")
            .id()
    }

    async fn club(&self, owner_id: i64, name: &str) -> i64 {
        self.services
            .memberships
            .found_club(owner_id, club_input(name))
            .await
            .expect("Failed to found club")
    }

    async fn feed(&self, user_id: i64, club_id: i64, title: &str, is_private: bool) -> i64 {
        self.services
            .feeds
            .create_feed(
                user_id,
                club_id,
                CreateFeed {
                    title: title.to_string(),
                    content: format!("{} body", title),
                    is_private,
                },
            )
            .await
            .expect("Failed to create feed")
    }
}

fn club_input(name: &str) -> CreateClub {
    CreateClub {
        name: name.to_string(),
        description: "weekend trips".to_string(),
        capacity: 30,
        sex: true,
        minimum_age: 20,
        maximum_age: 40,
    }
}

fn comment(content: &str) -> CreateComment {
    CreateComment {
        content: content.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_user_payloads_never_carry_password() {
    let fx = Fixture::new();
    let id = fx
        .services
        .users
        .create_user(CreateUser {
            password: "correct horse battery".to_string(),
            social_id: "kakao-1".to_string(),
            email: "jane@example.com".to_string(),
            name: "Jane".to_string(),
            sex: false,
            phone: "010-1234-5678".to_string(),
        })
        .await
        .expect("create user");
    let club_id = fx.club(id, "Readers").await;

    let one = serde_json::to_value(fx.services.users.find_user(id).await.unwrap()).unwrap();
    let all = serde_json::to_value(fx.services.users.find_all_users().await.unwrap()).unwrap();
    let checked = serde_json::to_value(
        fx.services
            .users
            .verify_credentials("jane@example.com", "correct horse battery")
            .await
            .unwrap(),
    )
    .unwrap();
    let members = serde_json::to_value(
        fx.services
            .memberships
            .list_members(club_id, None)
            .await
            .unwrap(),
    )
    .unwrap();

    assert!(one.get("password").is_none());
    assert_eq!(one["email"], "jane@example.com");
    assert!(all[0].get("password").is_none());
    assert!(checked.get("password").is_none());
    assert!(members[0].get("password").is_none());
    assert_eq!(members[0]["role"], "owner");
}

#[tokio::test]
async fn test_verify_credentials_failures() {
    let fx = Fixture::new();
    fx.services
        .users
        .create_user(CreateUser {
            password: "s3cret-enough".to_string(),
            social_id: "google-7".to_string(),
            email: "sam@example.com".to_string(),
            name: "Sam".to_string(),
            sex: true,
            phone: "010".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(
        fx.services
            .users
            .verify_credentials("sam@example.com", "wrong-password")
            .await,
        Err(ServiceError::PasswordNotMatch)
    );
    assert_eq!(
        fx.services
            .users
            .verify_credentials("nobody@example.com", "s3cret-enough")
            .await,
        Err(ServiceError::UserNotFound)
    );
}

#[tokio::test]
async fn test_duplicate_email_is_bad_request() {
    let fx = Fixture::new();
    fx.user("kim").await;

    let result = fx
        .services
        .users
        .create_user(CreateUser {
            password: "long-enough-pw".to_string(),
            social_id: "other-social".to_string(),
            email: "kim@example.com".to_string(),
            name: "Kim Two".to_string(),
            sex: true,
            phone: "010".to_string(),
        })
        .await;

    assert!(matches!(result, Err(ServiceError::BadRequest(_))));
}

#[tokio::test]
async fn test_users_only_change_themselves() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;

    assert!(matches!(
        fx.services.users.delete_user(alice, bob).await,
        Err(ServiceError::BadRequest(_))
    ));

    fx.services.users.delete_user(alice, alice).await.unwrap();
    assert_eq!(
        fx.services.users.find_user(alice).await,
        Err(ServiceError::UserNotFound)
    );
}

// ---------------------------------------------------------------------------
// Clubs and memberships
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_club_name_unique_among_live_clubs() {
    let fx = Fixture::new();
    let owner = fx.user("owner").await;
    let club_id = fx.club(owner, "Hikers").await;

    assert_eq!(
        fx.services.memberships.create_club(club_input("Hikers")).await,
        Err(ServiceError::ClubNameAlreadyExists)
    );

    // Case-sensitive
    assert!(fx
        .services
        .memberships
        .create_club(club_input("hikers"))
        .await
        .is_ok());

    fx.services
        .memberships
        .delete_club(club_id, owner)
        .await
        .unwrap();
    assert!(fx
        .services
        .memberships
        .create_club(club_input("Hikers"))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_create_club_rejects_inverted_age_range() {
    let fx = Fixture::new();
    let mut input = club_input("Odd");
    input.minimum_age = 50;
    input.maximum_age = 20;

    assert!(matches!(
        fx.services.memberships.create_club(input).await,
        Err(ServiceError::BadRequest(_))
    ));
}

#[tokio::test]
async fn test_found_club_requires_existing_owner() {
    let fx = Fixture::new();

    assert_eq!(
        fx.services
            .memberships
            .found_club(999, club_input("Ghosts"))
            .await,
        Err(ServiceError::UserNotFound)
    );
    assert!(fx.services.memberships.find_all_clubs().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_join_twice_conflicts() {
    let fx = Fixture::new();
    let owner = fx.user("owner").await;
    let member = fx.user("member").await;
    let club_id = fx.club(owner, "Runners").await;

    fx.services.memberships.join(member, club_id).await.unwrap();
    assert_eq!(
        fx.services.memberships.join(member, club_id).await,
        Err(ServiceError::MembershipAlreadyExists)
    );

    let members = fx
        .services
        .memberships
        .list_members(club_id, None)
        .await
        .unwrap();
    let joined: Vec<_> = members
        .iter()
        .filter(|m| m.user.identity.id == member)
        .collect();
    assert_eq!(joined.len(), 1);
    assert_eq!(joined[0].role, Role::Member);
    assert_eq!(joined[0].exp, 0);
}

#[tokio::test]
async fn test_join_missing_targets() {
    let fx = Fixture::new();
    let owner = fx.user("owner").await;
    let club_id = fx.club(owner, "Climbers").await;

    assert_eq!(
        fx.services.memberships.join(owner, 404).await,
        Err(ServiceError::ClubNotFound)
    );
    assert_eq!(
        fx.services.memberships.join(404, club_id).await,
        Err(ServiceError::UserNotFound)
    );
}

#[tokio::test]
async fn test_leave_then_rejoin() {
    let fx = Fixture::new();
    let owner = fx.user("owner").await;
    let member = fx.user("member").await;
    let club_id = fx.club(owner, "Swimmers").await;

    fx.services.memberships.join(member, club_id).await.unwrap();
    fx.services.memberships.leave(member, club_id).await.unwrap();
    assert!(fx.services.memberships.join(member, club_id).await.is_ok());

    assert!(matches!(
        fx.services.memberships.leave(owner, club_id).await,
        Err(ServiceError::BadRequest(_))
    ));
}

#[tokio::test]
async fn test_set_role_rejects_unknown_role() {
    let fx = Fixture::new();
    let owner = fx.user("owner").await;
    let member = fx.user("member").await;
    let club_id = fx.club(owner, "Chess").await;
    fx.services.memberships.join(member, club_id).await.unwrap();

    assert!(matches!(
        fx.services
            .memberships
            .set_role(club_id, member, "superuser", owner)
            .await,
        Err(ServiceError::BadRequest(_))
    ));

    let members = fx
        .services
        .memberships
        .list_members(club_id, None)
        .await
        .unwrap();
    let target = members
        .iter()
        .find(|m| m.user.identity.id == member)
        .unwrap();
    assert_eq!(target.role, Role::Member);
}

#[tokio::test]
async fn test_set_role_follows_policy() {
    let fx = Fixture::new();
    let owner = fx.user("owner").await;
    let admin = fx.user("admin").await;
    let member = fx.user("member").await;
    let club_id = fx.club(owner, "Photography").await;
    fx.services.memberships.join(admin, club_id).await.unwrap();
    fx.services.memberships.join(member, club_id).await.unwrap();

    fx.services
        .memberships
        .set_role(club_id, admin, "admin", owner)
        .await
        .unwrap();

    // Admins cannot hand out ownership or demote themselves
    assert!(matches!(
        fx.services
            .memberships
            .set_role(club_id, member, "owner", admin)
            .await,
        Err(ServiceError::BadRequest(_))
    ));
    assert!(matches!(
        fx.services
            .memberships
            .set_role(club_id, admin, "member", admin)
            .await,
        Err(ServiceError::BadRequest(_))
    ));

    // Members cannot assign anything
    assert!(matches!(
        fx.services
            .memberships
            .set_role(club_id, admin, "member", member)
            .await,
        Err(ServiceError::BadRequest(_))
    ));

    fx.services
        .memberships
        .set_role(club_id, member, "admin", admin)
        .await
        .unwrap();

    let roles: Vec<_> = fx
        .services
        .memberships
        .list_members(club_id, None)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.role)
        .collect();
    assert_eq!(roles, vec![Role::Owner, Role::Admin, Role::Admin]);
}

#[tokio::test]
async fn test_set_role_missing_targets() {
    let fx = Fixture::new();
    let owner = fx.user("owner").await;
    let club_id = fx.club(owner, "Gardeners").await;

    assert_eq!(
        fx.services
            .memberships
            .set_role(77, owner, "admin", owner)
            .await,
        Err(ServiceError::ClubNotFound)
    );
    assert_eq!(
        fx.services
            .memberships
            .set_role(club_id, 77, "admin", owner)
            .await,
        Err(ServiceError::UserNotFound)
    );
}

#[tokio::test]
async fn test_club_management_tiers() {
    let fx = Fixture::new();
    let owner = fx.user("owner").await;
    let admin = fx.user("admin").await;
    let member = fx.user("member").await;
    let club_id = fx.club(owner, "Cyclists").await;
    fx.services.memberships.join(admin, club_id).await.unwrap();
    fx.services.memberships.join(member, club_id).await.unwrap();
    fx.services
        .memberships
        .set_role(club_id, admin, "admin", owner)
        .await
        .unwrap();

    let rename = UpdateClub {
        capacity: Some(50),
        ..Default::default()
    };
    assert!(matches!(
        fx.services
            .memberships
            .update_club(club_id, member, rename.clone())
            .await,
        Err(ServiceError::BadRequest(_))
    ));
    let club = fx
        .services
        .memberships
        .update_club(club_id, admin, rename)
        .await
        .unwrap();
    assert_eq!(club.capacity, 50);

    assert!(matches!(
        fx.services.memberships.delete_club(club_id, admin).await,
        Err(ServiceError::BadRequest(_))
    ));
    fx.services
        .memberships
        .delete_club(club_id, owner)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_grant_experience_accumulates() {
    let fx = Fixture::new();
    let owner = fx.user("owner").await;
    let member = fx.user("member").await;
    let club_id = fx.club(owner, "Bakers").await;
    fx.services.memberships.join(member, club_id).await.unwrap();

    fx.services
        .memberships
        .grant_experience(club_id, member, 10)
        .await
        .unwrap();
    let membership = fx
        .services
        .memberships
        .grant_experience(club_id, member, 5)
        .await
        .unwrap();

    assert_eq!(membership.exp, 15);
}

#[tokio::test]
async fn test_list_clubs_of_user_skips_deleted_clubs() {
    let fx = Fixture::new();
    let owner = fx.user("owner").await;
    let kept = fx.club(owner, "Kept").await;
    let dropped = fx.club(owner, "Dropped").await;
    fx.services
        .memberships
        .delete_club(dropped, owner)
        .await
        .unwrap();

    let clubs: Vec<_> = fx
        .services
        .users
        .list_clubs_of_user(owner)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.club_id)
        .collect();
    assert_eq!(clubs, vec![kept]);
}

// ---------------------------------------------------------------------------
// Feeds
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_private_feed_visibility() {
    let fx = Fixture::new();
    let owner = fx.user("owner").await;
    let outsider = fx.user("outsider").await;
    let club_id = fx.club(owner, "Secret").await;

    let private = fx.feed(owner, club_id, "members only", true).await;
    let public = fx.feed(owner, club_id, "hello world", false).await;

    assert!(fx.services.feeds.find_feed(private, Some(owner)).await.is_ok());
    assert_eq!(
        fx.services.feeds.find_feed(private, Some(outsider)).await,
        Err(ServiceError::FeedNotFound)
    );
    assert_eq!(
        fx.services.feeds.find_feed(private, None).await,
        Err(ServiceError::FeedNotFound)
    );

    assert!(fx.services.feeds.find_feed(public, Some(owner)).await.is_ok());
    assert!(fx.services.feeds.find_feed(public, Some(outsider)).await.is_ok());
    assert!(fx.services.feeds.find_feed(public, None).await.is_ok());
}

#[tokio::test]
async fn test_create_feed_requires_membership() {
    let fx = Fixture::new();
    let owner = fx.user("owner").await;
    let outsider = fx.user("outsider").await;
    let club_id = fx.club(owner, "Closed").await;

    let input = CreateFeed {
        title: "hi".to_string(),
        content: "let me in".to_string(),
        is_private: false,
    };
    assert!(matches!(
        fx.services
            .feeds
            .create_feed(outsider, club_id, input.clone())
            .await,
        Err(ServiceError::BadRequest(_))
    ));
    assert_eq!(
        fx.services.feeds.create_feed(owner, 404, input).await,
        Err(ServiceError::ClubNotFound)
    );
}

#[tokio::test]
async fn test_feed_pages_newest_first() {
    let fx = Fixture::new();
    let owner = fx.user("owner").await;
    let club_id = fx.club(owner, "Writers").await;
    for title in ["A", "B", "C", "D", "E"] {
        fx.feed(owner, club_id, title, false).await;
    }

    let mut pages = Vec::new();
    let mut cursor = None;
    loop {
        let page = fx
            .services
            .feeds
            .list_feeds_by_club(club_id, Some(owner), cursor, 2)
            .await
            .unwrap();
        if page.is_empty() {
            break;
        }
        cursor = page.last().map(|feed| feed.id());
        pages.push(
            page.into_iter()
                .map(|feed| feed.title)
                .collect::<Vec<_>>(),
        );
    }

    assert_eq!(
        pages,
        vec![
            vec!["E".to_string(), "D".to_string()],
            vec!["C".to_string(), "B".to_string()],
            vec!["A".to_string()],
        ]
    );
}

#[tokio::test]
async fn test_private_feeds_filtered_before_limit() {
    let fx = Fixture::new();
    let owner = fx.user("owner").await;
    let club_id = fx.club(owner, "Mixed").await;
    fx.feed(owner, club_id, "public-1", false).await;
    fx.feed(owner, club_id, "public-2", false).await;
    fx.feed(owner, club_id, "private-1", true).await;
    fx.feed(owner, club_id, "private-2", true).await;

    let outsider_view = fx
        .services
        .feeds
        .list_feeds_by_club(club_id, None, None, 2)
        .await
        .unwrap();
    let titles: Vec<_> = outsider_view.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(titles, vec!["public-2", "public-1"]);

    let member_view = fx
        .services
        .feeds
        .list_feeds_by_club(club_id, Some(owner), None, 2)
        .await
        .unwrap();
    let titles: Vec<_> = member_view.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(titles, vec!["private-2", "private-1"]);
}

#[tokio::test]
async fn test_feed_page_limit_bounds() {
    let fx = Fixture::new();
    let owner = fx.user("owner").await;
    let club_id = fx.club(owner, "Bounds").await;

    for limit in [0, -1, 101] {
        assert!(matches!(
            fx.services
                .feeds
                .list_feeds_by_club(club_id, None, None, limit)
                .await,
            Err(ServiceError::BadRequest(_))
        ));
    }
    assert!(fx
        .services
        .feeds
        .list_feeds_by_club(club_id, None, None, 100)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_deleted_club_hides_feeds_but_keeps_them() {
    let fx = Fixture::new();
    let owner = fx.user("owner").await;
    let club_id = fx.club(owner, "Archive").await;
    let feed_id = fx.feed(owner, club_id, "old news", false).await;
    let stored_before = fx.store.stored_feed_count().await;

    fx.services
        .memberships
        .delete_club(club_id, owner)
        .await
        .unwrap();

    assert_eq!(
        fx.services.memberships.find_club(club_id).await,
        Err(ServiceError::ClubNotFound)
    );
    assert_eq!(fx.store.stored_feed_count().await, stored_before);
    assert_eq!(
        fx.services
            .feeds
            .list_feeds_by_club(club_id, Some(owner), None, 10)
            .await,
        Err(ServiceError::ClubNotFound)
    );
    assert_eq!(
        fx.services.feeds.find_feed(feed_id, Some(owner)).await,
        Err(ServiceError::FeedNotFound)
    );
}

#[tokio::test]
async fn test_only_author_changes_feed() {
    let fx = Fixture::new();
    let owner = fx.user("owner").await;
    let member = fx.user("member").await;
    let club_id = fx.club(owner, "Authors").await;
    fx.services.memberships.join(member, club_id).await.unwrap();
    let feed_id = fx.feed(owner, club_id, "draft", false).await;

    let edit = UpdateFeed {
        title: Some("final".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        fx.services
            .feeds
            .update_feed(feed_id, member, edit.clone())
            .await,
        Err(ServiceError::BadRequest(_))
    ));
    let feed = fx
        .services
        .feeds
        .update_feed(feed_id, owner, edit)
        .await
        .unwrap();
    assert_eq!(feed.title, "final");

    assert!(matches!(
        fx.services.feeds.delete_feed(feed_id, member).await,
        Err(ServiceError::BadRequest(_))
    ));
    fx.services.feeds.delete_feed(feed_id, owner).await.unwrap();
    assert_eq!(
        fx.services.feeds.find_feed(feed_id, Some(owner)).await,
        Err(ServiceError::FeedNotFound)
    );
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_comments_follow_feed_visibility() {
    let fx = Fixture::new();
    let owner = fx.user("owner").await;
    let outsider = fx.user("outsider").await;
    let club_id = fx.club(owner, "Quiet").await;
    let private = fx.feed(owner, club_id, "inner circle", true).await;

    let comment_id = fx
        .services
        .comments
        .create_comment(owner, private, comment("first"))
        .await
        .unwrap();

    assert!(fx
        .services
        .comments
        .find_comment(comment_id, Some(owner))
        .await
        .is_ok());
    assert_eq!(
        fx.services
            .comments
            .find_comment(comment_id, Some(outsider))
            .await,
        Err(ServiceError::CommentNotFound)
    );
    assert_eq!(
        fx.services
            .comments
            .create_comment(outsider, private, comment("me too"))
            .await,
        Err(ServiceError::FeedNotFound)
    );
    assert_eq!(
        fx.services
            .comments
            .list_comments_by_feed(private, None)
            .await,
        Err(ServiceError::FeedNotFound)
    );
}

#[tokio::test]
async fn test_comment_lifecycle() {
    let fx = Fixture::new();
    let owner = fx.user("owner").await;
    let other = fx.user("other").await;
    let club_id = fx.club(owner, "Talkers").await;
    let feed_id = fx.feed(owner, club_id, "topic", false).await;

    let first = fx
        .services
        .comments
        .create_comment(owner, feed_id, comment("first"))
        .await
        .unwrap();
    fx.services
        .comments
        .create_comment(other, feed_id, comment("second"))
        .await
        .unwrap();

    let edit = UpdateComment {
        content: "edited".to_string(),
    };
    assert!(matches!(
        fx.services
            .comments
            .update_comment(first, other, edit.clone())
            .await,
        Err(ServiceError::BadRequest(_))
    ));
    let updated = fx
        .services
        .comments
        .update_comment(first, owner, edit)
        .await
        .unwrap();
    assert_eq!(updated.content, "edited");

    fx.services
        .comments
        .delete_comment(first, owner)
        .await
        .unwrap();

    let remaining: Vec<_> = fx
        .services
        .comments
        .list_comments_by_feed(feed_id, None)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.content)
        .collect();
    assert_eq!(remaining, vec!["second".to_string()]);
    assert_eq!(
        fx.services.comments.find_comment(first, Some(owner)).await,
        Err(ServiceError::CommentNotFound)
    );
}

#[tokio::test]
async fn test_list_members_by_role() {
    let fx = Fixture::new();
    let owner = fx.user("owner").await;
    let admin = fx.user("admin").await;
    let first = fx.user("first").await;
    let second = fx.user("second").await;
    let club_id = fx.club(owner, "Cyclists").await;
    for user in [admin, first, second] {
        fx.services.memberships.join(user, club_id).await.unwrap();
    }
    fx.services
        .memberships
        .set_role(club_id, admin, "admin", owner)
        .await
        .unwrap();

    let ids = |members: Vec<clubhouse_shared::models::MemberDto>| {
        members
            .into_iter()
            .map(|m| m.user.identity.id)
            .collect::<Vec<_>>()
    };

    let members = fx
        .services
        .memberships
        .list_members(club_id, Some("member"))
        .await
        .unwrap();
    assert_eq!(ids(members), vec![first, second]);

    let admins = fx
        .services
        .memberships
        .list_members(club_id, Some("admin"))
        .await
        .unwrap();
    assert_eq!(ids(admins), vec![admin]);

    assert!(matches!(
        fx.services
            .memberships
            .list_members(club_id, Some("Owner"))
            .await,
        Err(ServiceError::BadRequest(_))
    ));
    assert_eq!(
        fx.services
            .memberships
            .list_members(404, Some("member"))
            .await,
        Err(ServiceError::ClubNotFound)
    );
}

#[tokio::test]
async fn test_deleted_user_loses_club_rights() {
    let fx = Fixture::new();
    let owner = fx.user("owner").await;
    let leaver = fx.user("leaver").await;
    let club_id = fx.club(owner, "Astronomers").await;
    fx.services.memberships.join(leaver, club_id).await.unwrap();
    let private = fx.feed(owner, club_id, "members only", true).await;
    let own_feed = fx.feed(leaver, club_id, "my post", false).await;

    fx.services.users.delete_user(leaver, leaver).await.unwrap();

    assert_eq!(
        fx.services.feeds.find_feed(private, Some(leaver)).await,
        Err(ServiceError::FeedNotFound)
    );
    assert_eq!(
        fx.services
            .feeds
            .list_feeds_by_club(club_id, Some(leaver), None, 10)
            .await
            .unwrap()
            .len(),
        1
    );
    assert_eq!(
        fx.services
            .feeds
            .create_feed(
                leaver,
                club_id,
                CreateFeed {
                    title: "ghost".to_string(),
                    content: "still here?".to_string(),
                    is_private: false,
                },
            )
            .await,
        Err(ServiceError::UserNotFound)
    );
    assert_eq!(
        fx.services.feeds.delete_feed(own_feed, leaver).await,
        Err(ServiceError::UserNotFound)
    );
    assert_eq!(
        fx.services
            .comments
            .create_comment(leaver, own_feed, comment("boo"))
            .await,
        Err(ServiceError::UserNotFound)
    );
    assert_eq!(
        fx.services.memberships.leave(leaver, club_id).await,
        Err(ServiceError::UserNotFound)
    );

    // Gone from the member list, still stored
    let members = fx
        .services
        .memberships
        .list_members(club_id, None)
        .await
        .unwrap();
    assert_eq!(members.len(), 1);
    assert!(fx.services.feeds.find_feed(own_feed, None).await.is_ok());
}
