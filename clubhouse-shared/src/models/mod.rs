/// Domain models for Clubhouse
///
/// Every entity embeds an [`Identity`](common::Identity) value carrying its id,
/// timestamps and soft-delete marker. Storage layout lives in the SQL
/// migrations; these structs only describe the in-memory shape.
///
/// # Models
///
/// - `common`: soft-deletable identity shared by all entities
/// - `user`: user accounts and the credential-free `UserDto` projection
/// - `club`: clubs with a unique live name
/// - `membership`: user-club relationship with role tier and experience
/// - `feed`: posts inside a club, optionally private
/// - `comment`: comments on feeds

pub mod club;
pub mod comment;
pub mod common;
pub mod feed;
pub mod membership;
pub mod user;

pub use club::{Club, CreateClub, UpdateClub};
pub use comment::{Comment, CreateComment, UpdateComment};
pub use common::Identity;
pub use feed::{CreateFeed, Feed, UpdateFeed};
pub use membership::{MemberDto, Membership, Role, UnknownRole};
pub use user::{CreateUser, NewUser, UpdateUser, User, UserDto};
