/// Clubs, joining and leaving, roles and experience
///
/// # Role assignment
///
/// Who may assign which role is decided by a [`RolePolicy`] evaluated against
/// the acting user's own membership. [`DefaultRolePolicy`] implements:
///
/// | Acting role | May assign |
/// |---|---|
/// | owner | any role, to anyone but themselves |
/// | admin | `member` or `admin`, only to targets whose role is `member` |
/// | member | nothing |
///
/// Nobody may change their own role. A refusal is a `BadRequest`.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::{ensure_live_user, validate_input};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    Club, CreateClub, MemberDto, Membership, Role, UnknownRole, UpdateClub, UserDto,
};
use crate::repository::Store;

/// Decides whether `acting` may give `target` the role `role`
pub trait RolePolicy: Send + Sync {
    fn may_assign(&self, acting: &Membership, target: &Membership, role: Role) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRolePolicy;

impl RolePolicy for DefaultRolePolicy {
    fn may_assign(&self, acting: &Membership, target: &Membership, role: Role) -> bool {
        if acting.user_id == target.user_id {
            return false;
        }

        match acting.role {
            Role::Owner => true,
            Role::Admin => target.role == Role::Member && role <= Role::Admin,
            Role::Member => false,
        }
    }
}

#[derive(Clone)]
pub struct MembershipService {
    store: Arc<dyn Store>,
    policy: Arc<dyn RolePolicy>,
}

impl MembershipService {
    pub fn new(store: Arc<dyn Store>, policy: Arc<dyn RolePolicy>) -> Self {
        Self { store, policy }
    }

    /// Creates a club and returns its id
    pub async fn create_club(&self, input: CreateClub) -> ServiceResult<i64> {
        validate_input(&input)?;
        check_age_range(input.minimum_age, input.maximum_age)?;

        if self.store.find_club_by_name(&input.name).await?.is_some() {
            warn!(name = %input.name, "Club name already taken");
            return Err(ServiceError::ClubNameAlreadyExists);
        }

        // A concurrent writer can still win; the storage constraint reports it
        let club = self.store.insert_club(&input).await?;

        info!(club_id = club.id(), name = %club.name, "Club created");
        Ok(club.id())
    }

    /// Creates a club with `owner_id` as its owner
    ///
    /// If the owner membership cannot be written the club is soft-deleted
    /// again before the error is returned.
    pub async fn found_club(&self, owner_id: i64, input: CreateClub) -> ServiceResult<i64> {
        if self.store.find_user(owner_id).await?.is_none() {
            return Err(ServiceError::UserNotFound);
        }

        let club_id = self.create_club(input).await?;

        if let Err(err) = self
            .store
            .insert_membership(owner_id, club_id, Role::Owner)
            .await
        {
            warn!(club_id, owner_id, error = %err, "Owner membership failed, rolling back club");
            if let Err(rollback) = self.store.soft_delete_club(club_id).await {
                error!(club_id, error = %rollback, "Failed to roll back club");
            }
            return Err(err.into());
        }

        info!(club_id, owner_id, "Club founded");
        Ok(club_id)
    }

    pub async fn find_club(&self, club_id: i64) -> ServiceResult<Club> {
        debug!(club_id, "Finding club");

        self.store
            .find_club(club_id)
            .await?
            .ok_or(ServiceError::ClubNotFound)
    }

    pub async fn find_all_clubs(&self) -> ServiceResult<Vec<Club>> {
        Ok(self.store.list_clubs().await?)
    }

    /// Edits club settings; admin or owner only
    pub async fn update_club(
        &self,
        club_id: i64,
        acting_user_id: i64,
        changes: UpdateClub,
    ) -> ServiceResult<Club> {
        validate_input(&changes)?;

        let club = self.find_club(club_id).await?;
        let acting = self.acting_membership(acting_user_id, club_id).await?;

        if !acting.role.can_manage_club() {
            warn!(club_id, acting_user_id, role = %acting.role, "Club update refused");
            return Err(ServiceError::bad_request("only admins and owners may edit the club"));
        }

        check_age_range(
            changes.minimum_age.unwrap_or(club.minimum_age),
            changes.maximum_age.unwrap_or(club.maximum_age),
        )?;

        if let Some(name) = changes.name.as_deref() {
            if name != club.name && self.store.find_club_by_name(name).await?.is_some() {
                return Err(ServiceError::ClubNameAlreadyExists);
            }
        }

        let club = self
            .store
            .update_club(club_id, changes)
            .await?
            .ok_or(ServiceError::ClubNotFound)?;

        info!(club_id, acting_user_id, "Club updated");
        Ok(club)
    }

    /// Soft-deletes a club; owner only
    ///
    /// Memberships and feeds stay stored but become unreachable through the
    /// club.
    pub async fn delete_club(&self, club_id: i64, acting_user_id: i64) -> ServiceResult<()> {
        self.find_club(club_id).await?;
        let acting = self.acting_membership(acting_user_id, club_id).await?;

        if !acting.role.can_delete_club() {
            warn!(club_id, acting_user_id, role = %acting.role, "Club deletion refused");
            return Err(ServiceError::bad_request("only the owner may delete the club"));
        }

        if !self.store.soft_delete_club(club_id).await? {
            return Err(ServiceError::ClubNotFound);
        }

        info!(club_id, acting_user_id, "Club deleted");
        Ok(())
    }

    /// Joins a club as a member and returns the membership id
    pub async fn join(&self, user_id: i64, club_id: i64) -> ServiceResult<i64> {
        self.find_club(club_id).await?;

        if self.store.find_user(user_id).await?.is_none() {
            return Err(ServiceError::UserNotFound);
        }

        if self.store.find_membership(user_id, club_id).await?.is_some() {
            return Err(ServiceError::MembershipAlreadyExists);
        }

        let membership = self
            .store
            .insert_membership(user_id, club_id, Role::Member)
            .await?;

        info!(user_id, club_id, membership_id = membership.id(), "User joined club");
        Ok(membership.id())
    }

    /// Leaves a club; the owner has to hand over ownership first
    pub async fn leave(&self, user_id: i64, club_id: i64) -> ServiceResult<()> {
        self.find_club(club_id).await?;
        let membership = self.acting_membership(user_id, club_id).await?;

        if membership.role == Role::Owner {
            return Err(ServiceError::bad_request("the owner cannot leave the club"));
        }

        self.store.soft_delete_membership(membership.id()).await?;

        info!(user_id, club_id, "User left club");
        Ok(())
    }

    /// Assigns `role` to `user_id` in the club and returns the membership id
    ///
    /// `role` is the raw tier name; anything else is a `BadRequest` and the
    /// membership is left as it was.
    pub async fn set_role(
        &self,
        club_id: i64,
        user_id: i64,
        role: &str,
        acting_user_id: i64,
    ) -> ServiceResult<i64> {
        self.find_club(club_id).await?;

        if self.store.find_user(user_id).await?.is_none() {
            return Err(ServiceError::UserNotFound);
        }

        let role = parse_role(role)?;

        let target = self
            .store
            .find_membership(user_id, club_id)
            .await?
            .ok_or_else(|| ServiceError::bad_request("user is not a member of the club"))?;
        let acting = self.acting_membership(acting_user_id, club_id).await?;

        if !self.policy.may_assign(&acting, &target, role) {
            warn!(
                club_id,
                user_id,
                acting_user_id,
                acting_role = %acting.role,
                requested = %role,
                "Role assignment refused"
            );
            return Err(ServiceError::bad_request("not allowed to assign this role"));
        }

        let membership = self
            .store
            .update_role(target.id(), role)
            .await?
            .ok_or_else(|| ServiceError::bad_request("user is not a member of the club"))?;

        info!(club_id, user_id, role = %role, acting_user_id, "Role assigned");
        Ok(membership.id())
    }

    /// Members of a club, in join order
    ///
    /// `role`, when given, must name a tier and narrows the list to it.
    pub async fn list_members(
        &self,
        club_id: i64,
        role: Option<&str>,
    ) -> ServiceResult<Vec<MemberDto>> {
        self.find_club(club_id).await?;

        let role = role.map(parse_role).transpose()?;
        let members = self.store.list_members(club_id, role).await?;
        Ok(members
            .into_iter()
            .map(|(membership, user)| MemberDto::new(&membership, UserDto::from(user)))
            .collect())
    }

    /// Adds experience to a member
    pub async fn grant_experience(
        &self,
        club_id: i64,
        user_id: i64,
        amount: u32,
    ) -> ServiceResult<Membership> {
        self.find_club(club_id).await?;
        let membership = self.acting_membership(user_id, club_id).await?;

        let membership = self
            .store
            .add_exp(membership.id(), i64::from(amount))
            .await?
            .ok_or_else(|| ServiceError::bad_request("user is not a member of the club"))?;

        debug!(club_id, user_id, amount, exp = membership.exp, "Experience granted");
        Ok(membership)
    }

    async fn acting_membership(&self, user_id: i64, club_id: i64) -> ServiceResult<Membership> {
        ensure_live_user(self.store.as_ref(), user_id).await?;

        self.store
            .find_membership(user_id, club_id)
            .await?
            .ok_or_else(|| ServiceError::bad_request("user is not a member of the club"))
    }
}

fn parse_role(role: &str) -> ServiceResult<Role> {
    role.parse().map_err(|e: UnknownRole| ServiceError::bad_request(e.to_string()))
}

fn check_age_range(minimum_age: i32, maximum_age: i32) -> ServiceResult<()> {
    if minimum_age > maximum_age {
        return Err(ServiceError::bad_request(
            "minimum_age must not exceed maximum_age",
        ));
    }
    Ok(())
}
