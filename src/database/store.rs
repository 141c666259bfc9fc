use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{
        ApprovedEntry, AuditEntry, Decision, NewAuditEntry, OtRequest, Profile, Role, RosterDay,
        Shift, ShiftCounts, ShiftInput, Staffing,
    },
    repositories::{
        AuditRepository, OtRequestRepository, ProfileRepository, RosterRepository,
        ShiftRepository,
    },
};

/// Persistence seam for the overtime service.
///
/// Each method is a single atomic operation against the backing store.
/// Transition methods are conditional: they return `None` when the row was
/// missing or no longer in a state the transition accepts, so a concurrent
/// change surfaces as a conflict instead of a lost update.
#[async_trait]
pub trait OvertimeStore: Send + Sync + 'static {
    // Shift catalog
    async fn find_shift(&self, id: Uuid) -> Result<Option<Shift>>;
    async fn list_shifts(&self, from: NaiveDate, include_deleted: bool) -> Result<Vec<Shift>>;
    async fn upsert_shifts(&self, inputs: &[ShiftInput]) -> Result<Vec<Shift>>;
    async fn update_capacity(&self, id: Uuid, spots_available: i32) -> Result<Option<Shift>>;
    /// Soft-deletes an active shift and declines its open requests. Returns
    /// the shift and how many requests were declined.
    async fn soft_delete_shift(
        &self,
        id: Uuid,
        deleted_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<(Shift, u64)>>;

    // Request ledger
    async fn find_request(&self, id: Uuid) -> Result<Option<OtRequest>>;
    async fn find_request_for(&self, shift_id: Uuid, user_id: Uuid) -> Result<Option<OtRequest>>;
    async fn upsert_request(&self, shift_id: Uuid, user_id: Uuid, at: DateTime<Utc>) -> Result<OtRequest>;
    async fn cancel_request(&self, shift_id: Uuid, user_id: Uuid) -> Result<Option<OtRequest>>;
    async fn decide_request(
        &self,
        id: Uuid,
        decision: Decision,
        decided_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<OtRequest>>;
    async fn archive_request(&self, id: Uuid, user_id: Uuid) -> Result<Option<OtRequest>>;
    async fn archive_closed_requests(&self, user_id: Uuid) -> Result<u64>;
    async fn list_user_requests(&self, user_id: Uuid) -> Result<Vec<OtRequest>>;
    async fn list_active_requests(&self) -> Result<Vec<OtRequest>>;
    async fn shift_counts(&self) -> Result<Vec<ShiftCounts>>;
    async fn list_approved_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<ApprovedEntry>>;

    // Roster
    async fn roster_pattern(&self, team: &str) -> Result<Vec<RosterDay>>;
    async fn roster_base_date(&self) -> Result<Option<NaiveDate>>;

    // Profiles
    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>>;
    async fn list_profiles(&self, ids: &[Uuid]) -> Result<Vec<Profile>>;
    /// Every profile, optionally of one role, ordered by name.
    async fn list_all_profiles(&self, role: Option<Role>) -> Result<Vec<Profile>>;
    async fn update_profile(&self, id: Uuid, full_name: &str, phone: Option<&str>) -> Result<Option<Profile>>;
    async fn set_role(&self, id: Uuid, role: Role) -> Result<Option<Profile>>;
    async fn find_staffing(&self, user_id: Uuid) -> Result<Option<Staffing>>;
    async fn upsert_staffing(&self, staffing: &Staffing) -> Result<Staffing>;

    // Audit
    async fn append_audit(&self, entry: NewAuditEntry) -> Result<AuditEntry>;
    async fn list_audit(&self, limit: i64) -> Result<Vec<AuditEntry>>;
}

/// Postgres-backed store composed of the per-table repositories.
#[derive(Clone)]
pub struct PgStore {
    shifts: ShiftRepository,
    requests: OtRequestRepository,
    roster: RosterRepository,
    profiles: ProfileRepository,
    audit: AuditRepository,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            shifts: ShiftRepository::new(pool.clone()),
            requests: OtRequestRepository::new(pool.clone()),
            roster: RosterRepository::new(pool.clone()),
            profiles: ProfileRepository::new(pool.clone()),
            audit: AuditRepository::new(pool),
        }
    }
}

#[async_trait]
impl OvertimeStore for PgStore {
    async fn find_shift(&self, id: Uuid) -> Result<Option<Shift>> {
        self.shifts.find_by_id(id).await
    }

    async fn list_shifts(&self, from: NaiveDate, include_deleted: bool) -> Result<Vec<Shift>> {
        self.shifts.list_from(from, include_deleted).await
    }

    async fn upsert_shifts(&self, inputs: &[ShiftInput]) -> Result<Vec<Shift>> {
        self.shifts.upsert_many(inputs).await
    }

    async fn update_capacity(&self, id: Uuid, spots_available: i32) -> Result<Option<Shift>> {
        self.shifts.update_capacity(id, spots_available).await
    }

    async fn soft_delete_shift(
        &self,
        id: Uuid,
        deleted_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<(Shift, u64)>> {
        self.shifts.soft_delete_and_decline(id, deleted_by, at).await
    }

    async fn find_request(&self, id: Uuid) -> Result<Option<OtRequest>> {
        self.requests.find_by_id(id).await
    }

    async fn find_request_for(&self, shift_id: Uuid, user_id: Uuid) -> Result<Option<OtRequest>> {
        self.requests.find_for(shift_id, user_id).await
    }

    async fn upsert_request(&self, shift_id: Uuid, user_id: Uuid, at: DateTime<Utc>) -> Result<OtRequest> {
        self.requests.upsert_requested(shift_id, user_id, at).await
    }

    async fn cancel_request(&self, shift_id: Uuid, user_id: Uuid) -> Result<Option<OtRequest>> {
        self.requests.cancel(shift_id, user_id).await
    }

    async fn decide_request(
        &self,
        id: Uuid,
        decision: Decision,
        decided_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<OtRequest>> {
        self.requests.decide(id, decision.into(), decided_by, at).await
    }

    async fn archive_request(&self, id: Uuid, user_id: Uuid) -> Result<Option<OtRequest>> {
        self.requests.archive(id, user_id).await
    }

    async fn archive_closed_requests(&self, user_id: Uuid) -> Result<u64> {
        self.requests.archive_closed(user_id).await
    }

    async fn list_user_requests(&self, user_id: Uuid) -> Result<Vec<OtRequest>> {
        self.requests.list_by_user(user_id).await
    }

    async fn list_active_requests(&self) -> Result<Vec<OtRequest>> {
        self.requests.list_active().await
    }

    async fn shift_counts(&self) -> Result<Vec<ShiftCounts>> {
        self.requests.shift_counts().await
    }

    async fn list_approved_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<ApprovedEntry>> {
        self.requests.approved_between(start, end).await
    }

    async fn roster_pattern(&self, team: &str) -> Result<Vec<RosterDay>> {
        self.roster.pattern_for_team(team).await
    }

    async fn roster_base_date(&self) -> Result<Option<NaiveDate>> {
        self.roster.base_date().await
    }

    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>> {
        self.profiles.find_by_id(id).await
    }

    async fn list_profiles(&self, ids: &[Uuid]) -> Result<Vec<Profile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.profiles.find_many(ids).await
    }

    async fn list_all_profiles(&self, role: Option<Role>) -> Result<Vec<Profile>> {
        self.profiles.list_all(role).await
    }

    async fn update_profile(&self, id: Uuid, full_name: &str, phone: Option<&str>) -> Result<Option<Profile>> {
        self.profiles.update_details(id, full_name, phone).await
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<Option<Profile>> {
        self.profiles.set_role(id, role).await
    }

    async fn find_staffing(&self, user_id: Uuid) -> Result<Option<Staffing>> {
        self.profiles.find_staffing(user_id).await
    }

    async fn upsert_staffing(&self, staffing: &Staffing) -> Result<Staffing> {
        self.profiles.upsert_staffing(staffing).await
    }

    async fn append_audit(&self, entry: NewAuditEntry) -> Result<AuditEntry> {
        self.audit.insert(entry).await
    }

    async fn list_audit(&self, limit: i64) -> Result<Vec<AuditEntry>> {
        self.audit.list_recent(limit).await
    }
}
