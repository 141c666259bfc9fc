use std::cmp::Ordering;
use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::{
    models::{
        ApprovedEntry, AuditEntry, Decision, NewAuditEntry, OtRequest, Profile, RequestStatus,
        Role, RosterDay, RosterType, Shift, ShiftCounts, ShiftInput, ShiftStatus, Staffing,
    },
    store::OvertimeStore,
};
use crate::domain::{
    counts,
    lifecycle::{self, RequestAction},
};

#[derive(Default)]
struct MemoryState {
    shifts: HashMap<Uuid, Shift>,
    requests: HashMap<Uuid, OtRequest>,
    patterns: HashMap<String, Vec<RosterDay>>,
    base_date: Option<NaiveDate>,
    profiles: HashMap<Uuid, Profile>,
    staffing: HashMap<Uuid, Staffing>,
    audit: Vec<AuditEntry>,
}

impl MemoryState {
    fn request_for(&mut self, shift_id: Uuid, user_id: Uuid) -> Option<&mut OtRequest> {
        self.requests
            .values_mut()
            .find(|r| r.shift_id == shift_id && r.user_id == user_id)
    }
}

/// Ascending by name with unnamed profiles last, as `NULLS LAST` sorts them.
fn name_order(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// In-process store selected by a `memory://` database URL. Mirrors the
/// Postgres constraints: one shift per (date, type) and one request per
/// (shift, user).
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_profile(&self, id: Uuid, full_name: Option<&str>, role: Role) -> Profile {
        let profile = Profile {
            id,
            full_name: full_name.map(str::to_string),
            phone: None,
            role,
            created_at: Utc::now(),
        };
        self.state.write().await.profiles.insert(id, profile.clone());
        profile
    }

    /// Replaces a team's pattern; `days[i]` is the roster type of index `i`.
    pub async fn set_roster_pattern(&self, team: &str, days: &[RosterType]) {
        let entries = days
            .iter()
            .zip(0i16..)
            .map(|(&roster_type, day_index)| RosterDay {
                team: team.to_string(),
                day_index,
                roster_type,
                start_time: None,
                end_time: None,
            })
            .collect();
        self.state.write().await.patterns.insert(team.to_string(), entries);
    }

    pub async fn set_base_date(&self, base_date: NaiveDate) {
        self.state.write().await.base_date = Some(base_date);
    }
}

#[async_trait]
impl OvertimeStore for MemoryStore {
    async fn find_shift(&self, id: Uuid) -> Result<Option<Shift>> {
        Ok(self.state.read().await.shifts.get(&id).cloned())
    }

    async fn list_shifts(&self, from: NaiveDate, include_deleted: bool) -> Result<Vec<Shift>> {
        let state = self.state.read().await;
        let mut shifts: Vec<Shift> = state
            .shifts
            .values()
            .filter(|s| s.shift_date >= from && (include_deleted || s.is_active()))
            .cloned()
            .collect();
        shifts.sort_by_key(|s| (s.shift_date, s.shift_type));
        Ok(shifts)
    }

    async fn upsert_shifts(&self, inputs: &[ShiftInput]) -> Result<Vec<Shift>> {
        let mut state = self.state.write().await;
        let mut saved = Vec::with_capacity(inputs.len());

        for input in inputs {
            let existing = state
                .shifts
                .values_mut()
                .find(|s| s.shift_date == input.shift_date && s.shift_type == input.shift_type);

            let shift = match existing {
                Some(shift) => {
                    shift.start_time = input.start_time;
                    shift.end_time = input.end_time;
                    shift.department = input.department.clone();
                    shift.spots_available = input.spots_available;
                    shift.shift_status = ShiftStatus::Active;
                    shift.deleted_at = None;
                    shift.notes = input.notes.clone();
                    shift.clone()
                }
                None => {
                    let shift = Shift {
                        id: Uuid::new_v4(),
                        shift_date: input.shift_date,
                        shift_type: input.shift_type,
                        start_time: input.start_time,
                        end_time: input.end_time,
                        department: input.department.clone(),
                        spots_available: input.spots_available,
                        shift_status: ShiftStatus::Active,
                        notes: input.notes.clone(),
                        deleted_at: None,
                        created_at: Utc::now(),
                    };
                    state.shifts.insert(shift.id, shift.clone());
                    shift
                }
            };
            saved.push(shift);
        }

        Ok(saved)
    }

    async fn update_capacity(&self, id: Uuid, spots_available: i32) -> Result<Option<Shift>> {
        let mut state = self.state.write().await;
        Ok(state.shifts.get_mut(&id).map(|shift| {
            shift.spots_available = spots_available;
            shift.clone()
        }))
    }

    async fn soft_delete_shift(
        &self,
        id: Uuid,
        deleted_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<(Shift, u64)>> {
        let mut state = self.state.write().await;

        let shift = match state.shifts.get_mut(&id) {
            Some(shift) if shift.is_active() => {
                shift.shift_status = ShiftStatus::Deleted;
                shift.deleted_at = Some(at);
                shift.clone()
            }
            _ => return Ok(None),
        };

        let mut declined = 0;
        for request in state.requests.values_mut().filter(|r| {
            r.shift_id == id && matches!(r.status, RequestStatus::Requested | RequestStatus::Approved)
        }) {
            request.record_decision(Decision::Declined, deleted_by, at);
            declined += 1;
        }

        Ok(Some((shift, declined)))
    }

    async fn find_request(&self, id: Uuid) -> Result<Option<OtRequest>> {
        Ok(self.state.read().await.requests.get(&id).cloned())
    }

    async fn find_request_for(&self, shift_id: Uuid, user_id: Uuid) -> Result<Option<OtRequest>> {
        let state = self.state.read().await;
        Ok(state
            .requests
            .values()
            .find(|r| r.shift_id == shift_id && r.user_id == user_id)
            .cloned())
    }

    async fn upsert_request(&self, shift_id: Uuid, user_id: Uuid, at: DateTime<Utc>) -> Result<OtRequest> {
        let mut state = self.state.write().await;

        if let Some(request) = state.request_for(shift_id, user_id) {
            if lifecycle::on_request(Some(request.status)) == RequestAction::Revive {
                request.revive(at);
            }
            return Ok(request.clone());
        }

        let request = OtRequest::requested(shift_id, user_id, at);
        state.requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn cancel_request(&self, shift_id: Uuid, user_id: Uuid) -> Result<Option<OtRequest>> {
        let mut state = self.state.write().await;
        Ok(state
            .request_for(shift_id, user_id)
            .filter(|r| lifecycle::can_cancel(r.status))
            .map(|request| {
                request.status = RequestStatus::Cancelled;
                request.clone()
            }))
    }

    async fn decide_request(
        &self,
        id: Uuid,
        decision: Decision,
        decided_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<OtRequest>> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let shifts = &state.shifts;
        Ok(state
            .requests
            .get_mut(&id)
            .filter(|r| {
                r.status != RequestStatus::Cancelled
                    && shifts.get(&r.shift_id).is_some_and(|s| s.is_active())
            })
            .map(|request| {
                request.record_decision(decision, decided_by, at);
                request.clone()
            }))
    }

    async fn archive_request(&self, id: Uuid, user_id: Uuid) -> Result<Option<OtRequest>> {
        let mut state = self.state.write().await;
        Ok(state
            .requests
            .get_mut(&id)
            .filter(|r| r.user_id == user_id)
            .map(|request| {
                request.archived = true;
                request.clone()
            }))
    }

    async fn archive_closed_requests(&self, user_id: Uuid) -> Result<u64> {
        let mut state = self.state.write().await;
        let mut archived = 0;
        for request in state.requests.values_mut().filter(|r| {
            r.user_id == user_id
                && !r.archived
                && matches!(r.status, RequestStatus::Declined | RequestStatus::Cancelled)
        }) {
            request.archived = true;
            archived += 1;
        }
        Ok(archived)
    }

    async fn list_user_requests(&self, user_id: Uuid) -> Result<Vec<OtRequest>> {
        let state = self.state.read().await;
        let mut requests: Vec<OtRequest> = state
            .requests
            .values()
            .filter(|r| r.user_id == user_id && !r.archived)
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
        Ok(requests)
    }

    async fn list_active_requests(&self) -> Result<Vec<OtRequest>> {
        let state = self.state.read().await;
        let mut requests: Vec<OtRequest> = state
            .requests
            .values()
            .filter(|r| !r.archived)
            .cloned()
            .collect();
        requests.sort_by_key(|r| r.requested_at);
        Ok(requests)
    }

    async fn shift_counts(&self) -> Result<Vec<ShiftCounts>> {
        let state = self.state.read().await;
        let requests: Vec<OtRequest> = state.requests.values().cloned().collect();
        Ok(counts::tally_all(&requests).into_values().collect())
    }

    async fn list_approved_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<ApprovedEntry>> {
        let state = self.state.read().await;
        let mut approved: Vec<(&OtRequest, &Shift)> = state
            .requests
            .values()
            .filter(|r| r.status == RequestStatus::Approved)
            .filter_map(|r| state.shifts.get(&r.shift_id).map(|s| (r, s)))
            .filter(|(_, s)| s.is_active() && s.shift_date >= start && s.shift_date <= end)
            .collect();
        approved.sort_by_key(|(r, s)| (s.shift_date, r.requested_at));

        Ok(approved
            .into_iter()
            .map(|(request, shift)| ApprovedEntry {
                shift_date: shift.shift_date,
                shift_type: shift.shift_type,
                user_id: request.user_id,
                full_name: state
                    .profiles
                    .get(&request.user_id)
                    .and_then(|p| p.full_name.clone()),
            })
            .collect())
    }

    async fn roster_pattern(&self, team: &str) -> Result<Vec<RosterDay>> {
        let state = self.state.read().await;
        Ok(state.patterns.get(team).cloned().unwrap_or_default())
    }

    async fn roster_base_date(&self) -> Result<Option<NaiveDate>> {
        Ok(self.state.read().await.base_date)
    }

    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>> {
        Ok(self.state.read().await.profiles.get(&id).cloned())
    }

    async fn list_profiles(&self, ids: &[Uuid]) -> Result<Vec<Profile>> {
        let state = self.state.read().await;
        Ok(ids.iter().filter_map(|id| state.profiles.get(id).cloned()).collect())
    }

    async fn list_all_profiles(&self, role: Option<Role>) -> Result<Vec<Profile>> {
        let state = self.state.read().await;
        let mut profiles: Vec<Profile> = state
            .profiles
            .values()
            .filter(|p| role.is_none_or(|role| p.role == role))
            .cloned()
            .collect();
        profiles.sort_by(|a, b| {
            name_order(a.full_name.as_deref(), b.full_name.as_deref())
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(profiles)
    }

    async fn update_profile(&self, id: Uuid, full_name: &str, phone: Option<&str>) -> Result<Option<Profile>> {
        let mut state = self.state.write().await;
        Ok(state.profiles.get_mut(&id).map(|profile| {
            profile.full_name = Some(full_name.to_string());
            profile.phone = phone.map(str::to_string);
            profile.clone()
        }))
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<Option<Profile>> {
        let mut state = self.state.write().await;
        Ok(state.profiles.get_mut(&id).map(|profile| {
            profile.role = role;
            profile.clone()
        }))
    }

    async fn find_staffing(&self, user_id: Uuid) -> Result<Option<Staffing>> {
        Ok(self.state.read().await.staffing.get(&user_id).cloned())
    }

    async fn upsert_staffing(&self, staffing: &Staffing) -> Result<Staffing> {
        let mut state = self.state.write().await;
        state.staffing.insert(staffing.user_id, staffing.clone());
        Ok(staffing.clone())
    }

    async fn append_audit(&self, entry: NewAuditEntry) -> Result<AuditEntry> {
        let saved = AuditEntry {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            actor_id: entry.actor_id,
            action: entry.action,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            details: entry.details,
        };
        self.state.write().await.audit.push(saved.clone());
        Ok(saved)
    }

    async fn list_audit(&self, limit: i64) -> Result<Vec<AuditEntry>> {
        let state = self.state.read().await;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(state.audit.iter().rev().take(limit).cloned().collect())
    }
}
