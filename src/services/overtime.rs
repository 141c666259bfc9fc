use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::database::{
    OvertimeStore,
    models::{
        Action, AuditEntry, Decision, EntityType, OtRequest, Profile, ProfileUpdate, RequestStatus,
        Role, RosterType, Shift, ShiftCounts, ShiftInput, Staffing, StaffingInput,
    },
};
use crate::domain::{
    counts, lifecycle, names,
    planner::{self, PlanRequest},
    report,
    roster::{self, AnnualRoster, RosterCalendar, RosterPattern},
    roster_print,
};
use crate::error::AppError;
use crate::services::{audit_logger::AuditLogger, user_context::UserContext};

/// Newest audit entries returned by the audit view.
pub const AUDIT_LOG_LIMIT: i64 = 200;

const UNKNOWN_NAME: &str = "Unknown";

/// An available shift as an employee sees it.
#[derive(Debug, Clone, Serialize)]
pub struct ShiftView {
    #[serde(flatten)]
    pub shift: Shift,
    pub counts: ShiftCounts,
    pub over_approved: bool,
    pub my_request: Option<OtRequest>,
    /// The viewer's roster type on the shift date, when their team is known.
    pub roster_type: Option<RosterType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MyRequestView {
    #[serde(flatten)]
    pub request: OtRequest,
    pub shift: Option<Shift>,
    pub can_cancel: bool,
    pub can_archive: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueuedRequest {
    #[serde(flatten)]
    pub request: OtRequest,
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApprovalBoardItem {
    pub shift: Shift,
    pub counts: ShiftCounts,
    pub over_approved: bool,
    pub requests: Vec<QueuedRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecisionOutcome {
    pub request: OtRequest,
    pub counts: ShiftCounts,
    pub over_approved: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManagedShift {
    #[serde(flatten)]
    pub shift: Shift,
    pub counts: ShiftCounts,
    pub over_approved: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletedShift {
    pub shift: Shift,
    pub declined_requests: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub profile: Profile,
    pub staffing: Option<Staffing>,
}

/// A generated download: file name plus body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub content: String,
}

#[derive(Clone)]
pub struct OvertimeService {
    store: Arc<dyn OvertimeStore>,
    audit: AuditLogger,
}

impl OvertimeService {
    pub fn new(store: Arc<dyn OvertimeStore>) -> Self {
        Self {
            audit: AuditLogger::new(store.clone()),
            store,
        }
    }

    async fn counts_by_shift(&self) -> Result<HashMap<Uuid, ShiftCounts>, AppError> {
        let counts = self.store.shift_counts().await?;
        Ok(counts.into_iter().map(|c| (c.shift_id, c)).collect())
    }

    async fn counts_for(&self, shift_id: Uuid) -> Result<ShiftCounts, AppError> {
        Ok(self
            .counts_by_shift()
            .await?
            .remove(&shift_id)
            .unwrap_or_else(|| ShiftCounts::empty(shift_id)))
    }

    async fn active_shift(&self, shift_id: Uuid) -> Result<Shift, AppError> {
        self.store
            .find_shift(shift_id)
            .await?
            .filter(Shift::is_active)
            .ok_or_else(|| AppError::not_found("Shift", shift_id))
    }

    /// The viewer's roster calendar; `None` without a team or a base date.
    async fn calendar_for(&self, team: Option<&str>) -> Result<Option<RosterCalendar>, AppError> {
        let Some(team) = team else {
            return Ok(None);
        };
        let Some(base_date) = self.store.roster_base_date().await? else {
            return Ok(None);
        };
        let days = self.store.roster_pattern(team).await?;
        Ok(Some(RosterCalendar::new(
            base_date,
            RosterPattern::from_days(&days),
        )))
    }

    async fn display_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, AppError> {
        let profiles = self.store.list_profiles(ids).await?;
        Ok(profiles
            .into_iter()
            .map(|p| (p.id, p.display_name()))
            .collect())
    }

    async fn shift_view(&self, ctx: &UserContext, shift: Shift) -> Result<ShiftView, AppError> {
        let counts = self.counts_for(shift.id).await?;
        let my_request = self
            .store
            .find_request_for(shift.id, ctx.user_id())
            .await?
            .filter(|r| !r.archived);
        let roster_type = self
            .calendar_for(ctx.team())
            .await?
            .map(|calendar| calendar.type_on(shift.shift_date));

        Ok(ShiftView {
            over_approved: counts.is_over_approved(shift.spots_available),
            counts,
            my_request,
            roster_type,
            shift,
        })
    }

    /// Upcoming active shifts, by default only those on the viewer's rest days.
    pub async fn available_shifts(
        &self,
        ctx: &UserContext,
        rest_only: bool,
        today: NaiveDate,
    ) -> Result<Vec<ShiftView>, AppError> {
        ctx.requires_employee()?;

        let shifts = self.store.list_shifts(today, false).await?;
        let calendar = self.calendar_for(ctx.team()).await?;
        let shifts = roster::visible_shifts(shifts, calendar.as_ref(), rest_only);

        let mut counts = self.counts_by_shift().await?;
        let mut mine: HashMap<Uuid, OtRequest> = self
            .store
            .list_user_requests(ctx.user_id())
            .await?
            .into_iter()
            .map(|r| (r.shift_id, r))
            .collect();

        Ok(shifts
            .into_iter()
            .map(|shift| {
                let counts = counts
                    .remove(&shift.id)
                    .unwrap_or_else(|| ShiftCounts::empty(shift.id));
                ShiftView {
                    over_approved: counts.is_over_approved(shift.spots_available),
                    counts,
                    my_request: mine.remove(&shift.id),
                    roster_type: calendar.as_ref().map(|c| c.type_on(shift.shift_date)),
                    shift,
                }
            })
            .collect())
    }

    pub async fn request_shift(
        &self,
        ctx: &UserContext,
        shift_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ShiftView, AppError> {
        ctx.requires_employee()?;

        let shift = self.active_shift(shift_id).await?;
        if shift.shift_date < now.date_naive() {
            return Err(AppError::BadRequest(
                "This shift has already taken place".to_string(),
            ));
        }

        let existing = self.store.find_request_for(shift_id, ctx.user_id()).await?;
        let action = lifecycle::on_request(existing.as_ref().map(|r| r.status));

        if action != lifecycle::RequestAction::Keep {
            let request = self.store.upsert_request(shift_id, ctx.user_id(), now).await?;
            log::info!(
                "User {} requested overtime on shift {} ({:?})",
                ctx.user_id(),
                shift_id,
                action
            );
            self.audit
                .record(
                    ctx,
                    Action::OT_REQUESTED,
                    EntityType::OT_REQUEST,
                    request.id,
                    AuditLogger::metadata(vec![
                        ("shift_id", json!(shift_id)),
                        ("shift_date", json!(shift.shift_date)),
                    ]),
                )
                .await;
        }

        self.shift_view(ctx, shift).await
    }

    pub async fn cancel_request(
        &self,
        ctx: &UserContext,
        shift_id: Uuid,
        confirm: bool,
    ) -> Result<ShiftView, AppError> {
        ctx.requires_employee()?;

        let shift = self
            .store
            .find_shift(shift_id)
            .await?
            .ok_or_else(|| AppError::not_found("Shift", shift_id))?;
        let current = self
            .store
            .find_request_for(shift_id, ctx.user_id())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No request for shift {shift_id}")))?;

        lifecycle::on_cancel(current.status, confirm)?;

        let cancelled = self
            .store
            .cancel_request(shift_id, ctx.user_id())
            .await?
            .ok_or_else(|| AppError::Conflict("Request changed before it could be cancelled".to_string()))?;

        log::info!("User {} cancelled request {}", ctx.user_id(), cancelled.id);
        self.audit
            .record(
                ctx,
                Action::OT_CANCELLED,
                EntityType::OT_REQUEST,
                cancelled.id,
                AuditLogger::metadata(vec![
                    ("shift_id", json!(shift_id)),
                    ("previous_status", json!(current.status)),
                ]),
            )
            .await;

        self.shift_view(ctx, shift).await
    }

    pub async fn my_requests(
        &self,
        ctx: &UserContext,
        approved_only: bool,
        today: NaiveDate,
    ) -> Result<Vec<MyRequestView>, AppError> {
        ctx.requires_employee()?;

        let requests = self.store.list_user_requests(ctx.user_id()).await?;

        let mut views = Vec::with_capacity(requests.len());
        for request in requests
            .into_iter()
            .filter(|r| !approved_only || r.status == RequestStatus::Approved)
        {
            let shift = self.store.find_shift(request.shift_id).await?;
            let can_archive = shift
                .as_ref()
                .is_some_and(|s| lifecycle::check_archivable(s.shift_date, today).is_ok());
            views.push(MyRequestView {
                can_cancel: lifecycle::can_cancel(request.status),
                can_archive,
                request,
                shift,
            });
        }
        Ok(views)
    }

    pub async fn archive_request(
        &self,
        ctx: &UserContext,
        request_id: Uuid,
        today: NaiveDate,
    ) -> Result<OtRequest, AppError> {
        ctx.requires_employee()?;

        let request = self
            .store
            .find_request(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("Request", request_id))?;
        if request.user_id != ctx.user_id() {
            return Err(AppError::Forbidden(
                "Only the owner can hide a request".to_string(),
            ));
        }

        let shift = self
            .store
            .find_shift(request.shift_id)
            .await?
            .ok_or_else(|| AppError::not_found("Shift", request.shift_id))?;
        lifecycle::check_archivable(shift.shift_date, today)?;

        self.store
            .archive_request(request_id, ctx.user_id())
            .await?
            .ok_or_else(|| AppError::not_found("Request", request_id))
    }

    pub async fn hide_closed(&self, ctx: &UserContext) -> Result<u64, AppError> {
        ctx.requires_employee()?;

        let archived = self.store.archive_closed_requests(ctx.user_id()).await?;
        log::info!("User {} hid {} closed requests", ctx.user_id(), archived);
        Ok(archived)
    }

    pub async fn approval_board(
        &self,
        ctx: &UserContext,
        today: NaiveDate,
    ) -> Result<Vec<ApprovalBoardItem>, AppError> {
        ctx.requires_manager()?;

        let shifts = self.store.list_shifts(today, false).await?;
        let requests = self.store.list_active_requests().await?;
        let tallies = counts::tally_all(&requests);

        let mut user_ids: Vec<Uuid> = requests.iter().map(|r| r.user_id).collect();
        user_ids.sort();
        user_ids.dedup();
        let names = self.display_names(&user_ids).await?;

        Ok(shifts
            .into_iter()
            .map(|shift| {
                let counts = tallies
                    .get(&shift.id)
                    .copied()
                    .unwrap_or_else(|| ShiftCounts::empty(shift.id));
                let queue = counts::approval_queue(shift.id, &requests)
                    .into_iter()
                    .map(|request| QueuedRequest {
                        full_name: names
                            .get(&request.user_id)
                            .cloned()
                            .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
                        request,
                    })
                    .collect();
                ApprovalBoardItem {
                    over_approved: counts.is_over_approved(shift.spots_available),
                    counts,
                    requests: queue,
                    shift,
                }
            })
            .collect())
    }

    /// Records a manager's decision. Capacity is reported, never enforced.
    pub async fn decide(
        &self,
        ctx: &UserContext,
        request_id: Uuid,
        decision: Decision,
        now: DateTime<Utc>,
    ) -> Result<DecisionOutcome, AppError> {
        ctx.requires_manager()?;

        let current = self
            .store
            .find_request(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("Request", request_id))?;
        lifecycle::on_decide(current.status, decision)?;
        let shift = self.active_shift(current.shift_id).await?;

        let request = self
            .store
            .decide_request(request_id, decision, ctx.user_id(), now)
            .await?
            .ok_or_else(|| {
                AppError::Conflict("Request or shift changed before the decision".to_string())
            })?;

        let counts = self.counts_for(shift.id).await?;
        let over_approved = counts.is_over_approved(shift.spots_available);
        if over_approved {
            log::warn!(
                "Shift {} is over-approved: {} approved for {} spots",
                shift.id,
                counts.approved,
                shift.spots_available
            );
        }

        let action = match decision {
            Decision::Approved => Action::OT_APPROVED,
            Decision::Declined => Action::OT_DECLINED,
        };
        self.audit
            .record(
                ctx,
                action,
                EntityType::OT_REQUEST,
                request.id,
                AuditLogger::metadata(vec![
                    ("shift_id", json!(shift.id)),
                    ("user_id", json!(request.user_id)),
                    ("previous_status", json!(current.status)),
                    ("approved", json!(counts.approved)),
                    ("capacity", json!(shift.spots_available)),
                ]),
            )
            .await;

        Ok(DecisionOutcome {
            request,
            counts,
            over_approved,
        })
    }

    pub fn preview_plan(&self, ctx: &UserContext, plan: &PlanRequest) -> Result<Vec<ShiftInput>, AppError> {
        ctx.requires_manager()?;
        Ok(planner::plan_shifts(plan)?)
    }

    pub async fn publish_plan(&self, ctx: &UserContext, plan: &PlanRequest) -> Result<Vec<Shift>, AppError> {
        ctx.requires_manager()?;

        let inputs = planner::plan_shifts(plan)?;
        let shifts = self.store.upsert_shifts(&inputs).await?;
        log::info!(
            "Published {} shifts from {} to {}",
            shifts.len(),
            plan.start,
            plan.end
        );

        for shift in &shifts {
            self.audit
                .record(
                    ctx,
                    Action::SHIFT_PUBLISHED,
                    EntityType::SHIFT,
                    shift.id,
                    AuditLogger::metadata(vec![
                        ("shift_date", json!(shift.shift_date)),
                        ("shift_type", json!(shift.shift_type)),
                        ("spots_available", json!(shift.spots_available)),
                    ]),
                )
                .await;
        }

        Ok(shifts)
    }

    pub async fn managed_shifts(
        &self,
        ctx: &UserContext,
        show_deleted: bool,
        today: NaiveDate,
    ) -> Result<Vec<ManagedShift>, AppError> {
        ctx.requires_manager()?;

        let shifts = self.store.list_shifts(today, show_deleted).await?;
        let mut counts = self.counts_by_shift().await?;

        Ok(shifts
            .into_iter()
            .map(|shift| {
                let counts = counts
                    .remove(&shift.id)
                    .unwrap_or_else(|| ShiftCounts::empty(shift.id));
                ManagedShift {
                    over_approved: counts.is_over_approved(shift.spots_available),
                    counts,
                    shift,
                }
            })
            .collect())
    }

    pub async fn update_capacity(
        &self,
        ctx: &UserContext,
        shift_id: Uuid,
        spots_available: i32,
    ) -> Result<Shift, AppError> {
        ctx.requires_manager()?;
        planner::validate_capacity(spots_available)?;

        let previous = self.active_shift(shift_id).await?;
        let shift = self
            .store
            .update_capacity(shift_id, spots_available)
            .await?
            .ok_or_else(|| AppError::not_found("Shift", shift_id))?;

        self.audit
            .record(
                ctx,
                Action::CAPACITY_CHANGED,
                EntityType::SHIFT,
                shift.id,
                AuditLogger::metadata(vec![
                    ("from", json!(previous.spots_available)),
                    ("to", json!(shift.spots_available)),
                ]),
            )
            .await;

        Ok(shift)
    }

    pub async fn delete_shift(
        &self,
        ctx: &UserContext,
        shift_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<DeletedShift, AppError> {
        ctx.requires_manager()?;

        let (shift, declined_requests) = self
            .store
            .soft_delete_shift(shift_id, ctx.user_id(), now)
            .await?
            .ok_or_else(|| AppError::not_found("Shift", shift_id))?;

        log::info!(
            "Shift {} deleted, {} open requests declined",
            shift.id,
            declined_requests
        );
        self.audit
            .record(
                ctx,
                Action::SHIFT_DELETED,
                EntityType::SHIFT,
                shift.id,
                AuditLogger::metadata(vec![
                    ("shift_date", json!(shift.shift_date)),
                    ("declined_requests", json!(declined_requests)),
                ]),
            )
            .await;

        Ok(DeletedShift {
            shift,
            declined_requests,
        })
    }

    pub async fn approved_report(
        &self,
        ctx: &UserContext,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Download, AppError> {
        ctx.requires_manager()?;
        report::validate_range(start, end)?;

        let entries = self.store.list_approved_between(start, end).await?;
        let groups = report::group_approved(&entries, start, end);

        Ok(Download {
            filename: report::approved_report_filename(start, end),
            content: report::approved_report_csv(&groups),
        })
    }

    pub async fn annual_roster(
        &self,
        ctx: &UserContext,
        year: i32,
        today: NaiveDate,
    ) -> Result<Download, AppError> {
        ctx.requires_employee()?;

        let team = ctx
            .team()
            .ok_or_else(|| AppError::BadRequest("Set your team before printing a roster".to_string()))?;
        let calendar = self
            .calendar_for(Some(team))
            .await?
            .ok_or_else(|| AppError::NotFound("Roster base date is not configured".to_string()))?;

        let roster = AnnualRoster::build(year, team, &calendar, today)?;
        let full_name = ctx.profile.full_name.as_deref();

        Ok(Download {
            filename: roster_print::roster_filename(full_name, year),
            content: roster_print::render_html(&roster, full_name, today),
        })
    }

    pub async fn audit_log(&self, ctx: &UserContext) -> Result<Vec<AuditEntry>, AppError> {
        ctx.requires_manager()?;
        Ok(self.store.list_audit(AUDIT_LOG_LIMIT).await?)
    }

    pub fn profile(&self, ctx: &UserContext) -> ProfileView {
        ProfileView {
            profile: ctx.profile.clone(),
            staffing: ctx.staffing.clone(),
        }
    }

    pub async fn update_profile(&self, ctx: &UserContext, update: &ProfileUpdate) -> Result<Profile, AppError> {
        let full_name = names::checked_display_name(&update.full_name)?;
        let phone = update
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());

        self.store
            .update_profile(ctx.user_id(), &full_name, phone)
            .await?
            .ok_or_else(|| AppError::not_found("Profile", ctx.user_id()))
    }

    pub async fn update_own_staffing(&self, ctx: &UserContext, input: &StaffingInput) -> Result<Staffing, AppError> {
        self.save_staffing(ctx, ctx.user_id(), input).await
    }

    pub async fn set_user_staffing(
        &self,
        ctx: &UserContext,
        user_id: Uuid,
        input: &StaffingInput,
    ) -> Result<Staffing, AppError> {
        ctx.requires_manager()?;
        self.store
            .find_profile(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Profile", user_id))?;
        self.save_staffing(ctx, user_id, input).await
    }

    async fn save_staffing(
        &self,
        ctx: &UserContext,
        user_id: Uuid,
        input: &StaffingInput,
    ) -> Result<Staffing, AppError> {
        let (team, band) = names::checked_staffing(input.team.as_deref(), input.band.as_deref())?;
        let staffing = self
            .store
            .upsert_staffing(&Staffing { user_id, team, band })
            .await?;

        self.audit
            .record(
                ctx,
                Action::STAFFING_CHANGED,
                EntityType::PROFILE,
                user_id,
                AuditLogger::metadata(vec![
                    ("team", json!(staffing.team)),
                    ("band", json!(staffing.band)),
                ]),
            )
            .await;

        Ok(staffing)
    }

    /// Users for the admin screens; `Some(Role::NewUser)` lists pending accounts.
    pub async fn list_users(&self, ctx: &UserContext, role: Option<Role>) -> Result<Vec<Profile>, AppError> {
        ctx.requires_manager()?;
        Ok(self.store.list_all_profiles(role).await?)
    }

    pub async fn set_role(&self, ctx: &UserContext, user_id: Uuid, role: Role) -> Result<Profile, AppError> {
        ctx.requires_manager()?;

        let profile = self
            .store
            .set_role(user_id, role)
            .await?
            .ok_or_else(|| AppError::not_found("Profile", user_id))?;

        log::info!("User {} set role of {} to {}", ctx.user_id(), user_id, role);
        self.audit
            .record(
                ctx,
                Action::ROLE_CHANGED,
                EntityType::PROFILE,
                user_id,
                AuditLogger::metadata(vec![("role", json!(role))]),
            )
            .await;

        Ok(profile)
    }
}
