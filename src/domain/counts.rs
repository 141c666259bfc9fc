use std::collections::HashMap;

use uuid::Uuid;

use crate::database::models::{OtRequest, RequestStatus, ShiftCounts};

/// Full recompute of one shift's counts from a ledger snapshot.
pub fn tally(shift_id: Uuid, requests: &[OtRequest]) -> ShiftCounts {
    let mut counts = ShiftCounts::empty(shift_id);
    for request in requests
        .iter()
        .filter(|r| r.shift_id == shift_id && !r.archived)
    {
        bump(&mut counts, request.status);
    }
    counts
}

pub fn tally_all(requests: &[OtRequest]) -> HashMap<Uuid, ShiftCounts> {
    let mut counts: HashMap<Uuid, ShiftCounts> = HashMap::new();
    for request in requests.iter().filter(|r| !r.archived) {
        let entry = counts
            .entry(request.shift_id)
            .or_insert_with(|| ShiftCounts::empty(request.shift_id));
        bump(entry, request.status);
    }
    counts
}

fn bump(counts: &mut ShiftCounts, status: RequestStatus) {
    match status {
        RequestStatus::Requested => counts.requested += 1,
        RequestStatus::Approved => counts.approved += 1,
        RequestStatus::Declined => counts.declined += 1,
        RequestStatus::Cancelled => counts.cancelled += 1,
    }
}

/// Requests a manager sees for a shift: first come, first served, cancelled
/// and archived ones left out.
pub fn approval_queue(shift_id: Uuid, requests: &[OtRequest]) -> Vec<OtRequest> {
    let mut queue: Vec<OtRequest> = requests
        .iter()
        .filter(|r| r.shift_id == shift_id && !r.archived && r.status != RequestStatus::Cancelled)
        .cloned()
        .collect();
    queue.sort_by_key(|r| r.requested_at);
    queue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Decision;
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    fn request(shift_id: Uuid, status: RequestStatus) -> OtRequest {
        let mut r = OtRequest::requested(shift_id, Uuid::new_v4(), Utc::now());
        r.status = status;
        r
    }

    #[test]
    fn tally_groups_by_status_and_skips_archived() {
        let shift_id = Uuid::new_v4();
        let mut archived = request(shift_id, RequestStatus::Approved);
        archived.archived = true;
        let requests = vec![
            request(shift_id, RequestStatus::Requested),
            request(shift_id, RequestStatus::Approved),
            request(shift_id, RequestStatus::Declined),
            request(shift_id, RequestStatus::Cancelled),
            request(Uuid::new_v4(), RequestStatus::Approved),
            archived,
        ];

        let counts = tally(shift_id, &requests);

        assert_eq!(counts.requested, 1);
        assert_eq!(counts.approved, 1);
        assert_eq!(counts.declined, 1);
        assert_eq!(counts.cancelled, 1);
    }

    #[test]
    fn approving_past_capacity_flags_over_approval() {
        let shift_id = Uuid::new_v4();
        let capacity = 2;
        let decider = Uuid::new_v4();
        let mut requests: Vec<OtRequest> = (0..3)
            .map(|_| request(shift_id, RequestStatus::Requested))
            .collect();

        assert_eq!(tally(shift_id, &requests).requested, 3);

        requests[0].record_decision(Decision::Approved, decider, Utc::now());
        requests[1].record_decision(Decision::Approved, decider, Utc::now());
        let counts = tally(shift_id, &requests);
        assert_eq!(counts.approved, 2);
        assert!(!counts.is_over_approved(capacity));

        requests[2].record_decision(Decision::Approved, decider, Utc::now());
        let counts = tally(shift_id, &requests);
        assert_eq!(counts.approved, 3);
        assert!(counts.is_over_approved(capacity));
    }

    #[test]
    fn empty_ledger_is_never_negative() {
        let counts = tally(Uuid::new_v4(), &[]);
        assert_eq!(counts.approved, 0);
        assert!(!counts.is_over_approved(0));
    }

    #[test]
    fn tally_all_matches_per_shift_tally() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let requests = vec![
            request(a, RequestStatus::Approved),
            request(a, RequestStatus::Requested),
            request(b, RequestStatus::Declined),
        ];

        let all = tally_all(&requests);

        assert_eq!(all.get(&a), Some(&tally(a, &requests)));
        assert_eq!(all.get(&b), Some(&tally(b, &requests)));
    }

    #[test]
    fn queue_is_first_come_first_served_without_cancelled() {
        let shift_id = Uuid::new_v4();
        let now = Utc::now();
        let mut late = request(shift_id, RequestStatus::Requested);
        late.requested_at = now;
        let mut early = request(shift_id, RequestStatus::Approved);
        early.requested_at = now - Duration::minutes(5);
        let cancelled = request(shift_id, RequestStatus::Cancelled);

        let queue = approval_queue(shift_id, &[late.clone(), cancelled, early.clone()]);

        assert_eq!(queue, vec![early, late]);
    }
}
