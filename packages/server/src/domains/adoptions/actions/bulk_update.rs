//! Administrative bulk resolution of adoption requests.

use serde::Serialize;
use tracing::{info, warn};

use crate::common::auth::{Actor, Capability};
use crate::common::RequestId;
use crate::domains::adoptions::models::adoption_request::RequestStatus;
use crate::domains::adoptions::AdoptionError;
use crate::kernel::ServerDeps;

use super::{approve_request, reject_request};

#[derive(Debug, Serialize)]
pub struct BulkUpdateError {
    pub request_id: RequestId,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct BulkUpdateOutcome {
    pub updated_count: usize,
    pub errors: Vec<BulkUpdateError>,
}

/// Apply approve/reject semantics to a batch of requests.
///
/// Each member runs as its own transaction; one member failing leaves the
/// others untouched. There is no all-or-nothing across the batch - the
/// outcome reports per-item results.
pub async fn bulk_update(
    actor: &Actor,
    request_ids: Vec<RequestId>,
    target: RequestStatus,
    deps: &ServerDeps,
) -> Result<BulkUpdateOutcome, AdoptionError> {
    actor.can(Capability::BulkResolve).check()?;

    if target == RequestStatus::Pending {
        return Err(AdoptionError::Validation(
            "target status must be approved or rejected".to_string(),
        ));
    }

    let mut outcome = BulkUpdateOutcome {
        updated_count: 0,
        errors: Vec::new(),
    };

    for request_id in request_ids {
        let result = match target {
            RequestStatus::Approved => approve_request(actor, request_id, None, deps)
                .await
                .map(|_| ()),
            RequestStatus::Rejected => reject_request(actor, request_id, None, deps)
                .await
                .map(|_| ()),
            RequestStatus::Pending => unreachable!("rejected above"),
        };

        match result {
            Ok(()) => outcome.updated_count += 1,
            Err(error) => {
                warn!(request_id = %request_id, error = %error, "bulk update member failed");
                outcome.errors.push(BulkUpdateError {
                    request_id,
                    error: error.to_string(),
                });
            }
        }
    }

    info!(
        updated = outcome.updated_count,
        failed = outcome.errors.len(),
        status = %target,
        "bulk update finished"
    );

    Ok(outcome)
}
