// src/services/lifecycle.rs

use crate::{
    errors::{AppError, AppResult},
    models::{Payslip, PayslipStatus},
};
use chrono::{DateTime, Utc};

/// Something a caller wants to do to a stored payslip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayslipAction {
    Approve,
    Reject,
    MarkPaid,
    Edit,
    Delete,
    /// Replace through forced regeneration
    Supersede,
}

impl PayslipAction {
    pub fn verb(&self) -> &'static str {
        match self {
            PayslipAction::Approve => "approve",
            PayslipAction::Reject => "reject",
            PayslipAction::MarkPaid => "mark as paid",
            PayslipAction::Edit => "update",
            PayslipAction::Delete => "delete",
            PayslipAction::Supersede => "regenerate",
        }
    }
}

/// Status reached by applying `action` from `from`.
///
/// Edit keeps the status as is. Delete and Supersede also return the current status
/// since the record is removed rather than moved.
pub fn next_status(from: PayslipStatus, action: PayslipAction) -> AppResult<PayslipStatus> {
    use PayslipAction::*;
    use PayslipStatus::*;

    match (from, action) {
        (Pending, Approve) => Ok(Approved),
        (Pending, Reject) => Ok(Rejected),
        (Approved, MarkPaid) => Ok(Paid),
        (Pending, Edit) => Ok(Pending),
        (Pending | Rejected, Delete) => Ok(from),
        (Pending | Rejected | Approved, Supersede) => Ok(from),
        _ => Err(AppError::IllegalTransition {
            from,
            action: action.verb(),
        }),
    }
}

/// Apply a status transition and return the updated payslip. `payslip` is untouched.
pub fn transition(
    payslip: &Payslip,
    action: PayslipAction,
    now: DateTime<Utc>,
) -> AppResult<Payslip> {
    let status = next_status(payslip.status, action)?;

    let mut next = payslip.clone();
    next.status = status;
    next.updated_at = now;
    match action {
        PayslipAction::Approve => next.approved_at = Some(now),
        PayslipAction::MarkPaid => {
            next.approved_at.get_or_insert(now);
        }
        _ => {}
    }
    Ok(next)
}

/// Deletion is only allowed for PENDING and REJECTED payslips.
pub fn ensure_deletable(payslip: &Payslip) -> AppResult<()> {
    next_status(payslip.status, PayslipAction::Delete).map(|_| ())
}

/// Monetary fields can only change while PENDING.
pub fn ensure_editable(payslip: &Payslip) -> AppResult<()> {
    next_status(payslip.status, PayslipAction::Edit)
        .map(|_| ())
        .map_err(|_| {
            AppError::Conflict(format!(
                "Cannot update approved or paid payslip (status {})",
                payslip.status
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::Period, services::calculator::PayslipCalculator};
    use chrono::Duration;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn payslip(status: PayslipStatus) -> Payslip {
        let period = Period::new(1, 2025).unwrap();
        let breakdown = PayslipCalculator::default()
            .calculate(dec!(100000), period)
            .unwrap();
        let mut slip = Payslip::pending(Uuid::new_v4(), period, breakdown);
        slip.status = status;
        slip
    }

    #[test]
    fn approve_pending_sets_approved_at() {
        let now = Utc::now();
        let slip = payslip(PayslipStatus::Pending);
        let approved = transition(&slip, PayslipAction::Approve, now).unwrap();

        assert_eq!(approved.status, PayslipStatus::Approved);
        assert_eq!(approved.approved_at, Some(now));
        assert_eq!(approved.updated_at, now);
        assert_eq!(slip.status, PayslipStatus::Pending);
    }

    #[test]
    fn approve_is_rejected_outside_pending() {
        for status in [
            PayslipStatus::Approved,
            PayslipStatus::Rejected,
            PayslipStatus::Paid,
        ] {
            let err = transition(&payslip(status), PayslipAction::Approve, Utc::now()).unwrap_err();
            assert!(
                matches!(err, AppError::IllegalTransition { from, action: "approve" } if from == status)
            );
        }
    }

    #[test]
    fn reject_only_from_pending() {
        let rejected =
            transition(&payslip(PayslipStatus::Pending), PayslipAction::Reject, Utc::now()).unwrap();
        assert_eq!(rejected.status, PayslipStatus::Rejected);
        assert_eq!(rejected.approved_at, None);

        assert!(
            transition(&payslip(PayslipStatus::Paid), PayslipAction::Reject, Utc::now()).is_err()
        );
    }

    #[test]
    fn mark_paid_requires_approval() {
        let err = transition(&payslip(PayslipStatus::Pending), PayslipAction::MarkPaid, Utc::now())
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::IllegalTransition {
                from: PayslipStatus::Pending,
                ..
            }
        ));
    }

    #[test]
    fn mark_paid_keeps_existing_approval_time() {
        let approved_at = Utc::now() - Duration::days(2);
        let mut slip = payslip(PayslipStatus::Approved);
        slip.approved_at = Some(approved_at);

        let paid = transition(&slip, PayslipAction::MarkPaid, Utc::now()).unwrap();
        assert_eq!(paid.status, PayslipStatus::Paid);
        assert_eq!(paid.approved_at, Some(approved_at));
    }

    #[test]
    fn mark_paid_fills_missing_approval_time() {
        let now = Utc::now();
        let paid = transition(&payslip(PayslipStatus::Approved), PayslipAction::MarkPaid, now)
            .unwrap();
        assert_eq!(paid.approved_at, Some(now));
    }

    #[test]
    fn paid_is_terminal() {
        let slip = payslip(PayslipStatus::Paid);
        for action in [
            PayslipAction::Approve,
            PayslipAction::Reject,
            PayslipAction::MarkPaid,
            PayslipAction::Edit,
            PayslipAction::Delete,
            PayslipAction::Supersede,
        ] {
            assert!(next_status(slip.status, action).is_err(), "{:?}", action);
        }
    }

    #[test]
    fn delete_guard() {
        assert!(ensure_deletable(&payslip(PayslipStatus::Pending)).is_ok());
        assert!(ensure_deletable(&payslip(PayslipStatus::Rejected)).is_ok());
        assert!(ensure_deletable(&payslip(PayslipStatus::Approved)).is_err());
        assert!(ensure_deletable(&payslip(PayslipStatus::Paid)).is_err());
    }

    #[test]
    fn edit_guard_reports_conflict() {
        assert!(ensure_editable(&payslip(PayslipStatus::Pending)).is_ok());
        let err = ensure_editable(&payslip(PayslipStatus::Approved)).unwrap_err();
        assert!(
            matches!(err, AppError::Conflict(msg) if msg.starts_with("Cannot update approved or paid payslip"))
        );
    }
}
