//! Check-in/check-out visit lifecycle.
//!
//! A visit normally walks forward through `CHECKED_IN` -> `IN_SERVICE` ->
//! `CHECKED_OUT`. Backward moves are allowed (front-desk corrections happen)
//! but are flagged in the logs so they show up in an audit trail.
//!
//! The intake wizard is the staff-facing flow that produces a visit record:
//! details -> review -> signature -> complete. The only hard gate is the
//! signature step: a visit cannot be completed until the customer has drawn
//! a non-empty signature.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::check_in_out::{CheckStatus, TirePressureReading};
use crate::models::{customer, service_item, vehicle};

/// Direction of a status change relative to the normal visit flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Unchanged,
    Forward,
    Backward,
}

/// Classify a status change and log backward moves at `warn`.
///
/// Backward transitions are never rejected; the repository applies them as
/// requested and the warn log is the only trace left behind.
pub fn note_transition(
    record_id: uuid::Uuid,
    from: CheckStatus,
    to: CheckStatus,
) -> TransitionKind {
    let kind = if to.stage() == from.stage() {
        TransitionKind::Unchanged
    } else if to.stage() > from.stage() {
        TransitionKind::Forward
    } else {
        TransitionKind::Backward
    };

    match kind {
        TransitionKind::Backward => {
            tracing::warn!(
                record_id = %record_id,
                from = ?from,
                to = ?to,
                "Backward status transition on check-in/out record"
            );
        }
        TransitionKind::Forward => {
            tracing::debug!(record_id = %record_id, from = ?from, to = ?to, "Status advanced");
        }
        TransitionKind::Unchanged => {}
    }

    kind
}

/// Steps of the staff intake wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Details,
    Review,
    Signature,
    Complete,
}

/// Errors raised by the intake wizard state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("a signature is required before the visit can be completed")]
    SignatureRequired,
    #[error("the wizard has already been completed")]
    AlreadyComplete,
    #[error("cannot skip ahead from {from:?} to {to:?}")]
    SkippedStep { from: WizardStep, to: WizardStep },
}

/// In-memory state for one pass through the intake wizard.
///
/// The wizard is transient: nothing is persisted until it completes, and an
/// abandoned wizard leaves no trace.
#[derive(Debug, Clone)]
pub struct IntakeWizard {
    step: WizardStep,
    signature: Option<String>,
}

impl IntakeWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Details,
            signature: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// Record the drawn signature. Whitespace-only input counts as empty.
    pub fn set_signature(&mut self, signature: &str) {
        let trimmed = signature.trim();
        self.signature = if trimmed.is_empty() {
            None
        } else {
            Some(signature.to_string())
        };
    }

    pub fn clear_signature(&mut self) {
        self.signature = None;
    }

    /// Advance to the next step. Completing requires a signature.
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        let next = match self.step {
            WizardStep::Details => WizardStep::Review,
            WizardStep::Review => WizardStep::Signature,
            WizardStep::Signature => {
                if self.signature.is_none() {
                    return Err(WizardError::SignatureRequired);
                }
                WizardStep::Complete
            }
            WizardStep::Complete => return Err(WizardError::AlreadyComplete),
        };
        self.step = next;
        Ok(next)
    }

    /// Step back to an earlier screen. Editing is allowed until completion.
    pub fn go_back(&mut self) -> Result<WizardStep, WizardError> {
        let previous = match self.step {
            WizardStep::Details => WizardStep::Details,
            WizardStep::Review => WizardStep::Details,
            WizardStep::Signature => WizardStep::Review,
            WizardStep::Complete => return Err(WizardError::AlreadyComplete),
        };
        self.step = previous;
        Ok(previous)
    }

    pub fn is_complete(&self) -> bool {
        self.step == WizardStep::Complete
    }
}

impl Default for IntakeWizard {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of vehicle and owner fields used to pre-populate the intake form.
///
/// Values are copied at the moment the wizard opens; later edits to the
/// vehicle or customer do not flow into an in-progress visit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IntakePrefill {
    pub vehicle_id: uuid::Uuid,
    pub customer_id: uuid::Uuid,
    pub contact_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mileage: Option<i32>,
    pub fuel_level: i32,
    pub tire_pressures: TirePressureReading,
}

/// Build the intake prefill from the vehicle and its owner.
///
/// Tire pressures come from the vehicle's preferred values when set, and from
/// its defaults otherwise. Location prefers the vehicle's own slot over the
/// customer's storage location.
pub fn build_prefill(vehicle: &vehicle::Model, owner: &customer::Model) -> IntakePrefill {
    let front = vehicle.preferred_front_psi.or(vehicle.default_front_psi);
    let rear = vehicle.preferred_rear_psi.or(vehicle.default_rear_psi);

    IntakePrefill {
        vehicle_id: vehicle.id,
        customer_id: owner.id,
        contact_name: format!("{} {}", owner.first_name, owner.last_name),
        contact_phone: owner.phone.clone(),
        location: vehicle
            .storage_location
            .clone()
            .or_else(|| Some(owner.storage_location.clone())),
        mileage: Some(vehicle.odometer),
        fuel_level: vehicle.fuel_level,
        tire_pressures: TirePressureReading {
            passenger_front: front,
            passenger_rear: rear,
            driver_front: front,
            driver_rear: rear,
        },
    }
}

/// Cost rollup across a visit's service items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ServiceTotals {
    pub total: Decimal,
    pub completed: Decimal,
    pub pending: Decimal,
    pub item_count: usize,
    pub completed_count: usize,
}

pub fn service_totals(items: &[service_item::Model]) -> ServiceTotals {
    let mut totals = ServiceTotals {
        total: Decimal::ZERO,
        completed: Decimal::ZERO,
        pending: Decimal::ZERO,
        item_count: items.len(),
        completed_count: 0,
    };

    for item in items {
        totals.total += item.cost;
        if item.completed {
            totals.completed += item.cost;
            totals.completed_count += 1;
        } else {
            totals.pending += item.cost;
        }
    }

    totals
}

/// Timestamp helper used when a status flip should also stamp the record.
pub fn now_timestamp() -> sea_orm::prelude::DateTimeWithTimeZone {
    Utc::now().fixed_offset()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn wizard_at_signature(signature: Option<&str>) -> IntakeWizard {
        let mut wizard = IntakeWizard::new();
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        if let Some(s) = signature {
            wizard.set_signature(s);
        }
        wizard
    }

    #[test]
    fn wizard_walks_forward_in_order() {
        let mut wizard = IntakeWizard::new();
        assert_eq!(wizard.step(), WizardStep::Details);
        assert_eq!(wizard.advance().unwrap(), WizardStep::Review);
        assert_eq!(wizard.advance().unwrap(), WizardStep::Signature);
    }

    #[test]
    fn wizard_blocks_completion_without_signature() {
        let mut wizard = wizard_at_signature(None);
        assert_eq!(wizard.advance(), Err(WizardError::SignatureRequired));
        assert_eq!(wizard.step(), WizardStep::Signature);
    }

    #[test]
    fn wizard_treats_blank_signature_as_missing() {
        let mut wizard = wizard_at_signature(Some("   "));
        assert_eq!(wizard.advance(), Err(WizardError::SignatureRequired));
    }

    #[test]
    fn wizard_completes_once_signed() {
        let mut wizard = wizard_at_signature(Some("data:image/png;base64,iVBOR"));
        assert_eq!(wizard.advance().unwrap(), WizardStep::Complete);
        assert!(wizard.is_complete());
    }

    #[test]
    fn wizard_cannot_move_after_completion() {
        let mut wizard = wizard_at_signature(Some("sig"));
        wizard.advance().unwrap();
        assert_eq!(wizard.advance(), Err(WizardError::AlreadyComplete));
        assert_eq!(wizard.go_back(), Err(WizardError::AlreadyComplete));
    }

    #[test]
    fn wizard_allows_stepping_back_before_completion() {
        let mut wizard = wizard_at_signature(Some("sig"));
        assert_eq!(wizard.go_back().unwrap(), WizardStep::Review);
        assert_eq!(wizard.go_back().unwrap(), WizardStep::Details);
        // Details is the floor.
        assert_eq!(wizard.go_back().unwrap(), WizardStep::Details);
    }

    #[test]
    fn clearing_signature_restores_the_gate() {
        let mut wizard = wizard_at_signature(Some("sig"));
        wizard.clear_signature();
        assert_eq!(wizard.advance(), Err(WizardError::SignatureRequired));
    }

    #[test]
    fn transitions_are_classified_by_stage() {
        let id = Uuid::new_v4();
        assert_eq!(
            note_transition(id, CheckStatus::CheckedIn, CheckStatus::InService),
            TransitionKind::Forward
        );
        assert_eq!(
            note_transition(id, CheckStatus::CheckedIn, CheckStatus::CheckedOut),
            TransitionKind::Forward
        );
        assert_eq!(
            note_transition(id, CheckStatus::CheckedOut, CheckStatus::InService),
            TransitionKind::Backward
        );
        assert_eq!(
            note_transition(id, CheckStatus::InService, CheckStatus::InService),
            TransitionKind::Unchanged
        );
    }

    #[test]
    fn service_totals_partition_completed_and_pending() {
        let base = service_item::Model {
            id: Uuid::new_v4(),
            check_in_out_id: Uuid::new_v4(),
            description: "Oil change".to_string(),
            cost: Decimal::new(12000, 2),
            completed: true,
            completed_at: None,
            position: 0,
            created_at: Utc::now().fixed_offset(),
            updated_at: Utc::now().fixed_offset(),
        };
        let items = vec![
            base.clone(),
            service_item::Model {
                id: Uuid::new_v4(),
                description: "Detail".to_string(),
                cost: Decimal::new(25000, 2),
                completed: false,
                position: 1,
                ..base.clone()
            },
            service_item::Model {
                id: Uuid::new_v4(),
                description: "Battery tender".to_string(),
                cost: Decimal::new(4500, 2),
                completed: true,
                position: 2,
                ..base
            },
        ];

        let totals = service_totals(&items);
        assert_eq!(totals.total, Decimal::new(41500, 2));
        assert_eq!(totals.completed, Decimal::new(16500, 2));
        assert_eq!(totals.pending, Decimal::new(25000, 2));
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.completed_count, 2);
    }

    #[test]
    fn service_totals_of_empty_list_are_zero() {
        let totals = service_totals(&[]);
        assert_eq!(totals.total, Decimal::ZERO);
        assert_eq!(totals.pending, Decimal::ZERO);
        assert_eq!(totals.item_count, 0);
    }
}
