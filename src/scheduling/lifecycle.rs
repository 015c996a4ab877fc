use thiserror::Error;

use crate::db::models::{AppointmentStatus, UserRole};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("cannot change the status of a completed appointment")]
    CompletedIsTerminal,

    #[error("cannot change the status of a cancelled appointment")]
    CancelledIsTerminal,

    #[error("this role is not permitted to change appointment status")]
    RoleNotAllowed,
}

/// Decide whether `actor` may move an appointment from `current` to
/// `requested`.
///
/// A `None` or same-status request is a plain edit (notes, reason) and is
/// open to any actor, terminal appointments included. A real status change is
/// restricted to staff roles, and `Completed`/`Cancelled` admit no way out.
/// Everything else, sideways moves included, is accepted.
pub fn check_transition(
    current: AppointmentStatus,
    requested: Option<AppointmentStatus>,
    actor: UserRole,
) -> Result<(), LifecycleError> {
    let Some(next) = requested else {
        return Ok(());
    };
    if next == current {
        return Ok(());
    }
    if !actor.can_manage_appointments() {
        return Err(LifecycleError::RoleNotAllowed);
    }
    match current {
        AppointmentStatus::Completed => Err(LifecycleError::CompletedIsTerminal),
        AppointmentStatus::Cancelled => Err(LifecycleError::CancelledIsTerminal),
        AppointmentStatus::Pending | AppointmentStatus::Confirmed => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AppointmentStatus::*;

    #[test]
    fn staff_can_walk_the_happy_path() {
        for (from, to) in [
            (Pending, Confirmed),
            (Confirmed, Completed),
            (Pending, Cancelled),
            (Confirmed, Cancelled),
        ] {
            check_transition(from, Some(to), UserRole::Receptionist).unwrap();
            check_transition(from, Some(to), UserRole::Dentist).unwrap();
            check_transition(from, Some(to), UserRole::MainDoctor).unwrap();
        }
    }

    #[test]
    fn terminal_states_have_no_way_out() {
        for to in [Pending, Confirmed, Cancelled] {
            assert_eq!(
                check_transition(Completed, Some(to), UserRole::MainDoctor),
                Err(LifecycleError::CompletedIsTerminal)
            );
        }
        for to in [Pending, Confirmed, Completed] {
            assert_eq!(
                check_transition(Cancelled, Some(to), UserRole::MainDoctor),
                Err(LifecycleError::CancelledIsTerminal)
            );
        }
    }

    #[test]
    fn same_status_is_an_accepted_noop_even_when_terminal() {
        check_transition(Completed, Some(Completed), UserRole::Customer).unwrap();
        check_transition(Cancelled, Some(Cancelled), UserRole::Customer).unwrap();
    }

    #[test]
    fn customers_may_edit_but_not_transition() {
        check_transition(Pending, None, UserRole::Customer).unwrap();
        assert_eq!(
            check_transition(Pending, Some(Confirmed), UserRole::Customer),
            Err(LifecycleError::RoleNotAllowed)
        );
    }
}
