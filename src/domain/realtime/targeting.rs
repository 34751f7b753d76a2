//! Audience filtering for targeted notifications.
//!
//! Pure functions; role resolution (presence first, directory second)
//! happens in the fan-out engine, which then calls in here.

use std::collections::{HashMap, HashSet};

use crate::domain::foundation::{Role, UserId};
use crate::domain::notification::NotificationType;

/// Drops duplicate ids, keeping first occurrences in order.
pub fn unique_ids(requested: &[UserId]) -> Vec<UserId> {
    let mut seen = HashSet::with_capacity(requested.len());
    requested
        .iter()
        .filter(|id| seen.insert(*id))
        .cloned()
        .collect()
}

/// Selects the requested ids whose resolved role is in the audience of
/// `kind`.
///
/// Ids with no resolved role are dropped. Every selected id appears once,
/// in request order.
pub fn select_recipients(
    kind: NotificationType,
    requested: &[UserId],
    roles: &HashMap<UserId, Role>,
) -> Vec<UserId> {
    unique_ids(requested)
        .into_iter()
        .filter(|id| roles.get(id).is_some_and(|role| kind.admits(*role)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid(s: &str) -> UserId {
        UserId::new(s).unwrap()
    }

    fn roles(pairs: &[(&str, Role)]) -> HashMap<UserId, Role> {
        pairs.iter().map(|(id, role)| (uid(id), *role)).collect()
    }

    #[test]
    fn assignment_keeps_only_teachers() {
        let selected = select_recipients(
            NotificationType::Assignment,
            &[uid("t1"), uid("t2")],
            &roles(&[("t1", Role::Teacher), ("t2", Role::Student)]),
        );
        assert_eq!(selected, vec![uid("t1")]);
    }

    #[test]
    fn system_keeps_teachers_and_students_but_not_admins() {
        let selected = select_recipients(
            NotificationType::System,
            &[uid("a1"), uid("s1"), uid("t1")],
            &roles(&[("a1", Role::Admin), ("s1", Role::Student), ("t1", Role::Teacher)]),
        );
        assert_eq!(selected, vec![uid("s1"), uid("t1")]);
    }

    #[test]
    fn unresolved_ids_are_dropped() {
        let selected = select_recipients(
            NotificationType::Reminder,
            &[uid("ghost"), uid("s1")],
            &roles(&[("s1", Role::Student)]),
        );
        assert_eq!(selected, vec![uid("s1")]);
    }

    #[test]
    fn duplicates_are_delivered_once() {
        let selected = select_recipients(
            NotificationType::Result,
            &[uid("s1"), uid("s1"), uid("s2"), uid("s1")],
            &roles(&[("s1", Role::Student), ("s2", Role::Student)]),
        );
        assert_eq!(selected, vec![uid("s1"), uid("s2")]);
    }

    #[test]
    fn unique_ids_preserves_first_occurrence_order() {
        assert_eq!(
            unique_ids(&[uid("b"), uid("a"), uid("b")]),
            vec![uid("b"), uid("a")]
        );
    }
}
