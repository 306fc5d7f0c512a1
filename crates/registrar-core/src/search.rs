//! Directory search: find a user by exact id or by name prefix.

use crate::error::{RegistryError, Result};
use crate::model::{Role, User};

/// Number of name matches returned when no page size is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Result of a directory search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<'a> {
    /// The query was `0`.
    Cancelled,
    /// An id query matched exactly one user.
    Resolved(&'a User),
    /// Name-prefix matches in candidate order, capped at the page size.
    /// `total` is the uncapped count so callers can show "10 of N".
    Matches { users: Vec<&'a User>, total: usize },
}

impl<'a> SearchOutcome<'a> {
    /// The user this search settled on without any further choice.
    pub fn single(&self) -> Option<&'a User> {
        match self {
            SearchOutcome::Resolved(user) => Some(user),
            SearchOutcome::Matches { users, total: 1 } => users.first().copied(),
            _ => None,
        }
    }

    /// Returns `true` for a name search that matched nobody.
    pub fn is_empty(&self) -> bool {
        matches!(self, SearchOutcome::Matches { total: 0, .. })
    }
}

/// Search `candidates` with the default page size.
pub fn find<'a>(candidates: &'a [User], query: &str, role: Option<Role>) -> Result<SearchOutcome<'a>> {
    find_paged(candidates, query, role, DEFAULT_PAGE_SIZE)
}

/// Search `candidates` for `query`.
///
/// An integer query is an exact id lookup: `0` cancels, a negative number is
/// rejected, and an id nobody has is `UserNotFound`. Anything else is a
/// case-insensitive name-prefix match returning at most `page_size` users.
/// When `role` is set, users with other roles are ignored.
pub fn find_paged<'a>(
    candidates: &'a [User],
    query: &str,
    role: Option<Role>,
    page_size: usize,
) -> Result<SearchOutcome<'a>> {
    let query = query.trim();
    if query.is_empty() {
        let noun = role.map_or_else(|| "user".to_string(), |r| r.to_string());
        return Err(RegistryError::InvalidQuery(format!(
            "you must enter a {noun}'s name or id"
        )));
    }

    let in_scope = |user: &&'a User| role.map_or(true, |r| user.role() == r);

    if let Ok(id) = query.parse::<i64>() {
        if id == 0 {
            return Ok(SearchOutcome::Cancelled);
        }
        if id < 0 {
            return Err(RegistryError::InvalidQuery(format!(
                "{id} is not a valid id, ids are positive"
            )));
        }
        return candidates
            .iter()
            .filter(in_scope)
            .find(|u| i64::from(u.id.0) == id)
            .map(SearchOutcome::Resolved)
            .ok_or_else(|| RegistryError::user_not_found(id, role));
    }

    let needle = query.to_lowercase();
    let mut users = Vec::new();
    let mut total = 0usize;
    for user in candidates.iter().filter(in_scope) {
        if user.name.trim().to_lowercase().starts_with(&needle) {
            total += 1;
            if users.len() < page_size {
                users.push(user);
            }
        }
    }

    Ok(SearchOutcome::Matches { users, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserId;

    fn population() -> Vec<User> {
        let names = [
            "Mazen", "Meshal", "Rayan", "Osama", "Maha", "Omar", "Sara", "Mariam", "Khalid",
            "Noura", "Faisal", "Lama", "Hassan", "Reem", "Yousef",
        ];
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let id = i as u32 + 1;
                match i {
                    2 => User::instructor(id, *name, ""),
                    3 => User::admin(id, *name, ""),
                    _ => User::student(id, *name, ""),
                }
            })
            .collect()
    }

    #[test]
    fn zero_cancels() {
        let users = population();
        assert_eq!(find(&users, "0", None).unwrap(), SearchOutcome::Cancelled);
    }

    #[test]
    fn negative_id_is_invalid() {
        let users = population();
        let err = find(&users, "-3", None).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidQuery(_)));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let users = population();
        let err = find(&users, "99", None).unwrap_err();
        assert_eq!(
            err,
            RegistryError::UserNotFound("The user with the id of: 99 was not found.".into())
        );
    }

    #[test]
    fn id_lookup_resolves() {
        let users = population();
        let outcome = find(&users, " 4 ", None).unwrap();
        assert_eq!(outcome.single().map(|u| u.id), Some(UserId(4)));
    }

    #[test]
    fn id_lookup_respects_role_filter() {
        let users = population();
        let err = find(&users, "3", Some(Role::Student)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The student with the id of: 3 was not found."
        );
        assert!(find(&users, "3", Some(Role::Instructor)).is_ok());
    }

    #[test]
    fn prefix_matches_keep_candidate_order() {
        let users = population();
        let outcome = find(&users, "ma", None).unwrap();
        let SearchOutcome::Matches { users: found, total } = outcome else {
            panic!("expected name matches");
        };
        let names: Vec<&str> = found.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Mazen", "Maha", "Mariam"]);
        assert_eq!(total, 3);
    }

    #[test]
    fn prefix_match_ignores_case() {
        let users = population();
        let outcome = find(&users, "RAY", None).unwrap();
        assert_eq!(outcome.single().map(|u| u.name.as_str()), Some("Rayan"));
    }

    #[test]
    fn no_matches_is_empty_not_error() {
        let users = population();
        let outcome = find(&users, "zed", None).unwrap();
        assert!(outcome.is_empty());
        assert_eq!(outcome.single(), None);
    }

    #[test]
    fn results_are_capped_but_total_is_true() {
        let users: Vec<User> = (1..=25)
            .map(|i| User::student(i, format!("Student {i}"), ""))
            .collect();
        let outcome = find(&users, "stu", None).unwrap();
        let SearchOutcome::Matches { users: found, total } = outcome else {
            panic!("expected name matches");
        };
        assert_eq!(found.len(), 10);
        assert_eq!(total, 25);
        assert_eq!(found[0].id, UserId(1));
        assert_eq!(found[9].id, UserId(10));

        let paged = find_paged(&users, "stu", None, 4).unwrap();
        assert!(matches!(paged, SearchOutcome::Matches { ref users, total: 25 } if users.len() == 4));
    }

    #[test]
    fn empty_query_is_invalid() {
        let users = population();
        assert!(matches!(
            find(&users, "   ", None),
            Err(RegistryError::InvalidQuery(_))
        ));
    }

    #[test]
    fn search_does_not_touch_candidates() {
        let users = population();
        let before: Vec<UserId> = users.iter().map(|u| u.id).collect();
        let _ = find(&users, "m", None).unwrap();
        let after: Vec<UserId> = users.iter().map(|u| u.id).collect();
        assert_eq!(before, after);
    }
}
