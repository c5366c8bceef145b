//! Helpers for role lists stored as a flat whitespace-separated string.

use std::collections::HashSet;

/// Remove every occurrence of the given role names from a role string.
///
/// Remaining tokens keep their relative order and are joined by a single
/// space, so runs of whitespace collapse and leading or trailing whitespace
/// disappears.
///
/// # Example
///
/// ```
/// use platform_rbac::remove_roles;
///
/// assert_eq!(remove_roles(&["admin"], "member admin guest"), "member guest");
/// assert_eq!(remove_roles(&["owner"], "  member   guest "), "member guest");
/// ```
pub fn remove_roles<S: AsRef<str>>(roles_to_remove: &[S], roles: &str) -> String {
    let removed: HashSet<&str> = roles_to_remove.iter().map(AsRef::as_ref).collect();

    roles
        .split_whitespace()
        .filter(|role| !removed.contains(role))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_single_role() {
        assert_eq!(remove_roles(&["admin"], "member admin guest"), "member guest");
    }

    #[test]
    fn test_remove_absent_role_normalizes_whitespace() {
        assert_eq!(remove_roles(&["owner"], "member admin"), "member admin");
        assert_eq!(remove_roles(&["owner"], "\tmember \n admin  "), "member admin");
    }

    #[test]
    fn test_remove_all_roles() {
        assert_eq!(remove_roles(&["member", "admin"], "member admin member"), "");
        assert_eq!(remove_roles::<&str>(&[], ""), "");
    }

    #[test]
    fn test_remove_repeated_tokens_keeps_order() {
        assert_eq!(
            remove_roles(&["b".to_string()], "a b c b a"),
            "a c a"
        );
    }
}
