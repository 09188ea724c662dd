//! Permission checks.
//!
//! Admins come from the `ADMINS` environment variable. They are the only
//! users allowed to toggle special AFK mode.

use std::collections::HashSet;
use std::sync::Arc;

/// Static set of bot admins.
#[derive(Debug, Clone, Default)]
pub struct Permissions {
    admin_ids: Arc<HashSet<u64>>,
}

impl Permissions {
    /// Create a permission checker for the given admin IDs.
    pub fn with_admins(admin_ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            admin_ids: Arc::new(admin_ids.into_iter().collect()),
        }
    }

    /// Check if a user is a bot admin.
    #[inline]
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_ids.contains(&user_id)
    }

    /// Number of configured admins.
    pub fn admin_count(&self) -> usize {
        self.admin_ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_admin() {
        let perms = Permissions::with_admins([1, 2]);
        assert!(perms.is_admin(1));
        assert!(!perms.is_admin(3));
        assert_eq!(perms.admin_count(), 2);
        assert!(!Permissions::default().is_admin(1));
    }
}
