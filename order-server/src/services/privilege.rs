//! Privileged-role lookup

use std::collections::HashSet;

/// Answers whether a user holds a privileged role
pub trait PrivilegeLookup: Send + Sync {
    fn is_privileged(&self, user_id: &str) -> bool;
}

/// Fixed set of administrator ids (from `ADMIN_USER_IDS`)
#[derive(Debug, Clone, Default)]
pub struct AdminList {
    admins: HashSet<String>,
}

impl AdminList {
    pub fn new<I, S>(admins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            admins: admins.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.admins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.admins.is_empty()
    }
}

impl PrivilegeLookup for AdminList {
    fn is_privileged(&self, user_id: &str) -> bool {
        self.admins.contains(user_id)
    }
}
