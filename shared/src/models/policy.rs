use serde::{Deserialize, Serialize};

use super::status::OrderStatus;

/// Whether orders in `status` accept edit requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditableStatusPolicy {
    pub status: OrderStatus,
    pub allow_edit_requests: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    pub updated_at: i64,
}

impl EditableStatusPolicy {
    /// Seed value for a status
    ///
    /// Orders past DRAFT but still in the pipeline may request edits;
    /// DRAFT is already editable and terminal statuses never reopen.
    pub fn default_for(status: OrderStatus) -> Self {
        let allow_edit_requests = matches!(
            status,
            OrderStatus::Confirmed | OrderStatus::InProduction | OrderStatus::Ready
        );
        Self {
            status,
            allow_edit_requests,
            updated_by: None,
            updated_at: 0,
        }
    }
}
