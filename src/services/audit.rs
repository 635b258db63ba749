use serde_json::Value;
use uuid::Uuid;

use crate::db::AuditEntry;

/// The administrator performing a privileged mutation, plus request metadata for the audit trail.
#[derive(Debug, Clone)]
pub struct AdminActor {
    pub admin_id: Uuid,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl AdminActor {
    pub fn new(admin_id: Uuid) -> Self {
        Self {
            admin_id,
            ip_address: None,
            user_agent: None,
        }
    }

    pub fn entry(
        &self,
        action: &str,
        resource: &str,
        resource_id: Option<String>,
        details: Value
    ) -> AuditEntry {
        AuditEntry {
            admin_id: self.admin_id,
            action: action.to_string(),
            resource: resource.to_string(),
            resource_id,
            details,
            ip_address: self.ip_address.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}
