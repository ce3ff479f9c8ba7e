use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::model::ServiceId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub tenant_name: String,
    pub created_at: i64, // epoch seconds
}

impl Tenant {
    pub fn new(id: String, tenant_name: String) -> Self {
        Self {
            id,
            tenant_name,
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Tenant ids double as schema names, so only `[a-z0-9]+` is accepted
    pub fn validate_id(id: &str) -> Result<(), SetupError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        if valid {
            Ok(())
        } else {
            Err(SetupError::InvalidArgument(format!(
                "Invalid tenant id '{}': only lowercase alphanumeric characters are allowed",
                id
            )))
        }
    }
}

/// Optional fields describing the admin user seeded into a new tenant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Admin user row written by the tenant seed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl DefaultUser {
    /// Returns None when no email was given, since the user table requires one
    pub fn to_admin_user(&self) -> Option<AdminUser> {
        let email = self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())?;
        Some(AdminUser {
            email: email.to_string(),
            first_name: non_blank(&self.first_name).unwrap_or("Admin").to_string(),
            last_name: non_blank(&self.last_name).unwrap_or("User").to_string(),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnsureTenantSchemaRequest {
    pub tenant_id: String,
    pub tenant_name: String,
    pub default_user: DefaultUser,
    pub create_only: bool,
}

impl EnsureTenantSchemaRequest {
    pub fn new(tenant_id: impl Into<String>, tenant_name: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            tenant_name: tenant_name.into(),
            default_user: DefaultUser::default(),
            create_only: false,
        }
    }

    pub fn with_default_user(mut self, default_user: DefaultUser) -> Self {
        self.default_user = default_user;
        self
    }

    pub fn create_only(mut self, create_only: bool) -> Self {
        self.create_only = create_only;
        self
    }
}

/// Outcome of a tenant schema bootstrap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenantSchemaReport {
    pub tenant_id: String,
    pub newly_created: bool,
    pub seeded: bool,
    /// Tenant-specific table managers in the order they were provisioned
    pub provisioned: Vec<ServiceId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(Tenant::validate_id("test1234567").is_ok());
        assert!(Tenant::validate_id("acme").is_ok());

        for bad in ["", "Test#123", "Acme", "acme-corp", "acme corp", "ácme"] {
            assert!(
                matches!(Tenant::validate_id(bad), Err(SetupError::InvalidArgument(_))),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_admin_user_requires_email() {
        assert_eq!(DefaultUser::default().to_admin_user(), None);

        let blank = DefaultUser {
            email: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank.to_admin_user(), None);
    }

    #[test]
    fn test_admin_user_name_defaults() {
        let user = DefaultUser {
            first_name: None,
            last_name: Some(" ".to_string()),
            email: Some("ops@acme.io".to_string()),
        };

        assert_eq!(
            user.to_admin_user(),
            Some(AdminUser {
                email: "ops@acme.io".to_string(),
                first_name: "Admin".to_string(),
                last_name: "User".to_string(),
            })
        );
    }
}
