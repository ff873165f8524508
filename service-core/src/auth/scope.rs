use super::UserRole;
use crate::error::AppError;

/// Verified identity of the caller, used to filter every tenant-owned
/// resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantScope {
    pub user_id: String,
    pub role: UserRole,
    /// Tenant claim; `None` for super admins not bound to a tenant.
    pub tenant_id: Option<String>,
}

impl TenantScope {
    pub fn new(user_id: impl Into<String>, role: UserRole, tenant_id: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            tenant_id,
        }
    }

    /// Super admins may touch any tenant; everyone else only their own.
    pub fn can_access_tenant(&self, tenant_id: &str) -> bool {
        match self.role {
            UserRole::SuperAdmin => true,
            UserRole::TenantAdmin => self.tenant_id.as_deref() == Some(tenant_id),
        }
    }

    pub fn require_tenant(&self, tenant_id: &str) -> Result<(), AppError> {
        if self.can_access_tenant(tenant_id) {
            Ok(())
        } else {
            tracing::warn!(
                user_id = %self.user_id,
                role = %self.role,
                tenant_id = %tenant_id,
                "Cross-tenant access denied"
            );
            Err(AppError::Forbidden(anyhow::anyhow!(
                "Access to tenant {} is not allowed",
                tenant_id
            )))
        }
    }

    /// Tenant a query must be filtered by.
    ///
    /// Tenant admins are pinned to their own tenant regardless of what was
    /// requested. Super admins get the requested tenant, or `None` for all.
    pub fn resolve_tenant(&self, requested: Option<&str>) -> Result<Option<String>, AppError> {
        match self.role {
            UserRole::SuperAdmin => Ok(requested.map(str::to_string)),
            UserRole::TenantAdmin => {
                let own = self.tenant_id.as_deref().ok_or_else(|| {
                    AppError::Forbidden(anyhow::anyhow!("Tenant admin has no tenant claim"))
                })?;
                if let Some(requested) = requested {
                    self.require_tenant(requested)?;
                }
                Ok(Some(own.to_string()))
            }
        }
    }
}
