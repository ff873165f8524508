use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Role carried in a user's token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserRole {
    /// Platform operator: manages tenants, billing and system users.
    SuperAdmin,
    /// Restaurant owner or manager: limited to a single tenant.
    TenantAdmin,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown role: {0}")]
pub struct RoleParseError(pub String);

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "super_admin",
            UserRole::TenantAdmin => "tenant_admin",
        }
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, UserRole::SuperAdmin)
    }
}

/// Lower-cases and folds `-`, `_` and whitespace runs into a single `_`.
fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for c in raw.trim().chars() {
        if c == '-' || c == '_' || c.is_whitespace() {
            pending_sep = !out.is_empty();
        } else {
            if pending_sep {
                out.push('_');
                pending_sep = false;
            }
            out.extend(c.to_lowercase());
        }
    }
    out
}

impl FromStr for UserRole {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "super_admin" | "superadmin" => Ok(UserRole::SuperAdmin),
            "tenant_admin" | "tenantadmin" | "admin" => Ok(UserRole::TenantAdmin),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for UserRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_super_admin_spellings() {
        for raw in ["super-admin", "SUPER_ADMIN", "Super Admin", "superadmin", " super_admin "] {
            assert_eq!(raw.parse::<UserRole>(), Ok(UserRole::SuperAdmin), "{raw}");
        }
    }

    #[test]
    fn test_parse_tenant_admin_spellings() {
        for raw in ["admin", "ADMIN", "tenant-admin", "TENANT_ADMIN"] {
            assert_eq!(raw.parse::<UserRole>(), Ok(UserRole::TenantAdmin), "{raw}");
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("".parse::<UserRole>().is_err());
        assert!("owner".parse::<UserRole>().is_err());
        assert!("super--admin-x".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_serde_uses_canonical_form() {
        let json = serde_json::to_string(&UserRole::SuperAdmin).unwrap();
        assert_eq!(json, "\"super_admin\"");

        let role: UserRole = serde_json::from_str("\"SUPER-ADMIN\"").unwrap();
        assert_eq!(role, UserRole::SuperAdmin);
    }
}
