//! Role and tenant-scope primitives.
//!
//! Token verification happens upstream; these types work on claims that
//! have already been verified.
//!
//! Callers are the tenant-owned resource handlers (menus, categories,
//! products, tenant settings): parse the role claim once with
//! `str::parse::<UserRole>`, then filter every query
//! through [`TenantScope::resolve_tenant`]. The billing calculator takes no
//! tenant claims and does not use this module.

mod role;
mod scope;

pub use role::{RoleParseError, UserRole};
pub use scope::TenantScope;
