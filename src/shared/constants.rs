/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Admin role - manages every project and profile
pub const ROLE_ADMIN: &str = "admin";

/// Manager role - runs projects and files reports
pub const ROLE_MANAGER: &str = "manager";

/// Default role for new profiles
pub const ROLE_MEMBER: &str = "member";

/// Roles accepted in `profiles.role`
pub const PROFILE_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER, ROLE_MEMBER];
