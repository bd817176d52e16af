//! Well-known identifiers shared across slices.

/// `OpenAPI` tag for infrastructure endpoints.
pub const SYSTEM_TAG: &str = "System";
/// `OpenAPI` tag for local authentication endpoints.
pub const AUTH_TAG: &str = "Auth";
/// `OpenAPI` tag for order endpoints.
pub const ORDERS_TAG: &str = "Orders";

/// Provider tag of accounts created through email/username/password registration.
pub const LOCAL_PROVIDER: &str = "local";

/// Settings-store key holding [`crate::config::AdvancedSettings`].
pub const ADVANCED_SETTINGS_KEY: &str = "advanced";

/// Role type assigned to newly registered accounts by default.
pub const AUTHENTICATED_ROLE: &str = "authenticated";
/// Role type of anonymous callers.
pub const PUBLIC_ROLE: &str = "public";

/// Message shown for any 5xx whose detail must stay server-side.
pub const INTERNAL_MESSAGE: &str = "Internal server error";
