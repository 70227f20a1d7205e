/// Application name
pub const APP_NAME: &str = "Linkup";

/// Maximum chat message length in characters
pub const MAX_MESSAGE_LEN: usize = 2_000;

/// Maximum size of an uploaded image or video (10 MiB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Default HTTP API port (server)
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Base URL used when building shareable profile links
pub const DEFAULT_PROFILE_BASE_URL: &str = "https://linkup.local";

/// Schema name reported in change notifications
pub const SCHEMA_PUBLIC: &str = "public";

/// Table names shared by the store, the server and the realtime feed
pub const TABLE_LOCATIONS: &str = "locations";
pub const TABLE_USERS: &str = "users";
pub const TABLE_GROUPS: &str = "groups";
pub const TABLE_GROUP_MEMBERS: &str = "group_members";
pub const TABLE_MESSAGES: &str = "messages";

/// Capacity of the realtime broadcast channel
pub const REALTIME_BUFFER: usize = 256;

/// Default page size when loading chat history
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;
