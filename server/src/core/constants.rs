// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "RelQuery";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "relquery";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".relquery";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "relquery.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "RELQUERY_CONFIG";

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "RELQUERY_DEBUG";

/// Environment variable for server host
pub const ENV_HOST: &str = "RELQUERY_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "RELQUERY_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "RELQUERY_LOG";

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "RELQUERY_DATA_DIR";

/// Environment variable for the database file path
pub const ENV_DB_PATH: &str = "RELQUERY_DB_PATH";

/// Environment variable to seed demo data on an empty database
pub const ENV_SEED_DEMO: &str = "RELQUERY_SEED_DEMO";

/// Environment variable for the per-request filter count limit
pub const ENV_MAX_FILTERS: &str = "RELQUERY_MAX_FILTERS";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5390;

/// Default request body limit
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Maximum time to wait for in-flight requests on shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Filters
// =============================================================================

/// Maximum number of filters per request
pub const DEFAULT_MAX_FILTERS: usize = 50;

/// Maximum size of the JSON `filters` parameter in bytes (64KB)
pub const DEFAULT_MAX_FILTER_JSON_BYTES: usize = 64 * 1024;

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "relquery.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -64000 = 64MB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// Pages between automatic WAL checkpoints
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// Interval between explicit WAL checkpoints
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;
