// Geopic Constants

// App identity (data directory resolution)
pub const APP_QUALIFIER: &str = "com";
pub const APP_ORG: &str = "geopic";
pub const APP_NAME: &str = "geopic";

// Local persisted state
pub const QUEUE_FILENAME: &str = "queue.json";
pub const CURSOR_FILENAME: &str = "last_sync";
pub const PHOTOS_FOLDER: &str = "photos";
pub const TEMP_FILE_PREFIX: &str = ".tmp-";

// Keychain service and accounts
pub const KEYCHAIN_SERVICE: &str = "com.geopic.app";
pub const KEYCHAIN_URL_ACCOUNT: &str = "server-url";
pub const KEYCHAIN_TOKEN_ACCOUNT: &str = "api-token";

// Capture settings
pub const CAPTURE_JPEG_QUALITY: u8 = 80;
pub const CAPTURE_FILENAME_PREFIX: &str = "photo";
pub const IMPORT_ID_PREFIX: &str = "server";

// Server API paths
pub const UPLOAD_PATH: &str = "/api/upload-photo";
pub const PHOTOS_PATH: &str = "/api/photos";
pub const MAP_PATH: &str = "/map";
