// src/config/consts.rs

// Server
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";
pub const INDEX_PATH: &str = "/";
pub const EXTRACT_PATH: &str = "/extract";
pub const EXPORT_PATH: &str = "/export";
pub const USER_AGENT: &str = concat!("canvas_roster/", env!("CARGO_PKG_VERSION"));

// Local files
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = ".store/debug.log";
pub const SETTINGS_FILE: &str = ".store/settings.json";
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloads";
pub const EXPORT_FILENAME: &str = "canvas_course_data.csv";

// Page element ids
pub const EXTRACT_FORM: &str = "extractForm";
pub const LOADING: &str = "loading";
pub const ERROR: &str = "error";
pub const EXPORT_BTN: &str = "exportBtn";
pub const EXPORT_LOADING: &str = "exportLoading";
pub const EXPORT_ERROR: &str = "exportError";

// Form fields
pub const FIELD_COURSE_URL: &str = "course_url";
pub const FIELD_API_KEY: &str = "api_key";
pub const FIELD_BASE_URL: &str = "base_url";
pub const FIELD_COURSE_ID: &str = "course_id";

// Table scraping
pub const NO_GROUP: &str = "No Group";

// User-facing messages
pub const MSG_INVALID_COURSE_URL: &str =
    "Invalid course URL. Please provide a valid Canvas course URL.";
pub const MSG_EXTRACT_FALLBACK: &str = "Network response was not ok";
pub const MSG_EXPORT_FALLBACK: &str = "Export failed";
pub const PREFIX_EXTRACT_ERROR: &str = "An error occurred: ";
pub const PREFIX_EXPORT_ERROR: &str = "Export failed: ";

/// Start page used when `GET /` is unreachable. Mirrors the server's form.
pub const FALLBACK_INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Canvas Course Data Extractor</title></head>
<body>
  <h1>Canvas Course Data Extractor</h1>
  <form id="extractForm">
    <label for="course_url">Course URL</label>
    <input type="url" id="course_url" name="course_url" placeholder="https://canvas.example.edu/courses/12345" required>
    <label for="api_key">API Key</label>
    <input type="password" id="api_key" name="api_key" required>
    <button type="submit">Extract Data</button>
  </form>
  <div id="loading" style="display: none;">Extracting data...</div>
  <div id="error" style="display: none;"></div>
</body>
</html>
"#;
