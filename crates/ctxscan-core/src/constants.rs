//! Compiled defaults and static pattern tables.

/// ctxscan version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum processable file size in bytes (5 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Number of directories walked concurrently per batch.
pub const DEFAULT_DIRECTORY_BATCH_WIDTH: usize = 4;

/// Number of files processed concurrently per chunk within a directory.
pub const DEFAULT_FILE_CHUNK_SIZE: usize = 20;

/// Scan deadline in seconds (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Maximum directory depth below the scan root.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default cache capacities, in entries.
pub const DEFAULT_IGNORE_FILTER_CACHE_CAPACITY: u64 = 64;
pub const DEFAULT_FILE_TYPE_CACHE_CAPACITY: u64 = 4_096;
pub const DEFAULT_TOKEN_CACHE_CAPACITY: u64 = 10_000;

/// Total weight of cached file records, in bytes (256 MiB).
pub const DEFAULT_FILE_METADATA_CACHE_MAX_BYTES: u64 = 256 * 1024 * 1024;

/// Ignore files read per directory in automatic mode.
pub const DEFAULT_IGNORE_FILE_NAMES: &[&str] = &[".gitignore"];

/// Static exclude list applied in global mode.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    // Version control
    "**/.git",
    "**/.svn",
    "**/.hg",
    // Dependencies
    "**/node_modules",
    "**/bower_components",
    "**/jspm_packages",
    "**/vendor/bundle",
    "**/__pycache__",
    "**/.venv",
    "**/venv",
    // Build output
    "**/dist",
    "**/.next",
    "**/.nuxt",
    "**/coverage",
    "**/target",
    // Editors
    "**/.idea",
    "**/.vscode",
    // Lock files
    "**/package-lock.json",
    "**/yarn.lock",
    "**/pnpm-lock.yaml",
    "**/Cargo.lock",
    // System files
    "**/.DS_Store",
    "**/Thumbs.db",
    "**/desktop.ini",
    // Logs and environment files
    "**/*.log",
    "**/.env",
    "**/.env.*",
    // Minified and generated assets
    "**/*.min.js",
    "**/*.min.css",
    "**/*.map",
    "**/*.pyc",
];

/// Built-in defaults merged with discovered ignore files in automatic mode.
pub const AUTOMATIC_DEFAULT_PATTERNS: &[&str] = &[
    // Version control
    ".git",
    ".svn",
    ".hg",
    ".bzr",
    // Dependencies
    "node_modules",
    "bower_components",
    "jspm_packages",
    "__pycache__",
    ".venv",
    "venv",
    ".tox",
    ".gradle",
    // Build output
    "dist",
    "out",
    ".next",
    ".nuxt",
    ".turbo",
    ".parcel-cache",
    ".cache",
    "coverage",
    // Editors
    ".idea",
    ".vscode",
    ".vs",
    "*.swp",
    "*.swo",
    // System files
    ".DS_Store",
    "Thumbs.db",
    "desktop.ini",
];

/// Directory names the pattern collector never descends into.
pub const COLLECTOR_SKIP_DIRS: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    ".bzr",
    "node_modules",
    "bower_components",
    "jspm_packages",
    ".pnpm-store",
    ".yarn",
    "__pycache__",
    ".venv",
    "venv",
    ".tox",
    ".gradle",
    ".m2",
];

/// Extensions classified as binary (lowercase, without the leading dot).
pub const BINARY_EXTENSIONS: &[&str] = &[
    // Images
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "tiff", "tif", "psd", "icns", "heic",
    // Audio / video
    "mp3", "mp4", "wav", "flac", "ogg", "avi", "mov", "mkv", "webm", "m4a", "aac",
    // Archives
    "zip", "tar", "gz", "tgz", "bz2", "xz", "7z", "rar", "jar", "war", "ear",
    // Compiled / native
    "exe", "dll", "so", "dylib", "a", "lib", "o", "obj", "class", "pyc", "pyo", "wasm", "bin",
    // Documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt",
    // Fonts
    "ttf", "otf", "woff", "woff2", "eot",
    // Databases
    "db", "sqlite", "sqlite3", "mdb",
    // Misc
    "iso", "dmg", "img", "dat", "pak",
];
