// src/config/consts.rs

// Sources
pub const WEATHER_URL: &str = "https://weather.gov.mn";
pub const IQAIR_CITY_URL: &str = "https://www.iqair.com/mongolia/ulaanbaatar/ulaanbaatar/";

// Output
pub const DEFAULT_OUT_DIR: &str = "public";
pub const WEATHER_LOG: &str = "weather_log.csv";
pub const PM25_LOG: &str = "pm25_log.csv";
pub const STORE_DIR: &str = ".store";
pub const DEBUG_LOG: &str = "debug.log";
pub const LOG_SEP: char = ',';
pub const WRITE_BOM: bool = true;

// Capture clock (zone lives in `Settings::timezone`)
pub const CAPTURE_FMT: &str = "%Y-%m-%d %H:%M";

// Retrieval
pub const RETRIES: u32 = 3;
pub const RETRY_DELAY_SECS: u64 = 10;
pub const WAIT_SECS: u64 = 15;
pub const POLL_MS: u64 = 2_500;
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

// Staleness
pub const REFETCH_MINS: i64 = 60;

// Writer lock
pub const LOCK_STALE_SECS: u64 = 600;
pub const LOCK_TRIES: u32 = 20;
pub const LOCK_PAUSE_MS: u64 = 250;

// Cell markers
pub const OFFLINE_CELL: &str = "OFFLINE";
