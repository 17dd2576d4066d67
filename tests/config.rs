// tests/config.rs
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use ub_airlog::config::Settings;
use ub_airlog::error::ConfigError;

fn from(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    Settings::from_lookup(|k| map.get(k).cloned())
}

#[test]
fn defaults_without_env() {
    let s = from(&[]).unwrap();
    assert_eq!(s, Settings::default());
    assert_eq!(s.timezone, chrono_tz::Asia::Ulaanbaatar);
    assert_eq!(s.retry.attempts, 3);
    assert_eq!(s.retry.delay, Duration::from_secs(10));
    assert_eq!(s.wait, Duration::from_secs(15));
    assert_eq!(s.refetch_after, chrono::Duration::minutes(60));
    assert_eq!(s.weather_log_path(), PathBuf::from("public").join("weather_log.csv"));
    assert_eq!(s.pm25_log_path(), PathBuf::from("public").join("pm25_log.csv"));
    assert!(s.write_bom);
}

#[test]
fn overrides_apply() {
    let s = from(&[
        ("AIRLOG_OUT_DIR", "/tmp/air"),
        ("AIRLOG_TZ", "Asia/Tokyo"),
        ("AIRLOG_RETRIES", "5"),
        ("AIRLOG_RETRY_DELAY_SECS", "0"),
        ("AIRLOG_WAIT_SECS", " 3 "),
        ("AIRLOG_POLL_MS", "100"),
        ("AIRLOG_REFETCH_MINS", "30"),
        ("AIRLOG_USER_AGENT", "test-agent"),
        ("AIRLOG_BOM", "0"),
    ])
    .unwrap();

    assert_eq!(s.out_dir, PathBuf::from("/tmp/air"));
    assert_eq!(s.timezone, chrono_tz::Asia::Tokyo);
    assert_eq!(s.retry.attempts, 5);
    assert_eq!(s.retry.delay, Duration::ZERO);
    assert_eq!(s.wait, Duration::from_secs(3));
    assert_eq!(s.poll, Duration::from_millis(100));
    assert_eq!(s.refetch_after, chrono::Duration::minutes(30));
    assert_eq!(s.user_agent, "test-agent");
    assert!(!s.write_bom);
    assert!(s.debug_log_path().starts_with("/tmp/air"));
}

#[test]
fn zero_retries_means_one_attempt() {
    assert_eq!(from(&[("AIRLOG_RETRIES", "0")]).unwrap().retry.attempts, 1);
}

#[test]
fn bad_values_are_rejected() {
    assert!(matches!(
        from(&[("AIRLOG_RETRIES", "many")]),
        Err(ConfigError::Invalid { key: "AIRLOG_RETRIES", .. })
    ));
    assert!(matches!(from(&[("AIRLOG_BOM", "maybe")]), Err(ConfigError::Invalid { key: "AIRLOG_BOM", .. })));
    assert!(matches!(from(&[("AIRLOG_TZ", "Mars/Olympus")]), Err(ConfigError::TimeZone(_))));
}
