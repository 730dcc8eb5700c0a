use super::*;

/// # Safety
/// Env-mutating tests serialize on `ENV_LOCK` to avoid races.
unsafe fn clear_marquee_env() {
    unsafe {
        std::env::remove_var("MARQUEE_API_BASE_URL");
        std::env::remove_var("MARQUEE_STATE_DIR");
        std::env::remove_var("MARQUEE_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("MARQUEE_CONNECT_TIMEOUT_SECS");
    }
}

static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[test]
fn from_env_uses_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe { clear_marquee_env() };

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.timeouts, HttpTimeouts::default());
    assert!(cfg.state_dir.ends_with("marquee") || cfg.state_dir.ends_with(".marquee"));
}

#[test]
fn from_env_parses_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_marquee_env();
        std::env::set_var("MARQUEE_API_BASE_URL", "https://tickets.example.test/api/");
        std::env::set_var("MARQUEE_STATE_DIR", "/tmp/marquee-test-state");
        std::env::set_var("MARQUEE_REQUEST_TIMEOUT_SECS", "42");
        std::env::set_var("MARQUEE_CONNECT_TIMEOUT_SECS", "7");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.api_base_url, "https://tickets.example.test/api");
    assert_eq!(cfg.state_dir, PathBuf::from("/tmp/marquee-test-state"));
    assert_eq!(cfg.timeouts, HttpTimeouts { request_secs: 42, connect_secs: 7 });

    unsafe { clear_marquee_env() };
}

#[test]
fn from_env_ignores_unparseable_timeouts() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_marquee_env();
        std::env::set_var("MARQUEE_REQUEST_TIMEOUT_SECS", "soon");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_REQUEST_TIMEOUT_SECS);

    unsafe { clear_marquee_env() };
}

#[test]
fn from_env_rejects_non_http_base_url() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_marquee_env();
        std::env::set_var("MARQUEE_API_BASE_URL", "ftp://localhost:8000");
    }

    let err = ClientConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("invalid MARQUEE_API_BASE_URL"));

    unsafe { clear_marquee_env() };
}

#[test]
fn normalize_base_url_trims_trailing_slashes() {
    assert_eq!(normalize_base_url("http://localhost:8000//").unwrap(), "http://localhost:8000");
}

#[test]
fn normalize_base_url_rejects_bare_scheme() {
    assert!(normalize_base_url("https://").is_err());
}

#[test]
fn with_api_base_url_overrides_and_validates() {
    let cfg = ClientConfig {
        api_base_url: DEFAULT_API_BASE_URL.to_owned(),
        state_dir: PathBuf::from("state"),
        timeouts: HttpTimeouts::default(),
    };
    let cfg = cfg.with_api_base_url("http://127.0.0.1:9000/").unwrap();
    assert_eq!(cfg.api_base_url, "http://127.0.0.1:9000");
    assert!(cfg.with_api_base_url("localhost").is_err());
}
