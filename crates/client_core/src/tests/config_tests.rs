use super::{
    load_settings, load_settings_with_env, ClientSettings, SettingsError, DEFAULT_SERVICE_URL,
};

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_settings_path(tag: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    env::temp_dir().join(format!("cars_client_{tag}_{suffix}.toml"))
}

#[test]
fn defaults_point_at_cars_collection() {
    let settings = ClientSettings::default().normalized().expect("defaults");
    assert_eq!(settings.service_url, DEFAULT_SERVICE_URL);
    assert_eq!(settings.collection_url(), format!("{DEFAULT_SERVICE_URL}/cars"));
    assert!(!settings.realtime_events);
}

#[test]
fn events_url_switches_scheme() {
    let mut settings = ClientSettings::default();
    settings.service_url = "http://127.0.0.1:3030".into();
    assert_eq!(
        settings.events_url().expect("ws url"),
        "ws://127.0.0.1:3030/cars/events"
    );

    settings.service_url = "https://cars.example.com".into();
    assert_eq!(
        settings.events_url().expect("wss url"),
        "wss://cars.example.com/cars/events"
    );
}

#[test]
fn events_url_accepts_uppercase_scheme() {
    let mut settings = ClientSettings::default();
    settings.service_url = "HTTPS://Cars.Example.com/api/".into();
    let settings = settings.normalized().expect("normalize");

    assert_eq!(
        settings.events_url().expect("wss url"),
        "wss://cars.example.com/api/cars/events"
    );
}

#[test]
fn rejects_non_http_service_url() {
    let mut settings = ClientSettings::default();
    settings.service_url = "ftp://cars.example.com".into();
    assert!(matches!(
        settings.normalized(),
        Err(SettingsError::InvalidServiceUrl { .. })
    ));
}

#[test]
fn normalizes_trailing_slashes() {
    let mut settings = ClientSettings::default();
    settings.service_url = "http://localhost:3030/".into();
    settings.service_path = "/cars/".into();
    let settings = settings.normalized().expect("normalize");
    assert_eq!(settings.collection_url(), "http://localhost:3030/cars");
}

#[test]
fn env_overrides_win_over_defaults() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("CARS_SERVICE_URL", "http://legacy:1"),
        ("APP__SERVICE_URL", "http://override:2"),
        ("APP__REALTIME_EVENTS", "yes"),
        ("APP__REQUEST_TIMEOUT_SECS", "5"),
        ("APP__EVENT_BUFFER", "not-a-number"),
    ]);
    let mut settings = ClientSettings::default();
    settings.apply_env_overrides(|name| vars.get(name).map(|v| v.to_string()));

    assert_eq!(settings.service_url, "http://override:2");
    assert!(settings.realtime_events);
    assert_eq!(settings.request_timeout_secs, 5);
    assert_eq!(settings.event_buffer, ClientSettings::default().event_buffer);
}

#[test]
fn loads_explicit_settings_file() {
    let path = temp_settings_path("explicit");
    fs::write(
        &path,
        "service_url = \"http://127.0.0.1:9000/\"\nrealtime_events = true\nevent_buffer = 8\n",
    )
    .expect("write settings");

    let settings = load_settings(Some(&path)).expect("load");
    fs::remove_file(&path).expect("cleanup");

    // The process env may carry overrides on a developer machine.
    if env::var("APP__SERVICE_URL").is_err() && env::var("CARS_SERVICE_URL").is_err() {
        assert_eq!(settings.service_url, "http://127.0.0.1:9000");
    }
    if env::var("APP__REALTIME_EVENTS").is_err() {
        assert!(settings.realtime_events);
    }
    if env::var("APP__EVENT_BUFFER").is_err() {
        assert_eq!(settings.event_buffer, 8);
    }
}

#[test]
fn env_overrides_win_over_settings_file() {
    let path = temp_settings_path("precedence");
    fs::write(
        &path,
        "service_url = \"http://from-file:1\"\nservice_path = \"vehicles\"\n",
    )
    .expect("write settings");

    let settings = load_settings_with_env(Some(&path), |name| {
        (name == "APP__SERVICE_URL").then(|| "http://from-env:2/".to_string())
    })
    .expect("load");
    fs::remove_file(&path).expect("cleanup");

    assert_eq!(settings.service_url, "http://from-env:2");
    assert_eq!(settings.collection_url(), "http://from-env:2/vehicles");
}

#[test]
fn missing_explicit_settings_file_is_an_error() {
    let path = temp_settings_path("missing");
    assert!(matches!(
        load_settings(Some(&path)),
        Err(SettingsError::Read { .. })
    ));
}

#[test]
fn malformed_settings_file_is_an_error() {
    let path = temp_settings_path("malformed");
    fs::write(&path, "service_url = [").expect("write settings");
    let result = load_settings(Some(&path));
    fs::remove_file(&path).expect("cleanup");
    assert!(matches!(result, Err(SettingsError::Parse { .. })));
}
