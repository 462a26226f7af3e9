use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_settings_file(name: &str, contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("robot_intake_{name}_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("intake.toml");
    fs::write(&path, contents).expect("write settings");
    path
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_point_at_local_planner() {
    let settings = Settings::default();
    assert_eq!(settings.goal_topic, "huber/robot/goal");
    assert_eq!(
        settings.resolved_api_base().expect("base"),
        "http://127.0.0.1:8000"
    );
    assert_eq!(settings.bootstrap_plan(), BootstrapPlan::default());
}

#[test]
fn file_values_override_defaults() {
    let path = temp_settings_file(
        "file",
        r#"
api_base = "http://robot.local:8000/"
goal_topic = "lab/goal"
start_delay_ms = 500
auto_start = "legacy_label"
"#,
    );

    let settings = load_settings_with(Some(&path), no_env).expect("settings");

    assert_eq!(settings.resolved_api_base().expect("base"), "http://robot.local:8000");
    assert_eq!(settings.goal_topic, "lab/goal");
    assert_eq!(settings.start_delay_ms, 500);
    assert_eq!(settings.connect_delay_ms, 50);
    assert_eq!(settings.auto_start, AutoStart::LegacyLabel);

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let path = temp_settings_file("env", r#"goal_topic = "from/file""#);
    let vars: HashMap<&str, &str> = [
        ("GOAL_TOPIC", "from/env"),
        ("APP__GOAL_TOPIC", "from/app/env"),
        ("API_KEY", "k"),
        ("APP__CONNECT_DELAY_MS", "not a number"),
        ("APP__AUTO_START", "on"),
    ]
    .into_iter()
    .collect();

    let settings = load_settings_with(Some(&path), |key| vars.get(key).map(|v| v.to_string()))
        .expect("settings");

    assert_eq!(settings.goal_topic, "from/app/env");
    assert_eq!(settings.api_key.as_deref(), Some("k"));
    assert_eq!(settings.connect_delay_ms, 50, "unparseable values are ignored");
    assert_eq!(settings.auto_start, AutoStart::On);

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn explicit_missing_file_is_an_error() {
    let missing = env::temp_dir().join("robot_intake_does_not_exist").join("intake.toml");
    let err = load_settings_with(Some(&missing), no_env).expect_err("must fail");
    assert!(matches!(err, SettingsError::Read { .. }));
}

#[test]
fn unknown_keys_are_rejected() {
    let path = temp_settings_file("unknown", r#"bind_addr = "0.0.0.0:1""#);
    let err = load_settings_with(Some(&path), no_env).expect_err("must fail");
    assert!(matches!(err, SettingsError::Parse { .. }));
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn page_url_derives_api_base_when_no_explicit_base() {
    let settings = Settings {
        page_url: Some("http://192.168.0.4:5500/".into()),
        ..Settings::default()
    };
    assert_eq!(
        settings.resolved_api_base().expect("base"),
        "http://192.168.0.4:8000"
    );

    let settings = Settings {
        api_base: Some("  ".into()),
        page_url: Some("http://robot.local/".into()),
        ..Settings::default()
    };
    assert_eq!(settings.resolved_api_base().expect("base"), "http://robot.local");
}
