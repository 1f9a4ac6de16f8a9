use super::{Settings, SettingsOverrides, DEFAULT_API_ORIGIN};

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_dir(tag: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    env::temp_dir().join(format!("storefront_{tag}_{suffix}"))
}

#[test]
fn defaults_derive_urls_from_origin() {
    let settings = Settings::resolve(SettingsOverrides::default()).expect("resolve");
    assert_eq!(settings.api_origin, DEFAULT_API_ORIGIN);
    assert_eq!(
        settings.api_url,
        "https://larek-api.nomoreparties.co/api/weblarek"
    );
    assert_eq!(
        settings.cdn_url,
        "https://larek-api.nomoreparties.co/content/weblarek"
    );
    assert_eq!(settings.log_filter, "info");
    assert_eq!(settings, Settings::default());
}

#[test]
fn origin_override_moves_both_urls() {
    let settings = Settings::resolve(SettingsOverrides {
        api_origin: Some("http://localhost:3000/".into()),
        ..Default::default()
    })
    .expect("resolve");
    assert_eq!(settings.api_origin, "http://localhost:3000");
    assert_eq!(settings.api_url, "http://localhost:3000/api/weblarek");
    assert_eq!(settings.cdn_url, "http://localhost:3000/content/weblarek");
}

#[test]
fn explicit_urls_win_over_origin() {
    let settings = Settings::resolve(SettingsOverrides {
        api_origin: Some("http://localhost:3000".into()),
        api_url: Some("http://api.test/v2".into()),
        cdn_url: Some("http://cdn.test".into()),
        log_filter: Some("debug".into()),
    })
    .expect("resolve");
    assert_eq!(settings.api_url, "http://api.test/v2");
    assert_eq!(settings.cdn_url, "http://cdn.test");
    assert_eq!(settings.log_filter, "debug");
}

#[test]
fn later_layers_win_field_by_field() {
    let file = SettingsOverrides {
        api_origin: Some("http://file.test".into()),
        log_filter: Some("warn".into()),
        ..Default::default()
    };
    let cli = SettingsOverrides {
        log_filter: Some("trace".into()),
        ..Default::default()
    };
    let merged = file.merge(SettingsOverrides::default()).merge(cli);
    assert_eq!(merged.api_origin.as_deref(), Some("http://file.test"));
    assert_eq!(merged.log_filter.as_deref(), Some("trace"));
    assert_eq!(merged.api_url, None);
}

#[test]
fn env_lookup_reads_known_keys() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("API_ORIGIN", "http://env.test"),
        ("APP__API_ORIGIN", "http://ignored.test"),
        ("APP__CDN_URL", "http://cdn.env.test"),
        ("APP__LOG_FILTER", "client_core=debug"),
    ]);
    let overrides =
        SettingsOverrides::from_env_with(|key| vars.get(key).map(|value| value.to_string()));
    assert_eq!(overrides.api_origin.as_deref(), Some("http://env.test"));
    assert_eq!(overrides.api_url, None);
    assert_eq!(overrides.cdn_url.as_deref(), Some("http://cdn.env.test"));
    assert_eq!(overrides.log_filter.as_deref(), Some("client_core=debug"));
}

#[test]
fn prefixed_origin_is_used_without_plain_key() {
    let overrides = SettingsOverrides::from_env_with(|key| {
        (key == "APP__API_ORIGIN").then(|| "http://prefixed.test".to_string())
    });
    assert_eq!(overrides.api_origin.as_deref(), Some("http://prefixed.test"));
}

#[test]
fn rejects_malformed_url() {
    let err = Settings::resolve(SettingsOverrides {
        api_url: Some("not a url".into()),
        ..Default::default()
    })
    .expect_err("malformed url");
    assert!(err.to_string().contains("api_url"));
}

#[test]
fn rejects_non_http_scheme() {
    let err = Settings::resolve(SettingsOverrides {
        cdn_url: Some("ftp://cdn.test".into()),
        ..Default::default()
    })
    .expect_err("ftp scheme");
    assert!(err.to_string().contains("http or https"));
}

#[test]
fn parses_toml_layer() {
    let overrides = SettingsOverrides::from_toml(
        r#"
api_origin = "http://toml.test"
log_filter = "debug"
"#,
    )
    .expect("parse");
    assert_eq!(overrides.api_origin.as_deref(), Some("http://toml.test"));
    assert_eq!(overrides.log_filter.as_deref(), Some("debug"));
    assert_eq!(overrides.cdn_url, None);
}

#[test]
fn unknown_toml_key_is_an_error() {
    assert!(SettingsOverrides::from_toml("api_host = \"x\"").is_err());
}

#[test]
fn missing_file_yields_no_overrides() {
    let path = temp_dir("missing").join("storefront.toml");
    let overrides = SettingsOverrides::from_file(&path).expect("missing file is fine");
    assert_eq!(overrides, SettingsOverrides::default());
}

#[test]
fn reads_overrides_from_file() {
    let root = temp_dir("file");
    fs::create_dir_all(&root).expect("create temp dir");
    let path = root.join("storefront.toml");
    fs::write(&path, "cdn_url = \"http://cdn.file.test\"\n").expect("write config");

    let overrides = SettingsOverrides::from_file(&path).expect("load");
    assert_eq!(overrides.cdn_url.as_deref(), Some("http://cdn.file.test"));

    fs::remove_dir_all(root).expect("cleanup");
}
