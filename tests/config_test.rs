use reslens::config::*;
use tempfile::TempDir;

#[test]
fn test_default_config_uses_getres_and_dash() {
    let config = ResLensConfig::default();
    assert_eq!(config.token_ident, "getRes");
    assert_eq!(config.path_delimiter, "-");
    assert_eq!(
        config.source,
        SourceConfig::JsonFile {
            path: "resources.json".to_string()
        }
    );
}

#[test]
fn test_save_and_load_config() {
    let dir = TempDir::new().unwrap();
    let config = ResLensConfig {
        source: SourceConfig::Sqlite {
            path: "data/res.db".to_string(),
            table: "res".to_string(),
        },
        path_delimiter: "/".to_string(),
        ..ResLensConfig::default()
    };
    save_config(dir.path(), &config).unwrap();
    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(config, loaded);
}

#[test]
fn test_missing_config_loads_defaults() {
    let dir = TempDir::new().unwrap();
    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(loaded, ResLensConfig::default());
}

#[test]
fn test_partial_config_fills_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(get_reslens_dir(dir.path())).unwrap();
    std::fs::write(
        get_config_path(dir.path()),
        r#"{"source": {"kind": "sqlite", "path": "r.db"}}"#,
    )
    .unwrap();

    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(
        loaded.source,
        SourceConfig::Sqlite {
            path: "r.db".to_string(),
            table: "resources".to_string()
        }
    );
    assert_eq!(loaded.token_ident, "getRes");
}

#[test]
fn test_invalid_token_ident_rejected() {
    let dir = TempDir::new().unwrap();
    let config = ResLensConfig {
        token_ident: String::new(),
        ..ResLensConfig::default()
    };
    assert!(save_config(dir.path(), &config).is_err());

    let config = ResLensConfig {
        token_ident: "get Res".to_string(),
        ..ResLensConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_unparseable_config_is_config_error() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(get_reslens_dir(dir.path())).unwrap();
    std::fs::write(get_config_path(dir.path()), "{not json").unwrap();

    let err = load_config(dir.path()).unwrap_err();
    assert!(err.to_string().starts_with("config error"));
}

#[test]
fn test_reslens_dir_and_source_path() {
    let dir = TempDir::new().unwrap();
    assert!(get_reslens_dir(dir.path()).ends_with(".reslens"));
    assert_eq!(
        resolve_source_path(dir.path(), "resources.json"),
        dir.path().join("resources.json")
    );
    let absolute = dir.path().join("abs.json");
    let absolute_str = absolute.to_string_lossy().to_string();
    assert_eq!(resolve_source_path(dir.path(), &absolute_str), absolute);
}
