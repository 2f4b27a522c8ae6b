use super::*;
use figment::Jail;

fn production() -> Settings {
    Settings {
        environment: Environment::Production,
        token_secret: Some("x".repeat(MIN_SECRET_LENGTH)),
        cookie_secure: true,
        ..Settings::default()
    }
}

#[test]
fn test_defaults_validate() {
    let settings = Settings::default();
    assert!(settings.validate().is_ok());
    assert_eq!(settings.port, 4000);
    assert_eq!(settings.session_ttl_secs, 604_800);
    assert_eq!(settings.cookie_name, "token");
    assert_eq!(settings.bind_addr().to_string(), "127.0.0.1:4000");
}

#[test]
fn test_settings_validation() {
    let mut invalid = Settings::default();
    invalid.log_level = "loud".to_string();
    assert!(invalid.validate().is_err());

    let mut invalid = Settings::default();
    invalid.session_ttl_secs = 0;
    assert!(invalid.validate().is_err());

    let mut invalid = Settings::default();
    invalid.password_cost = 4;
    assert!(invalid.validate().is_err());

    let mut invalid = Settings::default();
    invalid.database_url = " ".to_string();
    assert!(invalid.validate().is_err());
}

#[test]
fn test_production_requires_real_secret() {
    assert!(production().validate().is_ok());

    let mut settings = production();
    settings.token_secret = None;
    assert!(settings.validate().is_err());

    let mut settings = production();
    settings.token_secret = Some("dev_secret".to_string());
    assert!(settings.validate().is_err());

    let mut settings = production();
    settings.token_secret = Some("short".to_string());
    assert!(settings.validate().is_err());
}

#[test]
fn test_production_requires_secure_cookie() {
    let mut settings = production();
    settings.cookie_secure = false;
    assert!(settings.validate().is_err());
}

#[test]
fn test_resolve_secret() {
    let mut settings = Settings::default();
    settings.token_secret = Some("configured".to_string());
    assert_eq!(settings.resolve_secret().unwrap(), "configured");

    settings.token_secret = None;
    let first = settings.resolve_secret().unwrap();
    let second = settings.resolve_secret().unwrap();
    assert!(first.len() >= MIN_SECRET_LENGTH);
    // 32 random bytes, base64url without padding
    assert_eq!(first.len(), 43);
    assert_ne!(first, second);

    settings.environment = Environment::Production;
    assert!(settings.resolve_secret().is_err());
}

#[test]
fn test_load_settings() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "custom.toml",
            r#"
            port = 8080
            database_url = "file://data"
            log_level = "debug"
            session_ttl_secs = 3600
            "#,
        )?;
        jail.set_env("AUTHGATE_LOG_LEVEL", "warn");
        jail.set_env("AUTHGATE_TOKEN_SECRET", "from-env");

        let settings = Settings::load_from("custom.toml").map_err(|e| e.to_string())?;
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.database_url, "file://data");
        assert_eq!(settings.session_ttl_secs, 3600);
        // Environment variables take precedence over the file
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.token_secret.as_deref(), Some("from-env"));
        // Untouched keys keep their defaults
        assert_eq!(settings.cookie_name, "token");
        Ok(())
    });
}

#[test]
fn test_load_without_file_uses_defaults() {
    Jail::expect_with(|jail| {
        jail.set_env("AUTHGATE_ENVIRONMENT", "production");
        jail.set_env("AUTHGATE_COOKIE_SECURE", "true");

        // Production without a secret is rejected at load time
        assert!(Settings::load().is_err());

        jail.set_env("AUTHGATE_TOKEN_SECRET", "s".repeat(MIN_SECRET_LENGTH));
        let settings = Settings::load().map_err(|e| e.to_string())?;
        assert!(settings.is_production());
        assert!(settings.cookie_secure);
        Ok(())
    });
}
