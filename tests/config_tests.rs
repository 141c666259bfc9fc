use std::env;

use overtime_hub::config::Config;
use pretty_assertions::assert_eq;
use serial_test::serial;

mod common;

const KEYS: [&str; 7] = [
    "DATABASE_URL",
    "DATABASE_MAX_CONNECTIONS",
    "JWT_SECRET",
    "HOST",
    "PORT",
    "ENVIRONMENT",
    "CLIENT_BASE_URL",
];

/// Runs `f` with the given variables set and every other config key unset,
/// restoring the original environment afterwards.
fn with_env(vars: &[(&str, &str)], f: impl FnOnce()) {
    let original: Vec<(&str, Option<String>)> = KEYS.iter().map(|k| (*k, env::var(k).ok())).collect();

    unsafe {
        for key in KEYS {
            env::remove_var(key);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
    }

    f();

    unsafe {
        for (key, value) in original {
            match value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

#[test]
#[serial]
fn test_config_from_env_with_defaults() {
    common::setup_test_env();

    with_env(&[], || {
        let config = Config::from_env_only().unwrap();

        assert_eq!(config.database_url, "postgres://@localhost:5432/overtime_hub");
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, "development");
        assert_eq!(config.client_base_url, "http://localhost:3000");
        assert!(!config.uses_memory_store());
    });
}

#[test]
#[serial]
fn test_config_from_env_with_custom_values() {
    with_env(
        &[
            ("DATABASE_URL", "memory://local"),
            ("DATABASE_MAX_CONNECTIONS", "3"),
            ("JWT_SECRET", "test-secret"),
            ("HOST", "0.0.0.0"),
            ("PORT", "3000"),
            ("ENVIRONMENT", "production"),
            ("CLIENT_BASE_URL", "https://overtime.example.com"),
        ],
        || {
            let config = Config::from_env_only().unwrap();

            assert_eq!(config.database_url, "memory://local");
            assert_eq!(config.database_max_connections, 3);
            assert_eq!(config.jwt_secret, "test-secret");
            assert_eq!(config.server_address(), "0.0.0.0:3000");
            assert_eq!(config.client_base_url, "https://overtime.example.com");
            assert!(config.is_production());
            assert!(!config.is_development());
            assert!(config.uses_memory_store());
        },
    );
}

#[test]
#[serial]
fn test_config_invalid_numbers_fall_back() {
    with_env(
        &[("PORT", "invalid_port"), ("DATABASE_MAX_CONNECTIONS", "many")],
        || {
            let config = Config::from_env_only().unwrap();

            assert_eq!(config.port, 8080);
            assert_eq!(config.database_max_connections, 10);
        },
    );
}
