use rental_gateway::{
    AppConfig,
    config::{Env, IdentitySource},
};
use serial_test::serial;
use std::{env, panic, time::Duration};

const CONFIG_VARS: [&str; 8] = [
    "APP_ENV",
    "API_BASE_URL",
    "JWT_SECRET",
    "IDENTITY_SOURCE",
    "SESSION_COOKIE",
    "BIND_ADDR",
    "ROUTE_TABLE_PATH",
    "API_TIMEOUT_SECS",
];

// --- Setup/Teardown Utilities ---

/// Utility to run a test function with a clean slate and restore environment variables afterward
fn run_with_env<T, R>(test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    // Save current environment variables
    let originals: Vec<(&str, Option<String>)> = CONFIG_VARS
        .iter()
        .map(|&var| (var, env::var(var).ok()))
        .collect();

    unsafe {
        for var in CONFIG_VARS {
            env::remove_var(var);
        }
    }

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals.into_iter().rev() {
        unsafe {
            if let Some(val) = original_value {
                env::set_var(key, val);
            } else {
                env::remove_var(key);
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_app_config_production_fail_fast_without_secret() {
    let result = run_with_env(|| {
        panic::catch_unwind(|| {
            unsafe {
                env::set_var("APP_ENV", "production");
                env::set_var("API_BASE_URL", "https://api.example.com/api/v1");
            }
            // JWT_SECRET is missing
            AppConfig::load()
        })
    });

    assert!(
        result.is_err(),
        "Production config loading should panic on a missing JWT secret"
    );
}

#[test]
#[serial]
fn test_app_config_production_fail_fast_without_api_url() {
    let result = run_with_env(|| {
        panic::catch_unwind(|| {
            unsafe {
                env::set_var("APP_ENV", "production");
                env::set_var("JWT_SECRET", "prod-secret");
            }
            AppConfig::load()
        })
    });

    assert!(result.is_err());
}

#[test]
#[serial]
fn test_app_config_local_env_defaults() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "local");
        }
        AppConfig::load()
    });

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.api_base_url, "http://localhost:5000/api/v1");
    assert_eq!(config.jwt_secret, "local-development-jwt-secret");
    assert_eq!(config.identity_source, IdentitySource::Jwt);
    assert_eq!(config.session_cookie, "accessToken");
    assert_eq!(config.bind_addr, "0.0.0.0:3000");
    assert!(config.route_table_path.is_none());
    assert_eq!(config.api_timeout, Duration::from_secs(10));
}

#[test]
#[serial]
fn test_app_config_production_reads_everything() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "production");
            env::set_var("JWT_SECRET", "prod-secret");
            env::set_var("API_BASE_URL", "https://api.example.com/api/v1/");
            env::set_var("IDENTITY_SOURCE", "remote");
            env::set_var("SESSION_COOKIE", "sid");
            env::set_var("ROUTE_TABLE_PATH", "/etc/gateway/routes.json");
            env::set_var("API_TIMEOUT_SECS", "3");
        }
        AppConfig::load()
    });

    assert_eq!(config.env, Env::Production);
    assert_eq!(config.jwt_secret, "prod-secret");
    // Trailing slash is trimmed so paths can be appended directly.
    assert_eq!(config.api_base_url, "https://api.example.com/api/v1");
    assert_eq!(config.identity_source, IdentitySource::Remote);
    assert_eq!(config.session_cookie, "sid");
    assert_eq!(
        config.route_table_path.as_deref(),
        Some(std::path::Path::new("/etc/gateway/routes.json"))
    );
    assert_eq!(config.api_timeout, Duration::from_secs(3));
}

#[test]
#[serial]
fn test_app_config_rejects_unknown_identity_source() {
    let result = run_with_env(|| {
        panic::catch_unwind(|| {
            unsafe {
                env::set_var("IDENTITY_SOURCE", "ldap");
            }
            AppConfig::load()
        })
    });

    assert!(result.is_err());
}

#[test]
#[serial]
fn test_app_config_rejects_bad_timeout() {
    let result = run_with_env(|| {
        panic::catch_unwind(|| {
            unsafe {
                env::set_var("API_TIMEOUT_SECS", "soon");
            }
            AppConfig::load()
        })
    });

    assert!(result.is_err());
}
