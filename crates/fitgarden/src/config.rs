//! CLI-side configuration: profile selection plus flag overrides.
//!
//! The shared layer (`fitgarden-config`) owns file loading and the token
//! chain; this module layers `GlobalOpts` on top so any flag can override
//! any profile field.

use std::time::Duration;

use secrecy::SecretString;

use fitgarden_config::{Config, Profile, profile_to_backend_config, resolve_token};
use fitgarden_core::{BackendConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use fitgarden_config::{config_path, load_config_or_default};

/// The profile name selected by flags, env, or the config default.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Resolve a profile into a `BackendConfig`, applying CLI flag overrides.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<BackendConfig, CliError> {
    let mut config = profile_to_backend_config(profile, profile_name)?;

    if let Some(ref backend) = global.backend {
        config.url = backend.parse().map_err(|_| CliError::Validation {
            message: format!("URL de backend inválida: {backend}"),
        })?;
    }

    if let Some(ref token) = global.token {
        config.token = Some(SecretString::from(token.clone()));
    } else if config.token.is_none() {
        // Flags may have been skipped but the chain can still resolve one.
        config.token = resolve_token(profile, profile_name).ok();
    }

    if global.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }

    config.timeout = Duration::from_secs(global.timeout);

    Ok(config)
}

/// Build a `BackendConfig` from the config file, profile, and CLI flags.
pub fn build_backend_config(global: &GlobalOpts) -> Result<BackendConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, global);
    }

    // No profile found — try to build from flags / env vars alone.
    let backend = global.backend.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;

    let url: url::Url = backend.parse().map_err(|_| CliError::Validation {
        message: format!("URL de backend inválida: {backend}"),
    })?;

    let tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(BackendConfig {
        url,
        token: global.token.clone().map(SecretString::from),
        tls,
        timeout: Duration::from_secs(global.timeout),
    })
}
