//! Configuration command handlers.
//!
//! These run before any backend connection exists, so they only touch the
//! config file and the system keyring.

use dialoguer::{Confirm, Input, Password};

use fitgarden_config::{
    Config, Profile, config_path, load_config_or_default, save_config, store_token,
};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::active_profile_name;
use crate::error::CliError;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),
        ConfigCommand::Show => show(global),
        ConfigCommand::SetToken { profile } => set_token(global, profile),
        ConfigCommand::Path => {
            println!("{}", config_path().display());
            Ok(())
        }
    }
}

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = load_config_or_default();

    let profile_name: String = Input::new()
        .with_prompt("Nome do perfil")
        .default(active_profile_name(global, &cfg))
        .interact_text()
        .map_err(dialoguer_io)?;

    let backend: String = Input::new()
        .with_prompt("URL do backend")
        .default(
            cfg.profiles
                .get(&profile_name)
                .map(|p| p.backend.clone())
                .unwrap_or_else(|| "https://api.fitgarden.com.br".into()),
        )
        .interact_text()
        .map_err(dialoguer_io)?;

    // Sanity-check the URL before persisting anything.
    let _: url::Url = backend.parse().map_err(|_| CliError::Validation {
        message: format!("URL de backend inválida: {backend}"),
    })?;

    let profile = cfg.profiles.entry(profile_name.clone()).or_insert_with(|| Profile {
        backend: backend.clone(),
        ..Profile::default()
    });
    profile.backend = backend;

    if cfg.default_profile.is_none() {
        cfg.default_profile = Some(profile_name.clone());
    } else if cfg.default_profile.as_deref() != Some(&profile_name) {
        let make_default = Confirm::new()
            .with_prompt(format!("Tornar '{profile_name}' o perfil padrão?"))
            .default(false)
            .interact()
            .map_err(dialoguer_io)?;
        if make_default {
            cfg.default_profile = Some(profile_name.clone());
        }
    }

    save_config(&cfg)?;
    if !global.quiet {
        eprintln!("Perfil '{profile_name}' salvo em {}", config_path().display());
    }

    let store = Confirm::new()
        .with_prompt("Guardar um token de acesso no chaveiro do sistema agora?")
        .default(true)
        .interact()
        .map_err(dialoguer_io)?;
    if store {
        prompt_and_store_token(&profile_name, global)?;
    }

    Ok(())
}

fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = load_config_or_default();
    let active = active_profile_name(global, &cfg);

    println!("Arquivo:        {}", config_path().display());
    println!(
        "Perfil padrão:  {}",
        cfg.default_profile.as_deref().unwrap_or("-")
    );
    println!("Perfil ativo:   {active}");
    println!();

    if cfg.profiles.is_empty() {
        println!("(nenhum perfil configurado — use: fitgarden config init)");
        return Ok(());
    }

    let mut names: Vec<&String> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let profile = &cfg.profiles[name];
        println!("[{name}]");
        println!("  backend  = {}", profile.backend);
        if profile.token.is_some() {
            // Never echo stored secrets.
            println!("  token    = ********");
        }
        if let Some(ref env) = profile.token_env {
            println!("  token via ${env}");
        }
        if let Some(insecure) = profile.insecure {
            println!("  insecure = {insecure}");
        }
        if let Some(timeout) = profile.timeout {
            println!("  timeout  = {timeout}s");
        }
    }

    Ok(())
}

fn set_token(global: &GlobalOpts, profile: Option<String>) -> Result<(), CliError> {
    let cfg = load_config_or_default();
    let profile_name = profile.unwrap_or_else(|| active_profile_name(global, &cfg));

    if !cfg.profiles.contains_key(&profile_name) {
        let mut available: Vec<&String> = cfg.profiles.keys().collect();
        available.sort();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available
                .into_iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        });
    }

    prompt_and_store_token(&profile_name, global)
}

fn prompt_and_store_token(profile_name: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let token: String = Password::new()
        .with_prompt(format!("Token de acesso para '{profile_name}'"))
        .interact()
        .map_err(dialoguer_io)?;

    store_token(profile_name, &token)?;
    if !global.quiet {
        eprintln!("Token guardado no chaveiro do sistema");
    }
    Ok(())
}

fn dialoguer_io(err: dialoguer::Error) -> CliError {
    CliError::Io(std::io::Error::other(err))
}
