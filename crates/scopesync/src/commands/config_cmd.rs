//! Config command handlers: guided profile setup, inspection, selection,
//! and keyring-backed token storage.

use dialoguer::{Input, Password, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Profile};
use crate::error::CliError;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),
        ConfigCommand::Show => show(),
        ConfigCommand::Profiles => profiles(),
        ConfigCommand::Use { name } => use_profile(name),
        ConfigCommand::SetToken { profile } => set_token(profile, global),
    }
}

// ── Handlers ────────────────────────────────────────────────────────

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();

    let name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".to_string())
        .interact_text()
        .map_err(io_err)?;

    let controller: String = Input::new()
        .with_prompt("Controller URL")
        .interact_text()
        .map_err(io_err)?;

    let auth_modes = ["auth token", "email + password login"];
    let mode = Select::new()
        .with_prompt("Authentication")
        .items(&auth_modes)
        .default(0)
        .interact()
        .map_err(io_err)?;

    let mut profile = Profile {
        controller,
        auth_token: None,
        auth_token_env: None,
        email: None,
        password: None,
        ca_cert: None,
        insecure: global.insecure.then_some(true),
    };

    if mode == 0 {
        let token = Password::new()
            .with_prompt("Auth token")
            .interact()
            .map_err(io_err)?;
        match keyring::Entry::new("scopesync", &format!("{name}/auth-token"))
            .and_then(|entry| entry.set_password(&token))
        {
            Ok(()) => eprintln!("Token stored in the system keyring"),
            Err(e) => {
                eprintln!("Keyring unavailable ({e}); storing the token in the config file");
                profile.auth_token = Some(token);
            }
        }
    } else {
        let email: String = Input::new()
            .with_prompt("Login email")
            .interact_text()
            .map_err(io_err)?;
        profile.email = Some(email);
        eprintln!("Password will be read from SCOPESYNC_PASSWORD, the keyring, or the profile");
    }

    cfg.profiles.insert(name.clone(), profile);
    if cfg
        .default_profile
        .as_deref()
        .is_none_or(|d| !cfg.profiles.contains_key(d))
    {
        cfg.default_profile = Some(name.clone());
    }
    config::save_config(&cfg)?;

    eprintln!(
        "Profile '{name}' written to {}",
        config::config_path().display()
    );
    Ok(())
}

fn show() -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    println!("{}", toml::to_string_pretty(&cfg)?);
    Ok(())
}

fn profiles() -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let default = cfg.default_profile.as_deref().unwrap_or("");

    let mut names: Vec<&String> = cfg.profiles.keys().collect();
    names.sort_unstable();

    for name in names {
        let marker = if name == default { "*" } else { " " };
        let controller = &cfg.profiles[name].controller;
        println!("{marker} {name}  {controller}");
    }
    Ok(())
}

fn use_profile(name: String) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();

    if !cfg.profiles.contains_key(&name) {
        let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
        available.sort_unstable();
        return Err(CliError::ProfileNotFound {
            name,
            available: available.join(", "),
        });
    }

    cfg.default_profile = Some(name.clone());
    config::save_config(&cfg)?;
    eprintln!("Default profile set to '{name}'");
    Ok(())
}

fn set_token(profile_flag: Option<String>, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let name = profile_flag.unwrap_or_else(|| config::active_profile_name(global, &cfg));

    let token = Password::new()
        .with_prompt(format!("Auth token for profile '{name}'"))
        .interact()
        .map_err(io_err)?;

    keyring::Entry::new("scopesync", &format!("{name}/auth-token"))
        .and_then(|entry| entry.set_password(&token))
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;

    eprintln!("Token stored in the system keyring for profile '{name}'");
    Ok(())
}

fn io_err(e: dialoguer::Error) -> CliError {
    CliError::Io(std::io::Error::other(e))
}
