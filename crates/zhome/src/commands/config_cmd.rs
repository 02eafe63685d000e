//! Config command handlers: guided setup, inspection, profile switching.

use dialoguer::{Input, Select};
use zhome_core::SlugMode;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::{self, prompt_err};

fn format_config(cfg: &Config) -> String {
    let mut lines = vec![
        format!(
            "Default profile: {}",
            cfg.default_profile.as_deref().unwrap_or("-")
        ),
        format!("Output:          {}", cfg.defaults.output),
        format!("Color:           {}", cfg.defaults.color),
        format!("Timeout:         {}s", cfg.defaults.timeout),
    ];

    let mut names: Vec<&String> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let Some(p) = cfg.profiles.get(name) else {
            continue;
        };
        lines.push(String::new());
        lines.push(format!("[{name}]"));
        lines.push(format!("  Server:       {}", p.server));
        lines.push(format!("  Device poll:  {}", poll_label(p.device_poll_secs)));
        lines.push(format!("  Log poll:     {}", poll_label(p.log_poll_secs)));
        lines.push(format!("  Slug mode:    {}", p.slug_mode));
        if let Some(t) = p.timeout {
            lines.push(format!("  Timeout:      {t}s"));
        }
    }
    lines.join("\n")
}

fn poll_label(secs: u64) -> String {
    if secs == 0 {
        "off".into()
    } else {
        format!("{secs}s")
    }
}

fn prompt_secs(prompt: &str, default: u64) -> Result<u64, CliError> {
    Input::new()
        .with_prompt(prompt)
        .default(default)
        .interact_text()
        .map_err(prompt_err)
}

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("zhome configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let mut cfg = config::load_config()?;

    // 1. Profile name
    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    if cfg.profiles.contains_key(&profile_name)
        && !util::confirm(
            &format!("Profile '{profile_name}' exists. Overwrite?"),
            global.yes,
        )?
    {
        return Ok(());
    }

    // 2. Backend URL
    let server: String = Input::new()
        .with_prompt("Backend URL")
        .default("http://homeserver.local:5000".into())
        .validate_with(|s: &String| zhome_config::parse_server(s).map(|_| ()))
        .interact_text()
        .map_err(prompt_err)?;

    // 3. Polling
    let mut profile = Profile::new(server);
    profile.device_poll_secs = prompt_secs(
        "Device poll interval in seconds (0 = off)",
        profile.device_poll_secs,
    )?;
    profile.log_poll_secs =
        prompt_secs("Log poll interval in seconds (0 = off)", profile.log_poll_secs)?;

    // 4. Slug mode
    let modes = [SlugMode::FirstSpace, SlugMode::AllSpaces];
    let choices = [
        "Replace the first space in names (matches existing devices)",
        "Replace every space in names",
    ];
    let picked = Select::new()
        .with_prompt("Topic naming")
        .items(&choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    profile.slug_mode = modes.get(picked).copied().unwrap_or_default();

    // 5. Write config
    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());
    config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", config_path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: zhome devices list");
    Ok(())
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, format_config, |c| {
                c.default_profile.clone().unwrap_or_default()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_lists_profiles_sorted() {
        let mut cfg = Config::default();
        cfg.profiles
            .insert("lab".into(), Profile::new("http://10.0.0.8:5000"));
        let mut home = Profile::new("http://homeserver.local:5000");
        home.log_poll_secs = 0;
        cfg.profiles.insert("home".into(), home);

        let text = format_config(&cfg);
        let home_at = text.find("[home]").unwrap_or(usize::MAX);
        let lab_at = text.find("[lab]").unwrap_or(usize::MAX);
        assert!(home_at < lab_at);
        assert!(text.contains("Log poll:     off"));
        assert!(text.contains("Slug mode:    first-space"));
    }
}
