//! Sign-in and configuration commands.

use crate::config::Config;
use crate::context::AppContext;
use crate::preview::list_output_devices;
use crate::session::{PasswordStrength, RegistrationForm};

/// Sign in and store the session
pub fn cmd_login(
    ctx: &mut AppContext,
    email: &str,
    password: &str,
    remember: bool,
) -> anyhow::Result<()> {
    ctx.login(email, password, remember)?;
    match &ctx.session.email {
        Some(email) => println!("Signed in as {email}"),
        None => println!("Signed in"),
    }
    Ok(())
}

pub fn cmd_logout(ctx: &mut AppContext) -> anyhow::Result<()> {
    ctx.logout()?;
    println!("Signed out");
    Ok(())
}

pub fn cmd_whoami(ctx: &AppContext) -> anyhow::Result<()> {
    let session = &ctx.session;
    if !session.authenticated {
        println!("Not signed in");
        return Ok(());
    }

    println!("Signed in as {}", session.email.as_deref().unwrap_or("(email not remembered)"));
    if let Some(at) = &session.logged_in_at {
        println!("Since {at}");
    }
    Ok(())
}

/// Validate a sign-up form
pub fn cmd_register(
    ctx: &AppContext,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
    agree_to_terms: bool,
) -> anyhow::Result<()> {
    let strength = PasswordStrength::of(password);
    if strength != PasswordStrength::Empty {
        println!("Password strength: {}", strength.label());
    }

    let form = RegistrationForm {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        confirm_password: confirm_password.to_string(),
        agree_to_terms,
    };
    ctx.register(&form)?;
    println!("Registration details accepted for {}", form.email.trim());
    Ok(())
}

/// Print config location and effective settings
pub fn cmd_config(ctx: &mut AppContext, reset: bool) -> anyhow::Result<()> {
    match ctx.config_path() {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (no config directory on this system)"),
    }

    if reset {
        ctx.config = Config::default();
        println!("Settings reset to defaults");
    }

    println!();
    print!("{}", toml::to_string_pretty(&ctx.config)?);

    let devices = list_output_devices();
    if !devices.is_empty() {
        println!();
        println!("Output devices:");
        for name in devices {
            println!("  {name}");
        }
    }
    Ok(())
}
