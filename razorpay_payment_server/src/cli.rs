use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets
    const DISPLAY_ENVS: [&str; 14] = [
        "RUST_LOG",
        "RPG_HOST",
        "RPG_PORT",
        "RPG_RAZORPAY_API_URL",
        "RPG_RAZORPAY_KEY_ID",
        "RPG_WEBHOOK_HMAC_CHECKS",
        "RPG_CURRENCY",
        "RPG_RECEIPT_PREFIX",
        "RPG_CORS_ORIGIN",
        "RPG_MAIL_RELAY_URL",
        "RPG_MAIL_FROM",
        "RPG_OWNER_EMAIL",
        "RPG_STALE_ORDER_REPORT_INTERVAL",
        "RPG_STALE_ORDER_AGE",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
