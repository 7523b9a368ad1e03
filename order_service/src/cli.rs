use std::{env, env::VarError};

/// The service takes no arguments. If any are given, print the help and the current configuration instead.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
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
    const DISPLAY_ENVS: [&str; 15] = [
        "RUST_LOG",
        "ORDERS_HOST",
        "ORDERS_PORT",
        "ORDERS_DATABASE_URL",
        "ORDERS_DATABASE_MAX_CONNECTIONS",
        "ORDERS_NATS_URL",
        "ORDERS_NATS_CLIENT_ID",
        "ORDERS_NATS_STREAM",
        "ORDERS_NATS_SUBJECT",
        "ORDERS_NATS_QUEUE_GROUP",
        "ORDERS_NATS_DURABLE_NAME",
        "ORDERS_NATS_ACK_WAIT",
        "ORDERS_NATS_MAX_IN_FLIGHT",
        "ORDERS_NATS_MAX_DELIVER",
        "ORDERS_SHUTDOWN_TIMEOUT",
    ];

    println!("Current environment values:");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
