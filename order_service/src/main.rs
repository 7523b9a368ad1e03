use dotenvy::dotenv;
use log::info;
use order_service::{cli::handle_command_line_args, config::ServiceConfig, server::run_service};

#[actix_web::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    if handle_command_line_args() {
        return;
    }
    let config = ServiceConfig::from_env_or_default();

    info!("🚀️ Starting order service on {}:{}", config.host, config.port);
    match run_service(config).await {
        Ok(_) => println!("Bye!"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        },
    }
}
