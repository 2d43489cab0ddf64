use log::{error, info};
use timetable_solver::config::Config;
use timetable_solver::server;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::var("TIMETABLE_CONFIG") {
        Ok(path) => match Config::load(&path) {
            Ok(config) => {
                info!("Loaded configuration from {}", path);
                config
            }
            Err(e) => {
                error!("Could not load configuration from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        Err(_) => Config::default(),
    };

    if let Err(e) = server::run_server(config).await {
        error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}
