use clap::Parser;

use biolinker::cli::{Cli, Commands};
use biolinker::config::{DEFAULT_CONFIG_PATH, get_config, init_config_from};
use biolinker::runtime::modes;
use biolinker::system::logging::init_logging;
use biolinker::system::panic_handler::{RunMode, install_panic_hook};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config_from(cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH));

    match cli.command {
        None | Some(Commands::Serve) => {
            install_panic_hook(RunMode::Server);
            // guard 必须存活到进程结束，否则文件日志会丢失
            let _log_guard = init_logging(&get_config())?;
            modes::run_server().await
        }
        Some(cmd) => {
            install_panic_hook(RunMode::Cli);
            if let Err(e) = modes::run_cli(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
