use clap::Parser;
use log::*;

use edgeship::{Result, cli, command};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("edgeship")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = cli::Args::parse();

    initialize_logger(cli_args.debug)?;

    if let Err(err) = command::execute(&cli_args).await {
        error!("{err}");
        if let Some(hint) = err.hint() {
            eprintln!("{hint}");
        }
        std::process::exit(err.exit_code());
    }

    Ok(())
}
