mod args;
mod tideman;

use clap::Parser;
use log::{debug, error};

use crate::args::Args;

fn main() {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    debug!("args: {:?}", args);

    if let Err(e) = tideman::run_cli(&args) {
        error!("Error occured {:?}", e);
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}
