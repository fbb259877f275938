use clap::Parser;
use env_logger::Env;
use std::error::Error;
use std::process;

mod args;
mod survey;

fn main() {
    let args = args::Args::parse();
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();
    log::debug!("args: {:?}", args);

    if let Err(e) = survey::run_survey(&args) {
        eprintln!("Error: {}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        process::exit(1);
    }
}
