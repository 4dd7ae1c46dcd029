mod args;
mod ballot;

use clap::Parser;
use log::info;
use snafu::ErrorCompat;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    info!("args: {:?}", args);

    let res = ballot::run_session(
        args.config.clone(),
        args.commands.clone(),
        args.mode.clone(),
        args.out.clone(),
        args.reference.clone(),
    );

    if let Err(e) = res {
        eprintln!("An error occured: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("{}", bt);
        }
        std::process::exit(1);
    }
}
