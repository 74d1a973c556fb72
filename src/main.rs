extern crate pretty_env_logger;

#[macro_use]
extern crate log;

use clap::Parser;

mod klib;

use klib::{par_main, seq_main, Cli, Commands, KernelParams};

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Seq(args) => {
            setup_logging(args.debug());
            info!("starting");
            info!("params: {:#?}", args);
            if !args.validate() {
                error!("please fix arguments");
                std::process::exit(1);
            }
            seq_main(args);
        }
        Commands::Par(args) => {
            setup_logging(args.debug());
            info!("starting");
            info!("params: {:#?}", args);
            if !args.validate() {
                error!("please fix arguments");
                std::process::exit(1);
            }
            par_main(args);
        }
    }
    info!("finished");
}

fn setup_logging(debug: bool) {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    pretty_env_logger::formatted_timed_builder()
        .filter_level(level)
        .init();
}
