use clap::{Parser, crate_version};
use greenbutton_tariffs::{
    cli::{Args, Command, report},
    prelude::*,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Report(args) => report(&args)?,
    }

    info!("done");
    Ok(())
}
