#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "onisave", about = "Oxygen Not Included save inspection tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	Info(cmd::info::Args),
	Templates(cmd::templates::Args),
	Groups(cmd::groups::Args),
	Dump(cmd::dump::Args),
	Roundtrip(cmd::roundtrip::Args),
}

fn main() {
	init_tracing();
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn init_tracing() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(std::io::stderr)
		.compact()
		.init();
}

fn run() -> onisave::save::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Templates(args) => cmd::templates::run(args),
		Commands::Groups(args) => cmd::groups::run(args),
		Commands::Dump(args) => cmd::dump::run(args),
		Commands::Roundtrip(args) => cmd::roundtrip::run(args),
	}
}
