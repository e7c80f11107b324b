#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;
mod logger;

#[derive(Parser)]
#[command(name = "reshape", about = "Assign loosely shaped data into declared schemas")]
struct Cli {
	/// Log engine activity to stderr; repeat for more detail.
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	verbose: u8,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Populate a schema's root value from a source document.
	Assign(cmd::assign::Args),
	/// Convert one input into a built-in type.
	Coerce(cmd::coerce::Args),
	/// Show how field names split into words.
	Names(cmd::names::Args),
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> reshape::conv::Result<()> {
	let cli = Cli::parse();
	logger::init(cli.verbose);

	match cli.command {
		Commands::Assign(args) => cmd::assign::run(args),
		Commands::Coerce(args) => cmd::coerce::run(args),
		Commands::Names(args) => cmd::names::run(args),
	}
}
