use clap::Parser;
use miette::Result;
use pixel_transfer::cli::{self, Cli, Commands};
use pixel_transfer::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse_from(cli::normalize_args(std::env::args_os()));
    let printer = Printer::new();

    match cli.command {
        Some(Commands::Colours(args)) => cli::colours::run(args, &printer)?,
        Some(Commands::Completions(args)) => cli::completions::run(args)?,
        None => cli::transfer::run(cli.transfer, &printer)?,
    }

    Ok(())
}
