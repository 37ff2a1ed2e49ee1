use clap::Parser;
use miette::Result;
use gbasset::cli::{Cli, Commands};
use gbasset::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new().with_verbose(cli.verbose);

    match cli.command {
        Commands::Convert(args) => {
            gbasset::cli::convert::run(args, &printer)?;
        }
        Commands::Palette(args) => {
            gbasset::cli::palette::run(args, &printer)?;
        }
        Commands::Completions(args) => gbasset::cli::completions::run(args)?,
    }

    Ok(())
}
