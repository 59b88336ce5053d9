use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fixkit_gen::{
    C_DIR_FIXTURES_DEFAULT, SpecFixtureOptions, create_fixture_directory, generate_all,
    inspect_fixture_directory,
};
use tracing_subscriber::EnvFilter;

/// Generate formatted xlsx fixtures for spreadsheet import tests.
#[derive(Parser, Debug)]
#[command(name = "fixkit", author, version, about, long_about = None)]
struct Cli {
    /// Output directory for the fixture files
    #[arg(long, default_value = C_DIR_FIXTURES_DEFAULT)]
    dir_out: PathBuf,

    /// Read every fixture back and print a per-file summary
    #[arg(long)]
    inspect: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let options = SpecFixtureOptions {
        path_dir_out: cli.dir_out,
    };
    let c_dir_out = options.path_dir_out.display();

    create_fixture_directory(&options.path_dir_out)
        .with_context(|| format!("failed to create '{c_dir_out}'"))?;
    println!("Generating test Excel files...");
    generate_all(&options).with_context(|| format!("failed to generate into '{c_dir_out}'"))?;
    println!("Test files generated in '{c_dir_out}' directory");

    if cli.inspect {
        let l_inspections = inspect_fixture_directory(&options.path_dir_out)
            .with_context(|| format!("failed to inspect '{c_dir_out}'"))?;
        for inspection in l_inspections {
            println!("{inspection}");
        }
    }

    Ok(())
}
