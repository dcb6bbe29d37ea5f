//! ACI node setup CLI (setup-aci-nodes)

use anyhow::Result;
use clap::Parser;
use setup_aci_nodes::commands::UpdateCommand;
use setup_aci_nodes::Cli;

fn main() -> Result<()> {
    // Missing required arguments print usage and exit with status 2.
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    let result = UpdateCommand::from_config_file(&cli.config_file, &cli.node_name)
        .and_then(|cmd| cmd.execute(&cli.input_file, &cli.output_file));

    // Handle errors with appropriate exit codes
    match result {
        Ok(report) => {
            if !cli.quiet {
                println!("{}", report);
                println!("Wrote {}", cli.output_file.display());
            }
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);

            // Print error chain if in verbose mode
            if cli.verbose || cli.debug {
                for cause in e.chain().skip(1) {
                    eprintln!("  Caused by: {}", cause);
                }
            }
            std::process::exit(1);
        }
    }
}
