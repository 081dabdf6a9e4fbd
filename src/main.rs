//! Tuimer - Minimal TUI countdown timer.
//!
//! Parses the command line, then hands off to the bubbletea-rs program;
//! everything interactive lives in the session model.

mod alarm;
mod cli;
mod clock;
mod session;
mod styles;
mod view;

use bubbletea_rs::Program;
use clap::{CommandFactory, Parser};
use session::Session;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::Args::parse();

    // "tuimer help" behaves like --help.
    if args.duration.len() == 1 && args.duration[0] == "help" {
        cli::Args::command().print_help()?;
        return Ok(());
    }

    if !args.duration.is_empty() {
        // All remaining arguments form one duration: "1h 30m" == "1h30m".
        let input = args.duration.concat();
        match cli::parse_duration(&input) {
            Ok(seconds) => session::set_start_seconds(seconds),
            Err(_) => {
                println!("Error: Invalid time format.");
                println!("Run 'tuimer --help' for details.");
                std::process::exit(1);
            }
        }
    }

    let program = Program::<Session>::builder().alt_screen(true).build()?;
    program.run().await?;
    Ok(())
}
