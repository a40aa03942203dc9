// SPDX-License-Identifier: MIT OR Apache-2.0

//! `cfgstore` command-line tool.

use cfgstore::cli::{self, Cli};
use clap::Parser;

fn main() {
    let args = Cli::parse();
    cli::init_logging(&args.log_level);

    let stdout = std::io::stdout();
    if let Err(e) = cli::execute(&args, &mut stdout.lock()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
