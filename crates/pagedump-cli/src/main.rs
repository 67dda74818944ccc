mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    // Parse CLI, set up logging, dispatch.
    match Cli::run_from_args().await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("pagedump error: {:#}", err);
            std::process::exit(1);
        }
    }
}
