use std::io;
use std::process::ExitCode;

use chess_opponent::uci;

fn main() -> ExitCode {
    // stdout belongs to the protocol
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    match uci::run_uci_loop(stdin.lock(), stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("uci loop failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
