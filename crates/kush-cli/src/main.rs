#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = kush_cli::run_from_env() {
        tracing::error!(target: "kush.cli", exit_code = error.exit_code(), "{error}");
        eprintln!("kush: {error}");
        std::process::exit(error.exit_code());
    }
}
