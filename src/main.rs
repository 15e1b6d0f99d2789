use brrtdispatch::cli::run_cli;
use brrtdispatch::logging::{init_logging_with_config, LogConfig};

fn main() {
    let guard = match init_logging_with_config(&LogConfig::from_env()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run_cli() {
        eprintln!("error: {err:#}");
        drop(guard);
        std::process::exit(1);
    }
}
