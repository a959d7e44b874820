use std::process::exit;

use human_panic::setup_panic;
use log::error;

use testpack_gen::prelude::{execute, get_log_file, get_matches, get_verbosity, init_logger};

fn main() {
    setup_panic!();

    let matches = get_matches();

    let log_file = match get_log_file(&matches) {
        Ok(path) => Some(path),
        Err(e) => {
            eprintln!("Failed to set up the log file, logging to the console only: {e}");
            None
        }
    };

    if let Err(e) = init_logger(get_verbosity(&matches), log_file.as_deref()) {
        eprintln!("Failed to initialise logging: {e}");
        exit(1);
    }

    if let Err(e) = execute(&matches) {
        error!("{e:#}");
        exit(1);
    }
}
