use std::fs::{self, OpenOptions};
use std::path::Path;

use crate::config;

/// Route `log` output to a file; the terminal belongs to the UI.
///
/// `RUST_LOG` wins over `logging.level`. Failing to open the file leaves
/// logging disabled rather than writing over the UI.
pub fn init_logging(settings: &config::Settings) {
    let Some(path) = settings.log_file() else {
        return;
    };
    let file = match open_log_file(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("encore: cannot open log file {}: {e}", path.display());
            return;
        }
    };

    let env = env_logger::Env::default().default_filter_or(settings.logging.level.as_str());
    let result = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
    if let Err(e) = result {
        eprintln!("encore: logger already initialised: {e}");
    }
}

fn open_log_file(path: &Path) -> std::io::Result<fs::File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
