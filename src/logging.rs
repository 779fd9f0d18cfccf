use env_logger::{Builder, Target};
use log::LevelFilter;

pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

/// Stderr logger; `RUST_LOG` still narrows or widens individual modules.
pub fn init(verbose: u8, quiet: bool) {
    let level = level_for(verbose, quiet);
    Builder::new()
        .target(Target::Stderr)
        .filter_level(level)
        .filter_module("wgpu_core", LevelFilter::Warn)
        .filter_module("wgpu_hal", LevelFilter::Warn)
        .filter_module("naga", LevelFilter::Warn)
        .parse_default_env()
        .format_timestamp_secs()
        .init();

    log::debug!("logging initialized at {level:?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_wins() {
        assert_eq!(level_for(3, true), LevelFilter::Error);
    }

    #[test]
    fn verbosity_steps() {
        assert_eq!(level_for(0, false), LevelFilter::Info);
        assert_eq!(level_for(1, false), LevelFilter::Debug);
        assert_eq!(level_for(2, false), LevelFilter::Trace);
    }
}
