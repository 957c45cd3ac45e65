//! Log output for the harness binary.

use tracing::level_filters::LevelFilter;

/// Installs the global `tracing` subscriber.
///
/// Logs go to stderr without timestamps; report output is written
/// separately and is unaffected by the level chosen here.
pub fn init(options: &crate::TestOptions) {
    let level = if options.log_trace {
        LevelFilter::TRACE
    } else if options.log_debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    if tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_max_level(level)
        .try_init()
        .is_err()
    {
        // Something went wrong; proceed on anyway but complain audibly.
        eprintln!("warning: failed to initialize tracing.");
    }
}
