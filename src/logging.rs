use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "image_tagger=info,make_image_list=info";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    // A second call keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
