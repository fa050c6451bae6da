use std::sync::OnceLock;

use tracing::{debug, error};
use tracing_subscriber::prelude::*;
use tracing_subscriber::reload::Handle;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::commands::Verbosity;
use crate::utils::TERMINAL_STDERR;

struct LockingTerminalStderr;
impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LockingTerminalStderr {
    type Writer = LockingTerminalStderr;

    fn make_writer(&'a self) -> Self::Writer {
        LockingTerminalStderr
    }
}

impl std::io::Write for LockingTerminalStderr {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(mut guard) = TERMINAL_STDERR.lock() {
            guard.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if let Ok(mut guard) = TERMINAL_STDERR.lock() {
            guard.flush()?
        }
        Ok(())
    }
}

static LOGGER_HANDLE: OnceLock<Handle<EnvFilter, Registry>> = OnceLock::new();

/// The filter directives for a verbosity level.
///
/// `$RUST_LOG` takes precedence over these when set.
pub(crate) fn log_filter(verbosity: Verbosity) -> &'static str {
    match verbosity {
        // Show only errors
        Verbosity::Quiet => "off,pokedex=error",
        // Only show warnings
        Verbosity::Verbose(0) => "off,pokedex=warn",
        // `pokedex` also matches `pokedex_rust_sdk` and `pokedex_catalog`
        Verbosity::Verbose(1) => "off,pokedex=info",
        Verbosity::Verbose(2) => "off,pokedex=debug",
        Verbosity::Verbose(3) => "off,pokedex=trace",
        // Also show debug from dependencies, e.g. the http stack
        Verbosity::Verbose(4) => "debug,pokedex=trace",
        Verbosity::Verbose(_) => "trace",
    }
}

/// Install the global subscriber on first use and set its filter.
///
/// Subsequent calls only update the filter,
/// so this can be called again once the verbosity is known.
pub(crate) fn init_logger(verbosity: Option<Verbosity>) {
    let verbosity = verbosity.unwrap_or_default();

    let filter_handle = LOGGER_HANDLE.get_or_init(|| {
        let (subscriber, reload_handle) = create_registry_and_filter_reload_handle();
        subscriber.init();
        reload_handle
    });

    update_filters(filter_handle, log_filter(verbosity));
}

pub fn update_filters(filter_handle: &Handle<EnvFilter, Registry>, log_filter: &str) {
    let result = filter_handle.modify(|layer| {
        match EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_filter)) {
            Ok(new_filter) => *layer = new_filter,
            Err(err) => {
                error!("Updating logger filter failed: {}", err);
            },
        };
    });
    if let Err(err) = result {
        error!("Updating logger filter failed: {}", err);
    }
}

pub fn create_registry_and_filter_reload_handle() -> (
    impl tracing_subscriber::layer::SubscriberExt + SubscriberInitExt,
    Handle<EnvFilter, Registry>,
) {
    debug!("Initializing logger (how are you seeing this?)");
    // Start permissive, the actual filter is set right after through the handle.
    let filter = EnvFilter::new("trace");
    let (filter, filter_reload_handle) = tracing_subscriber::reload::Layer::new(filter);
    let log_layer = tracing_subscriber::fmt::layer()
        .with_writer(LockingTerminalStderr)
        .event_format(tracing_subscriber::fmt::format())
        .with_filter(filter);
    let registry = tracing_subscriber::registry().with(log_layer);

    (registry, filter_reload_handle)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use pokedex_catalog::{CatalogClientError, EntryKey};
    use pokedex_rust_sdk::models::browser::CatalogBrowser;
    use pokedex_rust_sdk::models::details::DetailView;
    use pokedex_rust_sdk::models::favorites::Favorites;

    use super::*;

    #[test]
    fn every_verbosity_has_a_valid_filter() {
        let levels = [Verbosity::Quiet]
            .into_iter()
            .chain((0..=5).map(Verbosity::Verbose));

        for verbosity in levels {
            let directives = log_filter(verbosity);
            assert!(
                EnvFilter::try_new(directives).is_ok(),
                "invalid filter for {verbosity:?}: {directives}"
            );
        }
    }

    #[test]
    fn default_verbosity_shows_warnings() {
        assert_eq!(log_filter(Verbosity::default()), "off,pokedex=warn");
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Fail a page load and a lookup while logging at `verbosity`.
    fn log_screen_failures(verbosity: Verbosity) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .with_writer(move || writer.clone())
                .with_filter(EnvFilter::new(log_filter(verbosity))),
        );

        tracing::subscriber::with_default(subscriber, || {
            let mut browser = CatalogBrowser::default();
            let request = browser.begin_initial().unwrap();
            browser.finish(request, Err(CatalogClientError::Other("boom".to_string())));

            let mut view = DetailView::new(Favorites::new());
            let request = view.activate(EntryKey::Id(25));
            view.finish(request, Err(CatalogClientError::Other("boom".to_string())));
        });

        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn screen_failures_stay_off_the_default_log() {
        assert_eq!(log_screen_failures(Verbosity::default()), "");
    }

    #[test]
    fn screen_failures_are_logged_when_verbose() {
        let logged = log_screen_failures(Verbosity::Verbose(2));
        assert!(logged.contains("failed to load catalog page"), "{logged}");
        assert!(logged.contains("failed to load details"), "{logged}");
    }
}
