use std::sync::Once;

static INIT: Once = Once::new();

/// Setup function that is only run once, even if called multiple times.
///
/// Every test module of the crate shares it, since they all live in one
/// binary and only one global logger can be installed.
pub(crate) fn setup() {
    INIT.call_once(|| {
        let _ = pretty_env_logger::try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::setup;

    #[test]
    fn test_setup_is_shared_and_repeatable() {
        setup();
        setup();
        // a logger is already in place, installing another one must fail quietly
        assert!(pretty_env_logger::try_init().is_err());
        setup();
        trace!("logger still usable");
    }
}
