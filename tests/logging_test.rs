//! Subscriber bootstrap, kept in its own binary because it installs a
//! process-global subscriber

#[test]
fn test_init_is_idempotent() {
    anneal_tuner::logging::init();
    anneal_tuner::logging::init();
    tracing::info!("subscriber installed");
    assert!(tracing::dispatcher::has_been_set());
}
