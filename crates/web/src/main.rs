use std::sync::Arc;

use ingest::state::SharedState;
use ingest::{poller, scheduler, static_bundle_service, BundleStore, Config, FeedPublisher, Transformer};
use web::{start_web_server, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = Arc::new(Config::from_env());
    let state = Arc::new(SharedState::new());
    let bundles = Arc::new(BundleStore::new());
    let feed = Arc::new(FeedPublisher::new());
    let transformer = Arc::new(Transformer::new());

    let store = database::Store::connect(&config.db_path)
        .await
        .expect("could not open sqlite store");
    let store = Arc::new(store);

    let client = reqwest::Client::new();

    // populates routes_children/routes_parent/start_times as a side effect,
    // awaited here so the scheduler's startup pass and the poller's
    // candidate-job builder never run against an empty ScheduleData.
    if let Err(error) = static_bundle_service::rebuild(&state, &bundles, &config) {
        log::error!("initial static bundle build failed: {error}");
    }

    {
        let state = Arc::clone(&state);
        let bundles = Arc::clone(&bundles);
        let config = Arc::clone(&config);
        tokio::spawn(async move {
            static_bundle_service::bundle_loop(&state, &bundles, &config).await;
        });
    }

    {
        let state = Arc::clone(&state);
        let config = Arc::clone(&config);
        tokio::spawn(async move {
            scheduler::schedule_thread(&state, &config).await;
        });
    }

    {
        let state = Arc::clone(&state);
        let config = Arc::clone(&config);
        let transformer = Arc::clone(&transformer);
        let feed = Arc::clone(&feed);
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            poller::receiver_loop(state, config, client, transformer, feed, store).await;
        });
    }

    let web_state = WebState { bundles, feed };
    if let Err(error) = start_web_server(web_state, &config.bind_host, config.bind_port).await {
        log::error!("web server exited: {error}");
    }
}
