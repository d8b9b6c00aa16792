use std::time::Duration;

use padtop_core::{Poller, shared_dashboard};

use crate::tui::app::App;

pub fn run(url: &str, namespace: &str, interval_ms: u64, history: usize) {
    let config = super::poll_config(url, namespace, interval_ms, history);
    let rt = super::runtime();

    let shared = shared_dashboard(config.capacity);
    let poller = match Poller::new(&config, shared.clone()) {
        Ok(poller) => poller,
        Err(e) => {
            eprintln!("failed to build scrape client: {e}");
            std::process::exit(1);
        }
    };

    let (stop_tx, stop_rx) = tokio::sync::watch::channel(false);
    let poll_task = rt.spawn(poller.clone().run(stop_rx));

    let mut app = App::new(shared, poller, rt.handle().clone(), config.base_url.clone());
    let result = app.run();

    // Stop the scrape loop before tearing the runtime down.
    let _ = stop_tx.send(true);
    rt.block_on(async {
        let _ = tokio::time::timeout(Duration::from_secs(1), poll_task).await;
    });

    if let Err(e) = result {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
}
