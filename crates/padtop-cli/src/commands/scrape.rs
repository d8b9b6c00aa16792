use std::collections::BTreeMap;

use padtop_core::{DEFAULT_CAPACITY, PollError, ScrapeClient, parse_exposition};

pub fn run(url: &str, namespace: &str, json: bool) {
    let config = super::poll_config(url, namespace, 1000, DEFAULT_CAPACITY);
    let rt = super::runtime();

    let result = rt.block_on(async {
        let client = ScrapeClient::new(&config)?;
        let body = client.fetch_metrics().await?;
        Ok::<_, PollError>(parse_exposition(&body, &config.namespace))
    });

    let scrape = match result {
        Ok(scrape) => scrape,
        Err(e) => {
            eprintln!("scrape failed: {e}");
            std::process::exit(1);
        }
    };

    // Sorted for stable output regardless of map iteration order.
    let sorted: BTreeMap<&str, f64> = scrape
        .values
        .iter()
        .map(|(k, v)| (k.as_str(), *v))
        .collect();

    if json {
        let out = serde_json::json!({
            "values": sorted,
            "unparseable": scrape.unparseable,
        });
        println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
        return;
    }

    if sorted.is_empty() {
        println!("no {namespace}: samples in response");
    }
    for (name, value) in &sorted {
        println!("{name:<28} {value}");
    }
    if scrape.unparseable > 0 {
        eprintln!("({} unparseable line(s) dropped)", scrape.unparseable);
    }
}
