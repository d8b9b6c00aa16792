use padtop_core::{DEFAULT_CAPACITY, DEFAULT_NAMESPACE, ScrapeClient};

pub fn run(url: &str, json: bool) {
    let config = super::poll_config(url, DEFAULT_NAMESPACE, 1000, DEFAULT_CAPACITY);
    let rt = super::runtime();

    let result = rt.block_on(async {
        let client = ScrapeClient::new(&config)?;
        client.fetch_system_info().await
    });

    let snapshot = match result {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("system info fetch failed: {e}");
            std::process::exit(1);
        }
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).unwrap_or_default()
        );
        return;
    }

    for (property, value) in snapshot.rows() {
        if value.contains('\n') {
            println!("{property}:");
            for line in value.lines() {
                println!("    {line}");
            }
        } else {
            println!("{property:<24} {value}");
        }
    }
}
