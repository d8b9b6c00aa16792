pub fn run(host: &str, port: u16) {
    let base = format!("http://{host}:{port}");

    println!("padtop demo server v{}", padtop_core::VERSION);
    println!("   {base}");
    println!();
    println!("   Endpoints:");
    println!("     GET /metrics       Synthetic scratchpad exposition text");
    println!("     GET /system_info   Synthetic system info snapshot");
    println!();
    println!("   Try:");
    println!("     curl {base}/metrics");
    println!("     padtop watch --url {base}");
    println!();

    let rt = super::runtime();
    if let Err(e) = rt.block_on(padtop_demo::run_server(host, port)) {
        eprintln!("demo server failed: {e}");
        std::process::exit(1);
    }
}
