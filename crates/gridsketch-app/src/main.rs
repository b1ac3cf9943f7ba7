//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Starting GridSketch");

    if let Err(e) = pollster::block_on(gridsketch_app::App::run()) {
        log::error!("GridSketch exited with an error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
