use particle_field::app::{self, RunOptions};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = app::run(RunOptions::from_args(&args)) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
