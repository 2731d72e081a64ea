use log::error;
use still_life::{config::Config, window::run};

fn main() {
    env_logger::init();

    let result = Config::from_args().and_then(|config| pollster::block_on(run(config)));
    if let Err(err) = result {
        error!("{:?}", err);
        std::process::exit(1);
    }
}
