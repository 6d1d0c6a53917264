use clap::Parser;
use memdis::config::Config;
use memdis::{server, Error};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    server::run(config).await
}
