//! usergraph server binary.
use usergraph::Config;

#[tokio::main]
async fn main() -> Result<(), usergraph::Error> {
    tracing_subscriber::fmt().init();

    usergraph::serve(Config::default()).await
}
