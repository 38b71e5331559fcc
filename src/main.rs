mod app;
mod modules;
mod types;
mod utils;

use crate::app::App;
use tokio::io::AsyncReadExt;
use tracing_subscriber::prelude::*;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_ansi(false))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    init_tracing();

    let app = App::new()?;

    match std::env::args().nth(1).as_deref() {
        // `send-otp invoke < event.json`
        Some("invoke") => {
            let mut raw = Vec::new();
            tokio::io::stdin().read_to_end(&mut raw).await?;

            match app.invoke_local(&raw).await {
                Ok(success) => {
                    println!("{}", success.into_response());
                    Ok(())
                }
                Err(err) => {
                    eprintln!("{}", err);
                    std::process::exit(1);
                }
            }
        }
        _ => app.serve().await,
    }
}
