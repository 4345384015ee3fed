use std::env;

use anyhow::{Context, Result};
use log::{debug, info};
use tokio::signal;

use pi_digits::{CalcConfig, Calculator, PiErr};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let digits: u64 = env::args()
        .nth(1)
        .context("usage: pi-digits <digits>")?
        .parse()
        .context("digits must be a positive integer")?;

    let cfg = match env::var("PI_CONFIG") {
        Ok(path) => CalcConfig::from_json_file(&path)?,
        Err(_) => CalcConfig::default(),
    }
    .with_env_overrides()?;

    let calculator = Calculator::new(cfg);
    let mut session = calculator.start(digits)?;
    let token = session.cancel_token();

    let ctrl_c = signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            event = session.progress() => match event {
                Some(event) => debug!(
                    "{:.1}% ({}/{})",
                    event.fraction() * 100.0,
                    event.produced,
                    event.total
                ),
                None => break,
            },
            _ = &mut ctrl_c, if !token.is_cancelled() => {
                info!("received SIGINT, waiting for the worker to stop");
                token.cancel();
            }
        }
    }

    match session.wait().await {
        Ok(pi) => {
            println!("{pi}");
            Ok(())
        }
        Err(PiErr::Cancelled) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
