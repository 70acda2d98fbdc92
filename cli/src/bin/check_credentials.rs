//! Check that Duo credentials are able to call the Auth or Admin API.

use clap::Parser;
use duo_hmac_cli::{check_credentials, Config, ReqwestHttpSend};
use duo_hmac_core::Signer;
use log::debug;

/// Check that the credentials in duo.conf can call the Duo Auth or Admin API
#[derive(Parser, Debug)]
#[clap(version, about)]
struct Args {
    /// Config file with a [duo] section holding ikey, skey and api_host
    #[clap(long, short = 'c')]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    debug!("loaded config: {config:?}");

    let signer = Signer::new(config.into_credential()?);
    let outcome = check_credentials(&signer, &ReqwestHttpSend::default()).await?;
    println!("{outcome}");

    Ok(())
}
