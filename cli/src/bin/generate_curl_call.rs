//! Generate a signed curl call for a Duo API.

use clap::{Parser, ValueEnum};
use duo_hmac_cli::{curl_command, parse_headers, parse_params, Config};
use duo_hmac_core::Signer;
use log::debug;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Method {
    Get,
    Post,
}

impl Method {
    fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Generates a curl call for a Duo API call.
///
/// Provide the HTTP method (default 'get'), the API path, and the call
/// parameters as key=value pairs.
#[derive(Parser, Debug)]
#[clap(
    name = "Duo API call generator for curl",
    version,
    about,
    after_help = "CLI flags: -m <HTTP method> -a <api path> -p key1=value1 key2=value2 ... [-H \"name: value\"]"
)]
struct Args {
    /// HTTP method
    #[clap(short = 'm', value_enum, default_value_t = Method::Get)]
    method: Method,

    /// API path
    #[clap(short = 'a')]
    path: String,

    /// API call parameters as k=v pairs
    #[clap(short = 'p', value_name = "KEY=VALUE", num_args = 0..)]
    params: Vec<String>,

    /// Extra request headers, x-duo headers among them are signed
    #[clap(short = 'H', value_name = "NAME: VALUE")]
    headers: Vec<String>,

    /// Config file with a [duo] section holding ikey, skey and api_host
    #[clap(long, short = 'c')]
    config: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    debug!("loaded config: {config:?}");

    let signer = Signer::new(config.into_credential()?);
    let params = parse_params(&args.params)?;
    let headers = parse_headers(&args.headers);
    let method = args.method.as_str();

    let components = signer.get_authentication_components(
        method,
        &args.path,
        Some(&params),
        Some(&headers),
    )?;
    println!("{}", curl_command(method, &components));

    Ok(())
}
