use anyhow::{Context, Error};
use clap::Parser;
use clap_stdin::MaybeStdin;

use eventloop_checkin::verify::{AuthorityClient, AuthorityConfig, VerificationClient};
use eventloop_checkin::ScanPayload;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    action: Action,
}

#[derive(Debug, clap::Subcommand)]
enum Action {
    /// Submit a QR payload to the check-in authority and print the outcome.
    Verify {
        /// QR payload text, or `-` to read it from stdin.
        qr_string: MaybeStdin<String>,
        /// Base URL of the check-in authority.
        #[arg(long, env = "EVENTLOOP_BACKEND_URL")]
        authority: String,
        /// Bearer token for header-authenticated deployments.
        #[arg(long, env = "EVENTLOOP_BACKEND_TOKEN")]
        token: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();
    match Args::parse().action {
        Action::Verify {
            qr_string,
            authority,
            token,
        } => verify(qr_string.to_string(), authority, token).await,
    }
}

async fn verify(qr_string: String, authority: String, token: Option<String>) -> Result<(), Error> {
    let mut config = AuthorityConfig::new(authority);
    config.bearer_token = token;
    let client = AuthorityClient::new(config)?;
    let outcome = client
        .verify(&ScanPayload::new(qr_string))
        .await
        .context("could not verify payload")?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
