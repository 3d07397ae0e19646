#![doc = include_str!("../README.md")]

use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use fedauth_aws::{
    CredentialsFile, ExpirationRecord, FederatedSession, FederationCredential, StsRoleAssumer,
};
use fedauth_cli::{
    TerminalRolePrompt, install_color_eyre, password_prompt_when_none, text_prompt_when_none,
};
use fedauth_okta::{AppLink, ClientSettings, OktaClient, login::Credentials};
use fedauth_saml::select_role;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, prelude::__tracing_subscriber_SubscriberExt as _, util::SubscriberInitExt as _,
};

use crate::{
    assertion_source::EmbedLinkSource,
    command::Cli,
    interrupt::Interrupts,
    login::login,
    renew::{CHECK_INTERVAL, Destination, InteractiveLogin, Renewal, reup},
};

mod assertion_source;
mod command;
mod interrupt;
mod login;
mod renew;

/// Targets of the AWS SDK, which are chatty below `warn`.
const AWS_TARGETS: &[&str] = &["aws_config", "aws_sdk_sts", "aws_smithy_runtime", "aws_runtime"];

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    install_color_eyre(cli.color)?;
    init_tracing(cli.verbose)?;

    run(cli).await
}

fn init_tracing(verbose: bool) -> Result<()> {
    // the log level hierarchy is determined by:
    //    - if RUST_LOG is detected at runtime
    //    - if RUST_LOG is provided at compile time
    //    - --verbose, then INFO
    let default_level = if verbose { "debug" } else { "info" };
    let mut filter = EnvFilter::builder()
        .with_default_directive(
            option_env!("RUST_LOG")
                .unwrap_or(default_level)
                .parse()
                .wrap_err("invalid compile time log level")?,
        )
        .from_env_lossy();

    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_none() {
        for target in AWS_TARGETS {
            filter = filter.add_directive(format!("{target}=warn").parse()?);
        }
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let interrupts = Interrupts::listen();

    let credentials = Credentials::new(
        text_prompt_when_none("Okta organization", cli.org)?,
        text_prompt_when_none("Username", cli.username)?,
        password_prompt_when_none("Password", cli.password)?,
    );
    let app = AppLink::new(cli.apptype, text_prompt_when_none("Application id", cli.appid)?);

    let mut client = OktaClient::new(ClientSettings {
        provider_domain: cli.provider_domain,
        ..Default::default()
    })?;
    let session_token = login(&mut client, &credentials, &interrupts).await?;

    let assertion = client.fetch_assertion(&app, &session_token).await?;
    let roles = assertion.roles()?;
    let role = select_role(&roles, &mut TerminalRolePrompt)?.clone();

    let destination = Destination {
        profile: cli
            .profile
            .unwrap_or_else(|| role.role_name().to_string()),
        region: cli.region.clone(),
        credentials: CredentialsFile::new(
            cli.credentials_file
                .or_else(CredentialsFile::default_path)
                .ok_or_else(|| eyre!("No home directory, pass --credentials-file"))?,
        ),
        expiration: ExpirationRecord::new(
            cli.expiration_file
                .or_else(ExpirationRecord::default_path)
                .ok_or_else(|| eyre!("No home directory, pass --expiration-file"))?,
        ),
    };

    let assumer = StsRoleAssumer::new(cli.region).await;
    let mut session = FederatedSession::new(Arc::new(assumer))
        .with_assertion_source(Arc::new(EmbedLinkSource::new(client.clone(), app)))
        .with_duration(cli.duration);

    let assumed = session
        .assume(&role, &FederationCredential::Assertion(assertion))
        .await?;
    destination.write(assumed)?;
    info!(
        "Credentials written to profiles \"default\" and \"{}\"",
        destination.profile
    );

    if !cli.reup {
        return Ok(());
    }

    let renewal = Renewal {
        session,
        role,
        session_token,
        relogin: InteractiveLogin {
            client,
            credentials,
            interrupts,
        },
        destination,
    };
    reup(renewal, CHECK_INTERVAL).await
}
