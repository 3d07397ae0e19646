use std::path::PathBuf;

use clap::Parser;
use fedauth_cli::Color;

pub const PASSWORD_ENV: &str = "FEDAUTH_PASSWORD";

#[derive(Parser, Clone)]
#[command(
    name = "fedauth",
    version,
    about = "Obtain temporary AWS credentials through an Okta login",
    long_about = None
)]
pub struct Cli {
    #[arg(long, env = "FEDAUTH_ORG", help = "Okta organization, the subdomain of your Okta URL")]
    pub org: Option<String>,

    #[arg(long, env = "FEDAUTH_USERNAME", help = "Okta username")]
    pub username: Option<String>,

    #[arg(long, env = PASSWORD_ENV, hide = true, hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long, env = "FEDAUTH_APPID", help = "Id of the AWS application in Okta")]
    pub appid: Option<String>,

    #[arg(long, default_value = "amazon_aws", help = "Type of the AWS application in Okta")]
    pub apptype: String,

    #[arg(
        long,
        env = "FEDAUTH_PROVIDER_DOMAIN",
        default_value = "okta.com",
        help = "Domain the organization is hosted under"
    )]
    pub provider_domain: String,

    #[arg(long, default_value = "us-east-1", help = "Region written to the profiles")]
    pub region: String,

    #[arg(long, help = "Profile to write the role credentials to [default: the role name]")]
    pub profile: Option<String>,

    #[arg(long, help = "Credentials file to update [default: ~/.aws/credentials]")]
    pub credentials_file: Option<PathBuf>,

    #[arg(
        long,
        help = "File recording when the credentials expire [default: ~/.aws/fedauth-expiration.json]"
    )]
    pub expiration_file: Option<PathBuf>,

    #[arg(
        long,
        default_value_t = 3600,
        value_parser = clap::value_parser!(i32).range(900..=43200),
        help = "Requested session duration in seconds"
    )]
    pub duration: i32,

    #[arg(long, help = "Keep running and renew the credentials before they expire")]
    pub reup: bool,

    #[arg(short = 'v', long, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(short = 'c', long, value_enum, default_value_t = Color::Auto)]
    pub color: Color,
}
