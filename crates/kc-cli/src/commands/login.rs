//! Login command.

use kc_auth::{
    AuthenticationResult, Authority, CaseConversion, DirectAccessGrantAuthenticationProvider,
    SimpleAuthorityMapper,
};
use kc_protocol_oidc::DirectGrantClient;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::Cli;
use crate::config::{load_provider_config, OutputFormat};
use crate::output::{output, prompt_password, success};

/// Login result for display.
#[derive(Debug, Clone, Serialize)]
pub struct LoginSummary {
    /// Verified subject.
    pub subject: String,
    /// Principal name.
    pub name: String,
    /// Realm roles and resource roles.
    pub roles: Vec<String>,
    /// Granted authorities.
    pub authorities: Vec<String>,
}

impl From<&AuthenticationResult> for LoginSummary {
    fn from(result: &AuthenticationResult) -> Self {
        Self {
            subject: result.principal().subject().to_string(),
            name: result.principal().name().to_string(),
            roles: result.roles().iter().map(ToString::to_string).collect(),
            authorities: result.authorities().iter().map(Authority::to_string).collect(),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct AuthorityRow {
    #[tabled(rename = "Authority")]
    authority: String,
}

/// Runs the login command.
pub async fn run_login(cli: Cli) -> crate::CliResult<()> {
    let config = load_provider_config(&cli.config)?;
    let password = match cli.password {
        Some(password) => password,
        None => prompt_password(&format!("Password for {}: ", cli.username))?,
    };

    let mut provider = DirectAccessGrantAuthenticationProvider::new(DirectGrantClient::new(config));
    if let Some(prefix) = cli.role_prefix {
        let case = if cli.upper_case {
            CaseConversion::Upper
        } else {
            CaseConversion::None
        };
        provider = provider.with_mapper(SimpleAuthorityMapper::new().with_prefix(prefix).with_case(case));
    }

    let result = provider.authenticate_credentials(&cli.username, &password).await?;
    let summary = LoginSummary::from(&result);

    match cli.output {
        OutputFormat::Table => {
            success(&format!("Logged in as {} ({})", summary.name, summary.subject));
            let rows: Vec<AuthorityRow> = summary
                .authorities
                .into_iter()
                .map(|authority| AuthorityRow { authority })
                .collect();
            output(&rows, OutputFormat::Table)?;
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    Ok(())
}
