use crate::cli::actions::Action;
use anyhow::Result;
use secrecy::SecretString;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        identity_url: matches
            .get_one("identity-url")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --identity-url"))?,
        identity_api_key: matches
            .get_one("identity-api-key")
            .map(|s: &String| SecretString::from(s.clone())),
        frontend_url: matches
            .get_one("frontend-url")
            .map(|s: &String| s.to_string())
            .unwrap_or_else(|| "http://localhost:3000".to_string()),
        csrf_max_age: matches
            .get_one::<i64>("csrf-max-age")
            .copied()
            .unwrap_or(86400),
    })
}
