use crate::cli::actions::Action;
use crate::gate::{self, identity::HttpIdentityProvider, GateConfig};
use anyhow::Result;
use std::sync::Arc;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            identity_url,
            identity_api_key,
            frontend_url,
            csrf_max_age,
        } => {
            let config =
                GateConfig::new(frontend_url).with_csrf_cookie_max_age_seconds(csrf_max_age);

            let provider = HttpIdentityProvider::new(&identity_url, identity_api_key)?;

            gate::new(port, config, Arc::new(provider)).await?;
        }
    }

    Ok(())
}
