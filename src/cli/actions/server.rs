use crate::{api, auth::config::AuthConfig, cli::actions::Action};
use anyhow::Result;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            jwt_secret,
            access_token_ttl_seconds,
            refresh_token_ttl_seconds,
            secure_cookies,
        } => {
            let config = AuthConfig::new()
                .with_access_token_ttl_seconds(access_token_ttl_seconds)
                .with_refresh_token_ttl_seconds(refresh_token_ttl_seconds)
                .with_secure_cookies(secure_cookies);

            api::new(port, dsn, jwt_secret, config).await?;
        }
    }

    Ok(())
}
