use crate::cli::actions::Action;
use anyhow::{Context, Result};
use secrecy::SecretString;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        dsn: matches
            .get_one::<String>("dsn")
            .cloned()
            .context("missing required argument: --dsn")?,
        jwt_secret: matches
            .get_one::<String>("jwt-secret")
            .cloned()
            .map(SecretString::from)
            .context("missing required argument: --jwt-secret")?,
        access_token_ttl_seconds: matches
            .get_one::<i64>("access-token-ttl")
            .copied()
            .unwrap_or(86_400),
        refresh_token_ttl_seconds: matches
            .get_one::<i64>("refresh-token-ttl")
            .copied()
            .unwrap_or(5_184_000),
        secure_cookies: matches.get_flag("secure-cookies"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn handler_builds_server_action() {
        temp_env::with_vars([("SESAMO_SECURE_COOKIES", None::<&str>)], || {
            let matches = crate::cli::commands::new().get_matches_from(vec![
                "sesamo",
                "--dsn",
                "postgres://user@localhost:5432/sesamo",
                "--jwt-secret",
                "sup3rs3cr3t",
            ]);
            let action = handler(&matches).expect("action");
            let Action::Server {
                port,
                dsn,
                jwt_secret,
                access_token_ttl_seconds,
                refresh_token_ttl_seconds,
                secure_cookies,
            } = action;
            assert_eq!(port, 8080);
            assert_eq!(dsn, "postgres://user@localhost:5432/sesamo");
            assert_eq!(jwt_secret.expose_secret(), "sup3rs3cr3t");
            assert_eq!(access_token_ttl_seconds, 86_400);
            assert_eq!(refresh_token_ttl_seconds, 5_184_000);
            assert!(!secure_cookies);
        });
    }
}
