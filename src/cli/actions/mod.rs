pub mod server;

use secrecy::SecretString;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        jwt_secret: SecretString,
        access_token_ttl_seconds: i64,
        refresh_token_ttl_seconds: i64,
        secure_cookies: bool,
    },
}
