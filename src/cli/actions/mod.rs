pub mod server;

use secrecy::SecretString;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        identity_url: String,
        identity_api_key: Option<SecretString>,
        frontend_url: String,
        csrf_max_age: i64,
    },
}
