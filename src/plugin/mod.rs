mod authenticator;

pub use authenticator::{Authenticator, AuthenticatorConfig, Dns01Challenge, ACME_CHALLENGE_LABEL};
