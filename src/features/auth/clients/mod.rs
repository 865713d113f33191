mod hosted_auth_client;

pub use hosted_auth_client::{HostedAuthClient, HostedSession, HostedUser, SignUpOutcome};
