use crate::error::{Error, Result};

/// The closed set of authentication plugins this client drives.
///
/// Modeled as a closed variant per the "Dynamic dispatch for TLS providers and auth plugins"
/// design note rather than an open trait: the wire only ever names one of these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPlugin {
    MySqlNativePassword,
    Sha256Password,
    CachingSha2Password,
}

impl AuthPlugin {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "mysql_native_password" => Ok(AuthPlugin::MySqlNativePassword),
            "sha256_password" => Ok(AuthPlugin::Sha256Password),
            "caching_sha2_password" => Ok(AuthPlugin::CachingSha2Password),
            other => Err(Error::AuthenticationFailed(
                format!("Unknown authentication plugin: {other}").into_boxed_str(),
            )),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AuthPlugin::MySqlNativePassword => "mysql_native_password",
            AuthPlugin::Sha256Password => "sha256_password",
            AuthPlugin::CachingSha2Password => "caching_sha2_password",
        }
    }
}
