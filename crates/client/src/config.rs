//! Session configuration built from a stored profile.

use tgup_protocol::{Profile, ProxyConfig};

use crate::ClientError;

/// Application version string reported to the remote service.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_DEVICE_MODEL: &str = "tgup";

/// Exactly one authentication method per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Phone { number: String, hide_password: bool },
    BotToken(String),
    SessionString(String),
}

impl Credentials {
    /// Resolves the credentials from a profile, enforcing the
    /// exactly-one-of-three rule.
    ///
    /// The profile editor validates this on save; the check here is a
    /// fail-fast so a hand-edited profile never reaches the network layer.
    pub fn from_profile(profile: &Profile) -> Result<Self, ClientError> {
        let mut found = Vec::new();
        if let Some(phone) = profile.phone.as_ref().filter(|s| !s.is_empty()) {
            found.push(Credentials::Phone {
                number: phone.clone(),
                hide_password: profile.hide_password,
            });
        }
        if let Some(token) = profile.bot_token.as_ref().filter(|s| !s.is_empty()) {
            found.push(Credentials::BotToken(token.clone()));
        }
        if let Some(session) = profile.session_string.as_ref().filter(|s| !s.is_empty()) {
            found.push(Credentials::SessionString(session.clone()));
        }

        match found.len() {
            0 => Err(ClientError::Credentials(
                "profile sets none of phone, bot token or session string".into(),
            )),
            1 => Ok(found.remove(0)),
            n => Err(ClientError::Credentials(format!(
                "profile sets {n} authentication methods, expected exactly one"
            ))),
        }
    }
}

/// Everything a client implementation needs to open a session.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Profile name, also used as the session storage name.
    pub session_name: String,
    pub api_id: String,
    pub api_hash: String,
    pub app_version: String,
    pub device_model: String,
    pub system_version: String,
    pub credentials: Credentials,
    pub proxy: Option<ProxyConfig>,
}

impl ClientConfig {
    /// Builds a config from a profile, filling service metadata defaults.
    pub fn from_profile(session_name: &str, profile: &Profile) -> Result<Self, ClientError> {
        let credentials = Credentials::from_profile(profile)?;
        Ok(Self {
            session_name: session_name.into(),
            api_id: profile.api_id.clone(),
            api_hash: profile.api_hash.clone(),
            app_version: APP_VERSION.into(),
            device_model: profile
                .device_model
                .clone()
                .unwrap_or_else(|| DEFAULT_DEVICE_MODEL.into()),
            system_version: profile
                .system_version
                .clone()
                .unwrap_or_else(|| std::env::consts::OS.into()),
            credentials,
            proxy: profile.proxy.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone_profile() -> Profile {
        Profile {
            api_id: "12345".into(),
            api_hash: "hash".into(),
            phone: Some("+15550100".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn resolves_phone_credentials() {
        let creds = Credentials::from_profile(&phone_profile()).unwrap();
        assert_eq!(
            creds,
            Credentials::Phone {
                number: "+15550100".into(),
                hide_password: false,
            }
        );
    }

    #[test]
    fn resolves_bot_token() {
        let profile = Profile {
            api_id: "1".into(),
            api_hash: "h".into(),
            bot_token: Some("42:token".into()),
            ..Profile::default()
        };
        assert_eq!(
            Credentials::from_profile(&profile).unwrap(),
            Credentials::BotToken("42:token".into())
        );
    }

    #[test]
    fn rejects_no_credentials() {
        let profile = Profile {
            api_id: "1".into(),
            api_hash: "h".into(),
            ..Profile::default()
        };
        assert!(matches!(
            Credentials::from_profile(&profile).unwrap_err(),
            ClientError::Credentials(_)
        ));
    }

    #[test]
    fn rejects_multiple_credentials() {
        let mut profile = phone_profile();
        profile.session_string = Some("serialized".into());
        let err = Credentials::from_profile(&profile).unwrap_err();
        assert!(matches!(err, ClientError::Credentials(_)));
        assert!(err.to_string().contains("exactly one"));
    }

    #[test]
    fn empty_strings_do_not_count_as_set() {
        let mut profile = phone_profile();
        profile.bot_token = Some(String::new());
        // Phone is the only non-empty method, so this is still valid.
        assert!(Credentials::from_profile(&profile).is_ok());
    }

    #[test]
    fn config_fills_defaults() {
        let config = ClientConfig::from_profile("work", &phone_profile()).unwrap();
        assert_eq!(config.session_name, "work");
        assert_eq!(config.device_model, "tgup");
        assert!(!config.system_version.is_empty());
        assert!(config.proxy.is_none());
    }

    #[test]
    fn config_keeps_profile_device_metadata() {
        let mut profile = phone_profile();
        profile.device_model = Some("Desktop".into());
        profile.system_version = Some("11".into());
        let config = ClientConfig::from_profile("p", &profile).unwrap();
        assert_eq!(config.device_model, "Desktop");
        assert_eq!(config.system_version, "11");
    }
}
