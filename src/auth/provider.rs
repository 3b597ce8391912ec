//! Provider lookup
//!
//! Every provider goes through the same backend flow, so a provider is just
//! a validated name. The table below lists the providers the backend ships;
//! configuration decides which of them are enabled.

use std::fmt;

use crate::error::AppError;

/// Known providers and their display labels
const PROVIDERS: &[(&str, &str)] = &[
    ("github", "GitHub"),
    ("google", "Google"),
    ("facebook", "Facebook"),
    ("discord", "Discord"),
    ("twitter", "Twitter"),
    ("microsoft", "Microsoft"),
    ("instagram", "Instagram"),
    ("vk", "VK"),
    ("twitch", "Twitch"),
    ("linkedin", "LinkedIn"),
    ("cognito", "AWS Cognito"),
    ("reddit", "Reddit"),
    ("auth0", "Auth0"),
    ("cas", "CAS"),
    ("patreon", "Patreon"),
    ("keycloak", "Keycloak"),
];

/// Whether the backend ships a provider with this name
pub fn is_known_provider(name: &str) -> bool {
    PROVIDERS.iter().any(|(known, _)| *known == name)
}

/// A provider name that is both known and enabled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider(String);

impl Provider {
    /// Resolve a route segment against the enabled providers
    ///
    /// Matching is case-insensitive; the resolved name is lowercase.
    pub fn resolve(name: &str, enabled: &[String]) -> Result<Self, AppError> {
        let name = name.trim().to_ascii_lowercase();

        let is_enabled = enabled.iter().any(|p| p.eq_ignore_ascii_case(&name));
        if !is_known_provider(&name) || !is_enabled {
            return Err(AppError::UnknownProvider(name));
        }

        Ok(Provider(name))
    }

    /// All enabled providers, in configuration order
    ///
    /// Entries that fail to resolve are skipped; configuration validation
    /// already rejects them at startup.
    pub fn enabled(enabled: &[String]) -> Vec<Self> {
        enabled
            .iter()
            .filter_map(|name| Self::resolve(name, enabled).ok())
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable label, e.g. "GitHub"
    pub fn label(&self) -> &'static str {
        PROVIDERS
            .iter()
            .find(|(name, _)| *name == self.0)
            .map(|(_, label)| *label)
            .unwrap_or("provider")
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
