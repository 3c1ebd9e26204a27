use crate::config::types::ApiConfig;

/// Resolve the bearer token for API calls.
///
/// Priority:
/// 1. `api.token` from the config file
/// 2. `PR_SIDEBAR_TOKEN` environment variable
/// 3. `HARNESS_TOKEN` environment variable
///
/// `None` means requests go out anonymously.
pub fn resolve_token(config: &ApiConfig) -> Option<String> {
    if let Some(token) = config.token.as_deref()
        && !token.is_empty()
    {
        return Some(token.to_owned());
    }

    ["PR_SIDEBAR_TOKEN", "HARNESS_TOKEN"]
        .into_iter()
        .find_map(|var| std::env::var(var).ok().filter(|t| !t.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_token_wins() {
        let config = ApiConfig {
            token: Some("from-config".to_owned()),
            ..ApiConfig::default()
        };
        assert_eq!(resolve_token(&config).as_deref(), Some("from-config"));
    }
}
