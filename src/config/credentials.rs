/// Provider credentials are sourced from the environment only; the workflow
/// definition never carries secrets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub clay_api_key: Option<String>,
    pub apollo_api_key: Option<String>,
    pub pdl_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            clay_api_key: env_key("CLAY_API_KEY"),
            apollo_api_key: env_key("APOLLO_API_KEY"),
            pdl_api_key: env_key("PDL_API_KEY"),
            openai_api_key: env_key("OPENAI_KEY"),
        }
    }
}

fn env_key(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_env_values_are_treated_as_absent() {
        assert_eq!(env_key("LEADFLOW_TEST_UNSET_KEY_48151623"), None);
    }

    #[test]
    fn default_credentials_carry_no_keys() {
        let credentials = Credentials::default();
        assert!(credentials.clay_api_key.is_none());
        assert!(credentials.openai_api_key.is_none());
    }
}
