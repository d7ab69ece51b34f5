#[cfg(test)]
mod tests {
    use crate::config::{Config, Credentials, LLMConfig, LLMProvider};
    use crate::error::GenerationError;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.keys_path, PathBuf::from("keys.json"));
        assert!(!config.verbose);
        assert_eq!(config.llm.provider, LLMProvider::Anthropic);
        assert_eq!(config.llm.model, "claude-3-opus-20240229");
        assert_eq!(config.llm.max_tokens, 30000);
        assert_eq!(config.llm.temperature, 1.0);
        assert_eq!(config.llm.top_p, 1.0);
        assert_eq!(config.llm.seed, 2024);
        assert_eq!(config.llm.retry_attempts, 3);
        assert_eq!(config.llm.retry_delay_ms, 2000);
        assert!(config.llm.retry_on_malformed_response);
    }

    #[test]
    fn test_plan_preset() {
        let llm = LLMConfig::plan_preset();
        assert_eq!(llm.provider, LLMProvider::OpenAI);
        assert_eq!(llm.model, "gpt-4-1106-preview");
        assert_eq!(llm.max_tokens, 4096);
        assert_eq!(llm.temperature, 0.0);
        assert_eq!(llm.retry_attempts, 3);
    }

    #[test]
    fn test_llm_provider_from_str() {
        assert_eq!(
            "openai".parse::<LLMProvider>().unwrap(),
            LLMProvider::OpenAI
        );
        assert_eq!(
            "Anthropic".parse::<LLMProvider>().unwrap(),
            LLMProvider::Anthropic
        );
        assert_eq!(
            "together".parse::<LLMProvider>().unwrap(),
            LLMProvider::Together
        );

        assert!("claude".parse::<LLMProvider>().is_err());
    }

    #[test]
    fn test_llm_provider_display() {
        assert_eq!(LLMProvider::OpenAI.to_string(), "openai");
        assert_eq!(LLMProvider::Anthropic.to_string(), "anthropic");
        assert_eq!(LLMProvider::Together.to_string(), "together");
    }

    #[test]
    fn test_config_from_partial_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("astro.toml");
        std::fs::write(
            &config_path,
            r#"
verbose = true

[llm]
provider = "together"
model = "meta-llama/Llama-3-70b-chat-hf"
retry_on_malformed_response = false
"#,
        )
        .unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert!(config.verbose);
        assert_eq!(config.llm.provider, LLMProvider::Together);
        assert_eq!(config.llm.model, "meta-llama/Llama-3-70b-chat-hf");
        assert!(!config.llm.retry_on_malformed_response);
        // 未出现的字段使用默认值
        assert_eq!(config.llm.retry_attempts, 3);
        assert_eq!(config.keys_path, PathBuf::from("keys.json"));
    }

    #[test]
    fn test_config_load_explicit_missing_file() {
        let result = Config::load(
            Some(Path::new("/definitely/not/here.toml")),
            Config::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_config_file_overrides_only_present_fields_of_base() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("plan.toml");
        std::fs::write(
            &config_path,
            "[llm]\nprovider = \"openai\"\nmodel = \"gpt-4o\"\n",
        )
        .unwrap();
        let base = Config {
            llm: LLMConfig::plan_preset(),
            ..Config::default()
        };

        let config = Config::from_file_over(&config_path, base).unwrap();

        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.temperature, 0.0);
        assert_eq!(config.llm.max_tokens, 4096);
        assert_eq!(config.llm.retry_attempts, 3);
        assert_eq!(config.keys_path, PathBuf::from("keys.json"));
    }

    #[test]
    fn test_credentials_key_for() {
        let credentials: Credentials = serde_json::from_str(
            r#"{"api_key": "sk-oai", "anthropic_key": "sk-ant", "organization_id": "org", "s2_key": ""}"#,
        )
        .unwrap();

        assert_eq!(credentials.key_for(LLMProvider::OpenAI), Some("sk-oai"));
        assert_eq!(credentials.key_for(LLMProvider::Anthropic), Some("sk-ant"));
        assert_eq!(credentials.key_for(LLMProvider::Together), None);
    }

    #[test]
    fn test_resolve_api_key_prefers_explicit_key() {
        let mut config = Config::default();
        config.llm.api_key = "explicit".to_string();
        config.keys_path = PathBuf::from("/no/such/keys.json");
        assert_eq!(config.resolve_api_key().unwrap(), "explicit");
    }

    #[test]
    fn test_resolve_api_key_from_keys_file() {
        let temp_dir = TempDir::new().unwrap();
        let keys_path = temp_dir.path().join("keys.json");
        std::fs::write(&keys_path, r#"{"anthropic_key": "from-file"}"#).unwrap();

        let mut config = Config::default();
        config.keys_path = keys_path;
        assert_eq!(config.resolve_api_key().unwrap(), "from-file");
    }

    #[test]
    fn test_resolve_api_key_missing() {
        // together 的环境变量在测试环境中不应存在
        if std::env::var("TOGETHER_API_KEY").is_ok() {
            return;
        }
        let mut config = Config::default();
        config.llm.provider = LLMProvider::Together;
        config.keys_path = PathBuf::from("/no/such/keys.json");

        let err = config.resolve_api_key().unwrap_err();
        assert!(matches!(err, GenerationError::MissingResource(_)));
    }
}
