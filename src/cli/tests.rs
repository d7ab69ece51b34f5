#[cfg(test)]
mod tests {
    use crate::cli::{IdeaArgs, PlanArgs};
    use crate::config::LLMProvider;
    use crate::generator::plan::IdeaSelection;
    use crate::generator::prompt::ResearchMethod;
    use clap::Parser;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const IDEA_REQUIRED: [&str; 5] = [
        "astro-idea-gen",
        "--paper-cache",
        "cache/papers/dark_matter.json",
        "--idea-cache",
        "cache/ideas/dark_matter.json",
    ];

    #[test]
    fn test_idea_args_default_values() {
        let args = IdeaArgs::try_parse_from(IDEA_REQUIRED).unwrap();

        assert!(args.rag);
        assert!(args.append_existing_ideas);
        assert_eq!(args.method, "general");
        assert_eq!(args.grounding_k, 10);
        assert_eq!(args.ideas_n, 5);
        assert!(args.engine.is_none());
        assert!(args.max_tokens.is_none());
        assert!(!args.debug);
        assert!(!args.verbose);
    }

    #[test]
    fn test_idea_args_require_cache_paths() {
        assert!(IdeaArgs::try_parse_from(["astro-idea-gen"]).is_err());
        assert!(
            IdeaArgs::try_parse_from(["astro-idea-gen", "--paper-cache", "p.json"]).is_err()
        );
    }

    #[test]
    fn test_idea_args_boolish_flags() {
        let mut argv = IDEA_REQUIRED.to_vec();
        argv.extend(["--rag", "False", "--append-existing-ideas", "false"]);
        let args = IdeaArgs::try_parse_from(argv).unwrap();

        assert!(!args.rag);
        assert!(!args.append_existing_ideas);
    }

    #[test]
    fn test_idea_args_underscore_aliases() {
        let args = IdeaArgs::try_parse_from([
            "astro-idea-gen",
            "--paper_cache",
            "p.json",
            "--idea_cache",
            "i.json",
            "--ideas_n",
            "8",
            "--RAG",
            "True",
        ])
        .unwrap();

        assert_eq!(args.paper_cache, PathBuf::from("p.json"));
        assert_eq!(args.ideas_n, 8);
        assert!(args.rag);
    }

    #[test]
    fn test_idea_args_into_config_overrides() {
        let mut argv = IDEA_REQUIRED.to_vec();
        argv.extend([
            "--engine",
            "gpt-4o",
            "--provider",
            "openai",
            "--max-tokens",
            "2000",
            "--temperature",
            "0.7",
            "--top-p",
            "0.9",
            "--seed",
            "7",
            "--method",
            "data_analysis",
            "--keys",
            "secrets/keys.json",
            "--verbose",
        ]);
        let (config, request) = IdeaArgs::try_parse_from(argv)
            .unwrap()
            .into_config()
            .unwrap();

        assert_eq!(config.llm.provider, LLMProvider::OpenAI);
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.max_tokens, 2000);
        assert_eq!(config.llm.temperature, 0.7);
        assert_eq!(config.llm.top_p, 0.9);
        assert_eq!(config.llm.seed, 7);
        assert_eq!(config.keys_path, PathBuf::from("secrets/keys.json"));
        assert!(config.verbose);
        assert_eq!(request.method, ResearchMethod::DataAnalysis);
        assert_eq!(request.idea_cache, PathBuf::from("cache/ideas/dark_matter.json"));
    }

    #[test]
    fn test_idea_args_into_config_defaults() {
        let (config, request) = IdeaArgs::try_parse_from(IDEA_REQUIRED)
            .unwrap()
            .into_config()
            .unwrap();

        assert_eq!(config.llm.provider, LLMProvider::Anthropic);
        assert_eq!(config.llm.model, "claude-3-opus-20240229");
        assert_eq!(config.llm.max_tokens, 30000);
        assert_eq!(config.llm.seed, 2024);
        assert!(request.rag);
        assert_eq!(request.ideas_n, 5);
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let mut argv = IDEA_REQUIRED.to_vec();
        argv.extend(["--provider", "mistral"]);
        assert!(IdeaArgs::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_config_file_is_layered_under_cli() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("astro.toml");
        std::fs::write(
            &config_path,
            "[llm]\nprovider = \"together\"\nmodel = \"meta-llama/Llama-3-70b\"\nmax_tokens = 8000\n",
        )
        .unwrap();

        let mut argv = IDEA_REQUIRED.to_vec();
        let config_arg = config_path.to_string_lossy().to_string();
        argv.extend(["--config", config_arg.as_str(), "--max-tokens", "1000"]);
        let (config, _) = IdeaArgs::try_parse_from(argv)
            .unwrap()
            .into_config()
            .unwrap();

        assert_eq!(config.llm.provider, LLMProvider::Together);
        assert_eq!(config.llm.model, "meta-llama/Llama-3-70b");
        assert_eq!(config.llm.max_tokens, 1000);
        assert_eq!(config.llm.temperature, 1.0);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let mut argv = IDEA_REQUIRED.to_vec();
        argv.extend(["--config", "/nonexistent/astro.toml"]);
        let result = IdeaArgs::try_parse_from(argv).unwrap().into_config();
        assert!(result.is_err());
    }

    #[test]
    fn test_plan_args_preset_and_selection() {
        let (config, request) = PlanArgs::try_parse_from([
            "astro-plan-gen",
            "--idea-cache-dir",
            "cache/ideas",
            "--experiment-plan-cache-dir",
            "cache/plans",
            "--cache-name",
            "dark_matter",
            "--idea-name",
            "all",
            "--grounding-k",
            "3",
        ])
        .unwrap()
        .into_config()
        .unwrap();

        assert_eq!(config.llm.provider, LLMProvider::OpenAI);
        assert_eq!(config.llm.model, "gpt-4-1106-preview");
        assert_eq!(config.llm.temperature, 0.0);
        assert_eq!(config.llm.max_tokens, 4096);
        assert_eq!(request.selection, IdeaSelection::All);
        assert_eq!(request.method, ResearchMethod::General);
        assert_eq!(
            request.idea_cache_path(),
            PathBuf::from("cache/ideas/dark_matter.json")
        );
    }

    #[test]
    fn test_plan_args_named_idea_and_engine() {
        let (config, request) = PlanArgs::try_parse_from([
            "astro-plan-gen",
            "--idea_cache_dir",
            "ideas",
            "--experiment_plan_cache_dir",
            "plans",
            "--cache_name",
            "lensing",
            "--idea_name",
            "Galactic Dark Matter Substructure",
            "--engine",
            "claude-3-5-sonnet-20240620",
            "--provider",
            "anthropic",
            "--method",
            "observational",
        ])
        .unwrap()
        .into_config()
        .unwrap();

        assert_eq!(config.llm.provider, LLMProvider::Anthropic);
        assert_eq!(config.llm.model, "claude-3-5-sonnet-20240620");
        assert_eq!(config.llm.temperature, 0.0);
        assert_eq!(
            request.selection,
            IdeaSelection::Named("Galactic Dark Matter Substructure".to_string())
        );
        assert_eq!(request.method, ResearchMethod::Observational);
    }

    #[test]
    fn test_plan_config_file_keeps_preset_sampling() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("astro.toml");
        std::fs::write(
            &config_path,
            "[llm]\nprovider = \"openai\"\nmodel = \"gpt-4o\"\n",
        )
        .unwrap();
        let config_arg = config_path.to_string_lossy().to_string();

        let (config, _) = PlanArgs::try_parse_from([
            "astro-plan-gen",
            "--idea-cache-dir",
            "ideas",
            "--experiment-plan-cache-dir",
            "plans",
            "--cache-name",
            "lensing",
            "--idea-name",
            "all",
            "--config",
            config_arg.as_str(),
        ])
        .unwrap()
        .into_config()
        .unwrap();

        assert_eq!(config.llm.provider, LLMProvider::OpenAI);
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.temperature, 0.0);
        assert_eq!(config.llm.max_tokens, 4096);
    }

    #[test]
    fn test_plan_config_file_can_override_sampling() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("astro.toml");
        std::fs::write(&config_path, "[llm]\ntemperature = 0.3\n").unwrap();
        let config_arg = config_path.to_string_lossy().to_string();

        let (config, _) = PlanArgs::try_parse_from([
            "astro-plan-gen",
            "--idea-cache-dir",
            "ideas",
            "--experiment-plan-cache-dir",
            "plans",
            "--cache-name",
            "lensing",
            "--idea-name",
            "all",
            "--config",
            config_arg.as_str(),
        ])
        .unwrap()
        .into_config()
        .unwrap();

        assert_eq!(config.llm.temperature, 0.3);
        assert_eq!(config.llm.max_tokens, 4096);
        assert_eq!(config.llm.model, "gpt-4-1106-preview");
    }

    #[test]
    fn test_plan_args_require_idea_name() {
        let result = PlanArgs::try_parse_from([
            "astro-plan-gen",
            "--idea-cache-dir",
            "ideas",
            "--experiment-plan-cache-dir",
            "plans",
            "--cache-name",
            "lensing",
        ]);
        assert!(result.is_err());
    }
}
