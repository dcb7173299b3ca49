//! Configuration from files and environment: repository, auth and text generator.

mod support;

use std::io::Write;

use study_planner::auth::AuthConfig;
use study_planner::db::factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
use study_planner::db::repository::PlanRepository;
use study_planner::db::{RepositoryConfig, RestConfig};
use study_planner::generation::GenerationConfig;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_repository_type_from_env_default() {
    support::with_scoped_env(&[("REPOSITORY_TYPE", None), ("BACKEND_URL", None)], || {
        assert_eq!(RepositoryType::from_env(), RepositoryType::Local);
    });
}

#[test]
fn test_repository_type_from_env_with_backend_url() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("BACKEND_URL", Some("https://project.example.co")),
        ],
        || {
            assert_eq!(RepositoryType::from_env(), RepositoryType::Rest);
        },
    );
}

#[test]
fn test_explicit_repository_type_wins() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("memory")),
            ("BACKEND_URL", Some("https://project.example.co")),
        ],
        || {
            assert_eq!(RepositoryType::from_env(), RepositoryType::Local);
        },
    );
}

#[test]
fn test_rest_config_from_env() {
    support::with_scoped_env(
        &[
            ("BACKEND_URL", Some("https://project.example.co/")),
            ("BACKEND_SERVICE_KEY", Some("service-key")),
            ("BACKEND_TIMEOUT_SECS", Some("5")),
        ],
        || {
            let config = RestConfig::from_env().unwrap();
            assert_eq!(config.base_url, "https://project.example.co");
            assert_eq!(config.timeout_secs, 5);
        },
    );

    support::with_scoped_env(
        &[
            ("BACKEND_URL", Some("https://project.example.co")),
            ("BACKEND_SERVICE_KEY", None),
        ],
        || {
            let err = RestConfig::from_env().unwrap_err();
            assert!(err.contains("BACKEND_SERVICE_KEY"));
        },
    );
}

#[tokio::test]
async fn test_factory_from_local_config_file() {
    let file = write_config("[repository]\ntype = \"local\"\n");
    let repo = RepositoryFactory::from_config_file(file.path()).unwrap();
    assert!(repo.health_check().await.unwrap());
}

#[test]
fn test_config_file_errors() {
    let unknown = write_config("[repository]\ntype = \"postgres\"\n");
    assert!(RepositoryBuilder::new().from_config_file(unknown.path()).is_err());

    let broken = write_config("[repository\n");
    assert!(RepositoryConfig::from_file(broken.path()).is_err());

    let incomplete = write_config("[repository]\ntype = \"rest\"\n");
    assert!(RepositoryFactory::from_config_file(incomplete.path()).is_err());

    assert!(RepositoryConfig::from_file("/nonexistent/repository.toml").is_err());
}

#[test]
fn test_auth_config_from_env() {
    support::with_scoped_env(
        &[
            ("AUTH_URL", Some("https://project.example.co")),
            ("AUTH_API_KEY", Some("anon-key")),
            ("AUTH_STATIC_TOKENS", None),
        ],
        || {
            assert!(matches!(AuthConfig::from_env().unwrap(), AuthConfig::Remote { .. }));
        },
    );

    support::with_scoped_env(
        &[
            ("AUTH_URL", None),
            ("AUTH_API_KEY", None),
            (
                "AUTH_STATIC_TOKENS",
                Some("dev=7f1f6c1e-4c7c-4c55-9f3a-0d3c8e0c2a11:coach"),
            ),
        ],
        || {
            let config = AuthConfig::from_env().unwrap();
            assert!(matches!(config, AuthConfig::Static(_)));
            assert!(config.build().is_ok());
        },
    );

    support::with_scoped_env(
        &[
            ("AUTH_URL", None),
            ("AUTH_API_KEY", None),
            ("AUTH_STATIC_TOKENS", None),
        ],
        || {
            assert!(AuthConfig::from_env().is_err());
        },
    );
}

#[test]
fn test_generation_config_from_env() {
    support::with_scoped_env(
        &[
            ("LLM_API_URL", Some("http://localhost:8000/v1/")),
            ("LLM_API_KEY", Some("")),
            ("LLM_MODEL", Some("llama-3.1-8b")),
            ("LLM_TEMPERATURE", None),
            ("LLM_MAX_TOKENS", Some("2048")),
            ("LLM_TIMEOUT_SECS", None),
        ],
        || {
            let config = GenerationConfig::from_env().unwrap();
            assert_eq!(config.api_url, "http://localhost:8000/v1");
            assert_eq!(config.api_key, None);
            assert_eq!(config.model, "llama-3.1-8b");
            assert_eq!(config.max_tokens, 2048);
        },
    );

    support::with_scoped_env(
        &[("LLM_API_URL", Some("http://localhost:8000/v1")), ("LLM_TEMPERATURE", Some("warm"))],
        || {
            assert!(GenerationConfig::from_env().is_err());
        },
    );

    support::with_scoped_env(&[("LLM_API_URL", None)], || {
        assert!(GenerationConfig::from_env().is_err());
    });
}
