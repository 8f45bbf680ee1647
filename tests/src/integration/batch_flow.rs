//! # Batch Flow Tests
//!
//! Drives `service::run` against files in a temp directory, a shell script
//! posing as `ethdo` and a wiremock beacon node.
//!
//! The fake `ethdo` appends `<validator or private key>|<mnemonic>` to
//! `calls.log` next to itself and answers by validator reference:
//!
//! | reference contains | stderr | exit |
//! |--------------------|--------|------|
//! | `exiting` | `... active_exiting` | 1 |
//! | `unknown` | `unknown validator` | 1 |
//! | `broken` | `failed to obtain validator info` | 1 |
//! | anything else | (stdout `exit submitted`) | 0 |

#[cfg(all(test, unix))]
mod tests {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use std::time::Duration;

    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use validator_exit::config::{ExitConfig, KeySourceConfig, PollConfig, RunConfig};
    use validator_exit::service;
    use validator_exit::{BatchReport, ExitError, ExitOutcome, ResumeHint, Shutdown};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const MNEMONIC: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    const FAKE_ETHDO: &str = r#"#!/bin/sh
ref=""
mnemonic=""
for arg in "$@"; do
  case "$arg" in
    --validator=*) ref="${arg#--validator=}" ;;
    --private-key=*) ref="${arg#--private-key=}" ;;
    --mnemonic=*) mnemonic="${arg#--mnemonic=}" ;;
  esac
done
echo "$ref|$mnemonic" >> "$(dirname "$0")/calls.log"
case "$ref" in
  *exiting*) echo "validator is in state active_exiting" >&2; exit 1 ;;
  *unknown*) echo "unknown validator" >&2; exit 1 ;;
  *broken*) echo "failed to obtain validator info" >&2; exit 1 ;;
esac
echo "exit submitted"
"#;

    const OPERATORS: &str = r#"
operators:
  - name: alpha
    keys:
      - "0xaaa1"
      - "0xaaa2"
  - name: beta
    keys:
      - "0xbbb1"
"#;

    /// Temp directory holding the fake `ethdo` and the input files.
    struct Workspace {
        dir: TempDir,
    }

    impl Workspace {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let ethdo = dir.path().join("ethdo");
            fs::write(&ethdo, FAKE_ETHDO).unwrap();
            fs::set_permissions(&ethdo, fs::Permissions::from_mode(0o755)).unwrap();
            Self { dir }
        }

        fn write(&self, name: &str, content: &str) -> PathBuf {
            let path = self.dir.path().join(name);
            fs::write(&path, content).unwrap();
            path
        }

        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        fn with_env_file(&self) -> PathBuf {
            self.write(".env", &format!("export MNEMONIC=\"{MNEMONIC}\"\n"))
        }

        /// Lines written by the fake `ethdo`, in call order.
        fn calls(&self) -> Vec<String> {
            fs::read_to_string(self.path("calls.log"))
                .map(|log| log.lines().map(str::to_string).collect())
                .unwrap_or_default()
        }

        fn exit_config(&self, connection: &str) -> ExitConfig {
            ExitConfig {
                connection: connection.to_string(),
                ethdo_bin: self.path("ethdo"),
                key_delay: Duration::ZERO,
                poll: PollConfig {
                    retry_delay: Duration::ZERO,
                    request_timeout: Duration::from_secs(5),
                    ..PollConfig::default()
                },
                ..ExitConfig::default()
            }
        }
    }

    fn operators_run(workspace: &Workspace, operator: Option<&str>) -> RunConfig {
        let mut run = RunConfig::new(KeySourceConfig::Operators {
            path: workspace.write("operators.yaml", OPERATORS),
            operator: operator.map(str::to_string),
        });
        run.credentials_file = workspace.path(".env");
        run
    }

    fn private_keys_run(workspace: &Workspace, dump: &str) -> RunConfig {
        RunConfig::new(KeySourceConfig::PrivateKeys {
            path: workspace.write("keys.txt", dump),
        })
    }

    async fn mount_status(server: &MockServer, validator_id: &str, status: &str, calls: u64) {
        Mock::given(method("GET"))
            .and(path(format!(
                "/eth/v1/beacon/states/head/validators/{validator_id}"
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "index": "1", "status": status }
            })))
            .expect(calls)
            .mount(server)
            .await;
    }

    async fn forbid_status_queries(server: &MockServer) {
        Mock::given(path_regex("^/eth/v1/beacon/states/head/validators/.*$"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(server)
            .await;
    }

    fn called_with_mnemonic(reference: &str) -> String {
        format!("{reference}|{MNEMONIC}")
    }

    // =============================================================================
    // MNEMONIC MODE
    // =============================================================================

    /// Operator filter, index resolution and status polling end to end
    #[tokio::test]
    async fn test_operator_keys_exit_and_poll() {
        let workspace = Workspace::new();
        workspace.with_env_file();
        let mut run = operators_run(&workspace, Some("alpha"));
        run.index_file = Some(workspace.write(
            "offline-prep.json",
            r#"{"validators": [{"pubkey": "0xAAA2", "index": "7"}, {"pubkey": "0xbbb1", "index": 9}]}"#,
        ));

        let server = MockServer::start().await;
        mount_status(&server, "0xaaa1", "active_exiting", 1).await;
        // Non-terminal first, then terminal.
        Mock::given(method("GET"))
            .and(path("/eth/v1/beacon/states/head/validators/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "status": "active_ongoing" }
            })))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        mount_status(&server, "7", "exited_unslashed", 1).await;

        let report = service::run(workspace.exit_config(&server.uri()), run, Shutdown::never())
            .await
            .unwrap();

        let BatchReport::Completed(summary) = &report else {
            panic!("expected completion, got {report:?}");
        };
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.count(ExitOutcome::Success), 2);
        assert_eq!(report.exit_code(), 0);
        assert_eq!(
            workspace.calls(),
            vec![called_with_mnemonic("0xaaa1"), called_with_mnemonic("7")]
        );
    }

    /// Known validator states are reported and the batch moves on
    #[tokio::test]
    async fn test_known_states_do_not_halt() {
        let workspace = Workspace::new();
        workspace.with_env_file();
        let operators = r#"
operators:
  - name: gamma
    keys: ["0xunknown1", "0xexiting1", "0xccc3"]
"#;
        let mut run = RunConfig::new(KeySourceConfig::Operators {
            path: workspace.write("gamma.yaml", operators),
            operator: None,
        });
        run.credentials_file = workspace.path(".env");

        let mut exit = workspace.exit_config("http://127.0.0.1:9");
        exit.wait_for_status = false;

        let report = service::run(exit, run, Shutdown::never()).await.unwrap();

        let summary = report.summary();
        assert!(matches!(report, BatchReport::Completed(_)));
        assert_eq!(summary.count(ExitOutcome::UnknownValidator), 1);
        assert_eq!(summary.count(ExitOutcome::AlreadyExiting), 1);
        assert_eq!(summary.count(ExitOutcome::Success), 1);
        assert_eq!(workspace.calls().len(), 3);
    }

    /// A failed exit stops the batch before the next key
    #[tokio::test]
    async fn test_failure_halts_before_next_key() {
        let workspace = Workspace::new();
        workspace.with_env_file();
        let operators = r#"
operators:
  - name: delta
    keys: ["0xddd1", "0xbroken", "0xddd3"]
"#;
        let mut run = RunConfig::new(KeySourceConfig::Operators {
            path: workspace.write("delta.yaml", operators),
            operator: Some("delta".to_string()),
        });
        run.credentials_file = workspace.path(".env");

        let server = MockServer::start().await;
        mount_status(&server, "0xddd1", "active_exiting", 1).await;

        let report = service::run(workspace.exit_config(&server.uri()), run, Shutdown::never())
            .await
            .unwrap();

        match &report {
            BatchReport::Halted {
                index,
                label,
                detail,
                ..
            } => {
                assert_eq!(*index, 1);
                assert_eq!(label, "0xbroken");
                assert_eq!(detail, "failed to obtain validator info");
            }
            other => panic!("expected halt, got {other:?}"),
        }
        assert_eq!(report.exit_code(), 1);
        assert_eq!(workspace.calls().len(), 2);
    }

    /// Resume gate skips ahead; limit applies before it
    #[tokio::test]
    async fn test_resume_from_with_limit() {
        let workspace = Workspace::new();
        workspace.with_env_file();
        let mut run = operators_run(&workspace, None);
        run.limit = Some(2);
        run.resume_from = Some("0xaaa2".to_string());

        let mut exit = workspace.exit_config("http://127.0.0.1:9");
        exit.wait_for_status = false;

        let report = service::run(exit, run, Shutdown::never()).await.unwrap();

        assert_eq!(report.summary().skipped, 1);
        assert_eq!(report.summary().processed, 1);
        assert_eq!(workspace.calls(), vec![called_with_mnemonic("0xaaa2")]);
    }

    /// A run interrupted before it starts submits nothing
    #[tokio::test]
    async fn test_interrupted_run_submits_nothing() {
        let workspace = Workspace::new();
        workspace.with_env_file();
        let run = operators_run(&workspace, Some("alpha"));
        let (tx, shutdown) = Shutdown::channel();
        tx.send(true).unwrap();

        let report = service::run(workspace.exit_config("http://127.0.0.1:9"), run, shutdown)
            .await
            .unwrap();

        match report {
            BatchReport::Interrupted { hint, .. } => assert_eq!(hint, ResumeHint::NotStarted),
            other => panic!("expected interrupt, got {other:?}"),
        }
        assert!(workspace.calls().is_empty());
    }

    // =============================================================================
    // PRIVATE-KEY MODE
    // =============================================================================

    /// Private keys are passed directly and never polled
    #[tokio::test]
    async fn test_private_keys_skip_polling() {
        let workspace = Workspace::new();
        let dump = "\
validator 0
  privateKey: \"0x11\"
validator 1
  privateKey: '0x22'
validator 2
  privateKey: 0x33
not a key line
";
        let mut run = private_keys_run(&workspace, dump);
        run.start_index = 1;
        run.resume_from = Some("0x11".to_string());

        let server = MockServer::start().await;
        forbid_status_queries(&server).await;

        let report = service::run(workspace.exit_config(&server.uri()), run, Shutdown::never())
            .await
            .unwrap();

        assert!(matches!(report, BatchReport::Completed(_)));
        assert_eq!(report.summary().processed, 2);
        assert_eq!(workspace.calls(), vec!["0x22|", "0x33|"]);
    }

    // =============================================================================
    // PRE-FLIGHT FAILURES
    // =============================================================================

    #[tokio::test]
    async fn test_missing_env_file_is_fatal() {
        let workspace = Workspace::new();
        let run = operators_run(&workspace, None);

        let result =
            service::run(workspace.exit_config("http://127.0.0.1:9"), run, Shutdown::never()).await;

        assert!(matches!(result, Err(ExitError::CredentialsNotFound { .. })));
        assert!(workspace.calls().is_empty());
    }

    #[tokio::test]
    async fn test_env_file_without_mnemonic_is_fatal() {
        let workspace = Workspace::new();
        workspace.write(".env", "OTHER=value\n");
        let run = operators_run(&workspace, None);

        let result =
            service::run(workspace.exit_config("http://127.0.0.1:9"), run, Shutdown::never()).await;

        assert!(matches!(result, Err(ExitError::Load(_))));
        assert!(workspace.calls().is_empty());
    }

    #[tokio::test]
    async fn test_start_index_out_of_bounds_is_fatal() {
        let workspace = Workspace::new();
        let mut run = private_keys_run(&workspace, "privateKey: 0x11\n");
        run.start_index = 1;

        let result =
            service::run(workspace.exit_config("http://127.0.0.1:9"), run, Shutdown::never()).await;

        assert!(matches!(
            result,
            Err(ExitError::StartIndexOutOfBounds {
                start_index: 1,
                total: 1
            })
        ));
        assert!(workspace.calls().is_empty());
    }

    #[tokio::test]
    async fn test_non_positive_limit_is_fatal() {
        let workspace = Workspace::new();
        let mut run = private_keys_run(&workspace, "privateKey: 0x11\n");
        run.limit = Some(0);

        let result =
            service::run(workspace.exit_config("http://127.0.0.1:9"), run, Shutdown::never()).await;

        assert!(matches!(result, Err(ExitError::Config(_))));
    }

    #[tokio::test]
    async fn test_missing_key_file_is_fatal() {
        let workspace = Workspace::new();
        let run = RunConfig::new(KeySourceConfig::PrivateKeys {
            path: workspace.path("absent.txt"),
        });

        let result =
            service::run(workspace.exit_config("http://127.0.0.1:9"), run, Shutdown::never()).await;

        assert!(matches!(result, Err(ExitError::Load(_))));
    }
}
