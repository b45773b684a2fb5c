//! Behavior of the `runScript` action across whole batches
//!
//! Collaborators are stubbed: the fetcher hands out real files with a
//! counting release hook, the runner returns canned results. Password
//! encryption uses the real codec.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use opsdeck_action::{Action, ActionError, ActionRegistry, ResultCode};
use opsdeck_credential::{AesGcmCodec, SecureString};
use opsdeck_database::{
    ConnectionTarget, RunScriptAction, RunScriptInput, RunScriptInputs, ScriptRunner, ScriptSource,
};
use opsdeck_resource::{AccessKeys, ArtifactHandle, FetchError, ResourceFetcher};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::io::AsyncReadExt;

const PLAINTEXT: &str = "p@ssw0rd-plain";

struct StubFetcher {
    dir: tempfile::TempDir,
    fail: bool,
    fetches: AtomicUsize,
    releases: Arc<AtomicUsize>,
}

impl StubFetcher {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            fail: false,
            fetches: AtomicUsize::new(0),
            releases: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    fn leftover_files(&self) -> usize {
        std::fs::read_dir(self.dir.path()).unwrap().count()
    }
}

#[async_trait]
impl ResourceFetcher for StubFetcher {
    async fn fetch(
        &self,
        endpoint: &str,
        _keys: &AccessKeys,
    ) -> Result<ArtifactHandle, FetchError> {
        let n = self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(FetchError::NotFound {
                endpoint: endpoint.to_owned(),
            });
        }

        let path: PathBuf = self.dir.path().join(format!("script-{n}.sql"));
        std::fs::write(&path, format!("-- {endpoint}\nSELECT 1;\n")).unwrap();

        let releases = Arc::clone(&self.releases);
        Ok(ArtifactHandle::new(path, move |p| {
            releases.fetch_add(1, Ordering::SeqCst);
            let _ = std::fs::remove_file(p);
        }))
    }
}

#[derive(Default)]
struct StubRunner {
    error: Option<String>,
    calls: Mutex<Vec<(ConnectionTarget, String, String)>>,
}

impl StubRunner {
    fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_owned()),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<(ConnectionTarget, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScriptRunner for StubRunner {
    async fn run(
        &self,
        target: &ConnectionTarget,
        password: &SecureString,
        mut script: ScriptSource,
    ) -> Result<String, ActionError> {
        let mut content = String::new();
        script.read_to_string(&mut content).await.unwrap();
        self.calls
            .lock()
            .unwrap()
            .push((target.clone(), password.expose().to_owned(), content));

        match &self.error {
            Some(message) => Err(ActionError::execution(message.clone(), "")),
            None => Ok("OK".to_owned()),
        }
    }
}

fn record(guid: &str) -> RunScriptInput {
    RunScriptInput {
        endpoint: "s3://bucket/script.sql".into(),
        guid: guid.into(),
        seed: "s1".into(),
        host: "db1".into(),
        user_name: "u".into(),
        password: AesGcmCodec.seal(guid, "s1", PLAINTEXT).unwrap(),
        call_back_parameter: json!({"ref": guid}),
        ..RunScriptInput::default()
    }
}

fn batch(records: Vec<RunScriptInput>) -> RunScriptInputs {
    RunScriptInputs { inputs: records }
}

fn action(fetcher: &Arc<StubFetcher>, runner: &Arc<StubRunner>) -> RunScriptAction {
    opsdeck_log::init_test();
    RunScriptAction::new(fetcher.clone(), runner.clone())
}

#[tokio::test]
async fn successful_record_reports_success() {
    let fetcher = Arc::new(StubFetcher::new());
    let runner = Arc::new(StubRunner::default());

    let outcome = action(&fetcher, &runner).execute(batch(vec![record("g1")])).await;

    assert!(outcome.error.is_none());
    let output = &outcome.output.outputs[0];
    assert_eq!(output.guid, "g1");
    assert_eq!(output.result.code, ResultCode::Success);
    assert_eq!(output.detail, "");
    assert_eq!(output.call_back_parameter, json!({"ref": "g1"}));

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    let (target, password, script) = &calls[0];
    assert_eq!(target.host, "db1");
    assert_eq!(target.port, 3306);
    assert_eq!(target.user, "u");
    assert_eq!(password, PLAINTEXT);
    assert_eq!(script, "-- s3://bucket/script.sql\nSELECT 1;\n");
}

#[tokio::test]
async fn padded_tokens_still_recover_password() {
    let fetcher = Arc::new(StubFetcher::new());
    let runner = Arc::new(StubRunner::default());

    let mut input = record("g1 ");
    input.seed = " s1".into();
    input.password = AesGcmCodec.seal("g1 ", " s1", PLAINTEXT).unwrap();
    let outcome = action(&fetcher, &runner).execute(batch(vec![input])).await;

    assert!(outcome.error.is_none(), "{:?}", outcome.error);
    let output = &outcome.output.outputs[0];
    assert_eq!(output.guid, "g1 ");
    assert_eq!(output.result.code, ResultCode::Success);
    assert_eq!(runner.calls()[0].1, PLAINTEXT);
}

#[tokio::test]
async fn failing_execution_reports_error_with_detail() {
    let fetcher = Arc::new(StubFetcher::new());
    let runner = Arc::new(StubRunner::failing("syntax error"));

    let outcome = action(&fetcher, &runner).execute(batch(vec![record("g1")])).await;

    let output = &outcome.output.outputs[0];
    assert_eq!(output.guid, "g1");
    assert_eq!(output.result.code, ResultCode::Error);
    assert!(output.detail.contains("syntax error"));
    assert_eq!(output.result.message, output.detail);
    assert!(matches!(outcome.error, Some(ActionError::Execution { .. })));
}

#[tokio::test]
async fn outputs_follow_input_order() {
    let fetcher = Arc::new(StubFetcher::new());
    let runner = Arc::new(StubRunner::default());

    let mut records: Vec<_> = (0..6).map(|i| record(&format!("g{i}"))).collect();
    records[2].user_name.clear();
    records[4].endpoint.clear();
    let guids: Vec<_> = records.iter().map(|r| r.guid.clone()).collect();

    let outcome = action(&fetcher, &runner).execute(batch(records)).await;

    let out_guids: Vec<_> = outcome.output.outputs.iter().map(|o| o.guid.clone()).collect();
    assert_eq!(out_guids, guids);
}

#[tokio::test]
async fn validation_failure_skips_fetch_and_run() {
    let fetcher = Arc::new(StubFetcher::new());
    let runner = Arc::new(StubRunner::default());

    let mut input = record("g1");
    input.host.clear();
    let outcome = action(&fetcher, &runner).execute(batch(vec![input])).await;

    let output = &outcome.output.outputs[0];
    assert_eq!(output.result.code, ResultCode::Error);
    assert!(output.result.message.contains("Host"));
    assert_eq!(output.guid, "g1");
    assert_eq!(output.call_back_parameter, json!({"ref": "g1"}));
    assert_eq!(fetcher.fetches(), 0);
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn artifact_released_once_on_success_and_failure() {
    for runner in [StubRunner::default(), StubRunner::failing("boom")] {
        let fetcher = Arc::new(StubFetcher::new());
        let runner = Arc::new(runner);

        action(&fetcher, &runner).execute(batch(vec![record("g1")])).await;

        assert_eq!(fetcher.fetches(), 1);
        assert_eq!(fetcher.releases(), 1);
        assert_eq!(fetcher.leftover_files(), 0);
    }
}

#[tokio::test]
async fn artifact_released_when_password_cannot_be_recovered() {
    let fetcher = Arc::new(StubFetcher::new());
    let runner = Arc::new(StubRunner::default());

    let mut input = record("g1");
    input.seed = "another-seed".into();
    let outcome = action(&fetcher, &runner).execute(batch(vec![input])).await;

    assert!(matches!(outcome.error, Some(ActionError::Decryption(_))));
    assert_eq!(outcome.output.outputs[0].result.code, ResultCode::Error);
    assert_eq!(fetcher.releases(), 1);
    assert_eq!(fetcher.leftover_files(), 0);
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn fetch_failure_is_reported_without_running() {
    let fetcher = Arc::new(StubFetcher::failing());
    let runner = Arc::new(StubRunner::default());

    let outcome = action(&fetcher, &runner).execute(batch(vec![record("g1")])).await;

    let output = &outcome.output.outputs[0];
    assert_eq!(output.result.code, ResultCode::Error);
    assert_eq!(output.detail.matches("s3://bucket/script.sql").count(), 1);
    assert!(output.detail.contains("artifact not found"));
    assert!(matches!(outcome.error, Some(ActionError::Fetch { .. })));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn outputs_never_contain_password() {
    let runners = [
        StubRunner::default(),
        StubRunner::failing("access denied"),
    ];
    for runner in runners {
        let fetcher = Arc::new(StubFetcher::new());
        let runner = Arc::new(runner);
        let good = record("g1");
        let ciphertext = good.password.clone();
        let mut bad_seed = record("g2");
        bad_seed.seed = "wrong".into();
        let bad_seed_cipher = bad_seed.password.clone();

        let outcome = action(&fetcher, &runner)
            .execute(batch(vec![good, bad_seed]))
            .await;

        let wire = serde_json::to_string(&outcome.output).unwrap();
        assert!(!wire.contains(PLAINTEXT));
        assert!(!wire.contains(&ciphertext));
        assert!(!wire.contains(&bad_seed_cipher));
    }
}

#[tokio::test]
async fn middle_failure_surfaces_aggregate_error() {
    let fetcher = Arc::new(StubFetcher::new());
    let runner = Arc::new(StubRunner::default());

    let mut middle = record("g2");
    middle.host = "   ".into();
    let outcome = action(&fetcher, &runner)
        .execute(batch(vec![record("g1"), middle, record("g3")]))
        .await;

    let codes: Vec<_> = outcome.output.outputs.iter().map(|o| o.result.code).collect();
    assert_eq!(
        codes,
        vec![ResultCode::Success, ResultCode::Error, ResultCode::Success]
    );
    assert!(matches!(outcome.error, Some(ActionError::Validation(_))));
    assert_eq!(fetcher.fetches(), 2);
}

#[tokio::test]
async fn last_error_wins() {
    let fetcher = Arc::new(StubFetcher::new());
    let runner = Arc::new(StubRunner::default());

    let mut first = record("g1");
    first.host.clear();
    let mut last = record("g3");
    last.seed = "wrong".into();

    let outcome = action(&fetcher, &runner)
        .execute(batch(vec![first, record("g2"), last]))
        .await;

    assert!(matches!(outcome.error, Some(ActionError::Decryption(_))));
}

#[tokio::test]
async fn empty_batch_is_empty_success() {
    let fetcher = Arc::new(StubFetcher::new());
    let runner = Arc::new(StubRunner::default());

    let outcome = action(&fetcher, &runner).execute(batch(Vec::new())).await;

    assert!(outcome.output.outputs.is_empty());
    assert!(outcome.error.is_none());
}

#[tokio::test]
async fn explicit_and_default_ports_reach_runner() {
    let fetcher = Arc::new(StubFetcher::new());
    let runner = Arc::new(StubRunner::default());

    let mut explicit = record("g1");
    explicit.port = "3307".into();
    explicit.database_name = "app".into();
    action(&fetcher, &runner)
        .with_default_port(3310)
        .execute(batch(vec![explicit, record("g2")]))
        .await;

    let calls = runner.calls();
    assert_eq!(calls[0].0.port, 3307);
    assert_eq!(calls[0].0.database, "app");
    assert_eq!(calls[1].0.port, 3310);
}

#[tokio::test]
async fn dispatch_through_registry() {
    let fetcher = Arc::new(StubFetcher::new());
    let runner = Arc::new(StubRunner::default());
    let mut registry = ActionRegistry::new();
    registry.register(action(&fetcher, &runner));

    let handler = registry.get_action_by_name("runScript").unwrap();
    let raw = json!({"inputs": [serde_json::to_value(record("g1")).unwrap()]});
    let outcome = handler.dispatch(raw).await.unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.output["outputs"][0]["guid"], "g1");
    assert_eq!(outcome.output["outputs"][0]["result"]["code"], "SUCCESS");
    assert_eq!(
        outcome.output["outputs"][0]["callBackParameter"],
        json!({"ref": "g1"})
    );
}

#[tokio::test]
async fn undecodable_request_is_invalid_param() {
    let fetcher = Arc::new(StubFetcher::new());
    let runner = Arc::new(StubRunner::default());
    let action = action(&fetcher, &runner);

    let err = action.read_param(json!({"inputs": "not-a-list"})).unwrap_err();
    assert!(matches!(err, ActionError::InvalidParam(_)));
}
