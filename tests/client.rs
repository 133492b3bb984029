//! Client against a live router on a loopback port
use futures_util::future::BoxFuture;
use gluster_block_rest::client::{BlockClient, Credentials};
use gluster_block_rest::common::{Config, ExecError};
use gluster_block_rest::executor::CommandRunner;
use gluster_block_rest::server::command::DeleteBlockVolumeRequest;
use gluster_block_rest::server::create_router;
use gluster_block_rest::Error;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingRunner {
    calls: Mutex<Vec<Vec<String>>>,
}

impl RecordingRunner {
    fn last_args(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .last()
            .expect("no command was run")
            .clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run<'a>(
        &'a self,
        _program: &'a str,
        args: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<u8>, ExecError>> {
        self.calls.lock().unwrap().push(args.to_vec());
        Box::pin(async { Ok(br#"{"RESULT":"SUCCESS"}"#.to_vec()) })
    }
}

/// Serve the router on 127.0.0.1:0 and return its base URL
async fn spawn_server(config: Config, runner: Arc<RecordingRunner>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(&config, runner);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn auth_config() -> Config {
    let mut config = Config::default();
    config.auth.enabled = true;
    config
        .auth
        .issuers
        .insert("heketi".to_string(), "s3cret".to_string());
    config
}

fn credentials() -> Option<Credentials> {
    Some(Credentials {
        issuer: "heketi".to_string(),
        secret: "s3cret".to_string(),
    })
}

#[tokio::test]
async fn test_signed_request_with_space_in_name() {
    let runner = Arc::new(RecordingRunner::default());
    let url = spawn_server(auth_config(), runner.clone()).await;
    let client = BlockClient::new(url, credentials());

    let value = client.info("vol1", "my block").await.unwrap();

    assert_eq!(value["RESULT"], "SUCCESS");
    assert_eq!(runner.last_args(), vec!["info", "vol1/my block", "--json"]);
}

#[tokio::test]
async fn test_reserved_characters_stay_in_block_name() {
    let runner = Arc::new(RecordingRunner::default());
    let url = spawn_server(Config::default(), runner.clone()).await;
    let client = BlockClient::new(url, None);

    client.info("vol1", "blk?x").await.unwrap();
    assert_eq!(runner.last_args(), vec!["info", "vol1/blk?x", "--json"]);

    client.info("vol1", "blk#x").await.unwrap();
    assert_eq!(runner.last_args(), vec!["info", "vol1/blk#x", "--json"]);

    client
        .delete("vol1", "blk?x", &DeleteBlockVolumeRequest::default())
        .await
        .unwrap();
    assert_eq!(runner.last_args(), vec!["delete", "vol1/blk?x", "--json"]);
}

#[tokio::test]
async fn test_signed_reserved_characters_authenticate() {
    let runner = Arc::new(RecordingRunner::default());
    let url = spawn_server(auth_config(), runner.clone()).await;
    let client = BlockClient::new(url, credentials());

    client.list("vol 1").await.unwrap();
    assert_eq!(runner.last_args(), vec!["list", "vol 1", "--json"]);

    client.info("vol1", "blk?x").await.unwrap();
    assert_eq!(runner.last_args(), vec!["info", "vol1/blk?x", "--json"]);
}

#[tokio::test]
async fn test_unsigned_request_rejected_when_auth_enabled() {
    let runner = Arc::new(RecordingRunner::default());
    let url = spawn_server(auth_config(), runner.clone()).await;
    let client = BlockClient::new(url, None);

    match client.info("vol1", "block1").await {
        Err(Error::Api { status, code, .. }) => {
            assert_eq!(status, 401);
            assert_eq!(code, -1);
        }
        other => panic!("expected 401, got {:?}", other),
    }
    assert!(runner.calls.lock().unwrap().is_empty());

    client.ping().await.unwrap();
}
