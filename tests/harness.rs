use std::net::TcpListener;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command as TokioCommand};

/// Running server plus the temp dir holding its sled data
pub struct Server {
    pub base: String,
    pub child: Child,
    _data_dir: tempfile::TempDir,
}

impl Server {
    pub async fn stop(mut self) {
        let _ = self.child.kill().await;
    }
}

pub fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

pub async fn spawn_server(extra_env: &[(&str, &str)]) -> Server {
    let port = free_port();
    let data_dir = tempfile::TempDir::new().expect("tmpdir");

    let mut cmd = TokioCommand::new(env!("CARGO_BIN_EXE_moodshift"));
    cmd.env("MOODSHIFT_HOST", "127.0.0.1")
        .env("MOODSHIFT_PORT", port.to_string())
        .env("MOODSHIFT_DATA_DIR", data_dir.path())
        .env("MOODSHIFT_LOG", "warn")
        .kill_on_drop(true)
        .stdout(Stdio::null())
        .stderr(Stdio::inherit());
    for (key, value) in extra_env {
        cmd.env(key, value);
    }

    let mut child = cmd.spawn().expect("failed to spawn moodshift");
    let client = reqwest::Client::new();
    let base = format!("http://127.0.0.1:{}", port);
    for _ in 0..80 {
        if let Ok(resp) = client.get(format!("{}/health", &base)).send().await {
            if resp.status().is_success() {
                return Server {
                    base,
                    child,
                    _data_dir: data_dir,
                };
            }
        }
        if let Ok(Some(status)) = child.try_wait() {
            panic!("moodshift exited early with status: {:?}", status);
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    let _ = child.kill().await;
    panic!("moodshift did not start in time");
}
