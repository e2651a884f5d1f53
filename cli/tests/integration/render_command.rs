//! End-to-end tests for `taskspec render`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::fs;
use std::path::PathBuf;

use predicates::prelude::*;
use tempfile::TempDir;

use crate::cli_tests::taskspec;

const COMMAND_YAML: &str = "\
entrypoint: [python, train.py]
environment:
  image: my/trainer:1.0
  environment_variables: [EPOCHS=3]
bind_mounts:
  - host_path: /datasets
    container_path: /data
    read_only: true
resources:
  shm_size: 2GiB
";

const TEMPLATE_YAML: &str = "\
cluster_id: test-cluster
master_host: master.test
master_port: 8443
use_tls: true
agent_user_group:
  user: det
  uid: 1000
  group: det
  gid: 1000
";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("command.yaml"), COMMAND_YAML).unwrap();
        fs::write(dir.path().join("template.yaml"), TEMPLATE_YAML).unwrap();
        let files = dir.path().join("context");
        fs::create_dir_all(files.join("lib")).unwrap();
        fs::write(files.join("train.py"), "print('train')\n").unwrap();
        fs::write(files.join("lib/util.py"), "X = 1\n").unwrap();
        fs::write(dir.path().join("id_rsa"), "PRIVATE\n").unwrap();
        fs::write(dir.path().join("id_rsa.pub"), "ssh-rsa PUBLIC\n").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn render(&self, extra: &[&str]) -> serde_json::Value {
        let output = taskspec()
            .arg("render")
            .arg("--config")
            .arg(self.path("command.yaml"))
            .arg("--template")
            .arg(self.path("template.yaml"))
            .arg("--user-files")
            .arg(self.path("context"))
            .args(extra)
            .output()
            .expect("run");
        assert!(
            output.status.success(),
            "render failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("valid json")
    }
}

fn paths(fragment: &serde_json::Value) -> Vec<String> {
    fragment["archive"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["path"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn render_without_keys() {
    let fx = Fixture::new();
    let task = fx.render(&["--token", "secret-token"]);

    assert_eq!(task["description"], "cmd");
    assert_eq!(task["entrypoint"], serde_json::json!(["python", "train.py"]));
    assert_eq!(task["shm_size"], 2_147_483_648_i64);
    assert_eq!(task["task_token"], "secret-token");
    assert_eq!(task["env_vars"]["DET_MASTER"], "https://master.test:8443");
    assert_eq!(task["mounts"][0]["source"], "/datasets");
    assert_eq!(task["environment"]["image"]["cuda"], "my/trainer:1.0");

    let archives = task["archives"].as_array().unwrap();
    assert_eq!(archives.len(), 2);
    assert_eq!(archives[0]["path"], "/run/determined/workdir");
    assert_eq!(paths(&archives[0]), ["lib", "lib/util.py", "train.py"]);
    assert_eq!(archives[1]["path"], "/");
    assert!(paths(&archives[1]).is_empty());
    for item in archives[0]["archive"].as_array().unwrap() {
        assert_eq!(item["uid"], 1000);
        assert_eq!(item["gid"], 1000);
    }
}

#[test]
fn render_with_keys_adds_credentials() {
    let fx = Fixture::new();
    let private = fx.path("id_rsa");
    let public = fx.path("id_rsa.pub");
    let task = fx.render(&[
        "--private-key",
        private.to_str().unwrap(),
        "--public-key",
        public.to_str().unwrap(),
    ]);

    let platform = &task["archives"][1];
    assert_eq!(
        paths(platform),
        [
            "/run/determined/ssh",
            "/run/determined/ssh/authorized_keys",
            "/run/determined/ssh/id_rsa",
            "/run/determined/ssh/id_rsa.pub",
            "/run/determined/ssh/sshd_config",
        ]
    );
    assert_eq!(platform["archive"][2]["mode"], 0o600);
}

#[test]
fn token_is_read_from_env() {
    let fx = Fixture::new();
    let output = taskspec()
        .env("TASKSPEC_TASK_TOKEN", "from-env")
        .arg("render")
        .arg("--config")
        .arg(fx.path("command.yaml"))
        .output()
        .expect("run");
    assert!(output.status.success());
    let task: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(task["task_token"], "from-env");
    assert_eq!(task["env_vars"]["DET_TASK_TOKEN"], "from-env");
}

#[test]
fn digest_is_stable_across_runs() {
    let fx = Fixture::new();
    let digest = |fx: &Fixture| {
        let out = taskspec()
            .arg("render")
            .arg("--config")
            .arg(fx.path("command.yaml"))
            .arg("--user-files")
            .arg(fx.path("context"))
            .arg("--digest")
            .output()
            .expect("run");
        assert!(out.status.success());
        String::from_utf8(out.stdout).unwrap()
    };
    let first = digest(&fx);
    assert_eq!(first.trim().len(), 64);
    assert_eq!(first, digest(&fx));
}

#[test]
fn archives_dir_receives_one_tarball_per_fragment() {
    let fx = Fixture::new();
    let out_dir = fx.path("out");
    fx.render(&["--archives-dir", out_dir.to_str().unwrap()]);

    let mut names: Vec<String> = fs::read_dir(&out_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["00-run-determined-workdir.tar.gz", "01-root.tar.gz"]);
    assert!(out_dir.join("00-run-determined-workdir.tar.gz").is_file());
}

#[test]
fn private_key_requires_public_key() {
    let fx = Fixture::new();
    taskspec()
        .arg("render")
        .arg("--config")
        .arg(fx.path("command.yaml"))
        .arg("--private-key")
        .arg(fx.path("id_rsa"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--public-key"));
}

#[test]
fn malformed_config_is_reported() {
    let fx = Fixture::new();
    fs::write(
        fx.path("bad.yaml"),
        "entrypoint: [x]\nbind_mounts:\n  - {host_path: rel, container_path: /c}\n",
    )
    .unwrap();
    taskspec()
        .arg("render")
        .arg("--config")
        .arg(fx.path("bad.yaml"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("must be an absolute path"));
}
