use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }

    pub fn storage(&self) -> PathBuf {
        self.root.path().join("storage")
    }

    /// stackyard.yml を書き込む
    pub fn write_config(&self, content: &str) {
        fs::write(self.root.path().join("stackyard.yml"), content).unwrap();
    }

    /// docker-compose の代わりに使うスタブスクリプトを書き込み、設定に登録する
    #[allow(dead_code)]
    pub fn write_fake_compose(&self, script: &str, mode: &str) {
        let script_path = self.root.path().join("fake-compose.sh");
        fs::write(&script_path, script).unwrap();
        self.write_config(&format!(
            "storage_path: {}\nmode: {}\ncompose_command: [\"sh\", \"{}\"]\ncommand_timeout_secs: 30\n",
            self.storage().display(),
            mode,
            script_path.display()
        ));
    }

    /// プロジェクトディレクトリで実行する stackyard コマンド
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("stackyard").unwrap();
        cmd.current_dir(self.path())
            .env_remove("STACKYARD_CONFIG_PATH")
            .env_remove("STACKYARD_MODE")
            .env("STACKYARD_STORAGE_PATH", self.storage());
        cmd
    }
}
