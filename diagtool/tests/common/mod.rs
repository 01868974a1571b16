use assert_cmd::assert::Assert;
use assert_cmd::Command;
use assert_fs::TempDir;
use std::path::PathBuf;

pub struct DiagtoolTestHelper {
    pub output_dir: TempDir,
}

impl DiagtoolTestHelper {
    pub fn new() -> Self {
        Self {
            output_dir: TempDir::new().unwrap(),
        }
    }

    pub fn output_path(&self) -> String {
        self.output_dir.path().display().to_string()
    }

    pub fn run_command(&self, args: &[&str]) -> Assert {
        let mut cmd = Command::cargo_bin("diagtool").unwrap();
        cmd.current_dir(self.output_dir.path())
            .env("NO_COLOR", "1")
            .args(args)
            .assert()
    }

    pub fn collect(&self) -> Assert {
        self.run_command(&["collect", "-o", &self.output_path()])
    }

    /// The run workspaces created under the output directory.
    pub fn run_workdirs(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.output_dir.path())
            .unwrap()
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect()
    }

    pub fn clean_output_dir(self) {
        self.output_dir.close().unwrap();
    }
}
