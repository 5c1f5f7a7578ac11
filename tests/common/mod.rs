use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const ENV_OVERRIDES: &[&str] = &[
    "TRANSCRIPTS_API_KEY",
    "TRANSCRIPTS_BASE_URL",
    "TRANSCRIPTS_OUTPUT_DIR",
    "TRANSCRIPTS_INCLUDE_SUMMARY",
    "TRANSCRIPTS_CREATED_AFTER",
    "TRANSCRIPTS_CREATED_BEFORE",
];

#[allow(dead_code)]
pub fn run_transcripts(args: &[&str]) -> Output {
    TestEnv::new().run(args)
}

pub struct TestEnv {
    home: TempDir,
    config: TempDir,
    data: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temporary HOME dir"),
            config: tempfile::tempdir().expect("create temporary XDG config dir"),
            data: tempfile::tempdir().expect("create temporary XDG data dir"),
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> Output {
        let mut command = Command::new(env!("CARGO_BIN_EXE_transcripts"));
        command
            .args(args)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.config.path())
            .env("XDG_DATA_HOME", self.data.path());

        for key in ENV_OVERRIDES {
            command.env_remove(key);
        }
        for (key, value) in env {
            command.env(key, value);
        }

        command.output().expect("failed to execute transcripts binary")
    }

    /// Scratch directory for transcript fixtures
    #[allow(dead_code)]
    pub fn data_dir(&self) -> &Path {
        self.data.path()
    }

    #[allow(dead_code)]
    pub fn write_transcript(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.data.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create transcript parent directory");
        }
        std::fs::write(&path, contents).expect("write transcript file");
        path
    }
}

#[allow(dead_code)]
pub fn describe(output: &Output) -> String {
    format!(
        "status: {}\nstdout:\n{}\nstderr:\n{}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}
