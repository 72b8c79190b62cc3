//! End-to-End Tests for the Gym Pulse Timer CLI.
//!
//! These tests run the compiled binary against a temporary presets file:
//! - Preset save, list, show, rename and delete
//! - A zero-length session running to completion
//! - Cue previews
//! - Error reporting and shell completions

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn presets_path(&self) -> PathBuf {
        self.dir.path().join("presets.json")
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.json")
    }

    /// The binary with presets and config isolated in the sandbox.
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("gympulse").unwrap();
        cmd.env_remove("RUST_LOG")
            .env("GYMPULSE_PRESETS", self.presets_path())
            .env("GYMPULSE_CONFIG", self.config_path());
        cmd
    }
}

fn read_presets(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

// ============================================================================
// Presets
// ============================================================================

mod presets_workflow {
    use super::*;

    #[test]
    fn test_list_empty() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["presets", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No saved presets"));
    }

    #[test]
    fn test_save_list_show() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["presets", "save", "Tabata", "-g", "10", "-w", "20", "-r", "10", "--rounds", "8"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Saved preset 'Tabata'"));

        let stored = read_presets(&sandbox.presets_path());
        assert_eq!(stored[0]["name"], "Tabata");
        assert_eq!(stored[0]["workSeconds"], 20);
        assert_eq!(stored[0]["rounds"], 8);

        sandbox
            .cmd()
            .args(["presets", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Tabata"))
            .stdout(predicate::str::contains(
                "Get Ready 0:10, Work 0:20, Rest 0:10, Sets 1, Rounds 8",
            ));

        sandbox
            .cmd()
            .args(["presets", "show", "tabata"])
            .assert()
            .success()
            .stdout(predicate::str::contains("work:      0:20"))
            .stdout(predicate::str::contains("voice:     on"));
    }

    #[test]
    fn test_save_clamps_zero_work() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["presets", "save", "Quick", "-w", "0", "-r", "0", "--no-voice"])
            .assert()
            .success();

        let stored = read_presets(&sandbox.presets_path());
        assert_eq!(stored[0]["workSeconds"], 1);
        assert_eq!(stored[0]["restSeconds"], 1);
        assert_eq!(stored[0]["voiceEnabled"], false);
    }

    #[test]
    fn test_rename_and_delete() {
        let sandbox = Sandbox::new();
        sandbox.cmd().args(["presets", "save", "Old"]).assert().success();

        sandbox
            .cmd()
            .args(["presets", "rename", "old", "  Legs  "])
            .assert()
            .success()
            .stdout(predicate::str::contains("Renamed 'Old' to 'Legs'"));

        sandbox
            .cmd()
            .args(["presets", "delete", "Legs"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Deleted preset 'Legs'"));

        sandbox
            .cmd()
            .args(["presets", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No saved presets"));
    }

    #[test]
    fn test_unknown_preset_fails() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["presets", "show", "Missing"])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("no preset named 'Missing'"))
            .stderr(predicate::str::contains("hint:"));
    }
}

// ============================================================================
// Run
// ============================================================================

mod run_workflow {
    use super::*;

    #[test]
    fn test_zero_length_session_completes() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args([
                "run", "-g", "0", "-w", "0", "-r", "0", "--sets", "2", "--rounds", "2",
                "--no-sound", "--no-voice",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("COMPLETE"))
            .stdout(predicate::str::contains("Session complete"));
    }

    #[test]
    fn test_run_from_preset_with_override() {
        let sandbox = Sandbox::new();
        sandbox.cmd().args(["presets", "save", "Short"]).assert().success();

        sandbox
            .cmd()
            .args([
                "run", "--preset", "Short", "-g", "0", "-w", "0", "-r", "0", "--no-sound",
                "--no-voice",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Rounds 4"))
            .stdout(predicate::str::contains("Session complete"));
    }

    #[test]
    fn test_run_rejects_invalid_sets() {
        let sandbox = Sandbox::new();
        sandbox.cmd().args(["run", "--sets", "0"]).assert().failure();
    }

    #[test]
    fn test_malformed_config_fails() {
        let sandbox = Sandbox::new();
        std::fs::write(sandbox.config_path(), "{ nope").unwrap();
        sandbox
            .cmd()
            .args(["presets", "list"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid config file"));
    }
}

// ============================================================================
// Cues
// ============================================================================

mod cue_preview {
    use super::*;

    #[test]
    fn test_preview_voice_only() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["cues", "preview", "--voice"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Voice preview"))
            .stdout(predicate::str::contains("» Get ready"))
            .stdout(predicate::str::contains("\x07").not());
    }

    #[test]
    fn test_preview_both_channels() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["cues", "preview"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Sound preview\n\x07"))
            .stdout(predicate::str::contains("Voice preview"));
    }
}

// ============================================================================
// Completions
// ============================================================================

mod completions {
    use super::*;

    #[test]
    fn test_bash_completions() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("gympulse"));
    }
}
