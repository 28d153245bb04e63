//! Integration tests for the `run` command.
use powerplan::cli::{RunOpts, handle_run_command};
use powerplan::settings::Settings;
use std::path::PathBuf;
use tempfile::tempdir;

/// Get the path to the example request.
fn get_request_path() -> PathBuf {
    PathBuf::from("demos/payload1/request.json")
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var("POWERPLAN_LOG_LEVEL", "off") };

    {
        // Save results to non-existent directory to check that directory creation works
        let tempdir = tempdir().unwrap();
        let output_dir = tempdir.path().join("results");
        let opts = RunOpts {
            output_dir: Some(output_dir.clone()),
            overwrite: false,
            debug_model: true,
        };
        handle_run_command(&get_request_path(), &opts, Some(Settings::default())).unwrap();

        for file_name in [
            "production_plan.csv",
            "production_plan.json",
            "debug_dispatch_info.csv",
            "powerplan_info.log",
            "powerplan_error.log",
        ] {
            assert!(output_dir.join(file_name).is_file(), "{file_name} missing");
        }
        let plan: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(output_dir.join("production_plan.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(
            plan[0],
            serde_json::json!({"name": "gasfiredbig1", "p": 369.0})
        );
    }

    // Second time will fail because the logging is already initialised
    assert_eq!(
        handle_run_command(
            &get_request_path(),
            &RunOpts::default(),
            Some(Settings::default())
        )
        .unwrap_err()
        .chain()
        .next()
        .unwrap()
        .to_string(),
        "Failed to initialise logging."
    );
}
