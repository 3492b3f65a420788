use std::{fs, path::PathBuf};

use tempfile::tempdir;

use cartouche_cli::{Args, run};

/// Collects all .toml scene files from a directory
fn collect_scene_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml")
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

/// Demo scenes live at the workspace root
fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args_for(input: &PathBuf, output: PathBuf) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_demos = collect_scene_files(demos_dir());
    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let output_path = temp_dir.path().join(format!(
            "{}.svg",
            demo_path.file_stem().unwrap().to_string_lossy()
        ));

        match run(&args_for(demo_path, output_path.clone())) {
            Ok(()) => {
                let svg = fs::read_to_string(&output_path).expect("Output should exist");
                assert!(svg.contains("data-panel="), "{} has no panels", demo_path.display());
            }
            Err(e) => failed_demos.push((demo_path.clone(), e)),
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }

    println!("All {} valid demos passed", valid_demos.len());
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_demos = collect_scene_files(demos_dir().join("errors"));
    assert!(!error_demos.is_empty(), "No error demos found in demos/errors/");

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let output_path = temp_dir.path().join(format!(
            "error_{}.svg",
            demo_path.file_stem().unwrap().to_string_lossy()
        ));

        if run(&args_for(demo_path, output_path.clone())).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
        assert!(!output_path.exists(), "Failed runs must not write output");
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }

    println!("All {} error demos failed as expected", error_demos.len());
}

#[test]
fn e2e_missing_config_file_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demo = demos_dir().join("connectors.toml");

    let mut args = args_for(&demo, temp_dir.path().join("out.svg"));
    args.config = Some(temp_dir.path().join("absent.toml").to_string_lossy().to_string());

    assert!(run(&args).is_err());
}
