use std::fs;
use std::path::Path;

use insta::assert_snapshot;
use tempfile::TempDir;

use crate::settings::StatsSettings;
use crate::stats::{CSV_HEADER, collect_stats, project_stats};
use crate::test::fake::FakeEngine;

fn make_project(root: &Path, name: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("reconstruction.psx"), b"psx").unwrap();
}

#[test]
fn header_written_even_with_no_projects() {
    let projects = TempDir::new().unwrap();
    let output = projects.path().join("model_stats.csv");

    let engine = FakeEngine::new();
    let summary = collect_stats(
        &engine,
        projects.path(),
        "reconstruction",
        &output,
        &StatsSettings::default(),
    )
    .unwrap();

    assert_eq!(summary.total(), 0);
    assert_eq!(fs::read_to_string(&output).unwrap(), format!("{CSV_HEADER}\n"));
}

#[test]
fn one_row_per_project_in_sorted_order() {
    let projects = TempDir::new().unwrap();
    make_project(projects.path(), "colony-2");
    make_project(projects.path(), "colony-1");
    let out_dir = TempDir::new().unwrap();
    let output = out_dir.path().join("model_stats.csv");

    let engine = FakeEngine::new();
    let summary = collect_stats(
        &engine,
        projects.path(),
        "reconstruction",
        &output,
        &StatsSettings::default(),
    )
    .unwrap();

    assert_eq!(summary.completed, ["colony-1", "colony-2"]);
    assert_snapshot!(fs::read_to_string(&output).unwrap(), @r"
    Coral Number,Surface Area,Volume
    colony-1,12.5,3.25
    colony-2,12.5,3.25
    ");
}

#[test]
fn holes_closed_at_level_100_between_area_and_volume() {
    let projects = TempDir::new().unwrap();
    make_project(projects.path(), "colony-1");
    let output = projects.path().join("model_stats.csv");

    let engine = FakeEngine::new();
    collect_stats(
        &engine,
        projects.path(),
        "reconstruction",
        &output,
        &StatsSettings::default(),
    )
    .unwrap();

    let calls = engine.calls();
    assert_eq!(
        &calls[1..],
        &["surface_area", "close_holes 100", "volume"][..]
    );
}

#[test]
fn rerun_overwrites_rather_than_accumulates() {
    let projects = TempDir::new().unwrap();
    make_project(projects.path(), "colony-1");
    let output = projects.path().join("model_stats.csv");
    fs::write(&output, "stale rows\nfrom a previous run\n").unwrap();

    let engine = FakeEngine::new();
    for _ in 0..2 {
        collect_stats(
            &engine,
            projects.path(),
            "reconstruction",
            &output,
            &StatsSettings::default(),
        )
        .unwrap();
    }

    let contents = fs::read_to_string(&output).unwrap();
    assert_eq!(contents, format!("{CSV_HEADER}\ncolony-1,12.5,3.25\n"));
}

#[test]
fn missing_project_is_recorded_and_the_batch_continues() {
    let projects = TempDir::new().unwrap();
    make_project(projects.path(), "colony-1");
    fs::create_dir_all(projects.path().join("colony-0")).unwrap(); // no .psx inside
    let out_dir = TempDir::new().unwrap();
    let output = out_dir.path().join("model_stats.csv");

    let engine = FakeEngine::new();
    let summary = collect_stats(
        &engine,
        projects.path(),
        "reconstruction",
        &output,
        &StatsSettings::default(),
    )
    .unwrap();

    assert_eq!(summary.completed, ["colony-1"]);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].name, "colony-0");

    let contents = fs::read_to_string(&output).unwrap();
    assert_eq!(contents.lines().count(), 2);
}

#[test]
fn custom_hole_level_reaches_the_engine() {
    let projects = TempDir::new().unwrap();
    make_project(projects.path(), "colony-1");

    let engine = FakeEngine::new();
    let stats = project_stats(
        &engine,
        &projects.path().join("colony-1/reconstruction.psx"),
        &StatsSettings { hole_level: 42 },
    )
    .unwrap();

    assert_eq!(stats.surface_area, 12.5);
    assert_eq!(stats.volume, 3.25);
    assert!(engine.calls().contains(&"close_holes 42".to_owned()));
}
