// tests/destination.rs

use std::path::Path;

use tempfile::TempDir;

use zinc::errors::ZincError;
use zinc::fs::mock::MockFileSystem;
use zinc::fs::{FileSystem, RealFileSystem};
use zinc::provision::prepare_destination;

#[test]
fn test_missing_destination_is_created_with_parents() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("nested/deeper/my_app");

    let resolved = prepare_destination(&RealFileSystem, &target).unwrap();

    assert!(resolved.is_absolute());
    assert!(target.is_dir());
}

#[test]
fn test_existing_empty_directory_is_accepted_repeatedly() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("my_app");
    std::fs::create_dir(&target).unwrap();

    let first = prepare_destination(&RealFileSystem, &target).unwrap();
    let second = prepare_destination(&RealFileSystem, &target).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_non_empty_directory_is_a_path_conflict() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("my_app");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("main.go"), "package main\n").unwrap();

    match prepare_destination(&RealFileSystem, &target) {
        Err(ZincError::PathConflict(path)) => assert!(path.ends_with("my_app")),
        other => panic!("expected PathConflict, got {other:?}"),
    }
}

#[test]
fn test_existing_file_is_a_path_conflict() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("my_app");
    std::fs::write(&target, "not a directory").unwrap();

    assert!(matches!(
        prepare_destination(&RealFileSystem, &target),
        Err(ZincError::PathConflict(_))
    ));
}

#[test]
fn test_relative_path_is_resolved_against_current_dir() {
    let fs = MockFileSystem::new();
    let resolved = prepare_destination(&fs, Path::new("my_app")).unwrap();

    assert!(resolved.is_absolute());
    assert_eq!(resolved, std::env::current_dir().unwrap().join("my_app"));
    assert!(fs.is_dir(&resolved));
}

#[test]
fn test_mock_destination_rules() {
    let fs = MockFileSystem::new();
    fs.add_dir("/work/empty");
    fs.add_file("/work/full/go.mod", "module app\n");

    assert!(prepare_destination(&fs, Path::new("/work/empty")).is_ok());
    assert!(matches!(
        prepare_destination(&fs, Path::new("/work/full")),
        Err(ZincError::PathConflict(_))
    ));
    assert!(matches!(
        prepare_destination(&fs, Path::new("/work/full/go.mod")),
        Err(ZincError::PathConflict(_))
    ));
}
