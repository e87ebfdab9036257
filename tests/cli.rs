extern crate assert_cmd;
extern crate image;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn chaosplot() -> Command {
    Command::cargo_bin("chaosplot").unwrap()
}

#[test]
fn lists_the_presets() {
    chaosplot()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("pickover"))
        .stdout(predicate::str::contains("fern"))
        .stdout(predicate::str::contains("lorenz"));
}

#[test]
fn renders_a_map() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("pickover.png");
    chaosplot()
        .args(&["map", "--preset", "pickover", "--iterations", "20000", "--size", "200x150"])
        .arg("--output")
        .arg(&out)
        .assert()
        .success();
    let written = image::open(&out).unwrap().to_luma();
    assert_eq!(written.dimensions(), (200, 150));
}

#[test]
fn renders_an_ifs_with_a_palette() {
    let dir = tempdir().unwrap();
    let palette = dir.path().join("fire.txt");
    fs::write(&palette, "0 0 0\n255 128 0\n255 255 255\n").unwrap();
    let out = dir.path().join("fern.png");
    chaosplot()
        .args(&["ifs", "--preset", "fern", "--iterations", "20000", "--seed", "3"])
        .arg("--palette")
        .arg(&palette)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();
    let written = image::open(&out).unwrap().to_rgb();
    assert_eq!(written.dimensions(), (512, 512));
}

#[test]
fn renders_a_flow() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("lorenz.png");
    chaosplot()
        .args(&["flow", "--preset", "lorenz", "--iterations", "20000", "--inverse"])
        .arg("--output")
        .arg(&out)
        .assert()
        .success();
    let written = image::open(&out).unwrap().to_rgb();
    assert_eq!(written.dimensions(), (800, 800));
    // Inverse mode starts from white.
    assert_eq!(written.get_pixel(799, 0).0, [255, 255, 255]);
}

#[test]
fn renders_a_pattern() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("circles.png");
    chaosplot()
        .args(&["pattern", "--field", "circle", "--zoom", "1", "--size", "64x64"])
        .arg("--output")
        .arg(&out)
        .assert()
        .success();
    assert!(out.exists());
}

#[test]
fn renders_a_batch() {
    let dir = tempdir().unwrap();
    chaosplot()
        .args(&["batch", "--iterations", "5000", "--threads", "1"])
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .success();
    assert!(dir.path().join("pickover.png").exists());
    assert!(dir.path().join("koch.png").exists());
}

#[test]
fn rejects_unknown_presets() {
    chaosplot()
        .args(&["map", "--preset", "mandelbrot", "--output", "x.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown name"));
}

#[test]
fn rejects_bad_sizes() {
    chaosplot()
        .args(&["map", "--size", "wide", "--output", "x.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not parse output image size"));
}

#[test]
fn rejects_a_transient_longer_than_the_run() {
    let dir = tempdir().unwrap();
    chaosplot()
        .args(&["map", "--iterations", "100", "--settle-down", "100"])
        .arg("--output")
        .arg(dir.path().join("x.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Settle-down count 100"));
}

#[test]
fn rust_log_turns_on_pass_statistics() {
    let dir = tempdir().unwrap();
    chaosplot()
        .env("RUST_LOG", "chaosplot=debug")
        .args(&["map", "--iterations", "20000", "--size", "200x150"])
        .arg("--output")
        .arg(dir.path().join("a.png"))
        .assert()
        .success()
        .stderr(predicate::str::contains("iterating map"))
        .stderr(predicate::str::contains("pass complete"));
}

#[test]
fn pass_statistics_are_quiet_by_default() {
    let dir = tempdir().unwrap();
    chaosplot()
        .env_remove("RUST_LOG")
        .args(&["map", "--iterations", "20000", "--size", "200x150"])
        .arg("--output")
        .arg(dir.path().join("a.png"))
        .assert()
        .success()
        .stderr(predicate::str::contains("wrote image"))
        .stderr(predicate::str::contains("pass complete").not());
}
