use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use image::{Rgba, RgbaImage};

fn cargo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_badgepress"))
}

/// Fresh workspace holding a blank-design config, a template and an input document.
fn workspace(name: &str) -> PathBuf {
    let dir = Path::new(env!("CARGO_TARGET_TMPDIR")).join(name);
    if dir.exists() {
        fs::remove_dir_all(&dir).expect("Failed to clean workspace");
    }
    fs::create_dir_all(dir.join("conf")).expect("Failed to create workspace");

    fs::write(
        dir.join("conf/badge.json"),
        r#"{ "design": "blank", "page_margin": 2 }"#,
    )
    .unwrap();
    RgbaImage::from_pixel(120, 70, Rgba([0, 128, 0, 255]))
        .save(dir.join("conf/student.png"))
        .expect("Failed to write template");

    let attendees: Vec<String> = (0..10)
        .map(|i| format!(r#"{{ "name": "Student {i}" }}"#))
        .collect();
    fs::write(
        dir.join("people.json"),
        format!(
            r#"{{ "Student": {{ "image": "student.png", "attendees": [{}] }} }}"#,
            attendees.join(",")
        ),
    )
    .unwrap();
    dir
}

#[test]
fn test_render_from_file() {
    let dir = workspace("cli_render_from_file");
    let out = dir.join("out");

    let output = cargo_bin()
        .args(["render", "-p", "100x60", "-d", "100", "-n", "9", "-e", "50%", "-c"])
        .arg(dir.join("conf/badge.json"))
        .arg("-i")
        .arg(dir.join("people.json"))
        .arg(&out)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);

    for name in [
        "[Student] pag 01-02.tif",
        "[Student] pag 02-02.tif",
        "[Student][vuoti] pag 01-01.tif",
    ] {
        assert!(out.join(name).exists(), "{name} was not created");
    }
    assert_eq!(fs::read_dir(&out).unwrap().count(), 3);

    let page = image::open(out.join("[Student] pag 01-02.tif"))
        .unwrap()
        .to_rgba8();
    assert_eq!(page.dimensions(), (393, 236));
    assert_eq!(*page.get_pixel(7, 7), Rgba([0, 128, 0, 255]));
}

#[test]
fn test_render_from_stdin() {
    let dir = workspace("cli_render_from_stdin");
    let out = dir.join("out");
    let input = fs::read(dir.join("people.json")).unwrap();

    let mut child = cargo_bin()
        .args(["render", "-p", "A4", "-d", "72", "-n", "20", "-c"])
        .arg(dir.join("conf/badge.json"))
        .arg(&out)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");
    child.stdin.take().unwrap().write_all(&input).unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(out.join("[Student] pag 01-01.tif").exists());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Rendered 1 page(s)"), "unexpected stdout: {stdout}");
}

#[test]
fn test_missing_output_dir_fails() {
    let output = cargo_bin()
        .arg("render")
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
}

#[test]
fn test_unknown_design_fails() {
    let dir = workspace("cli_unknown_design");
    fs::write(dir.join("conf/badge.json"), r#"{ "design": "poster" }"#).unwrap();

    let output = cargo_bin()
        .arg("render")
        .arg("-c")
        .arg(dir.join("conf/badge.json"))
        .arg("-i")
        .arg(dir.join("people.json"))
        .arg(dir.join("out"))
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown design 'poster'"), "unexpected stderr: {stderr}");
    assert!(!dir.join("out").exists());
}

#[test]
fn test_designs_list() {
    let output = cargo_bin()
        .args(["designs", "list"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("fields"));
    assert!(stdout.contains("blank"));
}

#[test]
fn test_designs_show_lists_config_keys() {
    let output = cargo_bin()
        .args(["designs", "show", "Fields"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("fields[].max_width"), "unexpected stdout: {stdout}");
    assert!(stdout.contains("fonts.<name>.size"), "unexpected stdout: {stdout}");

    let output = cargo_bin()
        .args(["designs", "show", "poster"])
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
}
