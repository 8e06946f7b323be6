use std::path::PathBuf;
use std::process::Command;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_scanreel")
}

fn tmp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("scanreel_cli_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn scene_subcommand_prints_valid_json() {
    let out = Command::new(bin()).arg("scene").output().unwrap();
    assert!(out.status.success());

    let scene: scanreel::Scene = serde_json::from_slice(&out.stdout).unwrap();
    scene.validate().unwrap();
    assert_eq!(scene.frames, 90);
    assert_eq!(scene.subjects.len(), 4);
}

#[test]
fn frame_subcommand_writes_png() {
    let out_path = tmp_dir().join("frame0.png");
    let _ = std::fs::remove_file(&out_path);

    let status = Command::new(bin())
        .args(["frame", "--index", "0", "--out"])
        .arg(&out_path)
        .status()
        .unwrap();
    assert!(status.success());

    let bytes = std::fs::read(&out_path).unwrap();
    assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));

    let _ = std::fs::remove_file(&out_path);
}

#[test]
fn render_subcommand_writes_gif_from_scene_file() {
    let dir = tmp_dir();
    let scene_path = dir.join("scene.json");
    let out_path = dir.join("smoke.gif");
    let _ = std::fs::remove_file(&out_path);

    let mut scene = scanreel::Scene::demo();
    scene.canvas = scanreel::Canvas {
        width: 120,
        height: 80,
    };
    scene.frames = 8;
    std::fs::write(&scene_path, serde_json::to_string_pretty(&scene).unwrap()).unwrap();

    let status = Command::new(bin())
        .args(["render", "--scene"])
        .arg(&scene_path)
        .arg("--out")
        .arg(&out_path)
        .status()
        .unwrap();
    assert!(status.success());

    let bytes = std::fs::read(&out_path).unwrap();
    assert!(bytes.starts_with(b"GIF89a"));
    assert_eq!(*bytes.last().unwrap(), 0x3B);

    let _ = std::fs::remove_file(&out_path);
    let _ = std::fs::remove_file(&scene_path);
}

#[test]
fn render_respects_keep_existing() {
    let dir = tmp_dir();
    let out_path = dir.join("keep.gif");
    std::fs::write(&out_path, b"old bytes").unwrap();

    let status = Command::new(bin())
        .args(["render", "--frames", "2", "--keep-existing", "--out"])
        .arg(&out_path)
        .status()
        .unwrap();
    assert!(!status.success());
    assert_eq!(std::fs::read(&out_path).unwrap(), b"old bytes");

    let _ = std::fs::remove_file(&out_path);
}
