// Allow deprecated APIs (assert_cmd::cargo_bin is deprecated but still works)
#![allow(deprecated)]

use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::process::Command;
use tempfile::tempdir;

fn write_png(path: &std::path::Path, width: u32, height: u32) {
    image::RgbaImage::from_pixel(width, height, image::Rgba([214, 0, 28, 255]))
        .save(path)
        .unwrap();
}

#[test]
fn test_sizes_lists_catalog() -> Result<(), Box<dyn std::error::Error>> {
    Command::cargo_bin("poster")?
        .arg("sizes")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("A5 (148 x 210 mm)")
                .and(predicate::str::contains("A4 (210 x 297 mm)"))
                .and(predicate::str::contains("A3 (297 x 420 mm)"))
                .and(predicate::str::contains("Story (9:16)"))
                .and(predicate::str::contains("Square (1:1)"))
                .and(predicate::str::contains("preview 707 x 1000")),
        );
    Ok(())
}

#[rstest]
#[case("a4", false, (707, 1000))]
#[case("square", false, (1000, 1000))]
#[case("story", true, (1080, 1920))]
fn test_render_writes_png(
    #[case] paper: &str,
    #[case] print: bool,
    #[case] expected: (u32, u32),
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let output = dir.path().join("poster.png");

    let mut cmd = Command::cargo_bin("poster")?;
    cmd.arg("render")
        .arg("-o")
        .arg(&output)
        .arg("--paper")
        .arg(paper)
        .arg("--text")
        .arg("stop judi\\nsekarang");
    if print {
        cmd.arg("--print");
    }
    cmd.assert().success();

    let decoded = image::open(&output)?;
    assert_eq!((decoded.width(), decoded.height()), expected);
    Ok(())
}

#[test]
fn test_render_with_background_into_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let background = dir.path().join("bg.png");
    write_png(&background, 30, 10);
    let out_dir = dir.path().join("out");
    std::fs::create_dir(&out_dir)?;

    Command::cargo_bin("poster")?
        .arg("render")
        .arg("-b")
        .arg(&background)
        .arg("-o")
        .arg(&out_dir)
        .arg("--color")
        .arg("#FFFFFF")
        .assert()
        .success()
        .stdout(predicate::str::contains("ANTIJUDOL_"));

    let entries: Vec<_> = std::fs::read_dir(&out_dir)?.collect::<Result<_, _>>()?;
    assert_eq!(entries.len(), 1);
    let name = entries[0].file_name().to_string_lossy().to_string();
    assert!(name.starts_with("ANTIJUDOL_") && name.ends_with(".png"));

    let decoded = image::open(entries[0].path())?.to_rgba8();
    assert_eq!(decoded.dimensions(), (707, 1000));
    // Cover-fitted background fills the top-left corner
    assert_eq!(decoded.get_pixel(2, 2).0, [214, 0, 28, 255]);
    Ok(())
}

#[test]
fn test_render_rejects_unreadable_background() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let background = dir.path().join("bg.png");
    std::fs::write(&background, b"not an image")?;

    Command::cargo_bin("poster")?
        .arg("render")
        .arg("-b")
        .arg(&background)
        .arg("-o")
        .arg(dir.path().join("out.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Gambar tidak bisa dibaca."));
    Ok(())
}

#[rstest]
#[case("--color", "#123456")]
#[case("--paper", "letter")]
fn test_render_rejects_invalid_options(
    #[case] flag: &str,
    #[case] value: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    Command::cargo_bin("poster")?
        .arg("render")
        .arg("-o")
        .arg(dir.path().join("out.png"))
        .arg(flag)
        .arg(value)
        .assert()
        .failure()
        .stderr(predicate::str::contains(value));
    Ok(())
}

#[test]
fn test_generate_requires_api_key() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    Command::cargo_bin("poster")?
        .env_remove("GEMINI_API_KEY")
        .env_remove("API_KEY")
        .arg("generate")
        .arg("-o")
        .arg(dir.path().join("out.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
    Ok(())
}

#[test]
fn test_render_reports_missing_font_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    Command::cargo_bin("poster")?
        .arg("render")
        .arg("-o")
        .arg(dir.path().join("out.png"))
        .arg("--font-file")
        .arg(dir.path().join("missing.ttf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read font file"));
    Ok(())
}
