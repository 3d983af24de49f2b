use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const SNAPSHOT: &str = r#"[
  {"id": 1, "livro": "B", "autor": "Autor B", "area": "classicos", "imagem": "b.jpg"},
  {"id": 2, "livro": "A", "autor": "Autor A", "area": "classicos", "download": "https://example.com/a.pdf"},
  {"id": 3, "livro": "C", "autor": "Ana Paula", "area": "lideranca", "link": "https://youtu.be/dQw4w9WgXcQ"},
  {"id": 4, "livro": "Análise do Direito", "autor": "Miguel Reale", "area": null}
]"#;

fn setup() -> anyhow::Result<tempfile::TempDir> {
    let temp = tempfile::TempDir::new()?;
    std::fs::write(temp.path().join("snapshot.json"), SNAPSHOT)?;
    Ok(temp)
}

fn cmd(temp: &Path) -> Command {
    let mut cmd = Command::cargo_bin("biblioteca").expect("biblioteca binary");
    cmd.env_remove("BIBLIOTECA_STORE_URL")
        .arg("--snapshot")
        .arg(temp.join("snapshot.json"))
        .arg("--state-dir")
        .arg(temp.join("state"));
    cmd
}

#[test]
fn areas_prints_counts_per_area() -> anyhow::Result<()> {
    let temp = setup()?;
    cmd(temp.path())
        .arg("areas")
        .assert()
        .success()
        .stdout(predicate::str::contains("classicos (2 livros)"))
        .stdout(predicate::str::contains("lideranca (1 livro)"))
        .stdout(predicate::str::contains("B <b.jpg>"));
    Ok(())
}

#[test]
fn list_sorts_by_title_and_reports_downloads() -> anyhow::Result<()> {
    let temp = setup()?;
    let output = cmd(temp.path())
        .args(["list", "--area", "classicos"])
        .output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.starts_with("classicos: 2 livros, 1 para download\n"));
    let a = stdout.find("#2 A").expect("A listed");
    let b = stdout.find("#1 B").expect("B listed");
    assert!(a < b);
    Ok(())
}

#[test]
fn list_for_unknown_area_shows_no_books() -> anyhow::Result<()> {
    let temp = setup()?;
    cmd(temp.path())
        .args(["list", "--area", "Classicos"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nenhum livro encontrado"));
    Ok(())
}

#[test]
fn search_matches_title_and_author_without_accents() -> anyhow::Result<()> {
    let temp = setup()?;
    cmd(temp.path())
        .args(["search", "--query", "ana"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#3 C"))
        .stdout(predicate::str::contains("#4 Análise do Direito"));

    cmd(temp.path())
        .args(["search", "--query", "a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 2 characters"));
    Ok(())
}

#[test]
fn open_and_favorite_persist_to_library() -> anyhow::Result<()> {
    let temp = setup()?;
    cmd(temp.path())
        .args(["open", "--area", "lideranca", "--id", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("por Ana Paula"))
        .stdout(predicate::str::contains("Ler agora: vídeo dQw4w9WgXcQ"));

    cmd(temp.path())
        .args(["favorite", "--area", "lideranca", "--id", "3"])
        .assert()
        .success()
        .stdout("favoritos: [3]\n");

    cmd(temp.path())
        .args(["favorite", "--area", "lideranca", "--id", "999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("book 999 not found"));

    cmd(temp.path())
        .arg("library")
        .assert()
        .success()
        .stdout(predicate::str::contains("Favoritos\n  #3 C - Ana Paula ♥"));

    cmd(temp.path())
        .args(["favorite", "--area", "lideranca", "--id", "3", "--remove"])
        .assert()
        .success()
        .stdout("favoritos: []\n");
    Ok(())
}

#[test]
fn browse_reads_commands_from_stdin() -> anyhow::Result<()> {
    let temp = setup()?;
    cmd(temp.path())
        .arg("browse")
        .write_stdin("area classicos\nopen 2\nback\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Baixar: https://example.com/a.pdf"))
        .stdout(predicate::str::contains("#2 A - Autor A ✓"));
    Ok(())
}

#[test]
fn rust_log_debug_emits_debug_line_to_stderr() -> anyhow::Result<()> {
    let temp = setup()?;
    cmd(temp.path())
        .env("RUST_LOG", "debug")
        .arg("library")
        .assert()
        .success()
        .stderr(predicate::str::contains("parsed cli"));
    Ok(())
}

#[test]
fn missing_store_url_is_reported() {
    let mut cmd = Command::cargo_bin("biblioteca").expect("biblioteca binary");
    cmd.env_remove("BIBLIOTECA_STORE_URL")
        .arg("areas")
        .assert()
        .failure()
        .stderr(predicate::str::contains("BIBLIOTECA_STORE_URL is required"));
}
