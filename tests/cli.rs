use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn cvc_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("cvc");
    path
}

fn run_cvc(cwd: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = cvc_binary();
    let output = Command::new(&binary)
        .current_dir(cwd)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run cvc binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

const SAMPLE_CV: &str = "\
Jane Doe\n\
Senior Software Engineer\n\
jane@example.com\n\
\n\
Professional Experience\n\
Acme Analytics | 2020-2023\n\
Built streaming data pipelines and dashboards that served thousands of internal users every single day\n\
Globex Systems | 2017-2020\n\
Maintained billing and invoicing services while improving deployment automation and observability tooling across teams\n\
\n\
Technical Skills\n\
• Rust and Python and SQL plus assorted scripting languages for automation\n\
• Kubernetes Docker Terraform and the usual cloud infrastructure suspects on AWS\n\
• Postgres Kafka Redis and various storage systems in production\n";

fn record_lines(path: &Path) -> Vec<serde_json::Value> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn chunk_cv_end_to_end() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("cv.md"), SAMPLE_CV).unwrap();

    let (stdout, stderr, success) =
        run_cvc(tmp.path(), &["chunk", "cv.md", "--source", "cv"]);
    assert!(success, "chunk failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("chunks written: 3"), "stdout: {}", stdout);
    assert!(stdout.contains("ok"));

    let records = record_lines(&tmp.path().join("cv.chunks.jsonl"));
    assert_eq!(records.len(), 3);

    assert_eq!(records[0]["id"], "cv-0");
    assert_eq!(records[0]["chunk_type"], "experience");
    assert_eq!(records[0]["heading"], "Acme Analytics");
    assert_eq!(records[0]["parent_heading"], "Professional Experience");
    assert_eq!(records[1]["heading"], "Globex Systems");
    assert_eq!(records[2]["chunk_type"], "skills");
    assert_eq!(records[2]["heading"], "Technical Skills");

    for (i, record) in records.iter().enumerate() {
        assert_eq!(record["chunk_index"], i);
        let text = record["text"].as_str().unwrap();
        let expected = text.split_whitespace().count() as u64;
        assert_eq!(record["word_count"].as_u64().unwrap(), expected);
    }
}

#[test]
fn chunk_output_is_byte_identical_across_runs() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("cv.md"), SAMPLE_CV).unwrap();

    for out in ["a.jsonl", "b.jsonl"] {
        let (_, _, success) = run_cvc(
            tmp.path(),
            &["chunk", "cv.md", "--source", "cv", "--output", out],
        );
        assert!(success);
    }

    let a = fs::read(tmp.path().join("a.jsonl")).unwrap();
    let b = fs::read(tmp.path().join("b.jsonl")).unwrap();
    assert_eq!(a, b, "chunking is not deterministic");
}

#[test]
fn chunk_empty_document_succeeds_with_no_chunks() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("empty.md"), "").unwrap();

    let (stdout, _, success) = run_cvc(tmp.path(), &["chunk", "empty.md"]);
    assert!(success, "empty input must not fail");
    assert!(stdout.contains("chunks written: 0"));
}

#[test]
fn chunk_dry_run_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("cv.md"), SAMPLE_CV).unwrap();

    let (stdout, _, success) = run_cvc(tmp.path(), &["chunk", "cv.md", "--dry-run"]);
    assert!(success);
    assert!(stdout.contains("dry-run"));
    assert!(!tmp.path().join("cv.chunks.jsonl").exists());
}

#[test]
fn unknown_profile_is_an_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("cv.md"), SAMPLE_CV).unwrap();

    let (_, stderr, success) = run_cvc(tmp.path(), &["chunk", "cv.md", "--profile", "resume"]);
    assert!(!success);
    assert!(stderr.contains("Unknown profile"));
}

#[test]
fn qa_one_chunk_per_question() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("faq.md"),
        "## What do you do\nI build data products.\n\n## Where are you based\nLondon.\n",
    )
    .unwrap();

    let (stdout, _, success) = run_cvc(tmp.path(), &["qa", "faq.md", "--source", "faq"]);
    assert!(success);
    assert!(stdout.contains("pairs written: 2"));

    let records = record_lines(&tmp.path().join("faq.chunks.jsonl"));
    assert_eq!(records[0]["chunk_type"], "qa");
    assert_eq!(records[0]["heading"], "What do you do?");
    assert!(records[0]["text"].as_str().unwrap().starts_with("Q: "));
}

#[test]
fn github_export_is_chunked_and_bad_documents_skipped() {
    let tmp = TempDir::new().unwrap();
    let export = serde_json::json!([
        {
            "type": "repository",
            "repo_name": "demo",
            "repo_url": "https://github.com/u/demo",
            "text": "demo: a small Rust CLI for processing personal documents into chunks"
        },
        {
            "type": "readme",
            "repo_name": "demo",
            "repo_url": "https://github.com/u/demo",
            "text": "## Install\nadd the crate to your manifest and build with the usual cargo workflow on any supported platform\n"
        },
        { "type": "repository", "repo_name": "broken" }
    ]);
    fs::write(
        tmp.path().join("github.json"),
        serde_json::to_string(&export).unwrap(),
    )
    .unwrap();

    let (stdout, stderr, success) = run_cvc(tmp.path(), &["github", "github.json"]);
    assert!(success, "github failed: {}", stderr);
    assert!(stdout.contains("documents processed: 2"));
    assert!(stdout.contains("documents skipped: 1"));
    assert!(stderr.contains("skipping document 2"));

    let records = record_lines(&tmp.path().join("github.chunks.jsonl"));
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["chunk_type"], "repository_summary");
    assert_eq!(records[0]["id"], "github-demo-0");
    assert_eq!(records[1]["chunk_type"], "readme_section");
}

#[test]
fn blog_export_is_chunked_per_post() {
    let tmp = TempDir::new().unwrap();
    let export = serde_json::json!([
        {
            "title": "Shipping a Side Project",
            "author": "Jane Doe",
            "url": "https://example.com/post",
            "tags": ["rust"],
            "content": "## The Idea\nthe opening section describes where the project came from and what problem it was meant to solve for readers\n\n## The Build\nthe second section walks through the implementation choices and the tradeoffs made along the way to launch\n"
        }
    ]);
    fs::write(
        tmp.path().join("posts.json"),
        serde_json::to_string(&export).unwrap(),
    )
    .unwrap();

    let (stdout, stderr, success) = run_cvc(tmp.path(), &["blog", "posts.json"]);
    assert!(success, "blog failed: {}", stderr);
    assert!(stdout.contains("posts processed: 1"));
    assert!(stdout.contains("chunks written: 2"));

    let records = record_lines(&tmp.path().join("posts.chunks.jsonl"));
    assert_eq!(records[0]["id"], "shipping-a-side-project-0");
    assert_eq!(records[0]["chunk_type"], "content");
    assert_eq!(records[0]["metadata"]["title"], "Shipping a Side Project");
}

#[test]
fn batch_skips_broken_files_and_continues() {
    let tmp = TempDir::new().unwrap();
    let docs = tmp.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    fs::write(docs.join("cv.md"), SAMPLE_CV).unwrap();
    fs::write(docs.join("bad.pdf"), b"not a valid pdf").unwrap();

    let (stdout, stderr, success) = run_cvc(
        tmp.path(),
        &["batch", "docs", "--output", "corpus.jsonl"],
    );
    assert!(success, "batch failed: {}", stderr);
    assert!(stdout.contains("files found: 2"));
    assert!(stdout.contains("files processed: 1"));
    assert!(stdout.contains("files skipped: 1"));
    assert!(stderr.contains("bad.pdf"));

    let records = record_lines(&tmp.path().join("corpus.jsonl"));
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["source"], "cv");
}

#[test]
fn stats_summarizes_a_record_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("cv.md"), SAMPLE_CV).unwrap();
    run_cvc(tmp.path(), &["chunk", "cv.md", "--source", "cv"]);

    let (stdout, _, success) = run_cvc(tmp.path(), &["stats", "cv.chunks.jsonl"]);
    assert!(success);
    assert!(stdout.contains("chunks:"));
    assert!(stdout.contains("experience"));
    assert!(stdout.contains("skills"));
}

#[test]
fn embed_dry_run_needs_no_api_key() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("cv.md"), SAMPLE_CV).unwrap();
    run_cvc(tmp.path(), &["chunk", "cv.md", "--source", "cv"]);

    let config_dir = tmp.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("cvc.toml"),
        "[embedding]\nprovider = \"openai\"\nmodel = \"text-embedding-3-small\"\ndims = 1536\n\n[qdrant]\nurl = \"http://localhost:6333\"\n",
    )
    .unwrap();

    let (stdout, stderr, success) =
        run_cvc(tmp.path(), &["embed", "cv.chunks.jsonl", "--dry-run"]);
    assert!(success, "embed dry-run failed: {}", stderr);
    assert!(stdout.contains("records to embed: 3"));
}

#[test]
fn embed_without_provider_is_an_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("cv.md"), SAMPLE_CV).unwrap();
    run_cvc(tmp.path(), &["chunk", "cv.md", "--source", "cv"]);

    let (_, stderr, success) = run_cvc(tmp.path(), &["embed", "cv.chunks.jsonl"]);
    assert!(!success);
    assert!(stderr.contains("disabled"));
}

#[test]
fn search_without_provider_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_cvc(tmp.path(), &["search", "kubernetes"]);
    assert!(!success);
    assert!(stderr.contains("requires embeddings"));
}
