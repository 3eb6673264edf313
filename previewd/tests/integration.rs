use std::path::{Path, PathBuf};
use std::process::{Child, Command};
use std::time::Duration;

struct TestServer {
    process: Child,
}

impl TestServer {
    fn spawn(args: &[&str]) -> Self {
        let bin_path = env!("CARGO_BIN_EXE_previewd");

        let process = Command::new(bin_path)
            .args(args)
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .expect("Failed to start server");

        Self { process }
    }

    fn serve(root: &Path, port: u16) -> Self {
        Self::spawn(&[
            "serve",
            "--dir",
            root.to_str().unwrap(),
            "--port",
            &port.to_string(),
        ])
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.process.kill();
    }
}

async fn wait_for_server(url: &str, server: &mut TestServer) -> bool {
    let client = reqwest::Client::new();
    for _ in 0..50 {
        if let Ok(Some(status)) = server.process.try_wait() {
            eprintln!("Server exited unexpectedly with status: {}", status);
            if let Some(mut stderr) = server.process.stderr.take() {
                use std::io::Read;
                let mut s = String::new();
                stderr.read_to_string(&mut s).unwrap();
                eprintln!("STDERR:\n{}", s);
            }
            return false;
        }

        if client.get(url).send().await.is_ok() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    eprintln!("Timeout waiting for server!");
    false
}

/// Build the canonical test tree:
/// files/a.html, files/b.css, packages/demo/index.html, packages/empty/readme.txt
fn setup_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("files")).unwrap();
    std::fs::write(root.join("files/a.html"), "<h1>a</h1>").unwrap();
    std::fs::write(root.join("files/b.css"), "body {}").unwrap();
    std::fs::create_dir_all(root.join("packages/demo")).unwrap();
    std::fs::write(root.join("packages/demo/index.html"), "<h1>demo</h1>").unwrap();
    std::fs::create_dir_all(root.join("packages/empty")).unwrap();
    std::fs::write(root.join("packages/empty/readme.txt"), "nothing").unwrap();
    dir
}

#[tokio::test]
async fn test_root_listing() {
    let tree = setup_tree();
    let mut server = TestServer::serve(tree.path(), 9311);
    assert!(wait_for_server("http://127.0.0.1:9311/", &mut server).await);

    let resp = reqwest::get("http://127.0.0.1:9311/").await.unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp
        .headers()
        .get("Content-Type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let body = resp.text().await.unwrap();
    assert!(body.contains("Found 1 project(s) and 1 HTML file(s)"));
    assert!(body.contains("href=\"/packages/demo\""));
    assert!(body.contains("href=\"/files/a.html\""));
    assert!(body.contains("b.css"));
    // HTML-free directories never show up as projects
    assert!(!body.contains("href=\"/packages/empty\""));
}

#[tokio::test]
async fn test_project_redirects_to_entry_file() {
    let tree = setup_tree();
    let mut server = TestServer::serve(tree.path(), 9312);
    assert!(wait_for_server("http://127.0.0.1:9312/", &mut server).await);

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let resp = client
        .get("http://127.0.0.1:9312/packages/demo")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(
        resp.headers().get("Location").unwrap(),
        "/packages/demo/index.html"
    );

    // Following the redirect lands on the entry file via static serving
    let resp = reqwest::get("http://127.0.0.1:9312/packages/demo")
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "<h1>demo</h1>");
}

#[tokio::test]
async fn test_entry_file_priority() {
    let tree = setup_tree();
    let demo2 = tree.path().join("packages/demo2");
    std::fs::create_dir_all(&demo2).unwrap();
    std::fs::write(demo2.join("main.html"), "<h1>main</h1>").unwrap();
    std::fs::write(demo2.join("app.html"), "<h1>app</h1>").unwrap();

    let mut server = TestServer::serve(tree.path(), 9313);
    assert!(wait_for_server("http://127.0.0.1:9313/", &mut server).await);

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let resp = client
        .get("http://127.0.0.1:9313/packages/demo2")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(
        resp.headers().get("Location").unwrap(),
        "/packages/demo2/main.html"
    );
}

#[tokio::test]
async fn test_entryless_directory_and_unknown_project() {
    let tree = setup_tree();
    let mut server = TestServer::serve(tree.path(), 9314);
    assert!(wait_for_server("http://127.0.0.1:9314/", &mut server).await);

    // Existing directory without HTML gets a flat listing
    let resp = reqwest::get("http://127.0.0.1:9314/packages/empty")
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Index of empty"));
    assert!(body.contains("readme.txt"));

    // Missing directory falls through to static serving and 404s
    let resp = reqwest::get("http://127.0.0.1:9314/packages/ghost")
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_files_root_serving() {
    let tree = setup_tree();
    let mut server = TestServer::serve(tree.path(), 9315);
    assert!(wait_for_server("http://127.0.0.1:9315/", &mut server).await);

    let resp = reqwest::get("http://127.0.0.1:9315/files/a.html")
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp
        .headers()
        .get("Content-Type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert!(resp.headers().contains_key("ETag"));
    assert_eq!(resp.text().await.unwrap(), "<h1>a</h1>");

    let resp = reqwest::get("http://127.0.0.1:9315/files/b.css")
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp
        .headers()
        .get("Content-Type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/css"));

    // Missing file is a plain 404, never a crash
    let resp = reqwest::get("http://127.0.0.1:9315/files/missing.html")
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_config_file_is_honored() {
    let tree = setup_tree();

    let mut config_path: PathBuf = std::env::temp_dir();
    config_path.push(format!("previewd-test-{}.toml", uuid::Uuid::new_v4()));
    std::fs::write(
        &config_path,
        format!(
            "port = 9316\nbind = \"127.0.0.1\"\nworking_dir = \"{}\"\n",
            tree.path().to_str().unwrap().replace('\\', "/")
        ),
    )
    .unwrap();

    let mut server = TestServer::spawn(&["serve", "--config", config_path.to_str().unwrap()]);
    let up = wait_for_server("http://127.0.0.1:9316/", &mut server).await;
    let _ = std::fs::remove_file(&config_path);
    assert!(up);

    let resp = reqwest::get("http://127.0.0.1:9316/").await.unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("demo"));
}
