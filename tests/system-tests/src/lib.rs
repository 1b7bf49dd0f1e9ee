#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::process::Stdio;
    use std::sync::OnceLock;
    use std::time::{Duration, SystemTime};

    use anyhow::{Context, Result, bail};
    use reqwest::StatusCode;
    use tokio::process::{Child, Command};
    use tokio::time::sleep;

    const SERVER_PROPERTIES: &str = "motd=system test\nview-distance=10\n";

    #[tokio::test]
    async fn content_api_against_live_server() -> Result<()> {
        let bind = "127.0.0.1:19180";
        let content_root = fresh_content_root("content-api")?;
        let mut server = start_server(bind, &content_root).await?;
        let base_url = format!("http://{bind}");
        let http = reqwest::Client::new();

        let result = async {
            let response = http
                .get(format!("{base_url}/api/config/server-properties"))
                .send()
                .await?;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                response
                    .headers()
                    .get("cache-control")
                    .and_then(|v| v.to_str().ok()),
                Some("no-cache")
            );
            let body: serde_json::Value = response.json().await?;
            assert_eq!(body["content"], SERVER_PROPERTIES);

            let missing = http
                .get(format!("{base_url}/api/config/does-not-exist"))
                .send()
                .await?;
            assert_eq!(missing.status(), StatusCode::NOT_FOUND);
            let body: serde_json::Value = missing.json().await?;
            assert_eq!(body, serde_json::json!({ "error": "File not found" }));

            fs::remove_file(content_root.join("server.properties"))?;
            let unreadable = http
                .get(format!("{base_url}/api/config/server-properties"))
                .send()
                .await?;
            assert_eq!(unreadable.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body: serde_json::Value = unreadable.json().await?;
            assert_eq!(body, serde_json::json!({ "error": "Could not read file" }));

            Ok::<(), anyhow::Error>(())
        }
        .await;

        stop_server(&mut server).await;
        let _ = fs::remove_dir_all(&content_root);
        result
    }

    #[tokio::test]
    async fn page_and_script_are_served_from_public_dir() -> Result<()> {
        let bind = "127.0.0.1:19181";
        let content_root = fresh_content_root("public-assets")?;
        let mut server = start_server(bind, &content_root).await?;

        let result = async {
            let index = reqwest::get(format!("http://{bind}/"))
                .await?
                .error_for_status()?
                .text()
                .await?;
            assert!(index.contains("id=\"config-content\""));
            assert!(index.contains("id=\"script-content\""));

            let script = reqwest::get(format!("http://{bind}/app.js"))
                .await?
                .error_for_status()?
                .text()
                .await?;
            assert!(script.contains("/api/config/"));

            Ok::<(), anyhow::Error>(())
        }
        .await;

        stop_server(&mut server).await;
        let _ = fs::remove_dir_all(&content_root);
        result
    }

    #[tokio::test]
    async fn cli_get_prints_file_content() -> Result<()> {
        let bind = "127.0.0.1:19182";
        let base_url = format!("http://{bind}");
        let content_root = fresh_content_root("cli-get")?;
        let mut server = start_server(bind, &content_root).await?;

        let result = async {
            let output = run_cli(&["--server-url", &base_url, "get", "server-properties"]).await?;
            assert_eq!(output, SERVER_PROPERTIES);

            let failure = run_cli(&["--server-url", &base_url, "get", "does-not-exist"]).await;
            let message = failure.expect_err("unknown key must fail").to_string();
            assert!(message.contains("Error: File not found"));

            Ok::<(), anyhow::Error>(())
        }
        .await;

        stop_server(&mut server).await;
        let _ = fs::remove_dir_all(&content_root);
        result
    }

    #[tokio::test]
    async fn cli_view_updates_only_clicked_group() -> Result<()> {
        let bind = "127.0.0.1:19183";
        let base_url = format!("http://{bind}");
        let content_root = fresh_content_root("cli-view")?;
        let mut server = start_server(bind, &content_root).await?;

        let result = async {
            let initial = run_cli(&["--server-url", &base_url, "view"]).await?;
            assert!(initial.starts_with("== config [server-properties] ==\n"));
            assert!(initial.contains(SERVER_PROPERTIES));
            assert!(initial.contains("== scripts [none] ==\n"));

            let clicked =
                run_cli(&["--server-url", &base_url, "view", "--script", "backup"]).await?;
            assert!(clicked.contains(SERVER_PROPERTIES));
            assert!(clicked.contains("== scripts [backup] ==\n#!/usr/bin/env bash\n"));

            Ok::<(), anyhow::Error>(())
        }
        .await;

        stop_server(&mut server).await;
        let _ = fs::remove_dir_all(&content_root);
        result
    }

    fn fresh_content_root(name: &str) -> Result<PathBuf> {
        let unique = SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let path = std::env::temp_dir().join(format!("paperview-{name}-{unique}"));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(path.join("scripts"))
            .with_context(|| format!("failed to create content root {}", path.display()))?;
        fs::write(path.join("server.properties"), SERVER_PROPERTIES)
            .context("failed to write server.properties")?;
        fs::write(
            path.join("scripts/backup.sh"),
            "#!/usr/bin/env bash\ntar czf backup.tgz world\n",
        )
        .context("failed to write backup.sh")?;
        Ok(path)
    }

    async fn start_server(bind: &str, content_root: &Path) -> Result<Child> {
        let server_bin = binary_path("viewer-server")?;
        let public_dir = workspace_root()?.join("public");

        let child = Command::new(server_bin)
            .env("PAPERVIEW_SERVER_BIND", bind)
            .env("PAPERVIEW_ROOT_DIR", content_root)
            .env("PAPERVIEW_PUBLIC_DIR", public_dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .context("failed to spawn viewer-server")?;

        wait_for_url_status(&format!("http://{bind}/health"), StatusCode::OK, 40).await?;
        Ok(child)
    }

    async fn run_cli(args: &[&str]) -> Result<String> {
        let cli_bin = binary_path("cli-client")?;
        let output = Command::new(cli_bin)
            .args(args)
            .output()
            .await
            .context("failed to execute cli-client")?;

        if !output.status.success() {
            bail!(
                "cli-client failed: {}",
                String::from_utf8_lossy(&output.stderr)
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    async fn wait_for_url_status(url: &str, expected: StatusCode, retries: usize) -> Result<()> {
        let http = reqwest::Client::new();

        for _ in 0..retries {
            if let Ok(resp) = http.get(url).send().await
                && resp.status() == expected
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }

        bail!("service did not return {expected} at {url}");
    }

    async fn stop_server(child: &mut Child) {
        let _ = child.kill().await;
        let _ = child.wait().await;
    }

    fn binary_path(name: &str) -> Result<PathBuf> {
        let workspace_root = workspace_root()?;
        ensure_binaries_built(&workspace_root)?;
        let mut path = workspace_root.join("target").join("debug").join(name);

        if let Some(suffix) = std::env::consts::EXE_SUFFIX.strip_prefix('.') {
            let mut filename = OsString::from(name);
            filename.push(".");
            filename.push(suffix);
            path = workspace_root.join("target").join("debug").join(filename);
        }

        if !path.exists() {
            bail!("expected binary does not exist: {}", path.display());
        }

        Ok(path)
    }

    fn workspace_root() -> Result<PathBuf> {
        let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        crate_dir
            .parent()
            .and_then(|p| p.parent())
            .map(PathBuf::from)
            .context("failed to resolve workspace root")
    }

    fn build_required_binaries(workspace_root: &Path) -> Result<()> {
        let status = std::process::Command::new("cargo")
            .arg("build")
            .arg("-p")
            .arg("viewer-server")
            .arg("-p")
            .arg("cli-client")
            .current_dir(workspace_root)
            .status()
            .context("failed to run cargo build for system test binaries")?;

        if !status.success() {
            bail!("cargo build for system test binaries failed");
        }

        Ok(())
    }

    fn ensure_binaries_built(workspace_root: &Path) -> Result<()> {
        static BUILD_RESULT: OnceLock<std::result::Result<(), String>> = OnceLock::new();

        let result = BUILD_RESULT.get_or_init(|| {
            build_required_binaries(workspace_root).map_err(|err| err.to_string())
        });

        if let Err(message) = result {
            bail!("failed to build required binaries: {message}");
        }

        Ok(())
    }
}
