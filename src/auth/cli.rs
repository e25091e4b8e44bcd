//! Token lookup through the `gh` CLI

use tokio::process::Command;
use tracing::debug;

/// Token printed by `gh auth token`, if gh is installed and logged in
pub async fn get_gh_token() -> Option<String> {
    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        debug!("gh auth token exited unsuccessfully");
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!token.is_empty()).then_some(token)
}
