use std::process::Command;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The web plugins only need a browser when built with the in-process
    // playwright backend; the default sidecar build has nothing to install.
    if std::env::var("CARGO_FEATURE_PLAYWRIGHT").is_err() {
        return Ok(());
    }

    if std::env::var("PLAYWRIGHT_SKIP_INSTALL").as_deref() == Ok("1") {
        println!("cargo:warning=PLAYWRIGHT_SKIP_INSTALL=1, not installing a browser");
        return Ok(());
    }

    let npx_present = Command::new("which")
        .arg("npx")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);
    if !npx_present {
        println!("cargo:warning=npx not found in PATH, skipping chromium install");
        return Ok(());
    }

    println!("cargo:warning=installing playwright chromium via npx …");
    let status = Command::new("npx")
        .args(["playwright@1.56.1", "install", "chromium"])
        .status()?;
    if !status.success() {
        return Err(format!(
            "npx playwright install chromium exited with code {}",
            status.code().unwrap_or(-1)
        )
        .into());
    }

    Ok(())
}
