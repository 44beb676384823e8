use super::{UpdateContext, UpdateError, UpdateStrategy};
use crate::catalog::{ToolDescriptor, UpdateMethod};
use crate::process::CommandSpec;
use async_trait::async_trait;
use std::path::PathBuf;

/// `brew upgrade <pkg>`.
pub struct BrewUpgrade;

#[async_trait]
impl UpdateStrategy for BrewUpgrade {
    fn method(&self) -> &'static str {
        "brew_pkg"
    }

    async fn apply(
        &self,
        ctx: &UpdateContext<'_>,
        tool: &ToolDescriptor,
    ) -> Result<(), UpdateError> {
        let spec = ctx
            .command("brew")
            .args(["upgrade", tool.package_or_binary()]);
        ctx.run_checked(&spec).await.map(drop)
    }
}

/// Application bundles, upgraded through brew casks when brew tracks them.
pub struct CaskUpgrade;

#[async_trait]
impl UpdateStrategy for CaskUpgrade {
    fn method(&self) -> &'static str {
        "mac_app"
    }

    async fn apply(
        &self,
        ctx: &UpdateContext<'_>,
        tool: &ToolDescriptor,
    ) -> Result<(), UpdateError> {
        let package = tool.package_or_binary();
        let check = ctx.command("brew").args(["list", "--cask", package]);
        let managed = matches!(ctx.runner.run(&check).await, Ok(out) if out.success());
        if !managed {
            return Err(UpdateError::NotManaged);
        }

        let spec = ctx.command("brew").args(["upgrade", "--cask", package]);
        ctx.run_checked(&spec).await.map(drop)
    }
}

/// `npm install -g <pkg>@latest`, retried once with `--force` on EEXIST.
pub struct NpmInstallLatest {
    method: &'static str,
}

impl NpmInstallLatest {
    /// Packages installed from the registry.
    #[must_use]
    pub fn registry() -> Self {
        Self { method: "npm_pkg" }
    }

    /// npm itself.
    #[must_use]
    pub fn system() -> Self {
        Self { method: "npm_sys" }
    }
}

#[async_trait]
impl UpdateStrategy for NpmInstallLatest {
    fn method(&self) -> &'static str {
        self.method
    }

    async fn apply(
        &self,
        ctx: &UpdateContext<'_>,
        tool: &ToolDescriptor,
    ) -> Result<(), UpdateError> {
        let target = format!("{}@latest", tool.package_or_binary());
        let spec = ctx.command("npm").args(["install", "-g", target.as_str()]);

        match ctx.run_checked(&spec).await {
            Err(UpdateError::CommandFailed { output, .. }) if output.contains("EEXIST") => {
                tracing::debug!(tool = %tool.id, "conflicting files, retrying with --force");
                let forced = spec.arg("--force");
                ctx.run_checked(&forced).await.map(drop)
            }
            other => other.map(drop),
        }
    }
}

/// Paths reach the shell through the environment, never spliced into the script.
const UPGRADE_SCRIPT: &str = r#""$ZSH/tools/upgrade.sh""#;
const INSTALL_SCRIPT: &str = r#"curl -fsSL "$SPARK_INSTALL_URL" | sh"#;
const INSTALL_URL_VAR: &str = "SPARK_INSTALL_URL";

/// Runs oh-my-zsh's own upgrade script with `ZSH` pointing at the install root.
pub struct OmzUpgrade;

#[async_trait]
impl UpdateStrategy for OmzUpgrade {
    fn method(&self) -> &'static str {
        "omz"
    }

    async fn apply(
        &self,
        ctx: &UpdateContext<'_>,
        _tool: &ToolDescriptor,
    ) -> Result<(), UpdateError> {
        let root = ctx
            .runner
            .env_var("ZSH")
            .map(PathBuf::from)
            .or_else(|| ctx.runner.home_dir().map(|h| h.join(".oh-my-zsh")))
            .ok_or_else(|| UpdateError::ManualOnly("home directory unknown".to_string()))?;
        if !ctx.runner.exists(&root) {
            return Err(UpdateError::NotInstalled(root));
        }

        let spec = CommandSpec::shell(UPGRADE_SCRIPT, ctx.timeout)
            .env("ZSH", root.display().to_string());
        ctx.run_checked(&spec).await.map(drop)
    }
}

/// Re-runs a published `curl | sh` installer.
pub struct InstallScriptRerun;

#[async_trait]
impl UpdateStrategy for InstallScriptRerun {
    fn method(&self) -> &'static str {
        "install_script"
    }

    async fn apply(
        &self,
        ctx: &UpdateContext<'_>,
        tool: &ToolDescriptor,
    ) -> Result<(), UpdateError> {
        let UpdateMethod::InstallScript { url } = &tool.method else {
            return Err(UpdateError::Unsupported(tool.method.tag().to_string()));
        };
        let spec =
            CommandSpec::shell(INSTALL_SCRIPT, ctx.timeout).env(INSTALL_URL_VAR, url.as_str());
        ctx.run_checked(&spec).await.map(drop)
    }
}

/// Tools without an automated updater. Never runs anything.
pub struct ManualNotice;

#[async_trait]
impl UpdateStrategy for ManualNotice {
    fn method(&self) -> &'static str {
        "manual"
    }

    async fn apply(
        &self,
        _ctx: &UpdateContext<'_>,
        tool: &ToolDescriptor,
    ) -> Result<(), UpdateError> {
        Err(UpdateError::ManualOnly(format!(
            "{} has no automated updater",
            tool.name
        )))
    }
}
