//! Local version probe strategies, one per kind of install.

use super::LocalVersion;
use crate::catalog::{ToolDescriptor, UpdateMethod};
use crate::process::{CommandRunner, CommandSpec};
use crate::version::{self, UNKNOWN};
use std::path::PathBuf;
use std::time::Duration;

/// Known bundle locations for application-bundle tools.
const APP_BUNDLES: &[(&str, &str)] = &[
    ("iterm", "/Applications/iTerm.app"),
    ("ghostty", "/Applications/Ghostty.app"),
    ("warp", "/Applications/Warp.app"),
    ("code", "/Applications/Visual Studio Code.app"),
    ("cursor", "/Applications/Cursor.app"),
    ("zed", "/Applications/Zed.app"),
    ("windsurf", "/Applications/Windsurf.app"),
    ("docker", "/Applications/Docker.app"),
];

/// Tools that install outside PATH, relative to the home directory.
const ALTERNATE_ROOTS: &[(&str, &str)] =
    &[("antigravity", ".antigravity/antigravity/bin/antigravity")];

enum Strategy {
    /// Read bundle metadata.
    Bundle,
    /// Short revision of a git checkout.
    Revision,
    /// `--version`, then fallbacks down to package-manager listings.
    Cli,
}

fn strategy_for(method: &UpdateMethod) -> Strategy {
    match method {
        UpdateMethod::MacApp => Strategy::Bundle,
        UpdateMethod::Omz => Strategy::Revision,
        UpdateMethod::BrewPkg
        | UpdateMethod::NpmPkg
        | UpdateMethod::NpmSys
        | UpdateMethod::InstallScript { .. }
        | UpdateMethod::Manual => Strategy::Cli,
    }
}

pub(super) async fn probe(
    runner: &dyn CommandRunner,
    timeout: Duration,
    tool: &ToolDescriptor,
) -> LocalVersion {
    let ctx = ProbeContext { runner, timeout };
    match strategy_for(&tool.method) {
        Strategy::Bundle => ctx.bundle(tool).await,
        Strategy::Revision => ctx.revision().await,
        Strategy::Cli => ctx.cli(tool).await,
    }
}

struct ProbeContext<'a> {
    runner: &'a dyn CommandRunner,
    timeout: Duration,
}

impl ProbeContext<'_> {
    async fn bundle(&self, tool: &ToolDescriptor) -> LocalVersion {
        let app = APP_BUNDLES
            .iter()
            .find(|(binary, _)| *binary == tool.binary)
            .map_or_else(
                || PathBuf::from(format!("/Applications/{}.app", tool.name)),
                |(_, path)| PathBuf::from(path),
            );
        let plist = app.join("Contents").join("Info.plist");
        if !self.runner.exists(&plist) {
            return LocalVersion::Missing;
        }

        let spec = CommandSpec::new("defaults", self.timeout)
            .arg("read")
            .arg(plist.display().to_string())
            .arg("CFBundleShortVersionString");
        match self.runner.run(&spec).await {
            Ok(out) if out.success() && !out.primary_text().is_empty() => {
                LocalVersion::Version(out.primary_text().to_string())
            }
            _ => LocalVersion::Detected,
        }
    }

    async fn revision(&self) -> LocalVersion {
        let Some(root) = self.omz_root() else {
            return LocalVersion::Missing;
        };
        if !self.runner.exists(&root) {
            return LocalVersion::Missing;
        }

        let root = root.display().to_string();
        let spec = CommandSpec::new("git", self.timeout)
            .arg(format!("--git-dir={root}/.git"))
            .arg(format!("--work-tree={root}"))
            .args(["rev-parse", "--short", "HEAD"]);
        match self.runner.run(&spec).await {
            Ok(out) if out.success() && !out.primary_text().is_empty() => {
                LocalVersion::Version(version::normalize(out.primary_text()))
            }
            _ => LocalVersion::Detected,
        }
    }

    fn omz_root(&self) -> Option<PathBuf> {
        self.runner
            .env_var("ZSH")
            .map(PathBuf::from)
            .or_else(|| self.runner.home_dir().map(|h| h.join(".oh-my-zsh")))
    }

    async fn cli(&self, tool: &ToolDescriptor) -> LocalVersion {
        let home = self.runner.home_dir();

        if let (Some(home), Some((_, rel))) = (
            &home,
            ALTERNATE_ROOTS.iter().find(|(b, _)| *b == tool.binary),
        ) {
            let path = home.join(rel);
            if self.runner.exists(&path)
                && let Some(v) = self
                    .version_flag(&path.display().to_string(), &tool.binary)
                    .await
            {
                return LocalVersion::Version(v);
            }
        }

        if self.runner.locate(&tool.binary).is_some()
            && let Some(v) = self.version_flag(&tool.binary, &tool.binary).await
        {
            return LocalVersion::Version(v);
        }

        if let Some(home) = &home {
            let local_bin = home.join(".local").join("bin").join(&tool.binary);
            if self.runner.exists(&local_bin)
                && let Some(v) = self
                    .version_flag(&local_bin.display().to_string(), &tool.binary)
                    .await
            {
                return LocalVersion::Version(v);
            }
        }

        if tool.method.is_npm()
            && let Some(v) = self.npm_listing(tool.package_or_binary()).await
        {
            return LocalVersion::Version(v);
        }

        if tool.method == UpdateMethod::BrewPkg
            && let Some(v) = self.brew_listing(tool.package_or_binary()).await
        {
            return LocalVersion::Version(v);
        }

        LocalVersion::Missing
    }

    /// `<program> --version`, normalized. `None` on any failure or empty output.
    async fn version_flag(&self, program: &str, binary: &str) -> Option<String> {
        let spec = CommandSpec::new(program, self.timeout).arg("--version");
        let out = self.runner.run(&spec).await.ok()?;
        if !out.success() {
            return None;
        }
        let v = version::normalize_for(binary, out.primary_text());
        (v != UNKNOWN).then_some(v)
    }

    /// `npm list -g --depth=0 --json <pkg>`.
    async fn npm_listing(&self, package: &str) -> Option<String> {
        let spec = CommandSpec::new("npm", self.timeout).args([
            "list",
            "-g",
            "--depth=0",
            "--json",
            package,
        ]);
        let out = self.runner.run(&spec).await.ok()?;
        if !out.success() {
            return None;
        }
        let json: serde_json::Value = serde_json::from_str(out.stdout.trim()).ok()?;
        json.get("dependencies")?
            .get(package)?
            .get("version")?
            .as_str()
            .map(version::normalize)
    }

    /// `brew list --versions <pkg>` prints `<pkg> <v1> [<v2>...]`; the last is newest.
    async fn brew_listing(&self, package: &str) -> Option<String> {
        let spec =
            CommandSpec::new("brew", self.timeout).args(["list", "--versions", package]);
        let out = self.runner.run(&spec).await.ok()?;
        if !out.success() {
            return None;
        }
        let fields: Vec<&str> = out.stdout.split_whitespace().collect();
        if fields.len() < 2 {
            return None;
        }
        fields.last().map(|v| version::normalize(v))
    }
}

