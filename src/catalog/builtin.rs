use super::{Category, ToolDescriptor, UpdateMethod};

const TOAD_INSTALL_URL: &str = "https://batrachian.ai/install";

#[allow(clippy::too_many_lines)]
pub(super) fn tools() -> Vec<ToolDescriptor> {
    use Category::*;
    use UpdateMethod::{BrewPkg, MacApp, Manual, NpmPkg, NpmSys, Omz};

    let t = ToolDescriptor::new;
    vec![
        // AI development
        t("Claude CLI", "claude", "@anthropic-ai/claude-code", Code, NpmPkg),
        t("Droid CLI", "droid", "factory-cli", Code, Manual),
        t("Gemini CLI", "gemini", "@google/gemini-cli", Code, NpmPkg),
        t("OpenCode", "opencode", "opencode-ai", Code, Manual),
        t("Codex CLI", "codex", "@openai/codex", Code, NpmPkg),
        t("Crush CLI", "crush", "crush", Code, BrewPkg),
        t(
            "Toad CLI",
            "toad",
            "batrachian-toad",
            Code,
            UpdateMethod::InstallScript {
                url: TOAD_INSTALL_URL.to_string(),
            },
        ),
        t("Ollama", "ollama", "ollama", Code, Manual),
        // Terminals
        t("iTerm2", "iterm", "iterm2", Term, MacApp),
        t("Ghostty", "ghostty", "ghostty", Term, MacApp),
        t("Warp Terminal", "warp", "warp", Term, MacApp),
        // Editors
        t("VS Code", "code", "visual-studio-code", Ide, MacApp),
        t("Cursor IDE", "cursor", "cursor", Ide, MacApp),
        t("Zed Editor", "zed", "zed", Ide, MacApp),
        t("Windsurf", "windsurf", "windsurf", Ide, MacApp),
        t("Antigravity", "antigravity", "antigravity", Ide, Manual),
        // Productivity
        t("JQ", "jq", "jq", Prod, BrewPkg),
        t("FZF", "fzf", "fzf", Prod, BrewPkg),
        t("Ripgrep", "rg", "ripgrep", Prod, BrewPkg),
        t("Bat", "bat", "bat", Prod, BrewPkg),
        t("HTTPie", "http", "httpie", Prod, BrewPkg),
        t("LazyGit", "lazygit", "lazygit", Prod, BrewPkg),
        t("TLDR", "tldr", "tldr", Prod, BrewPkg),
        // Infrastructure
        t("Docker Desktop", "docker", "docker", Infra, MacApp),
        t("Kubernetes CLI", "kubectl", "kubernetes-cli", Infra, BrewPkg),
        t("Helm", "helm", "helm", Infra, BrewPkg),
        t("Terraform", "terraform", "terraform", Infra, BrewPkg),
        t("AWS CLI", "aws", "awscli", Infra, BrewPkg),
        t("Ngrok", "ngrok", "ngrok", Infra, BrewPkg),
        // Utilities
        t("Oh My Zsh", "omz", "oh-my-zsh", Utils, Omz),
        t("Zellij", "zellij", "zellij", Utils, BrewPkg),
        t("Tmux", "tmux", "tmux", Utils, BrewPkg),
        t("Git", "git", "git", Utils, BrewPkg),
        t("Bash", "bash", "bash", Utils, BrewPkg),
        t("SQLite", "sqlite3", "sqlite", Utils, BrewPkg),
        t("Watchman", "watchman", "watchman", Utils, BrewPkg),
        t("Direnv", "direnv", "direnv", Utils, BrewPkg),
        t("Heroku CLI", "heroku", "heroku", Utils, BrewPkg),
        t("Pre-commit", "pre-commit", "pre-commit", Utils, BrewPkg),
        // Runtimes (protected)
        t("Node.js", "node", "node", Runtime, BrewPkg),
        t("Python 3.13", "python3", "python@3.13", Runtime, BrewPkg),
        t("Go Lang", "go", "go", Runtime, BrewPkg),
        t("Ruby", "ruby", "ruby", Runtime, BrewPkg),
        t("PostgreSQL 16", "psql", "postgresql@16", Runtime, BrewPkg),
        // System
        t("Homebrew Core", "brew", "homebrew", Sys, BrewPkg),
        t("NPM Globals", "npm", "npm", Sys, NpmSys),
    ]
}
