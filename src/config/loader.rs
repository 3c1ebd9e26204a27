use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::types::AppConfig;

/// Discover and load the app config.
///
/// Priority:
/// 1. `--config` flag (explicit path)
/// 2. `.pr-sidebar.toml` in the current Git repository root
/// 3. `$PR_SIDEBAR_CONFIG` environment variable
/// 4. `$XDG_CONFIG_HOME/pr-sidebar/config.toml`
/// 5. `~/.config/pr-sidebar/config.toml`
///
/// When both a global and a repo-local config exist, the repo-local file is
/// laid over the global one table by table (see [`merge_configs`]).
pub fn load_config(explicit_path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit_path {
        return read_config(path);
    }

    let config = match (find_global_config(), find_repo_local_config()) {
        (Some(global), Some(local)) => {
            let global_raw = read_table(&global)?;
            let local_raw = read_table(&local)?;
            toml::Value::Table(merge_configs(global_raw, local_raw))
                .try_into()
                .with_context(|| format!("merging {} over {}", local.display(), global.display()))?
        }
        (Some(path), None) | (None, Some(path)) => read_config(&path)?,
        (None, None) => AppConfig::default(),
    };
    tracing::debug!("config: api base {}", config.api.base_url);
    Ok(config)
}

/// Parse a single config file.
pub fn read_config(path: &Path) -> Result<AppConfig> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("parsing TOML from {}", path.display()))
}

fn read_table(path: &Path) -> Result<toml::Table> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    contents
        .parse::<toml::Table>()
        .with_context(|| format!("parsing TOML from {}", path.display()))
}

/// Lay `local` over `global`.
///
/// Top-level tables merge one level deep: a key set in a local `[api]`
/// replaces the same key of the global `[api]`, other global keys survive.
/// Non-table values and the `[keybindings]` lists are replaced wholesale.
fn merge_configs(mut global: toml::Table, local: toml::Table) -> toml::Table {
    for (key, local_value) in local {
        match (global.get_mut(&key), local_value) {
            (Some(toml::Value::Table(global_table)), toml::Value::Table(local_table))
                if key != "keybindings" =>
            {
                for (inner_key, inner_value) in local_table {
                    global_table.insert(inner_key, inner_value);
                }
            }
            (_, value) => {
                global.insert(key, value);
            }
        }
    }
    global
}

fn find_repo_local_config() -> Option<PathBuf> {
    // Walk up from CWD looking for `.pr-sidebar.toml` next to a `.git` directory.
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let candidate = dir.join(".pr-sidebar.toml");
        if candidate.is_file() {
            return Some(candidate);
        }
        if dir.join(".git").exists() {
            return None;
        }
        if !dir.pop() {
            return None;
        }
    }
}

fn find_global_config() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("PR_SIDEBAR_CONFIG") {
        let p = PathBuf::from(&path);
        if p.is_file() {
            return Some(p);
        }
    }

    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        let p = PathBuf::from(xdg).join("pr-sidebar/config.toml");
        if p.is_file() {
            return Some(p);
        }
    }

    let home = std::env::var("HOME").ok().map(PathBuf::from)?;
    let p = home.join(".config/pr-sidebar/config.toml");
    p.is_file().then_some(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_keys_override_global_keys_in_same_table() {
        let global: toml::Table = r#"
[api]
base_url = "https://global.example/api/v1"
timeout_secs = 10
"#
        .parse()
        .unwrap();
        let local: toml::Table = r#"
[api]
base_url = "https://local.example/api/v1"
"#
        .parse()
        .unwrap();

        let merged: AppConfig = toml::Value::Table(merge_configs(global, local))
            .try_into()
            .unwrap();
        assert_eq!(merged.api.base_url, "https://local.example/api/v1");
        assert_eq!(merged.api.timeout_secs, 10);
    }

    #[test]
    fn keybindings_replaced_wholesale() {
        let global: toml::Table = r#"
[[keybindings.sidebar]]
key = "z"
builtin = "remove"
"#
        .parse()
        .unwrap();
        let local: toml::Table = r#"
[[keybindings.universal]]
key = "Q"
builtin = "quit"
"#
        .parse()
        .unwrap();

        let merged: AppConfig = toml::Value::Table(merge_configs(global, local))
            .try_into()
            .unwrap();
        assert!(merged.keybindings.sidebar.is_empty());
        assert_eq!(merged.keybindings.universal.len(), 1);
    }
}
