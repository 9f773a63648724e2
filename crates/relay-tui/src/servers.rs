//! Output for the `servers` subcommands.

use crate::{
    SessionBootstrap,
    config::{Config, ServerProfile},
};

/// Shown by `servers list` when nothing is saved.
pub const EMPTY_LIST_HINT: &str =
    "No servers configured. Add one with: relay-tui servers add --name NAME --url URL --token TOKEN";

/// Text printed by `servers list`.
pub fn list(config: &Config) -> String {
    if config.servers.is_empty() {
        return format!("{EMPTY_LIST_HINT}\n");
    }
    config.table()
}

/// One health-check result line for `servers test`.
pub async fn check(profile: &ServerProfile, rest: &impl SessionBootstrap) -> String {
    match rest.health().await {
        Ok(health) => format!(
            "  {} ({}): OK - {} active sessions",
            profile.name, profile.url, health.active_sessions
        ),
        Err(e) => format!("  {} ({}): FAILED - {e}", profile.name, profile.url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_prints_hint() {
        assert_eq!(list(&Config::default()), format!("{EMPTY_LIST_HINT}\n"));
    }

    #[test]
    fn saved_servers_print_masked_table() {
        let output = list(&Config::initial());

        assert!(output.starts_with("NAME"));
        assert!(output.contains("local"));
        assert!(output.contains("ch****me"));
        assert!(!output.contains("changeme"));
    }
}
