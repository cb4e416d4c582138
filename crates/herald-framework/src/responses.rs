//! Built-in responses sent when an override hook returns
//! [`HookOutcome::Default`](crate::overrides::HookOutcome::Default).

use std::time::Duration;

use herald_core::Permission;

use crate::command::Command;
use crate::error::UsageError;
use crate::overrides::PermissionScope;
use crate::restriction::Restriction;

/// Lists the permissions missing on one side.
pub fn permission_denied(scope: PermissionScope, missing: &[Permission]) -> String {
    let list = missing
        .iter()
        .map(|p| format!("`{p}`"))
        .collect::<Vec<_>>()
        .join(", ");
    match scope {
        PermissionScope::Bot => format!("I am missing the following permissions: {list}"),
        PermissionScope::User => format!("You are missing the following permissions: {list}"),
    }
}

pub fn restricted(restriction: Restriction) -> String {
    match restriction {
        Restriction::Beta => "This command is only available in the beta version.",
        Restriction::Developer => "This command can only be used by developers.",
        Restriction::Donator => "This command is only available to donators.",
        Restriction::GuildOwner => "This command can only be used by the server owner.",
        Restriction::Nsfw => "This command can only be used in NSFW channels.",
        Restriction::Premium => "This command is only available in premium servers.",
        Restriction::SupportServer => "This command can only be used in the support server.",
    }
    .to_owned()
}

pub fn cooldown(command: &Command, remaining: Duration) -> String {
    format!(
        "Please wait {:.1}s before using `{}` again.",
        remaining.as_secs_f64(),
        command.key()
    )
}

pub fn invalid_usage(command: &Command, prefix: &str, error: &UsageError) -> String {
    format!("{error}\nUsage: {}", usage_line(command, prefix))
}

/// Usage line followed by the description, if any.
pub fn help(command: &Command, prefix: &str) -> String {
    let mut text = format!("Usage: {}", usage_line(command, prefix));
    if command.trigger_list().len() > 1 {
        text.push_str("\nAliases: ");
        text.push_str(&command.trigger_list()[1..].join(", "));
    }
    if !command.description_text().is_empty() {
        text.push('\n');
        text.push_str(command.description_text());
    }
    text
}

fn usage_line(command: &Command, prefix: &str) -> String {
    if command.usage_text().is_empty() {
        format!("`{prefix}{}`", command.key())
    } else {
        format!("`{prefix}{} {}`", command.key(), command.usage_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_list() {
        let text = permission_denied(
            PermissionScope::Bot,
            &[Permission::EmbedLinks, Permission::AttachFiles],
        );
        assert_eq!(
            text,
            "I am missing the following permissions: `embedLinks`, `attachFiles`"
        );
    }

    #[test]
    fn test_cooldown_text() {
        let cmd = Command::new(["daily"]).unwrap();
        assert_eq!(
            cooldown(&cmd, Duration::from_millis(3500)),
            "Please wait 3.5s before using `daily` again."
        );
    }

    #[test]
    fn test_help_text() {
        let cmd = Command::new(["ban", "b"])
            .unwrap()
            .usage("<user> [reason]")
            .description("Bans a member.");
        assert_eq!(
            help(&cmd, "!"),
            "Usage: `!ban <user> [reason]`\nAliases: b\nBans a member."
        );
        let usage = invalid_usage(&cmd, "!", &UsageError::missing_argument("user"));
        assert!(usage.ends_with("`!ban <user> [reason]`"));
    }
}
