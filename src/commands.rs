use crate::moderation::format_duration;
use crate::{Data, Error};
use poise::{Context, command, serenity_prelude as serenity};

/// Basic ping command
/// This command is used to check if the bot is responsive.
#[command(prefix_command, slash_command, guild_only)]
pub async fn ping(ctx: Context<'_, Data, Error>) -> Result<(), Error> {
    ctx.say("Pong!").await?;
    Ok(())
}

/// Show a user's recent violations
// Reports the count inside the current window and any pending group notification.
#[command(
    slash_command,
    guild_only,
    required_permissions = "MODERATE_MEMBERS",
    ephemeral
)]
pub async fn violations(
    ctx: Context<'_, Data, Error>,
    #[description = "User to look up"] user: serenity::User,
) -> Result<(), Error> {
    let coordinator = &ctx.data().coordinator;
    let count = coordinator.ledger().current_count(user.id.get());
    let window_secs = u64::try_from(coordinator.ledger().window().num_seconds()).unwrap_or(0);
    let pending = coordinator.notifications().pending_for(user.id.get());

    let mut report = violation_report(&user.name, count, window_secs);
    if let Some(record) = pending {
        report.push_str("\nGroup notification pending.");
        if let Some(expires_at) = record.expires_at {
            report.push_str(&format!(" Removed <t:{}:R>.", expires_at.timestamp()));
        }
    }

    ctx.say(report).await?;
    Ok(())
}

/// One-line summary of a user's violation count
fn violation_report(user_name: &str, count: u32, window_secs: u64) -> String {
    let plural = if count == 1 { "violation" } else { "violations" };
    format!(
        "**{user_name}** has {count} {plural} in the last {}.",
        format_duration(window_secs)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test that the ping command is properly defined
    #[test]
    fn test_ping_command_definition() {
        let cmd = ping();
        assert_eq!(cmd.name, "ping");
        assert!(
            cmd.description
                .unwrap_or_default()
                .contains("check if the bot is responsive")
        );
        assert!(cmd.guild_only);
    }

    #[test]
    fn test_violations_command_definition() {
        let cmd = violations();
        assert_eq!(cmd.name, "violations");
        assert!(cmd.guild_only);
        assert!(cmd.ephemeral);
        assert!(
            cmd.required_permissions
                .contains(serenity::Permissions::MODERATE_MEMBERS)
        );
        assert!(cmd.create_as_slash_command().is_some());
    }

    #[test]
    fn test_command_descriptions_fit_discord_limit() {
        for cmd in [ping(), violations()] {
            let description = cmd.description.unwrap_or_default();
            assert!(
                description.chars().count() <= 100,
                "{} description is {} chars",
                cmd.name,
                description.chars().count()
            );
        }
    }

    #[test]
    fn test_violation_report() {
        assert_eq!(
            violation_report("alice", 1, 86_400),
            "**alice** has 1 violation in the last 1 day."
        );
        assert_eq!(
            violation_report("bob", 0, 3600),
            "**bob** has 0 violations in the last 1 hour."
        );
    }
}
