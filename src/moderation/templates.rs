//! Notification text templates
//!
//! Templates use `{word}`, `{duration}`, `{count}`, `{user_name}`,
//! `{user_id}` and `{window}` placeholders. Unknown placeholders are left
//! untouched, and substituted values are never expanded again.

use crate::moderation::{Punishment, format_duration};
use serde::{Deserialize, Serialize};

/// Values substituted into a template
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    pub word: &'a str,
    pub punishment: Punishment,
    pub count: u32,
    pub user_name: &'a str,
    pub user_id: u64,
    /// Length of the violation window
    pub window: chrono::Duration,
}

/// Configurable notification texts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageTemplates {
    /// Sent privately to the punished user
    pub private_warning: String,
    /// Posted in the group, deleted when the restriction ends
    pub group_notification: String,
    /// Posted when forwarded content is removed
    pub forward_rejection: String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            private_warning: "⚠️ Your message contained a forbidden word: \"{word}\".\n\
                You cannot post in the group {duration}.\n\
                Violations in the last {window}: {count}."
                .to_string(),
            group_notification: "🚫 **{user_name}** (<@{user_id}>) was restricted {duration} \
                for using a forbidden word: \"{word}\". Violation #{count}."
                .to_string(),
            forward_rejection: "Forwarding messages into this group from elsewhere is not allowed!"
                .to_string(),
        }
    }
}

impl MessageTemplates {
    /// Text of the private warning
    #[must_use]
    pub fn render_private_warning(&self, ctx: &TemplateContext<'_>) -> String {
        render(&self.private_warning, ctx)
    }

    /// Text of the group notification
    #[must_use]
    pub fn render_group_notification(&self, ctx: &TemplateContext<'_>) -> String {
        render(&self.group_notification, ctx)
    }
}

/// Duration phrase as it reads inside a sentence
fn describe(punishment: Punishment) -> String {
    match punishment {
        Punishment::Restrict { .. } => format!("for {punishment}"),
        Punishment::Ban => "permanently".to_string(),
    }
}

fn render(template: &str, ctx: &TemplateContext<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        rest = &rest[open..];

        let value = rest
            .find('}')
            .and_then(|close| Some((placeholder(&rest[1..close], ctx)?, close)));
        match value {
            Some((value, close)) => {
                out.push_str(&value);
                rest = &rest[close + 1..];
            }
            None => {
                out.push('{');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn placeholder(name: &str, ctx: &TemplateContext<'_>) -> Option<String> {
    let value = match name {
        "word" => ctx.word.to_string(),
        "duration" => describe(ctx.punishment),
        "count" => ctx.count.to_string(),
        "user_name" => ctx.user_name.to_string(),
        "user_id" => ctx.user_id.to_string(),
        "window" => format_duration(u64::try_from(ctx.window.num_seconds()).unwrap_or(0)),
        _ => return None,
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(punishment: Punishment) -> TemplateContext<'static> {
        TemplateContext {
            word: "spam",
            punishment,
            count: 2,
            user_name: "Alice",
            user_id: 42,
            window: chrono::Duration::hours(12),
        }
    }

    #[test]
    fn test_render_all_placeholders() {
        let templates = MessageTemplates {
            private_warning: "{word}|{duration}|{count}|{user_name}|{user_id}|{window}|{other}"
                .to_string(),
            ..Default::default()
        };
        assert_eq!(
            templates.render_private_warning(&context(Punishment::restrict(3600))),
            "spam|for 1 hour|2|Alice|42|12 hours|{other}"
        );
    }

    #[test]
    fn test_ban_wording() {
        let templates = MessageTemplates::default();
        let text = templates.render_group_notification(&context(Punishment::Ban));
        assert!(text.contains("permanently"));
        assert!(text.contains("**Alice**"));
        assert!(text.contains("<@42>"));
        assert!(text.contains("#2"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let templates: MessageTemplates =
            serde_yaml::from_str("private_warning: \"no {word}\"\n").unwrap();
        assert_eq!(templates.private_warning, "no {word}");
        assert_eq!(
            templates.group_notification,
            MessageTemplates::default().group_notification
        );
    }

    #[test]
    fn test_substituted_values_are_not_expanded() {
        let templates = MessageTemplates {
            group_notification: "{user_name} said {word} ({count})".to_string(),
            ..Default::default()
        };
        let ctx = TemplateContext {
            word: "{count}",
            user_name: "{user_id}",
            ..context(Punishment::restrict(300))
        };
        assert_eq!(
            templates.render_group_notification(&ctx),
            "{user_id} said {count} (2)"
        );
    }

    #[test]
    fn test_default_warning_uses_configured_window() {
        let text = MessageTemplates::default()
            .render_private_warning(&context(Punishment::restrict(300)));
        assert!(text.contains("in the last 12 hours: 2"));
        assert!(!text.contains("24 hours"));
    }

    #[test]
    fn test_stray_braces_are_kept() {
        let templates = MessageTemplates {
            private_warning: "count {count} {word".to_string(),
            ..Default::default()
        };
        assert_eq!(
            templates.render_private_warning(&context(Punishment::Ban)),
            "count 2 {word"
        );

        let templates = MessageTemplates {
            private_warning: "{{count}} {}".to_string(),
            ..Default::default()
        };
        assert_eq!(
            templates.render_private_warning(&context(Punishment::Ban)),
            "{2} {}"
        );
    }
}
