use poise::serenity_prelude as serenity;
use poise::Modal;
use std::sync::atomic::Ordering;
use std::time::Duration;

use crate::ephemeral;
use crate::errors::Error;
use crate::model::{Command, Context};

/// How long the edit dialog waits for a submission.
pub const EDIT_TIMEOUT: Duration = Duration::from_secs(600);

pub fn commands() -> Vec<Command> {
    vec![echo(), edit_message(), delete_message()]
}

/// Send a message with template substitutions
///
/// `{2024/1/15 9:30}` becomes a timestamp shown in each reader's timezone. \
/// `{~...}` counts down, `{t!...}` and `{d!...}` force time or date only. \
/// `::name::` becomes one of the bot's custom emoji, `\n` a line break.
#[poise::command(
    slash_command,
    install_context = "Guild|User",
    interaction_context = "Guild|BotDm|PrivateChannel"
)]
pub async fn echo(
    ctx: Context<'_>,
    #[description = "The message template string"] message: String,
) -> Result<(), Error> {
    let content = ctx.data().compose(&message).await?;
    let reply = ctx.say(content).await?;
    let sent = reply.message().await?;

    ctx.data().remember(sent.id, message);

    Ok(())
}

#[derive(Debug, Modal)]
#[name = "Edit message"]
struct EditForm {
    #[name = "/echo message"]
    message: String,
}

/// The edit modal, prefilled only when the template is still remembered.
fn edit_dialog(template: Option<String>, custom_id: String) -> serenity::CreateInteractionResponse {
    EditForm::create(template.map(|message| EditForm { message }), custom_id)
}

/// Only our own /echo responses can be edited.
pub fn check_editable(
    author: serenity::UserId,
    kind: serenity::MessageType,
    bot: serenity::UserId,
) -> Result<(), Error> {
    if author != bot || kind != serenity::MessageType::ChatInputCommand {
        return Err(Error::NotEchoMessage);
    }
    Ok(())
}

/// Only messages the bot sent can be deleted.
pub fn check_deletable(author: serenity::UserId, bot: serenity::UserId) -> Result<(), Error> {
    if author != bot {
        return Err(Error::NotOwnMessage);
    }
    Ok(())
}

#[poise::command(
    context_menu_command = "Edit message",
    install_context = "Guild|User",
    interaction_context = "Guild|BotDm|PrivateChannel"
)]
pub async fn edit_message(ctx: Context<'_>, msg: serenity::Message) -> Result<(), Error> {
    if let Err(err) = check_editable(msg.author.id, msg.kind, ctx.framework().bot_id) {
        ephemeral!(ctx, "{}", err).await?;
        return Ok(());
    }

    let actx = match ctx {
        poise::Context::Application(actx) => actx,
        poise::Context::Prefix(_) => return Ok(()),
    };

    let custom_id = actx.interaction.id.to_string();
    let dialog = edit_dialog(ctx.data().recall(msg.id), custom_id.clone());

    actx.interaction.create_response(ctx.http(), dialog).await?;
    actx.has_sent_initial_response.store(true, Ordering::SeqCst);

    let submission = serenity::ModalInteractionCollector::new(ctx.serenity_context())
        .author_id(ctx.author().id)
        .filter(move |m| m.data.custom_id == custom_id)
        .timeout(EDIT_TIMEOUT)
        .next()
        .await;

    let submission = match submission {
        Some(submission) => submission,
        None => {
            log::debug!("Edit dialog for {} timed out", msg.id);
            return Ok(());
        }
    };

    let form = EditForm::parse(submission.data.clone()).map_err(Error::Form)?;

    let content = match ctx.data().compose(&form.message).await {
        Ok(content) => content,
        Err(err) if err.is_user_facing() => {
            let reply = serenity::CreateInteractionResponseMessage::new()
                .content(err.to_string())
                .ephemeral(true);
            submission
                .create_response(ctx.http(), serenity::CreateInteractionResponse::Message(reply))
                .await?;
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    ctx.data().remember(msg.id, form.message);

    submission
        .create_response(ctx.http(), serenity::CreateInteractionResponse::Acknowledge)
        .await?;
    submission
        .edit_followup(
            ctx.http(),
            msg.id,
            serenity::CreateInteractionResponseFollowup::new().content(content),
        )
        .await?;

    Ok(())
}

#[poise::command(
    context_menu_command = "Delete message",
    install_context = "Guild|User",
    interaction_context = "Guild|BotDm|PrivateChannel"
)]
pub async fn delete_message(ctx: Context<'_>, msg: serenity::Message) -> Result<(), Error> {
    if let Err(err) = check_deletable(msg.author.id, ctx.framework().bot_id) {
        ephemeral!(ctx, "{}", err).await?;
        return Ok(());
    }

    match msg.delete(ctx.http()).await {
        Ok(()) => {
            ephemeral!(ctx, "Message deleted.").await?;
        }
        Err(err) => {
            log::warn!("Failed to delete message {}: {}", msg.id, err);
            ephemeral!(ctx, "Failed to delete message.").await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use poise::serenity_prelude::{MessageType, UserId};

    #[test]
    fn edit_requires_own_echo() {
        let (bot, someone) = ids();

        assert!(check_editable(bot, MessageType::ChatInputCommand, bot).is_ok());
        assert!(matches!(
            check_editable(someone, MessageType::ChatInputCommand, bot),
            Err(Error::NotEchoMessage)
        ));
        assert!(matches!(
            check_editable(bot, MessageType::Regular, bot),
            Err(Error::NotEchoMessage)
        ));
    }

    fn ids() -> (UserId, UserId) {
        (UserId::new(256_287_298_155_577_344), UserId::new(81_384_788_765_712_384))
    }

    #[test]
    fn delete_requires_own_message() {
        let (bot, someone) = ids();

        assert!(check_deletable(bot, bot).is_ok());
        assert!(matches!(check_deletable(someone, bot), Err(Error::NotOwnMessage)));
    }

    #[test]
    fn edit_dialog_prefills_remembered_template() {
        let json = serde_json::to_string(&edit_dialog(Some("{9:30}".into()), "7".into())).unwrap();
        assert!(json.contains(r#""value":"{9:30}""#));
        assert!(json.contains(r#""label":"/echo message""#));

        let json = serde_json::to_string(&edit_dialog(None, "7".into())).unwrap();
        assert!(!json.contains(r#""value""#));
        assert!(json.contains(r#""custom_id":"7""#));
    }

    #[test]
    fn rejections_are_shown_to_the_user() {
        for err in [Error::NotEchoMessage, Error::NotOwnMessage] {
            assert!(err.is_user_facing());
        }
        assert_eq!(Error::NotEchoMessage.to_string(), "This message is not an /echo message.");
    }
}
