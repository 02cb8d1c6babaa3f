use crate::ephemeral;
use crate::errors::Error;
use crate::model::{Command, Context};
use crate::store::display_offset;

pub fn commands() -> Vec<Command> {
    vec![timezone()]
}

/// Set the timezone used to read templates
#[poise::command(
    slash_command,
    install_context = "Guild|User",
    interaction_context = "Guild|BotDm|PrivateChannel"
)]
pub async fn timezone(
    ctx: Context<'_>,
    #[rename = "timezone"]
    #[description = "Hours offset from UTC, -12 to 12"]
    #[min = -12]
    #[max = 12]
    hours: i64,
) -> Result<(), Error> {
    let offset = ctx.data().timezone.set_hours(hours)?;
    let name = display_offset(offset);

    log::info!("Timezone set to {} by {}", name, ctx.author().tag());
    ephemeral!(ctx, "Timezone set to {}", name).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_option_is_bounded() {
        let cmd = timezone().create_as_slash_command().unwrap();
        let json = serde_json::to_value(&cmd).unwrap();
        let option = &json["options"][0];

        assert_eq!(option["name"], "timezone");
        assert_eq!(option["min_value"].as_f64(), Some(-12.0));
        assert_eq!(option["max_value"].as_f64(), Some(12.0));
    }
}
