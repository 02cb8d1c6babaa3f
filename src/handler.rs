use poise::serenity_prelude as serenity;

use crate::errors::Error;
use crate::model::Data;

pub async fn handle(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    _data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot: ready } => {
            if let Some(s) = ready.shard {
                log::info!("Logged in as '{}' on {}/{}", ready.user.name, s.id.0, s.total);
            } else {
                log::info!("Logged in as '{}'", ready.user.name);
            }

            ctx.set_activity(Some(serenity::ActivityData::playing("with time.")));
        }

        other => log::trace!("Unhandled event: {}", other.snake_case_name()),
    }

    Ok(())
}
