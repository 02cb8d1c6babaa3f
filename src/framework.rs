use crate::errors::Error;
use crate::model::{Context, Data};
use crate::{ephemeral, err_log};

pub fn options() -> poise::FrameworkOptions<Data, Error> {
    poise::FrameworkOptions {
        commands: crate::modules::commands(),
        pre_command: |ctx| Box::pin(before(ctx)),
        post_command: |ctx| Box::pin(after(ctx)),
        on_error: |error| Box::pin(on_error(error)),
        event_handler: |ctx, event, framework, data| {
            Box::pin(crate::handler::handle(ctx, event, framework, data))
        },
        ..Default::default()
    }
}

async fn before(ctx: Context<'_>) {
    log::info!("Processing command `{}`", ctx.command().qualified_name);
}

async fn after(ctx: Context<'_>) {
    log::info!("Successfully processed command `{}`", ctx.command().qualified_name);
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    use poise::FrameworkError::*;

    match error {
        Command { error, ctx, .. } => {
            let cmd = &ctx.command().qualified_name;

            if error.is_user_facing() {
                log::info!("Rejected command `{}`: {}", cmd, error);
                err_log!(ephemeral!(ctx, "{}", error).await);
            } else {
                log::warn!("Error processing command `{}`: {:?}", cmd, error);
                err_log!(ephemeral!(ctx, "Something went wrong processing this command.").await);
            }
        }
        Setup { error, .. } => log::error!("Failed to set up: {}", error),
        other => err_log!(poise::builtins::on_error(other).await),
    }
}
