mod macros;

mod config;
mod errors;
mod ext;
mod framework;
mod handler;
mod logger;
mod model;
mod modules;
mod store;

use crate::config::Config;
use crate::errors::Error;
use crate::ext::emoji::{DiscordEmojis, EmojiResolver};
use crate::model::Data;
use crate::store::TimezoneStore;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let dotenv = dotenv::dotenv();
    logger::init();

    if let Err(err) = dotenv {
        log::debug!("No .env file loaded: {}", err);
    }

    if let Err(err) = run().await {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Error> {
    let config = Config::from_env()?;

    if config.client_id.is_some() || config.client_secret.is_some() {
        log::debug!("OAuth2 client credentials are configured but not used");
    }

    let setup_config = config.clone();
    let framework = poise::Framework::builder()
        .options(framework::options())
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                log::info!("Registered {} commands", framework.options().commands.len());

                ctx.http.set_application_id(ready.application.id);
                let emojis = DiscordEmojis::new(Arc::clone(&ctx.http));

                Ok(Data::new(
                    TimezoneStore::open(&setup_config.timezone_file),
                    EmojiResolver::new(Arc::new(emojis)),
                ))
            })
        })
        .build();

    let mut http = serenity::HttpBuilder::new(&config.token);
    if let Some(proxy) = &config.proxy {
        log::info!("Using proxy {}", proxy);
        http = http.proxy(proxy.as_str());
    }

    let mut client = serenity::ClientBuilder::new_with_http(http.build(), serenity::GatewayIntents::non_privileged())
        .framework(framework)
        .await?;

    let shard_manager = Arc::clone(&client.shard_manager);
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            log::warn!("Could not listen for interrupts: {}", err);
            return;
        }

        log::info!("Goodnight, everybody!");
        shard_manager.shutdown_all().await;
    });

    client.start().await?;

    Ok(())
}
