use itertools::Itertools;
use poise::serenity_prelude as serenity;
use std::fmt::{self, Display, Formatter};

use crate::ephemeral;
use crate::errors::Error;
use crate::model::{Command, Context};

pub fn commands() -> Vec<Command> {
    vec![userinfo(), user_info(), channelinfo()]
}

/// Show information about a user
#[poise::command(
    slash_command,
    install_context = "Guild|User",
    interaction_context = "Guild|BotDm|PrivateChannel"
)]
pub async fn userinfo(
    ctx: Context<'_>,
    #[description = "The user to show (defaults to you)"] user: Option<serenity::User>,
    #[description = "Only show the result to you"] ephemeral: Option<bool>,
) -> Result<(), Error> {
    let user = user.as_ref().unwrap_or_else(|| ctx.author());
    send_user_info(ctx, user, ephemeral.unwrap_or(false)).await
}

#[poise::command(
    context_menu_command = "User info",
    install_context = "Guild|User",
    interaction_context = "Guild|BotDm|PrivateChannel"
)]
pub async fn user_info(ctx: Context<'_>, user: serenity::User) -> Result<(), Error> {
    send_user_info(ctx, &user, true).await
}

async fn send_user_info(ctx: Context<'_>, user: &serenity::User, ephemeral: bool) -> Result<(), Error> {
    let member = match ctx.guild_id() {
        Some(guild_id) => match guild_id.member(ctx.http(), user.id).await {
            Ok(member) => Some(member),
            Err(err) => {
                log::debug!("No member {} in {}: {}", user.id, guild_id, err);
                None
            }
        },
        None => None,
    };

    let summary = UserSummary::new(user, member.as_ref());
    ctx.send(poise::CreateReply::default().content(summary.to_string()).ephemeral(ephemeral))
        .await?;

    Ok(())
}

/// Show information about a channel
#[poise::command(
    slash_command,
    guild_only,
    install_context = "Guild|User",
    interaction_context = "Guild"
)]
pub async fn channelinfo(
    ctx: Context<'_>,
    #[description = "The channel to show (defaults to this one)"] channel: Option<serenity::Channel>,
    #[description = "Only show the result to you"] ephemeral: Option<bool>,
) -> Result<(), Error> {
    let channel = match channel {
        Some(channel) => channel,
        None => ctx.channel_id().to_channel(ctx.http()).await?,
    };

    let channel = match channel.guild() {
        Some(channel) => channel,
        None => {
            ephemeral!(ctx, "That is not a server channel.").await?;
            return Ok(());
        }
    };

    let summary = ChannelSummary::new(&channel);
    ctx.send(
        poise::CreateReply::default()
            .content(summary.to_string())
            .ephemeral(ephemeral.unwrap_or(false)),
    )
    .await?;

    Ok(())
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserSummary {
    pub name: String,
    pub global_name: Option<String>,
    pub id: u64,
    pub bot: bool,
    pub created: i64,
    pub avatar: String,
    pub member: Option<MemberSummary>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemberSummary {
    pub nick: Option<String>,
    pub joined: Option<i64>,
    pub roles: Vec<u64>,
}

impl UserSummary {
    pub fn new(user: &serenity::User, member: Option<&serenity::Member>) -> Self {
        Self {
            name: user.name.clone(),
            global_name: user.global_name.clone(),
            id: user.id.get(),
            bot: user.bot,
            created: user.id.created_at().unix_timestamp(),
            avatar: user.face(),
            member: member.map(|m| MemberSummary {
                nick: m.nick.clone(),
                joined: m.joined_at.map(|t| t.unix_timestamp()),
                roles: m.roles.iter().map(|r| r.get()).collect(),
            }),
        }
    }
}

impl Display for UserSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.global_name {
            Some(global) => writeln!(f, "**User**: {} ({})", self.name, global)?,
            None => writeln!(f, "**User**: {}", self.name)?,
        }
        writeln!(f, "**ID**: {}", self.id)?;
        writeln!(f, "**Bot**: {}", yes_no(self.bot))?;
        writeln!(f, "**Created**: <t:{}:f>", self.created)?;
        write!(f, "**Avatar**: {}", self.avatar)?;

        if let Some(member) = &self.member {
            if let Some(nick) = &member.nick {
                write!(f, "\n**Nickname**: {}", nick)?;
            }
            if let Some(joined) = member.joined {
                write!(f, "\n**Joined**: <t:{}:f>", joined)?;
            }
            if member.roles.is_empty() {
                write!(f, "\n**Roles**: none")?;
            } else {
                write!(f, "\n**Roles**: {}", member.roles.iter().map(|r| format!("<@&{}>", r)).join(", "))?;
            }
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelSummary {
    pub name: String,
    pub id: u64,
    pub kind: String,
    pub created: i64,
    pub category: Option<u64>,
    pub position: u16,
    pub topic: Option<String>,
    pub nsfw: bool,
    pub slowmode: Option<u16>,
}

impl ChannelSummary {
    pub fn new(channel: &serenity::GuildChannel) -> Self {
        Self {
            name: channel.name.clone(),
            id: channel.id.get(),
            kind: channel.kind.name().to_string(),
            created: channel.id.created_at().unix_timestamp(),
            category: channel.parent_id.map(|id| id.get()),
            position: channel.position,
            topic: channel.topic.clone().filter(|t| !t.is_empty()),
            nsfw: channel.nsfw,
            slowmode: channel.rate_limit_per_user.filter(|&secs| secs > 0),
        }
    }
}

impl Display for ChannelSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "**Channel**: <#{}> ({})", self.id, self.name)?;
        writeln!(f, "**ID**: {}", self.id)?;
        writeln!(f, "**Type**: {}", self.kind)?;
        writeln!(f, "**Created**: <t:{}:f>", self.created)?;
        if let Some(category) = self.category {
            writeln!(f, "**Category**: <#{}>", category)?;
        }
        writeln!(f, "**Position**: {}", self.position)?;
        if let Some(topic) = &self.topic {
            writeln!(f, "**Topic**: {}", topic)?;
        }
        if let Some(secs) = self.slowmode {
            writeln!(f, "**Slow mode**: {}s", secs)?;
        }
        write!(f, "**NSFW**: {}", yes_no(self.nsfw))
    }
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}
