pub mod echo;
pub mod info;
pub mod timezone;

use crate::model::Command;

pub fn commands() -> Vec<Command> {
    let mut commands = Vec::new();
    commands.extend(echo::commands());
    commands.extend(timezone::commands());
    commands.extend(info::commands());
    commands
}
