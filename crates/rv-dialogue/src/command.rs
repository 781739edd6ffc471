//! Commands executed from dialogue nodes and choices.
//!
//! Commands are written as `{"command": name, "args": [...]}`. Names are
//! case-insensitive. Anything unrecognized parses to
//! [`DialogueCommand::Unknown`], which logs and does nothing.

use rv_core::{FlagValue, GameplayEffects, WorldMode};
use tracing::{info, warn};

use crate::graph::RawCommand;

/// A parsed dialogue command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueCommand {
    /// `flag [set] key [value]`. A missing value means `true`.
    SetFlag {
        /// Flag key.
        key: String,
        /// Parsed value.
        value: FlagValue,
    },
    /// `flag get key`: log the current value.
    GetFlag {
        /// Flag key.
        key: String,
    },
    /// `sfx [play] name`.
    PlaySound(String),
    /// `sfx stop name`.
    StopSound(String),
    /// `world set Reality|Dream`.
    SetWorldMode(WorldMode),
    /// `log message...`.
    Log(String),
    /// `item add id`.
    AddItem(String),
    /// `item remove id`.
    RemoveItem(String),
    /// `state [set] target n`.
    SetState {
        /// Interactable id.
        target: String,
        /// New state.
        state: i64,
    },
    /// `consume target`.
    Consume(String),
    /// `popup text...`.
    Popup(String),
    /// `dialogue id`: queue another dialogue.
    StartDialogue(String),
    /// `room scene [spawn]`.
    LoadRoom {
        /// Scene id.
        scene_id: String,
        /// Spawn point.
        spawn_point: Option<String>,
    },
    /// Anything else, kept for logging.
    Unknown {
        /// The command name as written.
        command: String,
        /// Its arguments.
        args: Vec<String>,
    },
}

impl DialogueCommand {
    /// Parse a content command.
    pub fn parse(raw: &RawCommand) -> Self {
        let name = raw.command.trim().to_lowercase();
        let args: Vec<&str> = raw.args.iter().map(|a| a.trim()).collect();
        let parsed = match name.as_str() {
            "flag" | "setflag" => parse_flag(&args),
            "sfx" | "sound" | "playsound" => parse_sound(&args),
            "world" | "worldmode" => parse_world(&args),
            "log" | "print" | "debug" => Some(Self::Log(raw.args.join(" "))),
            "item" | "inventory" => parse_item(&args),
            "state" => parse_state(&args),
            "consume" => first(&args).map(|t| Self::Consume(t.to_string())),
            "popup" => (!args.is_empty()).then(|| Self::Popup(raw.args.join(" "))),
            "dialogue" => first(&args).map(|id| Self::StartDialogue(id.to_string())),
            "room" | "loadroom" => first(&args).map(|scene| Self::LoadRoom {
                scene_id: scene.to_string(),
                spawn_point: args.get(1).filter(|s| !s.is_empty()).map(|s| s.to_string()),
            }),
            _ => None,
        };
        parsed.unwrap_or_else(|| Self::Unknown {
            command: raw.command.clone(),
            args: raw.args.clone(),
        })
    }

    /// Apply the command.
    pub fn execute<E>(&self, fx: &mut E)
    where
        E: GameplayEffects + ?Sized,
    {
        match self {
            Self::SetFlag { key, value } => fx.set_flag(key, value.clone()),
            Self::GetFlag { key } => match fx.state().flag(key) {
                Some(value) => info!(%key, %value, "flag get"),
                None => info!(%key, "flag get: unset"),
            },
            Self::PlaySound(name) => fx.play_sound(name),
            Self::StopSound(name) => fx.stop_sound(name),
            Self::SetWorldMode(mode) => fx.set_world_mode(*mode),
            Self::Log(message) => info!(target: "rv_dialogue::script", "{message}"),
            Self::AddItem(id) => fx.add_item(id),
            Self::RemoveItem(id) => fx.remove_item(id),
            Self::SetState { target, state } => fx.set_interactable_state(target, *state),
            Self::Consume(target) => fx.consume_interactable(target),
            Self::Popup(text) => fx.show_popup(text),
            Self::StartDialogue(id) => fx.request_dialogue(id),
            Self::LoadRoom {
                scene_id,
                spawn_point,
            } => fx.request_room(scene_id, spawn_point.as_deref()),
            Self::Unknown { command, args } => {
                warn!(%command, ?args, "unknown dialogue command ignored");
            }
        }
    }
}

/// Parse and run commands in order.
pub fn run_commands<E>(commands: &[RawCommand], fx: &mut E)
where
    E: GameplayEffects + ?Sized,
{
    for raw in commands {
        DialogueCommand::parse(raw).execute(fx);
    }
}

fn first<'a>(args: &[&'a str]) -> Option<&'a str> {
    args.first().copied().filter(|a| !a.is_empty())
}

fn is_word(arg: Option<&&str>, word: &str) -> bool {
    arg.is_some_and(|a| a.eq_ignore_ascii_case(word))
}

fn parse_flag(args: &[&str]) -> Option<DialogueCommand> {
    if is_word(args.first(), "get") {
        return first(&args[1..]).map(|key| DialogueCommand::GetFlag {
            key: key.to_string(),
        });
    }
    let rest = if is_word(args.first(), "set") {
        &args[1..]
    } else {
        args
    };
    let key = first(rest)?;
    let value = rest
        .get(1)
        .map_or(FlagValue::Bool(true), |raw| FlagValue::parse_loose(raw));
    Some(DialogueCommand::SetFlag {
        key: key.to_string(),
        value,
    })
}

fn parse_sound(args: &[&str]) -> Option<DialogueCommand> {
    if is_word(args.first(), "stop") {
        return first(&args[1..]).map(|n| DialogueCommand::StopSound(n.to_string()));
    }
    let rest = if is_word(args.first(), "play") {
        &args[1..]
    } else {
        args
    };
    first(rest).map(|n| DialogueCommand::PlaySound(n.to_string()))
}

fn parse_world(args: &[&str]) -> Option<DialogueCommand> {
    let rest = if is_word(args.first(), "set") {
        &args[1..]
    } else {
        args
    };
    let mode = first(rest)?.parse::<WorldMode>().ok()?;
    Some(DialogueCommand::SetWorldMode(mode))
}

fn parse_item(args: &[&str]) -> Option<DialogueCommand> {
    let id = first(args.get(1..)?)?.to_string();
    match args.first()?.to_lowercase().as_str() {
        "add" | "give" => Some(DialogueCommand::AddItem(id)),
        "remove" | "take" => Some(DialogueCommand::RemoveItem(id)),
        _ => None,
    }
}

fn parse_state(args: &[&str]) -> Option<DialogueCommand> {
    let rest = if is_word(args.first(), "set") {
        &args[1..]
    } else {
        args
    };
    let target = first(rest)?;
    let state = rest.get(1)?.parse::<i64>().ok()?;
    Some(DialogueCommand::SetState {
        target: target.to_string(),
        state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rv_core::{GameContext, GameEvent, ItemCatalog};

    fn parse(command: &str, args: &[&str]) -> DialogueCommand {
        DialogueCommand::parse(&RawCommand::new(command, args.iter().copied()))
    }

    #[test]
    fn flag_forms() {
        assert_eq!(
            parse("flag", &["set", "met_mara"]),
            DialogueCommand::SetFlag {
                key: "met_mara".into(),
                value: FlagValue::Bool(true)
            }
        );
        assert_eq!(
            parse("SetFlag", &["bells", "3"]),
            DialogueCommand::SetFlag {
                key: "bells".into(),
                value: FlagValue::Int(3)
            }
        );
        assert_eq!(
            parse("FLAG", &["set", "mood", "grim"]),
            DialogueCommand::SetFlag {
                key: "mood".into(),
                value: FlagValue::String("grim".into())
            }
        );
        assert_eq!(
            parse("flag", &["get", "bells"]),
            DialogueCommand::GetFlag { key: "bells".into() }
        );
    }

    #[test]
    fn sound_and_world_forms() {
        assert_eq!(parse("sfx", &["play", "bell"]), DialogueCommand::PlaySound("bell".into()));
        assert_eq!(parse("playsound", &["bell"]), DialogueCommand::PlaySound("bell".into()));
        assert_eq!(parse("Sound", &["stop", "rain"]), DialogueCommand::StopSound("rain".into()));
        assert_eq!(
            parse("worldmode", &["set", "dream"]),
            DialogueCommand::SetWorldMode(WorldMode::Dream)
        );
        assert!(matches!(parse("world", &["set", "limbo"]), DialogueCommand::Unknown { .. }));
    }

    #[test]
    fn log_joins_arguments() {
        assert_eq!(
            parse("print", &["the", "door", "creaks"]),
            DialogueCommand::Log("the door creaks".into())
        );
    }

    #[test]
    fn malformed_commands_are_unknown() {
        assert!(matches!(parse("flag", &[]), DialogueCommand::Unknown { .. }));
        assert!(matches!(parse("state", &["door", "open"]), DialogueCommand::Unknown { .. }));
        assert!(matches!(parse("item", &["juggle", "ball"]), DialogueCommand::Unknown { .. }));
        assert!(matches!(parse("dance", &[]), DialogueCommand::Unknown { .. }));
    }

    #[test]
    fn commands_act_through_effects() {
        let mut ctx = GameContext::new(ItemCatalog::default());
        run_commands(
            &[
                RawCommand::new("flag", ["set", "bells", "2"]),
                RawCommand::new("item", ["add", "key"]),
                RawCommand::new("state", ["set", "door", "1"]),
                RawCommand::new("world", ["set", "Dream"]),
                RawCommand::new("sfx", ["play", "bell"]),
                RawCommand::new("unknown", ["x"]),
                RawCommand::new("room", ["cellar", "stairs"]),
            ],
            &mut ctx,
        );
        assert_eq!(ctx.state().flag_int("bells", 0), 2);
        assert!(ctx.state().has_item("key"));
        assert_eq!(ctx.state().state("door", 0), 1);
        assert_eq!(ctx.world_mode(), WorldMode::Dream);
        let room = ctx.take_room_request().unwrap();
        assert_eq!(room.spawn_point.as_deref(), Some("stairs"));
        assert!(ctx
            .bus()
            .events()
            .any(|e| matches!(e, GameEvent::SoundRequested { play: true, .. })));
    }
}
