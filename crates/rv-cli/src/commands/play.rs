//! Terminal dialogue player.
//!
//! Input is line based: an empty line continues, a number picks a choice,
//! `q` quits.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use colored::Colorize;
use rv_core::GameEvent;
use rv_dialogue::DialogueView;
use rv_play::{Game, SaveFile};

/// Optional arguments of `rv play`.
pub struct PlayOptions {
    pub seed: Option<u64>,
    pub script: Option<PathBuf>,
    pub load: Option<PathBuf>,
    pub save: Option<PathBuf>,
}

/// Prints completed pages and offered choices to stdout.
#[derive(Debug, Default)]
struct TerminalView;

impl DialogueView for TerminalView {
    fn show_text(&mut self, _speaker: &str, _text: &str) {}

    fn text_complete(&mut self, speaker: &str, text: &str) {
        if text.is_empty() {
            return;
        }
        if speaker.is_empty() {
            println!("  {text}");
        } else {
            println!("  {}: {text}", speaker.bold());
        }
    }

    fn hide(&mut self) {}

    fn show_choices(&mut self, choices: &[String]) {
        for (i, choice) in choices.iter().enumerate() {
            println!("    {}) {choice}", i + 1);
        }
    }

    fn clear_choices(&mut self) {}
}

pub fn run(dir: &Path, dialogue: &str, options: PlayOptions) -> Result<(), String> {
    let mut pack = super::load_pack(dir)?;
    if let Some(seed) = options.seed {
        pack.config = pack.config.clone().with_seed(seed);
    }
    // Pages are revealed in one tick; the terminal has no animation.
    pack.config.typewriter = pack.config.typewriter.clone().with_speed(0.0);
    // Scrollback is the log; completed pages print once.
    pack.config.typewriter.history_lines = None;

    let mut game = Game::from_pack(&pack, TerminalView).map_err(|e| e.to_string())?;
    if let Some(path) = &options.load {
        let save = SaveFile::read(path).map_err(|e| e.to_string())?;
        game.load(save);
    }
    if !game.start_dialogue(dialogue) {
        return Err(format!("could not start dialogue '{dialogue}'"));
    }

    let mut input: Box<dyn BufRead> = match &options.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).map_err(|e| format!("cannot open {}: {e}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    settle(&mut game);
    let mut line = String::new();
    while game.dialogue().is_active() {
        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let command = line.trim();
        if command.eq_ignore_ascii_case("q") || command.eq_ignore_ascii_case("quit") {
            break;
        }
        if command.is_empty() {
            if !game.submit() {
                hint(&game);
            }
        } else {
            let chosen = command
                .parse::<usize>()
                .ok()
                .filter(|n| *n >= 1)
                .is_some_and(|n| game.choose(n - 1));
            if !chosen {
                hint(&game);
            }
        }
        settle(&mut game);
    }

    if game.dialogue().is_active() {
        println!("  {}", "(dialogue left open)".dimmed());
    } else {
        println!("  {}", "(end of dialogue)".dimmed());
    }

    if let Some(path) = &options.save {
        game.save().write(path).map_err(|e| e.to_string())?;
        println!("  Saved to {}", path.display());
    }

    Ok(())
}

/// Reveal pending text and report side effects of the last step.
fn settle(game: &mut Game<TerminalView>) {
    game.tick(0.0);
    for popup in game.take_popups() {
        println!("  [{}]", popup.cyan());
    }
    for event in game.take_events() {
        if let GameEvent::RoomChangeRequested { scene_id, .. } = event {
            println!("  {}", format!("-> room '{scene_id}'").dimmed());
        }
    }
}

fn hint(game: &Game<TerminalView>) {
    let count = game.dialogue().choices().len();
    let message = if game.dialogue().choices_visible() {
        format!("enter a number from 1 to {count}")
    } else {
        "press Enter to continue".to_string()
    };
    println!("  {}", message.yellow());
}
