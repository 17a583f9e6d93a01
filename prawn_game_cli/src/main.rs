use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use prawn_game_cli::catalog::Catalog;
use prawn_game_cli::deck::{CurrentState, DeckPolicy, ExhaustionPolicy, RetreatReveal};
use prawn_game_cli::game::{FilterVariant, Game, GameSettings, View};
use prawn_game_cli::input::{read_line, Command, SetRef};
use prawn_game_cli::logger;
use prawn_game_cli::rotation::{RosterSnapshot, TurnRotation};
use prawn_game_cli::shuffle::{Randomizer, RngShuffler};

#[derive(Parser)]
#[command(name = "prawn-game")]
#[command(about = "Shuffled conversation cards for one or more players")]
struct Args {
    /// JSON prompt catalog to use instead of the bundled one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Seed the shuffle for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Deal a fresh deck instead of stopping at the end
    #[arg(long)]
    auto_reshuffle: bool,

    /// Show the answer face of a card brought back with `prev`
    #[arg(long)]
    reveal_on_retreat: bool,

    /// Filter with a single wildcard switch instead of card sets
    #[arg(long)]
    wildcard_only: bool,

    /// Seat a player (repeatable, in turn order)
    #[arg(long = "player")]
    players: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the session journal on exit
    #[arg(long)]
    dump_log: bool,
}

impl Args {
    fn settings(&self) -> GameSettings {
        GameSettings {
            policy: DeckPolicy {
                exhaustion: if self.auto_reshuffle { ExhaustionPolicy::AutoReshuffle } else { ExhaustionPolicy::Manual },
                retreat_reveal: if self.reveal_on_retreat { RetreatReveal::Revealed } else { RetreatReveal::Hidden },
            },
            variant: if self.wildcard_only { FilterVariant::WildcardOnly } else { FilterVariant::Categories },
        }
    }
}

const SETUP_HELP: &str = "t <n|set> toggle set | w wildcards | a <name> add | r <n> remove | m <from> <to> move | x shuffle players | s start | q quit";
const PLAY_HELP: &str = "n next | p prev | f flip | t <n|set> toggle set | w wildcards | o options | log | q quit";

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.verbose);

    let catalog = match &args.catalog {
        Some(path) => Catalog::from_path(path).with_context(|| format!("loading {}", path.display()))?,
        None => Catalog::builtin().context("bundled catalog is broken")?,
    };
    info!(prompts = catalog.len(), "catalog loaded");

    let rng = match args.seed {
        Some(seed) => RngShuffler::seeded(seed),
        None => RngShuffler::from_entropy(),
    };

    let mut roster = TurnRotation::new();
    for name in &args.players {
        roster.add_participant(name);
    }

    let mut game = Game::new(args.settings(), catalog, rng).with_roster(roster);

    println!("THE PRAWN GAME");
    loop {
        match game.view() {
            View::Setup => print_setup(&game),
            View::Playing => print_table(&game),
        }
        let Some(line) = read_line("> ") else { break };
        let Some(cmd) = Command::parse(&line) else {
            println!("Unrecognized command. Type 'h' for help.");
            continue;
        };
        if cmd == Command::Quit {
            break;
        }
        handle(&mut game, cmd);
    }

    if args.dump_log {
        print!("{}", game.log().render());
    }
    Ok(())
}

fn handle<R: Randomizer>(game: &mut Game<R>, cmd: Command) {
    match cmd {
        Command::Help => {
            let help = if game.view() == View::Setup { SETUP_HELP } else { PLAY_HELP };
            println!("{help}");
        }
        Command::ToggleSet(set) => {
            let id = match set {
                SetRef::Position(n) => game.card_sets().get(n - 1).map(|s| s.id.clone()),
                SetRef::Id(id) => Some(id),
            };
            let toggled = id.map_or(false, |id| game.toggle_card_set(&id));
            if !toggled {
                println!("No such card set.");
            }
        }
        Command::ToggleWildcards => match game.wildcards_enabled() {
            Some(on) => {
                game.set_wildcards(!on);
            }
            None => println!("This game filters by card set; use 't'."),
        },
        Command::AddPlayer(name) => persist(game.add_participant(&name)),
        Command::RemovePlayer(n) => persist(game.remove_participant(n - 1)),
        Command::MovePlayer(from, to) => persist(game.move_participant(from - 1, to - 1)),
        Command::ShufflePlayers => persist(Some(game.shuffle_participants())),
        Command::Start | Command::Next if game.view() == View::Setup => {
            if game.start().is_none() {
                println!("Enable at least one card set first.");
            }
        }
        Command::Next => {
            game.advance();
        }
        Command::Prev => {
            if !game.can_retreat() {
                println!("Nothing to go back to.");
            }
            game.retreat();
        }
        Command::Flip => {
            game.flip();
        }
        Command::Options => game.open_setup(),
        Command::ShowLog => print!("{}", game.log().render()),
        Command::Start => println!("Already playing. Type 'o' for options."),
        Command::Quit => {}
    }
}

// Roster storage belongs to whoever embeds the game; the terminal just traces it.
fn persist(snapshot: Option<RosterSnapshot>) {
    match snapshot {
        Some(s) => debug!(roster = ?s.participants, active = ?s.active_index, "roster changed"),
        None => println!("Nothing changed."),
    }
}

fn print_setup<R: Randomizer>(game: &Game<R>) {
    println!();
    println!("--- Card Options ---");
    match game.wildcards_enabled() {
        Some(on) => println!("  Wildcards: {}", if on { "on" } else { "off" }),
        None => {
            for (i, set) in game.card_sets().iter().enumerate() {
                let mark = if set.enabled { "x" } else { " " };
                println!("  {}. [{}] {:<11} {}", i + 1, mark, set.name, set.description);
            }
        }
    }
    println!("--- Players ---");
    if game.rotation().is_empty() {
        println!("  (none)");
    }
    for (i, name) in game.rotation().participants().iter().enumerate() {
        println!("  {}. {}", i + 1, name);
    }
    if !game.can_start() {
        println!("(start disabled: no cards selected)");
    }
    println!("Type 'h' for help.");
}

fn print_table<R: Randomizer>(game: &Game<R>) {
    let CurrentState { prompt, remaining, revealed } = game.current();
    println!();
    if let Some(name) = game.rotation().current_participant() {
        println!("{name}'s turn");
    }
    match prompt {
        None => println!("[ End of Deck ]"),
        Some(_) if !revealed => println!("[ WNRS ]  (f to flip)"),
        Some(p) => println!("[ {p} ]"),
    }
    println!("{remaining} left{}", if game.can_retreat() { "" } else { "  (no previous card)" });
}
