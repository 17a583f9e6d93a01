use std::io::{self, BufRead, Write};

/// Prints `prompt` and reads one line. `None` on end of input.
pub fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();

    let mut buf = String::new();
    match io::stdin().lock().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf),
    }
}

/// A card set picked either by its 1-based position on screen or by id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetRef {
    Position(usize),
    Id(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Next,
    Prev,
    Flip,
    ToggleSet(SetRef),
    ToggleWildcards,
    AddPlayer(String),
    /// 1-based, as listed.
    RemovePlayer(usize),
    MovePlayer(usize, usize),
    ShufflePlayers,
    Start,
    Options,
    ShowLog,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((h, r)) => (h, r.trim()),
            None => (line, ""),
        };
        let position = |s: &str| s.parse::<usize>().ok().filter(|&n| n > 0);

        let cmd = match head.to_lowercase().as_str() {
            "n" | "next" | "" if rest.is_empty() => Command::Next,
            "p" | "prev" | "back" => Command::Prev,
            "f" | "flip" => Command::Flip,
            "t" | "toggle" if !rest.is_empty() => match position(rest) {
                Some(n) => Command::ToggleSet(SetRef::Position(n)),
                None => Command::ToggleSet(SetRef::Id(rest.to_string())),
            },
            "w" | "wild" | "wildcards" => Command::ToggleWildcards,
            "a" | "add" if !rest.is_empty() => Command::AddPlayer(rest.to_string()),
            "r" | "remove" => Command::RemovePlayer(position(rest)?),
            "m" | "move" => {
                let mut parts = rest.split_whitespace();
                let from = position(parts.next()?)?;
                let to = position(parts.next()?)?;
                Command::MovePlayer(from, to)
            }
            "x" | "shuffle" => Command::ShufflePlayers,
            "s" | "start" => Command::Start,
            "o" | "options" => Command::Options,
            "log" => Command::ShowLog,
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            _ => return None,
        };
        Some(cmd)
    }
}
