#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciCommand {
    Uci,
    IsReady,
    UciNewGame,
    Position(Vec<String>),
    Go(GoLimits),
    Perft(u32),
    SetOption { name: String, value: Option<String> },
    Display,
    Stop,
    Quit,
    Unknown(String),
}

/// Limits from a `go` command. Unset fields fall back to the configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoLimits {
    pub nodes: Option<u64>,
    pub depth: Option<u32>,
    pub movetime_ms: Option<u64>,
}

pub fn parse_uci_command(line: &str) -> Option<UciCommand> {
    let trimmed = line.trim();
    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    let first = *parts.first()?;

    let cmd = match first {
        "uci" => UciCommand::Uci,
        "isready" => UciCommand::IsReady,
        "ucinewgame" => UciCommand::UciNewGame,
        "position" => UciCommand::Position(parts[1..].iter().map(|p| (*p).to_string()).collect()),
        "go" => UciCommand::Go(parse_go(&parts[1..])),
        "perft" => {
            let depth = parts.get(1).and_then(|v| v.parse::<u32>().ok()).unwrap_or(1);
            UciCommand::Perft(depth)
        }
        "setoption" => parse_setoption(&parts[1..])?,
        "d" => UciCommand::Display,
        "stop" => UciCommand::Stop,
        "quit" => UciCommand::Quit,
        _ => UciCommand::Unknown(trimmed.to_string()),
    };

    Some(cmd)
}

fn parse_go(parts: &[&str]) -> GoLimits {
    let mut limits = GoLimits::default();
    let mut tokens = parts.iter();
    while let Some(&token) = tokens.next() {
        match token {
            "nodes" => limits.nodes = tokens.next().and_then(|v| v.parse().ok()),
            "depth" => limits.depth = tokens.next().and_then(|v| v.parse().ok()),
            "movetime" => limits.movetime_ms = tokens.next().and_then(|v| v.parse().ok()),
            _ => {}
        }
    }
    limits
}

/// `setoption name <words...> [value <words...>]`
fn parse_setoption(parts: &[&str]) -> Option<UciCommand> {
    if parts.first() != Some(&"name") {
        return None;
    }
    let rest = &parts[1..];
    let value_at = rest.iter().position(|&p| p == "value");
    let (name, value) = match value_at {
        Some(i) => (&rest[..i], Some(rest[i + 1..].join(" "))),
        None => (rest, None),
    };
    if name.is_empty() {
        return None;
    }
    Some(UciCommand::SetOption {
        name: name.join(" "),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_limits() {
        assert_eq!(
            parse_uci_command("go wtime 1000 nodes 5000 depth 4 movetime 300"),
            Some(UciCommand::Go(GoLimits {
                nodes: Some(5000),
                depth: Some(4),
                movetime_ms: Some(300),
            }))
        );
        assert_eq!(
            parse_uci_command("go"),
            Some(UciCommand::Go(GoLimits::default()))
        );
    }

    #[test]
    fn setoption_with_spaces() {
        assert_eq!(
            parse_uci_command("setoption name Move Time value 250"),
            Some(UciCommand::SetOption {
                name: "Move Time".to_string(),
                value: Some("250".to_string()),
            })
        );
        assert_eq!(parse_uci_command("setoption value 3"), None);
    }

    #[test]
    fn blank_and_unknown() {
        assert_eq!(parse_uci_command("   "), None);
        assert_eq!(
            parse_uci_command("xyzzy 1"),
            Some(UciCommand::Unknown("xyzzy 1".to_string()))
        );
        assert_eq!(parse_uci_command("perft 3"), Some(UciCommand::Perft(3)));
    }
}
