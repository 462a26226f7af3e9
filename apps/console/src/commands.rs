//! Console lines parsed into intake commands.

use intake_core::QuickAction;

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    /// Free text: typed into the prompt, then submitted with Ctrl+Enter.
    Type(String),
    Send,
    Quick(QuickAction),
    Chip(String),
    Goal { x: f64, y: f64 },
    Topic(String),
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  <text>          type text into the prompt and submit it
  /send           submit the prompt as it is
  /center /stop /circle /figure8
                  quick actions (sent through the planner)
  /chip TEXT      fill the prompt with an example without sending
  /goal X Y       publish a goal straight to the bus
  /topic TOPIC    change the goal topic
  /status         show the current status
  /quit";

pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(ConsoleCommand::Type(line.to_string())));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    let cmd = match name {
        "send" => ConsoleCommand::Send,
        "chip" if !args.is_empty() => ConsoleCommand::Chip(args.to_string()),
        "chip" => return Err("usage: /chip TEXT".into()),
        "goal" => parse_goal(args)?,
        "topic" => ConsoleCommand::Topic(args.to_string()),
        "status" => ConsoleCommand::Status,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => match other.parse::<QuickAction>() {
            Ok(action) => ConsoleCommand::Quick(action),
            Err(err) => return Err(err.to_string()),
        },
    };
    Ok(Some(cmd))
}

fn parse_goal(args: &str) -> Result<ConsoleCommand, String> {
    let mut parts = args.split(|c: char| c.is_whitespace() || c == ',').filter(|p| !p.is_empty());
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err("usage: /goal X Y".into());
    };
    let x = x.parse::<f64>().map_err(|err| format!("bad x '{x}': {err}"))?;
    let y = y.parse::<f64>().map_err(|err| format!("bad y '{y}': {err}"))?;
    Ok(ConsoleCommand::Goal { x, y })
}
