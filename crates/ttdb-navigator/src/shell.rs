use std::time::Instant;

use ttdb_core::RecordId;
use ttdb_engine::links::LinkTarget;
use ttdb_engine::session::{Session, SessionEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Find(String),
    Open(String),
    Show,
    TourOn,
    TourOff,
    TourSlow(bool),
    TourPause,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    Forget,
    Refresh,
    Status,
    Help,
    Quit,
}

pub fn parse_command(input: &str) -> Result<Command, String> {
    let mut parts = input.split_whitespace();
    let Some(head) = parts.next() else {
        return Err(String::from("empty command"));
    };
    let rest: Vec<&str> = parts.collect();
    match head {
        "list" | "ls" => Ok(Command::List),
        "find" | "search" => Ok(Command::Find(rest.join(" "))),
        "open" | "select" => rest
            .first()
            .map(|id| Command::Open((*id).to_string()))
            .ok_or_else(|| String::from("open expects a record id or link")),
        "show" => Ok(Command::Show),
        "tour" => match rest.as_slice() {
            ["on"] => Ok(Command::TourOn),
            ["off"] => Ok(Command::TourOff),
            ["slow", "on"] => Ok(Command::TourSlow(true)),
            ["slow", "off"] => Ok(Command::TourSlow(false)),
            ["pause"] => Ok(Command::TourPause),
            _ => Err(String::from("tour expects on|off|pause|slow on|slow off")),
        },
        "zoom" => match rest.as_slice() {
            ["in"] => Ok(Command::ZoomIn),
            ["out"] => Ok(Command::ZoomOut),
            ["reset"] => Ok(Command::ZoomReset),
            _ => Err(String::from("zoom expects in|out|reset")),
        },
        "forget" => Ok(Command::Forget),
        "refresh" => Ok(Command::Refresh),
        "status" => Ok(Command::Status),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("unknown command: {other} (try help)")),
    }
}

// Returns false when the shell should exit.
pub fn handle_line(session: &mut Session, input: &str) -> bool {
    if input.is_empty() {
        return true;
    }
    match parse_command(input) {
        Ok(Command::Quit) => false,
        Ok(command) => {
            execute(session, command);
            true
        }
        Err(message) => {
            println!("{message}");
            true
        }
    }
}

fn execute(session: &mut Session, command: Command) {
    let now = Instant::now();
    match command {
        Command::List => print_list(session),
        Command::Find(term) => {
            session.search_input(&term, now);
        }
        Command::Open(target) => match session.open_link(&target, now) {
            LinkTarget::Internal(_) => {}
            LinkTarget::External(uri) => println!("external resource: {uri}"),
            LinkTarget::Inert => println!("inert link ignored"),
        },
        Command::Show => match session.selected().cloned() {
            Some(id) => print_record(session, &id),
            None => println!("No record selected."),
        },
        Command::TourOn => {
            session.set_tour_enabled(true, now);
            println!("{}", session.tour_note());
        }
        Command::TourOff => {
            session.set_tour_enabled(false, now);
            println!("{}", session.tour_note());
        }
        Command::TourSlow(slow) => {
            session.set_slow_pace(slow, now);
            println!("{}", session.tour_note());
        }
        Command::TourPause => {
            session.toggle_tour_pause(now);
            println!("{}", session.tour_note());
        }
        Command::ZoomIn => {
            session.zoom_step(1, now);
            println!("zoom: {:.2}", session.globe.zoom());
        }
        Command::ZoomOut => {
            session.zoom_step(-1, now);
            println!("zoom: {:.2}", session.globe.zoom());
        }
        Command::ZoomReset => {
            session.reset_zoom(now);
            println!("zoom: {:.2}", session.globe.zoom());
        }
        Command::Forget => {
            session.forget_discoveries(now);
            println!("{}", session.status());
        }
        Command::Refresh => {
            session.refresh(now);
            println!("{}", session.status());
        }
        Command::Status => {
            println!("{}", session.status());
            println!("{}", session.search_meta());
            println!("{}", session.tour_note());
            if let Some(path) = &session.tour_audio().path {
                let playing = if session.tour_audio().should_play {
                    "playing"
                } else {
                    "stopped"
                };
                println!("tour audio: {path} ({playing})");
            }
        }
        Command::Help => print_help(),
        Command::Quit => {}
    }
}

fn print_list(session: &Session) {
    if session.filtered_order().is_empty() {
        if session.search_term().is_empty() {
            println!("No discovered records yet.");
        } else {
            println!("No matching discovered records.");
        }
        return;
    }
    for id in session.filtered_order() {
        let marker = if session.selected() == Some(id) { "*" } else { " " };
        match session.database().get(id).and_then(|record| record.title.as_deref()) {
            Some(title) => println!("{marker} {id} - {title}"),
            None => println!("{marker} {id}"),
        }
    }
    println!("{}", session.search_meta());
}

fn print_record(session: &Session, id: &RecordId) {
    let Some(record) = session.database().get(id) else {
        println!("No record selected.");
        return;
    };
    println!();
    match &record.title {
        Some(title) => println!("== {title} ({id})"),
        None => println!("== {id}"),
    }
    if !record.body.is_empty() {
        println!("{}", record.body);
    }
    if !record.edges.is_empty() {
        println!("Related records:");
        for edge in &record.edges {
            match session.database().get(&edge.target) {
                Some(target) => println!("- {} -> {}", edge.kind, target.label()),
                None => println!("- {} -> {} (unknown)", edge.kind, edge.target),
            }
        }
    }
}

pub fn report_event(session: &Session, event: &SessionEvent) {
    match event {
        SessionEvent::Reloaded => {
            println!("{}", session.status());
        }
        SessionEvent::SelectionChanged { to: Some(id), from_tour, .. } => {
            if *from_tour {
                println!("tour advanced:");
            }
            print_record(session, id);
        }
        SessionEvent::SelectionChanged { .. } => {}
    }
}

fn print_help() {
    println!("commands:");
    println!("  list                 visible records");
    println!("  find <term>          filter discovered records (empty term clears)");
    println!("  open <id|link>       select a record or follow a link");
    println!("  show                 print the selected record");
    println!("  tour on|off|pause    guided tour control");
    println!("  tour slow on|off     tour pacing");
    println!("  zoom in|out|reset    globe zoom");
    println!("  forget               reset discoveries");
    println!("  refresh              force a reload");
    println!("  status               status lines");
    println!("  quit                 exit");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_commands() {
        assert_eq!(parse_command("list").expect("parsed"), Command::List);
        assert_eq!(parse_command("quit").expect("parsed"), Command::Quit);
        assert_eq!(
            parse_command("find rail gauge").expect("parsed"),
            Command::Find(String::from("rail gauge"))
        );
        assert_eq!(
            parse_command("open @alpha").expect("parsed"),
            Command::Open(String::from("@alpha"))
        );
    }

    #[test]
    fn parses_tour_and_zoom_subcommands() {
        assert_eq!(parse_command("tour on").expect("parsed"), Command::TourOn);
        assert_eq!(
            parse_command("tour slow on").expect("parsed"),
            Command::TourSlow(true)
        );
        assert_eq!(parse_command("zoom in").expect("parsed"), Command::ZoomIn);
        assert!(parse_command("tour faster").is_err());
        assert!(parse_command("zoom").is_err());
    }

    #[test]
    fn open_requires_an_argument() {
        assert!(parse_command("open").is_err());
    }

    #[test]
    fn unknown_commands_are_reported() {
        let err = parse_command("teleport").expect_err("unknown command");
        assert!(err.contains("teleport"));
    }
}
