use lingo_types::{AppEvent, LanguageSelection};

/// Turn a raw input line into an app event.
///
/// `:lang hi`, `:lang {"code":"mr"}`, `:batch a | b`, `:live text`,
/// `:reset` and `:state` are commands; anything else is translated.
pub fn parse_command(line: &str) -> AppEvent {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(rest) = line.strip_prefix(':') else {
        return AppEvent::Translate(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "lang" => AppEvent::SetLanguage(parse_selection(arg)),
        "batch" => AppEvent::TranslateBatch(arg.split('|').map(|s| s.trim().to_string()).collect()),
        "live" => AppEvent::LiveInput(arg.to_string()),
        "reset" => AppEvent::ResetCache,
        "state" => AppEvent::ShowState,
        _ => AppEvent::Translate(line.to_string()),
    }
}

fn parse_selection(arg: &str) -> LanguageSelection {
    if arg.starts_with('{') {
        match serde_json::from_str(arg) {
            Ok(selection) => return selection,
            Err(e) => tracing::warn!("Invalid language record {}: {}", arg, e),
        }
    }
    LanguageSelection::Code(arg.to_string())
}
