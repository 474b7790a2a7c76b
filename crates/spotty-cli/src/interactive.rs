//! Line-driven presentation layer over a [`Session`].
//!
//! Each input line becomes a UI event; background results are applied while
//! waiting for the next line, and the view is re-rendered after every change.

use std::rc::Rc;

use spotty_app::{
    AppError, LocationProvider, LocationState, Mode, Session, SubmissionState, UiEvent, View,
};
use spotty_client::HttpFacilityRepository;
use spotty_core::{AppConfig, Coordinate, DraftField, FacilityDraft};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::LocalSet;

use crate::display;

const HELP: &str = "\
commands:
  click <lat> <lng>    start a new facility at a point (replaces any open draft)
  name <text>          set the draft's name
  toggle <flag>        flip free | water | winter | neutral
  submit               add the draft
  cancel               discard the draft
  list                 facilities nearby, nearest first
  show                 current state
  help                 this text
  quit                 leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Free,
    Water,
    Winter,
    Neutral,
}

#[derive(Debug, PartialEq)]
enum Input {
    Click(Coordinate),
    Name(String),
    Toggle(Flag),
    Submit,
    Cancel,
    List,
    Show,
    Help,
    Quit,
}

fn parse_input(line: &str) -> Result<Option<Input>, String> {
    let line = line.trim();
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(c, r)| (c, r.trim()));

    let input = match command {
        "" => return Ok(None),
        "click" => {
            let mut parts = rest.split_whitespace();
            let (Some(lat), Some(lng), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err("usage: click <lat> <lng>".to_owned());
            };
            let lat = lat.parse::<f64>().map_err(|e| format!("bad latitude: {e}"))?;
            let lng = lng.parse::<f64>().map_err(|e| format!("bad longitude: {e}"))?;
            Input::Click(Coordinate::new(lat, lng).map_err(|e| e.to_string())?)
        }
        "name" => Input::Name(rest.to_owned()),
        "toggle" => Input::Toggle(match rest {
            "free" => Flag::Free,
            "water" => Flag::Water,
            "winter" => Flag::Winter,
            "neutral" => Flag::Neutral,
            other => return Err(format!("unknown flag '{other}' (free, water, winter, neutral)")),
        }),
        "submit" => Input::Submit,
        "cancel" => Input::Cancel,
        "list" => Input::List,
        "show" => Input::Show,
        "help" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Some(input))
}

fn toggled(flag: Flag, draft: &FacilityDraft) -> DraftField {
    match flag {
        Flag::Free => DraftField::IsFree(!draft.is_free),
        Flag::Water => DraftField::RunningWater(!draft.running_water),
        Flag::Winter => DraftField::OpenInWinter(!draft.open_in_winter),
        Flag::Neutral => DraftField::GenderNeutral(!draft.gender_neutral),
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn status(view: &View<'_>) -> String {
    let location = match view.location {
        LocationState::Resolving => "locating...".to_owned(),
        LocationState::Resolved(c) => format!("at {c}"),
        LocationState::FallbackResolved(c) => format!("at {c} (default area)"),
    };
    let mode = match view.mode {
        Mode::Browsing => "browsing".to_owned(),
        Mode::Editing(pending) => {
            let draft = pending.draft();
            format!(
                "draft at {}: name \"{}\", free: {}, water: {}, winter: {}, gender neutral: {}{}",
                draft.location,
                draft.name,
                on_off(draft.is_free),
                on_off(draft.running_water),
                on_off(draft.open_in_winter),
                on_off(draft.gender_neutral),
                if pending.submission() == SubmissionState::Submitting {
                    " [submitting]"
                } else {
                    ""
                },
            )
        }
    };
    format!("{location} | {} facilities | {mode}", view.dataset.len())
}

/// Prints the view, plus the error slot when it changed since last time.
fn render(view: &View<'_>, last_error: &mut Option<AppError>) {
    println!("{}", status(view));
    if view.error != last_error.as_ref() {
        if let Some(error) = view.error {
            println!("! {error}");
        }
        *last_error = view.error.cloned();
    }
}

pub async fn run(repo: HttpFacilityRepository, config: &AppConfig) -> anyhow::Result<()> {
    let local = LocalSet::new();
    local
        .run_until(async move {
            let mut session = Session::new(Rc::new(repo), config.search_radius_km);
            session.start(LocationProvider::from_config(config));
            println!("{HELP}");

            let mut last_error = None;
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                tokio::select! {
                    line = lines.next_line() => {
                        let Some(line) = line? else { break };
                        let input = match parse_input(&line) {
                            Ok(Some(input)) => input,
                            Ok(None) => continue,
                            Err(message) => {
                                println!("{message}");
                                continue;
                            }
                        };
                        let changes_state = matches!(
                            input,
                            Input::Click(_)
                                | Input::Name(_)
                                | Input::Toggle(_)
                                | Input::Submit
                                | Input::Cancel
                        );
                        match input {
                            Input::Quit => break,
                            Input::Help => println!("{HELP}"),
                            Input::List => {
                                let view = session.view();
                                let listing = display::list(view.dataset, view.location.coordinate());
                                print!("{listing}");
                            }
                            Input::Show => render(&session.view(), &mut last_error),
                            Input::Click(c) => session.dispatch(UiEvent::MapClicked(c)),
                            Input::Name(name) => {
                                session.dispatch(UiEvent::DraftChanged(DraftField::Name(name)));
                            }
                            Input::Toggle(flag) => {
                                let field = session
                                    .controller()
                                    .pending()
                                    .map(|p| toggled(flag, p.draft()));
                                match field {
                                    Some(field) => session.dispatch(UiEvent::DraftChanged(field)),
                                    None => println!("no open draft; click on the map first"),
                                }
                            }
                            Input::Submit => session.dispatch(UiEvent::Submit),
                            Input::Cancel => session.dispatch(UiEvent::Cancel),
                        }
                        if changes_state {
                            render(&session.view(), &mut last_error);
                        }
                    }
                    progressed = session.step(), if !session.is_idle() => {
                        if progressed {
                            render(&session.view(), &mut last_error);
                        }
                    }
                }
            }
            Ok::<(), anyhow::Error>(())
        })
        .await
}
