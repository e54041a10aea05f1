//! Interactive calendar session.
//!
//! Reads one command per line from stdin and drives a [`CalendarController`]
//! over an in-memory widget, so the whole reconciliation protocol (drops,
//! drags, deletes with undo, room filter) can be exercised against a real
//! server from a terminal.

use std::io::Write as _;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use roomdesk_calendar::{
    Alerter, CalendarController, CalendarHooks, CalendarWidget, EventChange, EventCollection,
    EventKey, HookOutcome, NotificationId, NotifyConfig, PageInputs, PageSession,
};
use roomdesk_client::{HttpReservationClient, ReservationBackend};
use roomdesk_core::{ExternalSource, RoomId, TimeSpan, parse_timestamp};

use crate::config::Config;
use crate::error::CliResult;

const HELP: &str = "\
Commands:
  list                          show events on the calendar
  drop <room> <start> <end> [title]
                                drop a new reservation onto the calendar
  move <key> <start>            drag an event to a new start
  resize <key> <end>            drag an event's end
  click <key>                   delete an event (offers undo)
  undo [id]                     undo a deletion (newest if no id)
  close <id>                    close a notification
  filter <room|-1>              show one room, or all rooms
  hover | leave                 move the pointer into / out of the tray
  notifications                 show the notification tray
  help                          this text
  quit                          leave the session

Times are RFC 3339 or local `YYYY-MM-DDTHH:MM`.";

/// Errors parsing a session command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid number `{0}`")]
    Number(String),

    #[error("invalid time `{0}`")]
    Time(String),
}

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    List,
    Drop {
        room: RoomId,
        span: TimeSpan,
        title: Option<String>,
    },
    Move {
        key: EventKey,
        start: DateTime<Utc>,
    },
    Resize {
        key: EventKey,
        end: DateTime<Utc>,
    },
    Click(EventKey),
    Undo(Option<NotificationId>),
    Close(NotificationId),
    Filter(i64),
    Hover,
    Leave,
    Notifications,
    Help,
    Quit,
}

fn number<T: FromStr>(arg: &str) -> Result<T, CommandParseError> {
    arg.trim_start_matches('#')
        .parse()
        .map_err(|_| CommandParseError::Number(arg.to_string()))
}

fn time(arg: &str) -> Result<DateTime<Utc>, CommandParseError> {
    parse_timestamp(arg).map_err(|_| CommandParseError::Time(arg.to_string()))
}

impl FromStr for SessionCommand {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandParseError::Empty);
        };
        let args: Vec<&str> = words.collect();

        let command = match (name, args.as_slice()) {
            ("list" | "ls", []) => Self::List,
            ("drop", [room, start, end, title @ ..]) => {
                let span = TimeSpan::new(time(start)?, time(end)?);
                if span.end <= span.start {
                    return Err(CommandParseError::Usage("drop: end must be after start"));
                }
                Self::Drop {
                    room: RoomId(number(room)?),
                    span,
                    title: (!title.is_empty()).then(|| title.join(" ")),
                }
            }
            ("drop", _) => return Err(CommandParseError::Usage("drop <room> <start> <end> [title]")),
            ("move", [key, start]) => Self::Move {
                key: EventKey::from_raw(number(key)?),
                start: time(start)?,
            },
            ("move", _) => return Err(CommandParseError::Usage("move <key> <start>")),
            ("resize", [key, end]) => Self::Resize {
                key: EventKey::from_raw(number(key)?),
                end: time(end)?,
            },
            ("resize", _) => return Err(CommandParseError::Usage("resize <key> <end>")),
            ("click" | "delete", [key]) => Self::Click(EventKey::from_raw(number(key)?)),
            ("click" | "delete", _) => return Err(CommandParseError::Usage("click <key>")),
            ("undo", []) => Self::Undo(None),
            ("undo", [id]) => Self::Undo(Some(NotificationId::from_raw(number(id)?))),
            ("undo", _) => return Err(CommandParseError::Usage("undo [id]")),
            ("close", [id]) => Self::Close(NotificationId::from_raw(number(id)?)),
            ("close", _) => return Err(CommandParseError::Usage("close <id>")),
            ("filter", [room]) => Self::Filter(number(room)?),
            ("filter", _) => return Err(CommandParseError::Usage("filter <room|-1>")),
            ("hover", []) => Self::Hover,
            ("leave", []) => Self::Leave,
            ("notifications" | "tray", []) => Self::Notifications,
            ("help" | "?", _) => Self::Help,
            ("quit" | "exit" | "q", _) => Self::Quit,
            (other, _) => return Err(CommandParseError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

/// Prints alerts to stderr.
#[derive(Debug, Default)]
pub struct TerminalAlerter;

impl Alerter for TerminalAlerter {
    fn alert(&self, message: &str) {
        eprintln!("! {}", message);
    }
}

/// A calendar page driven from the terminal.
pub struct Session {
    controller: CalendarController<EventCollection>,
}

impl Session {
    pub fn new(
        backend: Arc<dyn ReservationBackend>,
        alerter: Arc<dyn Alerter>,
        notify: NotifyConfig,
        inputs: PageInputs,
    ) -> Self {
        let mut controller = CalendarController::new(
            backend,
            EventCollection::new(),
            alerter,
            PageSession::new(),
            notify,
        );
        controller.load(inputs);
        Self { controller }
    }

    pub fn controller(&self) -> &CalendarController<EventCollection> {
        &self.controller
    }

    /// Runs one command and returns the lines to print.
    pub async fn execute(&mut self, command: SessionCommand) -> Vec<String> {
        debug!(?command, "Session command");
        match command {
            SessionCommand::List => self.list(),
            SessionCommand::Drop { room, span, title } => vec![self.drop_event(room, span, title).await],
            SessionCommand::Move { key, start } => {
                let Some(previous) = self.editable_span(key) else {
                    return vec![format!("Event {} cannot be moved", key)];
                };
                self.set_span(key, previous.moved_to(start));
                let outcome = self.controller.event_drop(EventChange::new(key, previous)).await;
                vec![describe(outcome)]
            }
            SessionCommand::Resize { key, end } => {
                let Some(previous) = self.editable_span(key) else {
                    return vec![format!("Event {} cannot be resized", key)];
                };
                if end <= previous.start {
                    return vec!["The end must be after the start".to_string()];
                }
                self.set_span(key, TimeSpan::new(previous.start, end));
                let outcome = self.controller.event_resize(EventChange::new(key, previous)).await;
                vec![describe(outcome)]
            }
            SessionCommand::Click(key) => {
                let outcome = self.controller.event_click(key).await;
                let mut lines = vec![describe(outcome)];
                if matches!(outcome, HookOutcome::Deleted(_)) {
                    lines.extend(self.tray_lines().await.into_iter().take(1));
                }
                lines
            }
            SessionCommand::Undo(id) => {
                let id = match id {
                    Some(id) => Some(id),
                    None => self.controller.latest_undo().await,
                };
                match id {
                    Some(id) => vec![describe(self.controller.undo(id).await)],
                    None => vec!["Nothing to undo".to_string()],
                }
            }
            SessionCommand::Close(id) => {
                if self.controller.close_notification(id).await {
                    vec![format!("Closed notification {}", id)]
                } else {
                    vec![format!("No notification {}", id)]
                }
            }
            SessionCommand::Filter(raw) => {
                if self.controller.rooms().is_none() {
                    return vec!["This page has no room filter".to_string()];
                }
                if self.controller.set_room_filter(raw) {
                    let mut lines = vec![format!("Showing {}", self.controller.room_filter())];
                    lines.extend(self.list());
                    lines
                } else {
                    vec![format!("Already showing {}", self.controller.room_filter())]
                }
            }
            SessionCommand::Hover => {
                self.controller.pointer_entered_tray();
                vec!["Pointer is over the tray".to_string()]
            }
            SessionCommand::Leave => {
                self.controller.pointer_left_tray();
                vec!["Pointer left the tray".to_string()]
            }
            SessionCommand::Notifications => {
                let lines = self.tray_lines().await;
                if lines.is_empty() {
                    vec!["No notifications".to_string()]
                } else {
                    lines
                }
            }
            SessionCommand::Help => HELP.lines().map(str::to_string).collect(),
            SessionCommand::Quit => Vec::new(),
        }
    }

    async fn drop_event(&mut self, room: RoomId, span: TimeSpan, title: Option<String>) -> String {
        let source = self
            .controller
            .external_sources()
            .and_then(|sources| sources.iter().find(|s| s.room == room).cloned());
        if let Some(ref source) = source
            && !source.draggable
        {
            return format!("Room {} is hidden by the room filter", room);
        }

        let source = source.unwrap_or_else(|| ExternalSource::new(format!("Room {}", room), room));
        let mut event = source.provisional_event(span.start, span.end);
        if let Some(title) = title {
            event.title = title;
        }
        let key = self.controller.widget_mut().add_event(event);
        describe(self.controller.event_receive(key).await)
    }

    fn editable_span(&self, key: EventKey) -> Option<TimeSpan> {
        self.controller
            .widget()
            .event(key)
            .filter(|e| e.editable)
            .map(|e| e.span())
    }

    fn set_span(&mut self, key: EventKey, span: TimeSpan) {
        if let Some(event) = self.controller.widget_mut().event_mut(key) {
            event.set_span(span);
        }
    }

    fn list(&self) -> Vec<String> {
        let widget = self.controller.widget();
        if widget.is_empty() {
            return vec!["No events".to_string()];
        }
        widget
            .iter()
            .map(|(key, e)| {
                let pk = e.pk.map(|pk| pk.to_string()).unwrap_or_else(|| "-".to_string());
                format!(
                    "{:<4} pk {:<6} room {:<4} {:<7} {}  {}{}",
                    key.to_string(),
                    pk,
                    e.room.0,
                    e.visibility.class_name(),
                    e.span(),
                    e.title,
                    if e.editable { "" } else { " [read-only]" }
                )
            })
            .collect()
    }

    async fn tray_lines(&self) -> Vec<String> {
        self.controller
            .notifications()
            .await
            .into_iter()
            .map(|n| {
                let hint = if n.has_undo { "  (undo available)" } else { "" };
                format!("[{}] {}{}", n.id, n.text, hint)
            })
            .collect()
    }
}

fn describe(outcome: HookOutcome) -> String {
    match outcome {
        HookOutcome::Confirmed(pk) => format!("Reserved (pk {})", pk),
        HookOutcome::Updated => "Saved".to_string(),
        HookOutcome::Reverted => "Change refused, previous times restored".to_string(),
        HookOutcome::Removed => "Reservation refused, event removed".to_string(),
        HookOutcome::Deleted(id) => format!("Deleted (notification {})", id),
        HookOutcome::Restored { key, pk } => format!("Restored as {} (pk {})", key, pk),
        HookOutcome::Rejected => "Request refused".to_string(),
        HookOutcome::Ignored => "Nothing to do".to_string(),
    }
}

/// Runs the interactive session until `quit` or end of input.
///
/// The CSRF token comes from `--csrf-token`, then the page, then the
/// configuration file.
pub async fn run(
    config: &Config,
    base_url: Option<&str>,
    csrf_token: Option<&str>,
    page: Option<&Path>,
) -> CliResult<()> {
    let inputs = match page {
        Some(path) => Some(PageInputs::from_json(&std::fs::read_to_string(path)?)?),
        None => None,
    };
    let csrf_token = csrf_token.or(inputs.as_ref().map(|p| p.csrf_token.as_str()));
    let client_config = config.backend.to_client_config(base_url, csrf_token)?;
    let inputs = inputs.unwrap_or_else(|| PageInputs {
        csrf_token: client_config.csrf_token.clone(),
        ..PageInputs::default()
    });

    let base = client_config.base_url.clone();
    let backend: Arc<dyn ReservationBackend> = Arc::new(HttpReservationClient::new(client_config)?);
    let mut session = Session::new(
        backend,
        Arc::new(TerminalAlerter),
        config.notifications.to_notify_config(),
        inputs,
    );

    println!("roomdesk session on {} (type `help` for commands)", base);
    for line in session.list() {
        println!("{}", line);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<SessionCommand>() {
            Ok(SessionCommand::Quit) => break,
            Ok(command) => {
                for out in session.execute(command).await {
                    println!("{}", out);
                }
            }
            Err(e) => eprintln!("{}", e),
        }
    }
    Ok(())
}
