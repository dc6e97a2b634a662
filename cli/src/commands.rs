//! Subcommands and their execution against one guard.
//!
//! Each invocation is one "page load": the guard is built over the file
//! store, the command runs, and the process exits. `check` and `watch` run
//! the full page-load validation; the rest act on the stored session
//! directly, the way the developer console helpers do.

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

use std::io::Write;
use std::rc::Rc;

use chrono::TimeDelta;
use clap::{Args, Subcommand};
use hubber_session::{
    Clock, DebugApi, GuardError, PageHost, PageState, Profile, SessionGuard, SessionUser, TimeRemaining, UserId,
    ValidationSchedule,
};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::file_store::FileStore;
use crate::terminal::TerminalPage;

pub type CliGuard<C, W> = SessionGuard<FileStore, C, TerminalPage<W>>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Guard(#[from] GuardError),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected key=value, got `{0}`")]
    InvalidPair(String),
    #[error("no active session")]
    NoSession,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the stored session record.
    Show,
    /// Print the time left on the session.
    Remaining,
    /// Run the page-load validation for `--page`.
    Check,
    /// Start a session for an already-verified user.
    Login(LoginArgs),
    /// Ask for confirmation, then log out: stamp history, clear storage,
    /// head to the login page.
    Logout,
    /// Log out without asking.
    ForceLogout,
    /// Reset the session expiry to now plus the TTL.
    Extend,
    /// Succeed when the user holds any of the given roles.
    HasRole {
        #[arg(required = true)]
        roles: Vec<String>,
    },
    Profile(ProfileCommand),
    /// Re-validate on the configured interval.
    Watch(WatchArgs),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "user")]
    pub role: String,
    /// Numeric ids are stored as numbers; anything else as a string.
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Args, Debug)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileSubcommand {
    Show,
    /// Merge `key=value` pairs into the profile. Values that parse as JSON
    /// are stored as JSON, everything else as a string.
    Set {
        #[arg(required = true)]
        pairs: Vec<String>,
    },
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Stop after this many checks.
    #[arg(long)]
    pub ticks: Option<u32>,
    /// Override the validation interval.
    #[arg(long)]
    pub interval_ms: Option<i64>,
}

/// Run `command`. `Ok(false)` means the command ran but the answer was
/// negative (no session, role missing, redirected).
///
/// # Errors
///
/// Returns [`CliError`] when a write fails or an argument is malformed.
pub fn run<C: Clock, W: Write>(command: Command, guard: &Rc<CliGuard<C, W>>) -> Result<bool, CliError> {
    let page = guard.page();
    let debug = DebugApi::new(Rc::clone(guard));
    match command {
        Command::Show => {
            let Some(session) = debug.show_session() else {
                page.say("no session");
                return Ok(false);
            };
            page.say(serde_json::to_string_pretty(&session)?);
            Ok(true)
        }
        Command::Remaining => {
            let Some(remaining) = debug.show_time_remaining() else {
                page.say("no session");
                return Ok(false);
            };
            page.say(describe_remaining(remaining));
            guard.show_session_warning();
            Ok(true)
        }
        Command::Check => {
            let state = guard.start();
            guard.show_session_warning();
            page.say(format_args!("{state:?}"));
            Ok(state == PageState::ValidSession)
        }
        Command::Login(args) => login(guard, args),
        Command::Logout => Ok(guard.request_logout()),
        Command::ForceLogout => {
            debug.force_logout();
            Ok(true)
        }
        Command::Extend => {
            if !guard.extend_session()? {
                return Err(CliError::NoSession);
            }
            if let Some(remaining) = guard.session_time_remaining() {
                page.say(describe_remaining(remaining));
            }
            Ok(true)
        }
        Command::HasRole { roles } => {
            let held = match roles.as_slice() {
                [role] => guard.has_role(role),
                _ => guard.has_any_role(roles.as_slice()),
            };
            page.say(if held { "yes" } else { "no" });
            Ok(held)
        }
        Command::Profile(profile) => match profile.command {
            ProfileSubcommand::Show => {
                let profile = guard.user_profile().unwrap_or_default();
                page.say(serde_json::to_string_pretty(&profile)?);
                Ok(guard.current_session().is_some())
            }
            ProfileSubcommand::Set { pairs } => {
                let patch = parse_pairs(&pairs)?;
                if !guard.update_user_profile(&patch)? {
                    return Err(CliError::NoSession);
                }
                let merged = guard.user_profile().unwrap_or_default();
                page.say(serde_json::to_string_pretty(&merged)?);
                Ok(true)
            }
        },
        Command::Watch(args) => Ok(watch(guard, &args)),
    }
}

fn login<C: Clock, W: Write>(guard: &CliGuard<C, W>, args: LoginArgs) -> Result<bool, CliError> {
    let id = match args.id {
        Some(raw) => raw.parse::<i64>().map_or(UserId::Text(raw), UserId::Number),
        None => UserId::Text(Uuid::new_v4().to_string()),
    };
    let user = SessionUser::new(id, args.name, args.email, args.role);
    let record = guard.establish_session(user)?;
    guard.page().say(format_args!("session {} until {}", record.session_id, record.expiry.to_rfc3339()));

    let target = guard.take_return_url().unwrap_or_else(|| guard.config().default_page.clone());
    guard.page().navigate(&target);
    Ok(true)
}

fn watch<C: Clock, W: Write>(guard: &CliGuard<C, W>, args: &WatchArgs) -> bool {
    let interval = args.interval_ms.filter(|ms| *ms > 0).map_or(guard.config().validation_interval, TimeDelta::milliseconds);
    let page = guard.page();

    let state = guard.start();
    page.say(format_args!("{state:?}"));
    if state != PageState::ValidSession {
        return false;
    }
    guard.show_session_warning();

    let schedule = ValidationSchedule::new(interval, guard.clock().now());
    let mut ticks = 0u32;
    while args.ticks.is_none_or(|limit| ticks < limit) {
        let wait = schedule.until_next(guard.clock().now()).to_std().unwrap_or_default();
        std::thread::sleep(wait);
        if !schedule.poll(guard.clock().now()) {
            continue;
        }
        ticks += 1;
        let Some(state) = guard.periodic_check() else {
            page.say("public page, nothing to watch");
            return true;
        };
        info!(tick = ticks, state = ?state, "periodic check");
        page.say(format_args!("{state:?}"));
        if state != PageState::ValidSession {
            return false;
        }
        guard.show_session_warning();
    }
    true
}

fn describe_remaining(remaining: TimeRemaining) -> String {
    format!(
        "{}h {}m remaining ({} ms)",
        remaining.hours,
        remaining.minutes - remaining.hours * 60,
        remaining.milliseconds
    )
}

/// Parse `key=value` arguments into a profile patch.
///
/// # Errors
///
/// Returns [`CliError::InvalidPair`] for an argument without `=` or with an
/// empty key.
pub fn parse_pairs(pairs: &[String]) -> Result<Profile, CliError> {
    let mut patch = Profile::new();
    for pair in pairs {
        let Some((key, raw)) = pair.split_once('=') else {
            return Err(CliError::InvalidPair(pair.clone()));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(CliError::InvalidPair(pair.clone()));
        }
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
        patch.insert(key.to_owned(), value);
    }
    Ok(patch)
}
