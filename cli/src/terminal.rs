//! Page host for the terminal.
//!
//! Navigation moves the simulated location and prints the target; a delayed
//! navigation is reported with its delay instead of waiting for it. Notices
//! and user fields are printed as lines. Output goes to any `Write` and
//! confirmation answers come from any `BufRead`, so tests can drive both.

use std::cell::RefCell;
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::time::Duration;

use hubber_session::{Notice, PageHost, PageLocation, UserDisplay};
use tracing::warn;

pub struct TerminalPage<W> {
    location: RefCell<PageLocation>,
    assume_yes: bool,
    out: RefCell<W>,
    /// `None` reads from stdin.
    input: RefCell<Option<Box<dyn BufRead>>>,
}

impl<W: Write> TerminalPage<W> {
    pub fn new(url: &str, assume_yes: bool, out: W) -> Self {
        Self {
            location: RefCell::new(PageLocation::from_url(url)),
            assume_yes,
            out: RefCell::new(out),
            input: RefCell::new(None),
        }
    }

    /// Read confirmation answers from `input` instead of stdin.
    #[must_use]
    pub fn with_input(self, input: impl BufRead + 'static) -> Self {
        *self.input.borrow_mut() = Some(Box::new(input));
        self
    }

    pub fn say(&self, line: impl Display) {
        if let Err(e) = writeln!(self.out.borrow_mut(), "{line}") {
            warn!(error = %e, "failed to write output");
        }
    }

    fn move_to(&self, url: &str) {
        *self.location.borrow_mut() = PageLocation::from_url(url);
    }
}

impl<W: Write + Default> TerminalPage<W> {
    /// Take everything written so far.
    pub fn take_output(&self) -> W {
        std::mem::take(&mut *self.out.borrow_mut())
    }
}

impl<W: Write> PageHost for TerminalPage<W> {
    fn location(&self) -> PageLocation {
        self.location.borrow().clone()
    }

    fn navigate(&self, url: &str) {
        self.say(format_args!("-> {url}"));
        self.move_to(url);
    }

    fn navigate_after(&self, url: &str, delay: Duration) {
        self.say(format_args!("-> {url} (after {} ms)", delay.as_millis()));
        self.move_to(url);
    }

    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        {
            let mut out = self.out.borrow_mut();
            if let Err(e) = write!(out, "{message} [y/N] ").and_then(|()| out.flush()) {
                warn!(error = %e, "failed to write prompt");
            }
        }
        let mut answer = String::new();
        let read = match self.input.borrow_mut().as_mut() {
            Some(input) => input.read_line(&mut answer),
            None => io::stdin().lock().read_line(&mut answer),
        };
        if let Err(e) = read {
            warn!(error = %e, "failed to read confirmation");
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }

    fn show_notice(&self, notice: Notice, lifetime: Duration) {
        let action = notice.action_label().map(|a| format!(" [{a}]")).unwrap_or_default();
        self.say(format_args!(
            "[{}] {}{action} (dismissed after {}s)",
            notice.level().css_class(),
            notice.message(),
            lifetime.as_secs()
        ));
    }

    fn render_user(&self, display: &UserDisplay) {
        for (field, text) in display.bindings() {
            self.say(format_args!("{}: {text}", field.class_name()));
        }
    }

    fn clear_user(&self) {
        self.say("(signed out)");
    }
}
