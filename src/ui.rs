// UI layer: everything the user sees. Output goes through a `Printer` so the
// same code writes to the terminal (with colour and a spinner) or to a
// buffer in tests.

use crate::api::Business;
use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal, Stdout, Write};
use std::time::Duration;

/// Flavor text for one spin, generated by the wheel and printed here.
#[derive(Debug, Clone, PartialEq)]
pub struct Narrative {
    pub adjective: Option<String>,
    pub tossed: Option<(String, String)>,
}

/// Writes everything the user sees to `out`. `interactive` turns on colour
/// and the progress spinner.
pub struct Printer<W: Write> {
    out: W,
    interactive: bool,
}

impl Printer<Stdout> {
    /// Print to stdout, with styling and a spinner only on a real terminal.
    pub fn stdout() -> Self {
        let out = io::stdout();
        let interactive = out.is_terminal();
        Printer { out, interactive }
    }
}

impl<W: Write> Printer<W> {
    /// Plain output, no styling and no spinner.
    pub fn plain(out: W) -> Self {
        Printer {
            out,
            interactive: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn narrative(&mut self, narrative: &Narrative) -> io::Result<()> {
        match &narrative.adjective {
            Some(adj) => writeln!(self.out, "You give the Wheel of Food a {adj} spin...")?,
            None => writeln!(self.out, "You give the Wheel of Food a spin...")?,
        }
        if let Some((first, second)) = &narrative.tossed {
            writeln!(
                self.out,
                "It whirls past {first} and {second}, tossing them off the plate!"
            )?;
        }
        Ok(())
    }

    /// Announce where the wheel stopped.
    pub fn landed(&mut self, category: &str) -> io::Result<()> {
        let upper = category.to_uppercase();
        if self.interactive {
            writeln!(self.out, "The wheel slows down... and lands on {}!", upper.bold().yellow())
        } else {
            writeln!(self.out, "The wheel slows down... and lands on {upper}!")
        }
    }

    /// Closing line for a spin that landed on a sentinel category.
    pub fn sentinel(&mut self, category: &str) -> io::Result<()> {
        if category.trim().eq_ignore_ascii_case("SPIN AGAIN") {
            writeln!(self.out, "Give it another spin to see what's for dinner!")
        } else {
            writeln!(self.out, "Looks like you're going hungry this time. Better luck next spin!")
        }
    }

    /// Notice for a search that came back with no businesses.
    pub fn no_results(&mut self, category: &str, location: &str) -> io::Result<()> {
        writeln!(
            self.out,
            "No results found for {category} near {location}. Try another spin or a wider distance."
        )
    }

    /// Summary line, one line per address component, then the URL.
    pub fn choice(&mut self, category: &str, business: &Business) -> io::Result<()> {
        let name = if self.interactive {
            business.name.as_str().bold().to_string()
        } else {
            business.name.clone()
        };
        writeln!(
            self.out,
            "Hungry for {category}? Try {name}, rated at {:.1} stars with {} reviews!",
            business.rating, business.review_count
        )?;
        for line in &business.location.display_address {
            writeln!(self.out, "{line}")?;
        }
        writeln!(self.out, "{}", business.url)?;
        self.out.flush()
    }

    /// Spinner shown while the search request is in flight. Hidden when not
    /// attached to a terminal.
    pub fn spinner(&self, message: &'static str) -> ProgressBar {
        if !self.interactive {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}
