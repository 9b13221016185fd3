use std::io::IsTerminal;
use std::time::{Duration, Instant};

use anstyle::{AnsiColor, Effects, Style};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

pub(crate) fn current_output_style() -> OutputStyle {
    if std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none() {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

/// Status lines go to stderr; stdout carries only the diagram or JSON.
#[derive(Copy, Clone, Debug)]
pub(crate) struct TerminalRenderer {
    style: OutputStyle,
}

pub(crate) struct TerminalSpinner {
    style: OutputStyle,
    label: String,
    progress_bar: Option<ProgressBar>,
    started_at: Instant,
}

impl TerminalRenderer {
    pub(crate) fn from_style(style: OutputStyle) -> Self {
        Self { style }
    }

    pub(crate) fn current() -> Self {
        Self::from_style(current_output_style())
    }

    pub(crate) fn print_status(self, status: &str, message: &str) {
        eprintln!("{}", render_status_line(self.style, status, message));
    }

    pub(crate) fn print_section(self, title: &str) {
        if let Some(line) = render_section_header(self.style, title) {
            eprintln!();
            eprintln!("{}", colorize(section_style(), &line));
        }
    }

    pub(crate) fn start_spinner(self, label: &str) -> TerminalSpinner {
        let progress_bar = if self.style == OutputStyle::Rich {
            let progress_bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan.bold} {msg} {elapsed}")
            {
                progress_bar.set_style(style.tick_chars("<^>v "));
            }
            progress_bar.set_message(label.to_string());
            progress_bar.enable_steady_tick(Duration::from_millis(80));
            Some(progress_bar)
        } else {
            None
        };

        TerminalSpinner {
            style: self.style,
            label: label.to_string(),
            progress_bar,
            started_at: Instant::now(),
        }
    }
}

impl TerminalSpinner {
    pub(crate) fn finish_success(mut self) {
        let Some(progress_bar) = self.progress_bar.take() else {
            return;
        };

        progress_bar.finish_and_clear();
        if let Some(line) = render_finished_line(self.style, &self.label, self.started_at.elapsed())
        {
            eprintln!("{line}");
        }
    }

    pub(crate) fn finish_abandon(mut self) {
        if let Some(progress_bar) = self.progress_bar.take() {
            progress_bar.finish_and_clear();
        }
    }
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => format!("[{}] {message}", status.to_ascii_uppercase()),
    }
}

fn render_section_header(style: OutputStyle, title: &str) -> Option<String> {
    match style {
        OutputStyle::Plain => None,
        OutputStyle::Rich => Some(format!("== {title} ==")),
    }
}

fn render_finished_line(style: OutputStyle, label: &str, elapsed: Duration) -> Option<String> {
    if style == OutputStyle::Plain {
        return None;
    }
    Some(format!(
        "{} complete in {}",
        colorize(label_style(), label),
        format_elapsed(elapsed)
    ))
}

pub(crate) fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let millis = elapsed.subsec_millis();
    format!("{secs}.{millis:03}s")
}

fn section_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightBlue.into()))
        .effects(Effects::BOLD)
}

fn label_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightCyan.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
