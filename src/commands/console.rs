use crossterm::style::Stylize;
use parking_lot::Mutex;
use std::sync::Arc;

/// Color class of a console line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Header,
    Section,
    Success,
    Warning,
    Failure,
}

#[derive(Clone)]
enum Sink {
    Stdout,
    Buffer(Arc<Mutex<Vec<(Tone, String)>>>),
}

/// Human-facing output of the CLI, separate from tracing logs
#[derive(Clone)]
pub struct Console {
    sink: Sink,
}

impl Console {
    pub fn stdout() -> Self {
        Self { sink: Sink::Stdout }
    }

    /// Keeps lines in memory instead of printing them
    pub fn buffered() -> Self {
        Self {
            sink: Sink::Buffer(Arc::new(Mutex::new(Vec::new()))),
        }
    }

    pub fn print<S: AsRef<str>>(&self, tone: Tone, message: S) {
        let message = message.as_ref();
        match &self.sink {
            Sink::Stdout => println!("{}", styled(tone, message)),
            Sink::Buffer(lines) => lines.lock().push((tone, message.to_string())),
        }
    }

    pub fn plain<S: AsRef<str>>(&self, message: S) {
        self.print(Tone::Plain, message);
    }

    pub fn header<S: AsRef<str>>(&self, message: S) {
        self.print(Tone::Header, message);
    }

    pub fn section<S: AsRef<str>>(&self, message: S) {
        self.print(Tone::Section, message);
    }

    pub fn success<S: AsRef<str>>(&self, message: S) {
        self.print(Tone::Success, message);
    }

    pub fn warning<S: AsRef<str>>(&self, message: S) {
        self.print(Tone::Warning, message);
    }

    pub fn failure<S: AsRef<str>>(&self, message: S) {
        self.print(Tone::Failure, message);
    }

    /// Buffered lines; always empty for stdout
    pub fn lines(&self) -> Vec<(Tone, String)> {
        match &self.sink {
            Sink::Stdout => Vec::new(),
            Sink::Buffer(lines) => lines.lock().clone(),
        }
    }

    pub fn contains(&self, tone: Tone, needle: &str) -> bool {
        self.lines()
            .iter()
            .any(|(t, line)| *t == tone && line.contains(needle))
    }
}

fn styled(tone: Tone, message: &str) -> String {
    match tone {
        Tone::Plain => message.to_string(),
        Tone::Header => message.cyan().to_string(),
        Tone::Section => message.blue().to_string(),
        Tone::Success => message.green().to_string(),
        Tone::Warning => message.yellow().to_string(),
        Tone::Failure => message.red().to_string(),
    }
}
