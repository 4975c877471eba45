use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};

use crate::backends::ColorBackend;
use crate::pipeline::acquire::{prompt_for_image, read_raw_line, stage_image, Selection};
use crate::pipeline::analyze::analyze_file;
use crate::pipeline::compare::{Trend, DEFAULT_TOLERANCE};
use crate::report::{render_change, render_progress, ReportStyle};
use crate::session::{CapturedImage, Session};

/// Settings for one acquisition run.
#[derive(Debug, Clone)]
pub struct FlowOptions {
    pub upload_dir: PathBuf,
    pub tolerance: f64,
    pub style: ReportStyle,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploaded_images"),
            tolerance: DEFAULT_TOLERANCE,
            style: ReportStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Waiting for the next image.
    Idle,
    /// An image was just recorded; ask whether to continue.
    Reporting,
    Done,
}

/// Interactive loop: pick an image, stage it, analyze it, record it, report.
///
/// The backend is borrowed for the whole run. Console I/O goes through the
/// supplied reader and writer.
pub struct Flow<'a, B: ?Sized, R, W> {
    backend: &'a B,
    input: R,
    output: W,
    options: FlowOptions,
    clock: fn() -> NaiveDateTime,
    session: Session,
}

impl<'a, B, R, W> Flow<'a, B, R, W>
where
    B: ColorBackend + ?Sized,
    R: BufRead,
    W: Write,
{
    pub fn new(backend: &'a B, input: R, output: W, options: FlowOptions) -> Self {
        Self {
            backend,
            input,
            output,
            options,
            clock: || Local::now().naive_local(),
            session: Session::new(),
        }
    }

    /// Replace the wall clock used for file names and capture dates.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Run until the user declines to continue or input runs out, then hand
    /// back everything that was recorded.
    pub fn run(mut self) -> Result<Session> {
        let mut state = State::Idle;
        while state != State::Done {
            state = match state {
                State::Idle => self.acquire()?,
                State::Reporting => self.ask_to_continue()?,
                State::Done => State::Done,
            };
        }
        Ok(self.session)
    }

    fn acquire(&mut self) -> Result<State> {
        let source = match prompt_for_image(&mut self.input, &mut self.output)? {
            Selection::Selected(path) => path,
            Selection::NoneSelected => {
                writeln!(self.output, "No file selected.")?;
                return Ok(State::Idle);
            }
            Selection::Closed => {
                writeln!(self.output)?;
                return Ok(State::Done);
            }
        };

        let now = (self.clock)();
        let staged = match stage_image(&source, &self.options.upload_dir, now) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(error = %e, "Could not stage image");
                writeln!(self.output, "Could not upload image: {e:#}")?;
                return Ok(State::Idle);
            }
        };
        writeln!(
            self.output,
            "Image uploaded successfully to {}",
            staged.display()
        )?;

        let shade = analyze_file(self.backend, &staged);
        if let Some(reason) = shade.fallback_reason() {
            writeln!(self.output, "{reason}")?;
        }

        self.session.append(CapturedImage {
            path: staged,
            capture_date: now.date(),
            shade,
        });

        if let Some(change) = self.session.change_since_baseline() {
            tracing::info!(
                change,
                trend = Trend::classify(change, self.options.tolerance).label(),
                "Progress since first image"
            );
            write!(
                self.output,
                "{}",
                render_change(change, self.options.tolerance)
            )?;
        }
        write!(
            self.output,
            "{}",
            render_progress(&self.session, self.options.style)
        )?;

        Ok(State::Reporting)
    }

    fn ask_to_continue(&mut self) -> Result<State> {
        write!(self.output, "Upload another image? (y/n): ")?;
        self.output.flush()?;

        let Some(answer) = read_raw_line(&mut self.input).context("failed to read answer")? else {
            writeln!(self.output)?;
            return Ok(State::Done);
        };

        // Undecodable bytes can never spell `y`.
        if String::from_utf8_lossy(&answer)
            .trim()
            .eq_ignore_ascii_case("y")
        {
            Ok(State::Idle)
        } else {
            Ok(State::Done)
        }
    }
}
