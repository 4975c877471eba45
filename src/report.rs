use crossterm::style::{Color as TermColor, Stylize};

use crate::color::{Color, REFERENCE_WHITE};
use crate::pipeline::compare::{compare, Trend};
use crate::session::Session;

/// Options for rendering the progress report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportStyle {
    /// Follow each shade line with a colored terminal swatch.
    pub preview: bool,
}

/// Render the whole session, one block per image, each measured against
/// the reference white.
pub fn render_progress(session: &Session, style: ReportStyle) -> String {
    let mut out = String::from("\nWhitening Progress:\n");
    for (i, image) in session.iter().enumerate() {
        let shade = &image.shade;
        out.push_str(&format!(
            "Image {} - Date: {}, Shade: {}",
            i + 1,
            image.capture_date.format("%Y-%m-%d"),
            shade.color
        ));
        if let Some(reason) = shade.fallback_reason() {
            out.push_str(&format!(" (fallback: {reason})"));
        }
        out.push('\n');

        if style.preview {
            out.push_str(&format!("  {}\n", swatch(shade.color)));
        }

        let relative = compare(REFERENCE_WHITE, shade.color);
        out.push_str(&format!("Relative brightness: {relative:.2}\n"));
    }
    out
}

/// Render the baseline-to-latest change and its qualitative label.
pub fn render_change(change: f64, tolerance: f64) -> String {
    let trend = Trend::classify(change, tolerance);
    format!(
        "Shade change since first image: {change:.2}\n{}\n",
        trend.message()
    )
}

/// A block of the shade itself with its hex code printed on top in black
/// or white, whichever reads better.
fn swatch(color: Color) -> String {
    let label = format!(" {} ", color.to_hex());
    let fg = if color.relative_luminance() > 0.4 {
        TermColor::Black
    } else {
        TermColor::White
    };
    label
        .with(fg)
        .on(TermColor::Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        })
        .to_string()
}
