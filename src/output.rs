//! Output formatting for search results (ripgrep-like, or JSON)

use crate::index::types::SearchResult;
use std::io::{self, Write};
use std::ops::Range;
use std::path::Path;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Map a match given in case-folded bytes back to a byte range of the
/// original line text.
///
/// Lowercasing can change the byte length of a character, so the original
/// line is walked character by character while tracking the folded length.
/// Returns `None` when the match is not inside `line` (truncated results).
pub fn highlight_range(line: &str, folded_offset: usize, folded_len: usize) -> Option<Range<usize>> {
    let folded_end = folded_offset + folded_len;
    let mut folded = 0;
    let mut start = None;

    for (i, ch) in line.char_indices() {
        if start.is_none() && folded >= folded_offset {
            start = Some(i);
        }
        if folded >= folded_end {
            return start.map(|s| s..i);
        }
        folded += ch.to_lowercase().map(char::len_utf8).sum::<usize>();
    }

    if folded >= folded_end {
        start.map(|s| s..line.len())
    } else {
        None
    }
}

/// Print results grouped by file, with the match highlighted
pub fn print_results(
    results: &[SearchResult],
    query: &str,
    color: bool,
    heading: bool,
) -> io::Result<()> {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    let folded_len = query.trim().to_lowercase().len();

    let mut current_file: Option<&Path> = None;

    for r in results {
        let is_new_file = current_file.map(|p| p != r.file_path).unwrap_or(true);

        if is_new_file {
            if current_file.is_some() && heading {
                // Add blank line between files
                writeln!(stdout)?;
            }

            if heading {
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
                writeln!(stdout, "{}", r.file_path.display())?;
                stdout.reset()?;
            }

            current_file = Some(&r.file_path);
        }

        print_match_line(&mut stdout, r, folded_len, heading)?;
    }

    Ok(())
}

/// Print a single result line
fn print_match_line(
    stdout: &mut StandardStream,
    result: &SearchResult,
    folded_len: usize,
    heading: bool,
) -> io::Result<()> {
    if !heading {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(stdout, "{}", result.file_path.display())?;
        stdout.reset()?;
        write!(stdout, ":")?;
    }

    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(stdout, "{}", result.line_number)?;
    stdout.reset()?;
    write!(stdout, ":")?;

    let line = &result.line_text;
    let range = if result.truncated {
        None
    } else {
        highlight_range(line, result.match_byte_offset, folded_len)
    };

    match range {
        Some(range) => {
            write!(stdout, "{}", &line[..range.start])?;
            stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            write!(stdout, "{}", &line[range.clone()])?;
            stdout.reset()?;
            write!(stdout, "{}", &line[range.end..])?;
        }
        None => write!(stdout, "{}", line)?,
    }

    if result.truncated {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        write!(stdout, " [match beyond displayed text]")?;
        stdout.reset()?;
    }

    writeln!(stdout)
}

/// Print results as a JSON array
pub fn print_json(results: &[SearchResult]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    serde_json::to_writer_pretty(&mut lock, results)?;
    writeln!(lock)
}
