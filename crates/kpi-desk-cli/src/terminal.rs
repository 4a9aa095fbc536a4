//! Line-oriented terminal surface

use kpi_form::{Notice, NoticeLevel, Prompt, Surface};
use kpi_literal::LiteralMap;
use std::fmt;
use std::io::{BufRead, Write};

/// Surface reading answers from `input` and writing to `output`
///
/// End of input answers every question with "cancel".
pub(crate) struct TerminalSurface<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalSurface<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) {
        if let Err(err) = self.output.write_fmt(args).and_then(|()| self.output.flush()) {
            tracing::warn!(error = %err, "terminal write failed");
        }
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                let trimmed = line.trim_end_matches(&['\n', '\r'][..]).len();
                line.truncate(trimmed);
                Some(line)
            }
            Err(err) => {
                tracing::warn!(error = %err, "terminal read failed");
                None
            }
        }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Surface for TerminalSurface<R, W> {
    fn notify(&mut self, notice: Notice) {
        let tag = match notice.level {
            NoticeLevel::Info => "",
            NoticeLevel::Success => "ok: ",
            NoticeLevel::Warning => "warning: ",
            NoticeLevel::Error => "error: ",
        };
        self.emit(format_args!("{tag}{}\n", notice.message));
    }

    fn choose(&mut self, label: &str, options: &[String]) -> Option<usize> {
        if options.is_empty() {
            return None;
        }
        self.emit(format_args!("{label}\n"));
        for (i, option) in options.iter().enumerate() {
            self.emit(format_args!("  {}) {option}\n", i + 1));
        }
        loop {
            self.emit(format_args!("> "));
            let answer = self.read_line()?;
            let answer = answer.trim();
            if let Some(i) = options.iter().position(|o| o == answer) {
                return Some(i);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Some(n - 1),
                _ => self.emit(format_args!(
                    "Please enter a number between 1 and {}\n",
                    options.len()
                )),
            }
        }
    }

    fn prompt(&mut self, prompt: &Prompt) -> Option<String> {
        match &prompt.placeholder {
            Some(hint) => self.emit(format_args!("{} [{hint}]: ", prompt.label)),
            None => self.emit(format_args!("{}: ", prompt.label)),
        }
        self.read_line()
    }

    fn compare(&mut self, original: &LiteralMap, updated: &LiteralMap) {
        let cell = |map: &LiteralMap, field: &str| {
            map.get(field).map_or_else(|| "-".to_string(), ToString::to_string)
        };
        let fields: Vec<&String> = original
            .keys()
            .chain(updated.keys().filter(|k| !original.contains_key(*k)))
            .collect();

        let rows: Vec<[String; 3]> = fields
            .iter()
            .map(|f| [(*f).clone(), cell(original, f), cell(updated, f)])
            .collect();
        let header = ["field".to_string(), "original".to_string(), "updated".to_string()];
        let mut widths = [header[0].len(), header[1].len(), header[2].len()];
        for row in &rows {
            for (w, value) in widths.iter_mut().zip(row) {
                *w = (*w).max(value.chars().count());
            }
        }

        for row in std::iter::once(&header).chain(rows.iter()) {
            self.emit(format_args!(
                "  {:<w0$}  {:<w1$}  {}\n",
                row[0],
                row[1],
                row[2],
                w0 = widths[0],
                w1 = widths[1],
            ));
        }
    }

    fn confirm(&mut self, label: &str) -> bool {
        self.emit(format_args!("{label}? [y/N] "));
        self.read_line()
            .is_some_and(|a| matches!(a.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }
}
