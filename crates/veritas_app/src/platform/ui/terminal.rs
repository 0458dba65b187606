use std::io::{self, Write};

use veritas_core::{AppViewModel, Notification};

use super::render::{format_notification, format_result, progress_line};

/// Writes view changes to a terminal, repainting the progress line in place.
pub struct TerminalSink<W: Write> {
    out: W,
    progress: Option<String>,
    shown_result_for: Option<String>,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            progress: None,
            shown_result_for: None,
        }
    }

    pub fn render(&mut self, view: &AppViewModel) -> io::Result<()> {
        match progress_line(view) {
            Some(line) if self.progress.as_ref() != Some(&line) => {
                write!(self.out, "\r{line}\x1b[K")?;
                self.out.flush()?;
                self.progress = Some(line);
            }
            Some(_) => {}
            None => self.end_progress()?,
        }

        if let Some(result) = &view.result {
            if self.shown_result_for != view.job_id {
                self.end_progress()?;
                writeln!(self.out, "{}", format_result(result))?;
                self.shown_result_for = view.job_id.clone();
            }
        }
        self.out.flush()
    }

    pub fn notify(&mut self, notification: &Notification) -> io::Result<()> {
        self.end_progress()?;
        writeln!(self.out, "{}", format_notification(notification))
    }

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        self.end_progress()?;
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    pub fn write_prompt(&mut self, prompt: &str) -> io::Result<()> {
        if self.progress.is_none() {
            write!(self.out, "{prompt}")?;
            self.out.flush()?;
        }
        Ok(())
    }

    fn end_progress(&mut self) -> io::Result<()> {
        if self.progress.take().is_some() {
            writeln!(self.out)?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritas_core::{update, AppState, JobId, Msg, NotifyLevel};

    #[test]
    fn repeated_views_do_not_repaint() {
        let (state, _) = update(AppState::new(), Msg::InputChanged("x".repeat(60)));
        let (state, _) = update(state, Msg::SubmitClicked);
        let (state, _) = update(
            state,
            Msg::SubmitSucceeded {
                key: 1,
                job_id: JobId::new("j"),
            },
        );

        let mut sink = TerminalSink::new(Vec::new());
        sink.render(&state.view()).unwrap();
        sink.render(&state.view()).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out.matches('\r').count(), 1);
    }

    #[test]
    fn notifications_end_the_progress_line() {
        let (state, _) = update(AppState::new(), Msg::InputChanged("x".repeat(60)));
        let (state, _) = update(state, Msg::SubmitClicked);

        let mut sink = TerminalSink::new(Vec::new());
        sink.render(&state.view()).unwrap();
        sink.notify(&Notification {
            level: NotifyLevel::Error,
            message: "boom".to_string(),
        })
        .unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert!(out.ends_with("\n[error] boom\n"));
    }
}
