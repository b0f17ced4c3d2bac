//! Per-author outcomes and the console summary.

/// Why an author still needs a hand-supplied avatar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NeedsInput {
    /// Author id missing from the title table.
    Unknown,
    /// Title table marks the author as manual.
    Manual,
    /// The article has no image.
    NoImage { title: String },
}

#[derive(Debug)]
pub enum Outcome {
    Fetched,
    NeedsInput(NeedsInput),
    Failed(anyhow::Error),
}

/// Status line printed while processing, e.g. `  OK       alan-watts`.
pub fn status_line(id: &str, outcome: &Outcome) -> String {
    match outcome {
        Outcome::Fetched => format!("  OK       {id}"),
        Outcome::NeedsInput(NeedsInput::Unknown) => {
            format!("  UNKNOWN  {id} (add to the title table)")
        }
        Outcome::NeedsInput(NeedsInput::Manual) => {
            format!("  SKIP     {id} (needs user-provided image)")
        }
        Outcome::NeedsInput(NeedsInput::NoImage { title }) => {
            format!("  NO_IMAGE {id} (wiki: {title})")
        }
        Outcome::Failed(_) => format!("  FAIL     {id}"),
    }
}

/// Accumulated outcomes for one run.
#[derive(Debug, Default)]
pub struct Report {
    pub fetched: Vec<String>,
    pub need_input: Vec<(String, NeedsInput)>,
    pub failed: Vec<String>,
}

impl Report {
    pub fn record(&mut self, id: &str, outcome: Outcome) {
        match outcome {
            Outcome::Fetched => self.fetched.push(id.to_string()),
            Outcome::NeedsInput(reason) => self.need_input.push((id.to_string(), reason)),
            Outcome::Failed(err) => {
                let detail = format!("{err:#}");
                tracing::warn!(id, error = %detail, "avatar fetch failed");
                self.failed.push(id.to_string());
            }
        }
    }

    /// Final tallies plus the lists of authors needing attention.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        push_line(&mut out, "");
        push_line(&mut out, "--- Results ---");
        push_line(&mut out, &format!("  Fetched:    {}", self.fetched.len()));
        push_line(&mut out, &format!("  Need input: {}", self.need_input.len()));
        push_line(&mut out, &format!("  Failed:     {}", self.failed.len()));

        if !self.need_input.is_empty() {
            push_line(&mut out, "");
            push_line(&mut out, "Authors needing user-provided images:");
            for (id, reason) in &self.need_input {
                let note = if *reason == NeedsInput::Unknown {
                    " (unknown)"
                } else {
                    ""
                };
                push_line(&mut out, &format!("  - {id}{note}"));
            }
        }
        if !self.failed.is_empty() {
            push_line(&mut out, "");
            push_line(&mut out, "Authors that failed:");
            for id in &self.failed {
                push_line(&mut out, &format!("  - {id}"));
            }
        }
        out
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}
