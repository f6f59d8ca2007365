use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

/// Spinner shown while an entry is being generated
pub struct GenerationProgress {
    spinner: ProgressBar,
    position: Option<(usize, usize)>,
    started: Instant,
}

impl GenerationProgress {
    pub fn start(version: &str) -> Self {
        Self::spin(format!("Generating entry for {}", version), None)
    }

    /// Spinner for one version of a catch-up run, labelled `[index/total]`
    pub fn start_batch(index: usize, total: usize, version: &str) -> Self {
        Self::spin(
            format!("[{}/{}] Generating entry for {}", index, total, version),
            Some((index, total)),
        )
    }

    fn spin(message: String, position: Option<(usize, usize)>) -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.blue} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));
        Self {
            spinner,
            position,
            started: Instant::now(),
        }
    }

    pub fn succeed(self, version: &str) {
        let line = format!(
            "{}{} Generated entry for {} ({})",
            self.prefix(),
            "✅",
            version,
            format_duration(self.started.elapsed())
        );
        self.spinner.finish_and_clear();
        println!("{}", line.green());
    }

    /// Catch-up failure; the run carries on with the next version
    pub fn skip(self, version: &str, reason: &str) {
        let line = skipped_line(&self.prefix(), version, reason);
        self.spinner.finish_and_clear();
        println!("{}", line.yellow());
    }

    /// Generation failure that ends the run
    pub fn abort(self, version: &str) {
        let line = failed_line(&self.prefix(), version);
        self.spinner.finish_and_clear();
        println!("{}", line.red());
    }

    fn prefix(&self) -> String {
        match self.position {
            Some((index, total)) => format!("[{}/{}] ", index, total),
            None => String::new(),
        }
    }
}

fn skipped_line(prefix: &str, version: &str, reason: &str) -> String {
    format!("{prefix}⚠️  Skipped {version}: {reason}")
}

fn failed_line(prefix: &str, version: &str) -> String {
    format!("{prefix}❌ Failed to generate entry for {version}")
}

fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    if seconds < 60 {
        format!("{seconds}s")
    } else {
        format!("{}m {}s", seconds / 60, seconds % 60)
    }
}
