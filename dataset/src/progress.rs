use indicatif::{ProgressBar, ProgressStyle};

/// Byte-based progress over the raw input file.
pub struct StreamProgressBar {
    bar: ProgressBar,
}

impl StreamProgressBar {
    pub fn new(total_bytes: u64) -> Self {
        let bar = ProgressBar::new(total_bytes);
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} Processing positions... {percent:>3}% | {msg}")
                .unwrap(),
        );

        Self { bar }
    }

    pub fn update(&self, bytes_read: u64, rows: u64) {
        self.bar.set_position(bytes_read);
        self.bar.set_message(format!("{} rows", rows));
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
