use log::{LevelFilter, Log, Metadata, Record};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
	fn enabled(&self, metadata: &Metadata<'_>) -> bool {
		metadata.level() <= log::max_level()
	}

	fn log(&self, record: &Record<'_>) {
		if self.enabled(record.metadata()) {
			eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
		}
	}

	fn flush(&self) {}
}

/// Install the stderr logger; each `-v` raises the level by one step past errors.
pub fn init(verbosity: u8) {
	let level = match verbosity {
		0 => LevelFilter::Error,
		1 => LevelFilter::Warn,
		2 => LevelFilter::Info,
		3 => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	};
	if log::set_logger(&LOGGER).is_ok() {
		log::set_max_level(level);
	}
}

#[cfg(test)]
mod tests {
	use super::init;

	#[test]
	fn repeated_init_keeps_first_logger() {
		init(3);
		init(0);
		assert_eq!(log::max_level(), log::LevelFilter::Debug);
	}
}
