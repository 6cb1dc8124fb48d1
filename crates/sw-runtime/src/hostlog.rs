use std::fs::OpenOptions;
use std::io::Write;

use chrono::Local;
use rhai::{Dynamic, Engine};

/// Fixed global name under which the append-log function is visible to
/// scripts.
pub const LOG_FN_NAME: &str = "swLog";

const TIMESTAMP_FORMAT: &str = "%m/%d/%Y (%H:%M:%S)";

/// Register the native callback surface. The two-argument form does the
/// work; the other arities are registered so that a wrong argument count
/// reports failure to the script instead of raising an engine error.
pub(crate) fn register_host_log(engine: &mut Engine) {
    engine.register_fn(LOG_FN_NAME, |path: Dynamic, message: Dynamic| -> bool {
        append_log(&path.to_string(), &message.to_string())
    });
    engine.register_fn(LOG_FN_NAME, || -> bool { false });
    engine.register_fn(LOG_FN_NAME, |_: Dynamic| -> bool { false });
    engine.register_fn(LOG_FN_NAME, |_: Dynamic, _: Dynamic, _: Dynamic| -> bool {
        false
    });
}

/// Append one timestamped line to the file at `path`, creating it if
/// needed. The path is fully script-controlled; this is a trust boundary,
/// not a sandbox.
pub(crate) fn append_log(path: &str, message: &str) -> bool {
    let Ok(mut file) = OpenOptions::new().append(true).create(true).open(path) else {
        return false;
    };
    let stamp = Local::now().format(TIMESTAMP_FORMAT);
    writeln!(file, "{}: {}", stamp, message).is_ok()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn scratch_path(tag: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("sw-hostlog-{}-{}.log", tag, std::process::id()))
    }

    #[test]
    fn appends_one_timestamped_line_per_call() {
        let path = scratch_path("append");
        let _ = fs::remove_file(&path);

        assert!(append_log(&path.display().to_string(), "first"));
        assert!(append_log(&path.display().to_string(), "second"));

        let contents = fs::read_to_string(&path).expect("log file readable");
        let lines = contents.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("): first"));
        assert!(lines[1].ends_with("): second"));

        let prefix = lines[0]
            .strip_suffix(": first")
            .expect("line carries the message suffix");
        chrono::NaiveDateTime::parse_from_str(prefix, "%m/%d/%Y (%H:%M:%S)")
            .expect("prefix matches the fixed timestamp format");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn unopenable_path_reports_failure() {
        assert!(!append_log("/nonexistent-dir/sub/never.log", "dropped"));
    }
}
