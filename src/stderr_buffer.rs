use std::sync::Mutex;

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

/// Start buffering warnings. While active, `warn()` stores messages instead
/// of writing to stderr, so background fetches can't corrupt the raw-mode
/// terminal.
pub fn activate() {
    *BUFFER.lock().unwrap() = Some(Vec::new());
}

/// Stop buffering and return everything collected.
pub fn drain() -> Vec<String> {
    BUFFER.lock().unwrap().take().unwrap_or_default()
}

/// Write a warning. Stored while buffering is active, printed to stderr
/// immediately otherwise.
pub fn warn(msg: String) {
    let mut guard = BUFFER.lock().unwrap();
    if let Some(buf) = guard.as_mut() {
        buf.push(msg);
    } else {
        drop(guard);
        eprintln!("{}", msg);
    }
}

/// `eprintln!` that routes through the stderr buffer when it is active.
#[macro_export]
macro_rules! buffered_eprintln {
    ($($arg:tt)*) => {
        $crate::stderr_buffer::warn(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffering_roundtrip() {
        activate();
        warn("first".to_string());
        warn("second".to_string());
        let drained = drain();
        // Other tests may warn concurrently; only check our own messages.
        assert!(drained.contains(&"first".to_string()));
        assert!(drained.contains(&"second".to_string()));
    }
}
