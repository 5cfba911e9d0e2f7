use std::{any::Any, backtrace::Backtrace, thread};

use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
/// Calling it twice is harmless; the second call keeps the first subscriber.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let installed = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();
    if installed {
        install_panic_logger();
    }
}

fn payload_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

fn install_panic_logger() {
    std::panic::set_hook(Box::new(|info| {
        let message = payload_message(info.payload());
        let current = thread::current();
        let thread_name = current.name().unwrap_or("unnamed");
        let location = info
            .location()
            .map(|location| location.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        tracing::error!(
            panic = %message,
            thread = thread_name,
            location = %location,
            backtrace = %Backtrace::capture(),
            "panic"
        );
    }));
}

#[cfg(test)]
mod tests {
    use super::payload_message;

    #[test]
    fn panic_payloads_are_read_as_text() {
        let borrowed: Box<dyn std::any::Any + Send> = Box::new("static message");
        let owned: Box<dyn std::any::Any + Send> = Box::new("owned message".to_string());
        let other: Box<dyn std::any::Any + Send> = Box::new(42_u8);

        assert_eq!(payload_message(borrowed.as_ref()), "static message");
        assert_eq!(payload_message(owned.as_ref()), "owned message");
        assert_eq!(payload_message(other.as_ref()), "unknown panic");
    }
}
