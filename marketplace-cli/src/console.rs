//! Console log format
//!
//! Renders every tracing event as a single `[TAG] message` record on stdout.
//! The tag is the event's `tag` field when present (`BUILD`, `OK`), otherwise
//! the level name.

use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// `[TAG] message key=value ...`
#[derive(Debug, Clone, Copy, Default)]
pub struct TaggedFormat;

impl<S, N> FormatEvent<S, N> for TaggedFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = TagVisitor::default();
        event.record(&mut visitor);

        let tag = visitor
            .tag
            .unwrap_or_else(|| event.metadata().level().as_str().to_string());

        write!(writer, "[{tag}] {}", visitor.message)?;
        for (name, value) in &visitor.fields {
            write!(writer, " {name}={value}")?;
        }
        writeln!(writer)
    }
}

#[derive(Default)]
struct TagVisitor {
    tag: Option<String>,
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl TagVisitor {
    fn record(&mut self, field: &Field, value: String) {
        match field.name() {
            "tag" => self.tag = Some(value),
            "message" => self.message = value,
            name => self.fields.push((name, value)),
        }
    }
}

impl Visit for TagVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record(field, format!("{value:?}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::Level;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Buffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let buffer = Buffer::default();
        let subscriber = tracing_subscriber::fmt()
            .event_format(TaggedFormat)
            .with_writer(buffer.clone())
            .with_max_level(Level::TRACE)
            .finish();

        tracing::subscriber::with_default(subscriber, f);

        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_level_tags() {
        let output = capture(|| {
            tracing::warn!("No logo found for gaia");
            tracing::error!("Validation errors found:\n   - a: b");
            tracing::info!("Loaded 2 pinned apps");
        });

        assert_eq!(
            output,
            "[WARN] No logo found for gaia\n\
             [ERROR] Validation errors found:\n   - a: b\n\
             [INFO] Loaded 2 pinned apps\n"
        );
    }

    #[test]
    fn test_tag_field_overrides_level() {
        let output = capture(|| {
            tracing::info!(tag = "BUILD", "Building apps.json from apps");
            tracing::info!(tag = "OK", "Successfully generated apps.json");
        });

        assert_eq!(
            output,
            "[BUILD] Building apps.json from apps\n[OK] Successfully generated apps.json\n"
        );
    }

    #[test]
    fn test_extra_fields_are_appended() {
        let output = capture(|| {
            tracing::debug!(slug = "n8n", flagged = true, "Accepted app");
        });

        assert_eq!(output, "[DEBUG] Accepted app slug=n8n flagged=true\n");
    }
}
