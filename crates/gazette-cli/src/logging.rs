use colored::Colorize;
use gazette::logging::SKIP_FORMAT;
use std::fmt;
use tracing::{
    Event, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{
    fmt::{FmtContext, FormatEvent, FormatFields, format},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

pub struct EventLoggerFormatter {
    pub quiet: bool,
}

/// Records forwarded from the `log` facade carry their target in a `log.target` field.
#[derive(Default)]
struct LogTarget(Option<String>);

impl Visit for LogTarget {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "log.target" {
            self.0 = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, _field: &Field, _value: &dyn fmt::Debug) {}
}

fn event_label(event: &Event<'_>) -> String {
    let mut log_target = LogTarget::default();
    event.record(&mut log_target);

    match log_target.0 {
        Some(target) => target,
        // Events without an explicit `name:` are called "event file:line"
        None if event.metadata().name().starts_with("event ") => String::new(),
        None => event.metadata().name().to_string(),
    }
}

impl<S, N> FormatEvent<S, N> for EventLoggerFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        if self.quiet {
            return Ok(());
        }

        let label = event_label(event);

        if label == SKIP_FORMAT {
            ctx.field_format().format_fields(writer.by_ref(), event)?;
            return writeln!(writer);
        }

        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string().dimmed();

        write!(
            writer,
            "{}{} ",
            timestamp,
            if label.is_empty() {
                String::new()
            } else {
                format!(" {}", label.to_ascii_lowercase().bold().bright_yellow())
            }
        )?;

        match *event.metadata().level() {
            tracing::Level::ERROR => write!(writer, "{} ", "error:".red().bold())?,
            tracing::Level::WARN => write!(writer, "{} ", "warning:".yellow().bold())?,
            _ => {}
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

pub fn init_logging(quiet: bool) {
    let tracing_formatter = tracing_subscriber::fmt::layer().event_format(EventLoggerFormatter { quiet });

    tracing_subscriber::registry()
        .with(
            // Library records use short targets (`api`, `store`, `pages`...), hence a global default
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ureq=warn".into()),
        )
        .with(tracing_formatter)
        .init();
}
