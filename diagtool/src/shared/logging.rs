use chrono::Local;
use clap::{ArgGroup, Parser};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing::{Dispatch, Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Registry;

/// Event formatter shared by every sink, so a line renders the same on the
/// console and in `diagtool.output`:
/// `<timestamp>: [Diagtool] [<severity>] <message>`.
pub struct DiagFormat;

impl<S, N> FormatEvent<S, N> for DiagFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        write!(
            writer,
            "{}: [Diagtool] [{}] ",
            Local::now().format("%Y-%m-%d %H:%M:%S %z"),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

#[derive(Parser, Debug)]
#[clap(group = ArgGroup::new("logging"))]
pub struct LoggingOpts {
    /// A level of verbosity, and can be used multiple times
    #[arg(short, long, action = clap::ArgAction::Count, global(true))]
    pub verbose: u8,
}

impl LoggingOpts {
    pub fn to_level_filter(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    /// Console-only subscriber, installed once at process start. Events emitted
    /// before the run workspace exists (configuration errors) land here.
    pub fn configure_logging(&self) {
        let console = tracing_subscriber::fmt::layer()
            .event_format(DiagFormat)
            .with_writer(io::stdout);

        let subscriber = Registry::default()
            .with(console)
            .with(self.to_level_filter());

        tracing::subscriber::set_global_default(subscriber)
            .expect("setting default subscriber failed");
    }
}

/// Dual-sink dispatch for a run. The console and the log file receive every
/// event, one formatted line each, synchronously. The file is opened in
/// append/create mode and written through a mutex.
pub fn run_log_dispatch(diaglog: &Path, filter: LevelFilter) -> Result<Dispatch, io::Error> {
    let log_file = OpenOptions::new().create(true).append(true).open(diaglog)?;

    let console = tracing_subscriber::fmt::layer()
        .event_format(DiagFormat)
        .with_writer(io::stdout);

    let file = tracing_subscriber::fmt::layer()
        .event_format(DiagFormat)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file));

    let subscriber = Registry::default().with(console).with(file).with(filter);

    Ok(Dispatch::new(subscriber))
}
