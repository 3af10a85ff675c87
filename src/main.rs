use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use arbormap::cli::args::Cli;
use arbormap::cli::commands::execute_command;
use arbormap::cli::output;

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if let Err(e) = execute_command(&cli) {
        output::error(&e);
        std::process::exit(e.exit_code());
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // spreadsheet and shapefile readers are chatty at trace level
    let noisy_modules = ["calamine", "shapefile", "zip"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    let filtered_layer = fmt_layer.with_filter(filter).with_filter(module_filter);

    tracing_subscriber::registry().with(filtered_layer).init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbormap::util::testing;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        testing::init_test_setup();
        Cli::command().debug_assert();
    }

    #[test]
    fn given_build_flags_when_parsing_then_fields_are_set() {
        let cli = Cli::parse_from([
            "arbormap", "-vv", "-C", "/tmp/site", "build", "--sheet", "Inventory", "--no-photos",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.site_dir.as_deref(), Some(std::path::Path::new("/tmp/site")));
        match cli.command {
            Some(arbormap::cli::args::Commands::Build {
                sheet, no_photos, output,
            }) => {
                assert_eq!(sheet.as_deref(), Some("Inventory"));
                assert!(no_photos);
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
