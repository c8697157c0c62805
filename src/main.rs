use clap::Parser;
use miette::Result;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use hierbom::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) so piping into
    // `head` or `grep -q` doesn't panic on a broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    let level = if global.verbose {
        LevelFilter::DEBUG
    } else if global.quiet {
        LevelFilter::ERROR
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init(args) => hierbom::cli::commands::init::run(args),
        Commands::Cost(args) => hierbom::cli::commands::cost::run(args, &global),
        Commands::Flatten(args) => hierbom::cli::commands::flatten::run(args, &global),
        Commands::Check(args) => hierbom::cli::commands::check::run(args, &global),
        Commands::Completions(args) => hierbom::cli::commands::completions::run(args),
    }
}
