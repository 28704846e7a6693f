use clap::Parser;
use sftp_mirror::config::Cli;
use sftp_mirror::logging::init_logging;
use sftp_mirror::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli)?;

    let summary = sftp_mirror::commands::sync::run(&config)?;
    if !config.simulate && summary.has_failures() {
        anyhow::bail!("{} item(s) could not be mirrored", summary.failed());
    }

    Ok(())
}
