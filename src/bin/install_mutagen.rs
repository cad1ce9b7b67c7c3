//! `install-mutagen` entry point.

use std::process::ExitCode;

use clap::Parser;
use hostprep::cli::{init_tracing, Command, InstallCli, InstallCommand};
use hostprep::config::load_config;
use hostprep::shell::{is_ci, SystemRunner};
use hostprep::ui::create_ui;

fn main() -> ExitCode {
    let cli = InstallCli::parse();
    init_tracing(cli.global.debug);

    tracing::debug!("install-mutagen starting with args: {:?}", cli);

    if cli.global.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let mut ui = create_ui(!is_ci(), cli.global.output_mode());
    let runner = SystemRunner;

    let result = load_config(cli.global.config.as_deref())
        .and_then(|config| InstallCommand::new(config.installer, &runner).execute(ui.as_mut()));

    match result {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
