//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, stdin)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Installs logging and builds the API over the resolved store root
//! - `handle_*()`: Per-command handlers that call the API and print its result
//!
//! Handlers never compute anything themselves: business rules live in the command
//! layer and reach the CLI as a `CmdResult`.

use super::render::{
    eprint_messages, print_messages, render_config, render_report, render_runs,
    render_sections, render_summary, render_timeseries,
};
use super::setup::{
    print_grouped_help, print_help_for_command, print_subcommand_help, BuildCommands, Cli,
    Commands, ConfigCommands, MiscCommands, OutputCommands, RunCommands, SectionCommands,
};
use clap::Parser;
use seoscope::api::{ConfigAction, PrintFormat, SeoApi};
use seoscope::error::{Result, SeoError};
use seoscope::init::initialize;
use seoscope::logging;
use seoscope::store::fs::FileStore;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

struct AppContext {
    api: SeoApi<FileStore>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Top level uses grouped help, subcommands use clap's own rendering
    if cli.help {
        if cli.command.is_none() {
            print_grouped_help();
        } else {
            print_subcommand_help(&cli.command);
        }
        return Ok(());
    }

    if let Some(Commands::Misc(MiscCommands::Help { command })) = &cli.command {
        return handle_help(command.as_deref());
    }

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Run(cmd)) => match cmd {
            RunCommands::Start { project, run_id } => handle_start(&mut ctx, &project, run_id),
            RunCommands::Runs { project } => handle_runs(&ctx, &project),
            RunCommands::Import {
                project,
                source,
                run,
            } => handle_import(&mut ctx, &project, &source, run),
        },
        Some(Commands::Build(cmd)) => match cmd {
            BuildCommands::Summarize {
                project,
                run,
                record,
            } => handle_summarize(&mut ctx, &project, &run, record),
            BuildCommands::Record { project, run } => handle_record(&mut ctx, &project, &run),
            BuildCommands::Report { project, run } => handle_report(&mut ctx, &project, &run),
            BuildCommands::Timeseries { project } => handle_timeseries(&ctx, &project),
        },
        Some(Commands::Output(cmd)) => match cmd {
            OutputCommands::Print {
                project,
                run,
                html,
                output,
            } => handle_print(&mut ctx, &project, &run, html, output.as_deref()),
            OutputCommands::Export { project, run, dest } => {
                handle_export(&ctx, &project, &run, dest)
            }
            OutputCommands::Section { action } => handle_section(&mut ctx, action),
        },
        Some(Commands::Misc(cmd)) => match cmd {
            MiscCommands::Config { action } => handle_config(&mut ctx, action),
            MiscCommands::Init => handle_init(&ctx),
            MiscCommands::Help { command } => handle_help(command.as_deref()),
        },
        None => {
            print_grouped_help();
            Ok(())
        }
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("warning: {}", e);
    }

    let ctx = initialize(cli.home.as_deref())?;
    Ok(AppContext { api: ctx.api })
}

fn handle_start(ctx: &mut AppContext, project: &str, run_id: Option<String>) -> Result<()> {
    let result = ctx.api.start_run(project, run_id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_runs(ctx: &AppContext, project: &str) -> Result<()> {
    let result = ctx.api.list_runs(project)?;
    print!("{}", render_runs(&result.runs));
    print_messages(&result.messages);
    Ok(())
}

fn handle_import(
    ctx: &mut AppContext,
    project: &str,
    source: &Path,
    run: Option<String>,
) -> Result<()> {
    let result = ctx.api.import_run(project, run, source)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_summarize(ctx: &mut AppContext, project: &str, run: &str, record: bool) -> Result<()> {
    let result = ctx.api.summarize(project, run, record)?;
    if let Some(summary) = &result.summary {
        print!("{}", render_summary(summary));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_record(ctx: &mut AppContext, project: &str, run: &str) -> Result<()> {
    let result = ctx.api.record(project, run)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_report(ctx: &mut AppContext, project: &str, run: &str) -> Result<()> {
    let result = ctx.api.build_report(project, run)?;
    if let Some(report) = &result.report {
        print!("{}", render_report(report));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_timeseries(ctx: &AppContext, project: &str) -> Result<()> {
    let result = ctx.api.timeseries(project)?;
    if let Some(timeseries) = &result.timeseries {
        print!("{}", render_timeseries(timeseries));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_print(
    ctx: &mut AppContext,
    project: &str,
    run: &str,
    html: bool,
    output: Option<&Path>,
) -> Result<()> {
    let format = if html {
        PrintFormat::Html
    } else {
        PrintFormat::Markdown
    };
    let result = ctx.api.print_report(project, run, format)?;
    let rendered = result.rendered.unwrap_or_default();

    match output {
        Some(path) => {
            std::fs::write(path, &rendered).map_err(SeoError::Io)?;
            print_messages(&result.messages);
            println!("Wrote {}", path.display());
        }
        None => {
            eprint_messages(&result.messages);
            print!("{}", rendered);
            if !rendered.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}

fn handle_export(
    ctx: &AppContext,
    project: &str,
    run: &str,
    dest: Option<PathBuf>,
) -> Result<()> {
    let dest = match dest {
        Some(dest) => dest,
        None => std::env::current_dir().map_err(SeoError::Io)?,
    };
    let result = ctx.api.export_run(project, run, &dest)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_section(ctx: &mut AppContext, action: SectionCommands) -> Result<()> {
    let result = match action {
        SectionCommands::Set {
            project,
            run,
            name,
            body,
        } => {
            let body = section_body(body)?;
            ctx.api.set_section(&project, &run, &name, &body)?
        }
        SectionCommands::Rm { project, run, name } => {
            ctx.api.remove_section(&project, &run, &name)?
        }
        SectionCommands::List { project, run } => {
            let result = ctx.api.sections(&project, &run)?;
            if let Some(sections) = &result.sections {
                print!("{}", render_sections(sections));
            }
            result
        }
    };
    print_messages(&result.messages);
    Ok(())
}

/// Body words joined with spaces, or piped stdin when no words were given.
fn section_body(words: Vec<String>) -> Result<String> {
    if !words.is_empty() {
        return Ok(words.join(" "));
    }

    let mut buffer = String::new();
    if !std::io::stdin().is_terminal() {
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(SeoError::Io)?;
    }
    Ok(buffer.trim_end().to_string())
}

fn handle_config(ctx: &mut AppContext, action: Option<ConfigCommands>) -> Result<()> {
    let action = match action {
        None => ConfigAction::ShowAll,
        Some(ConfigCommands::BaseUrl { project, url: None }) => ConfigAction::ShowBaseUrl(project),
        Some(ConfigCommands::BaseUrl {
            project,
            url: Some(url),
        }) => ConfigAction::SetBaseUrl(project, url),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print!("{}", render_config(config));
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_init(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.init()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_help(command: Option<&str>) -> Result<()> {
    match command {
        Some(cmd) => print_help_for_command(cmd),
        None => print_grouped_help(),
    }
    Ok(())
}
