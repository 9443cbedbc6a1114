use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "seoscope",
    bin_name = "seoscope",
    version,
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Aggregate site crawls into SEO summaries, timeseries and reports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Store root (overrides SEOSCOPE_HOME)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub home: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Run,
    Build,
    Output,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Run => "Run Commands:",
            CommandGroup::Build => "Build Commands:",
            CommandGroup::Output => "Output Commands:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "start" | "runs" | "import" => Some(CommandGroup::Run),
            "summarize" | "record" | "report" | "timeseries" => Some(CommandGroup::Build),
            "print" | "export" | "section" => Some(CommandGroup::Output),
            "config" | "init" | "help" => Some(CommandGroup::Misc),
            _ => None,
        }
    }

    pub fn all() -> &'static [CommandGroup] {
        &[
            CommandGroup::Run,
            CommandGroup::Build,
            CommandGroup::Output,
            CommandGroup::Misc,
        ]
    }
}

/// Returns the custom grouped help output as a string
pub fn get_grouped_help() -> String {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("seoscope {version}\n"));
    output.push_str("Aggregate site crawls into SEO summaries, timeseries and reports\n");
    output.push('\n');
    output.push_str("Usage: seoscope [OPTIONS] [COMMAND]\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();

    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let name = sc.get_name();
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<12} {}\n", name, about));
            }
        }
    }

    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("      --home <DIR>  Store root (overrides SEOSCOPE_HOME)\n");
    output.push_str("  -v, --verbose     Verbose output\n");
    output.push_str("  -h, --help        Print help\n");
    output.push_str("  -V, --version     Print version\n");

    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

/// Prints help for the parsed subcommand using clap's built-in rendering
pub fn print_subcommand_help(command: &Option<Commands>) {
    let name = match command {
        Some(Commands::Run(c)) => match c {
            RunCommands::Start { .. } => "start",
            RunCommands::Runs { .. } => "runs",
            RunCommands::Import { .. } => "import",
        },
        Some(Commands::Build(c)) => match c {
            BuildCommands::Summarize { .. } => "summarize",
            BuildCommands::Record { .. } => "record",
            BuildCommands::Report { .. } => "report",
            BuildCommands::Timeseries { .. } => "timeseries",
        },
        Some(Commands::Output(c)) => match c {
            OutputCommands::Print { .. } => "print",
            OutputCommands::Export { .. } => "export",
            OutputCommands::Section { .. } => "section",
        },
        Some(Commands::Misc(c)) => match c {
            MiscCommands::Config { .. } => "config",
            MiscCommands::Init => "init",
            MiscCommands::Help { .. } => "help",
        },
        None => {
            print_grouped_help();
            return;
        }
    };

    print_help_for_command(name);
}

pub fn print_help_for_command(name: &str) {
    let mut cmd = Cli::command();

    for subcmd in cmd.get_subcommands_mut() {
        if subcmd.get_name() == name {
            let help = subcmd.render_help();
            print!("{}", help);
            return;
        }
    }

    eprintln!("Unknown command: {}", name);
    eprintln!();
    print_grouped_help();
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Run(RunCommands),

    #[command(flatten)]
    Build(BuildCommands),

    #[command(flatten)]
    Output(OutputCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

#[derive(Subcommand, Debug)]
pub enum RunCommands {
    /// Start a new run for a project
    #[command(display_order = 1)]
    Start {
        project: String,

        /// Run id (defaults to the current UTC time, YYYYMMDD-HHMMSS)
        run_id: Option<String>,
    },

    /// List the runs of a project
    #[command(alias = "ls", display_order = 2)]
    Runs { project: String },

    /// Import a crawl output directory into a run
    #[command(display_order = 3)]
    Import {
        project: String,

        /// Directory holding audit.json and pages/, images/, errors/
        source: PathBuf,

        /// Existing or new run id (defaults to a fresh one)
        #[arg(long, value_name = "ID")]
        run: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum BuildCommands {
    /// Rebuild a run's summary
    #[command(display_order = 10)]
    Summarize {
        project: String,
        run: String,

        /// Also append the summary to the project timeseries
        #[arg(long)]
        record: bool,
    },

    /// Append a run's stored summary to the project timeseries
    #[command(display_order = 11)]
    Record { project: String, run: String },

    /// Build a run's report document
    #[command(display_order = 12)]
    Report { project: String, run: String },

    /// Show the project timeseries
    #[command(display_order = 13)]
    Timeseries { project: String },
}

#[derive(Subcommand, Debug)]
pub enum OutputCommands {
    /// Render a run's printable report (markdown, or HTML with --html)
    #[command(display_order = 20)]
    Print {
        project: String,
        run: String,

        /// Render HTML instead of markdown
        #[arg(long)]
        html: bool,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Export a run to a tar.gz archive
    #[command(display_order = 21)]
    Export {
        project: String,
        run: String,

        /// Destination directory (defaults to the current directory)
        #[arg(long, value_name = "DIR")]
        dest: Option<PathBuf>,
    },

    /// Manage a run's report sections
    #[command(display_order = 22)]
    Section {
        #[command(subcommand)]
        action: SectionCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum SectionCommands {
    /// Add or replace a section
    Set {
        project: String,
        run: String,
        name: String,

        /// Body words (joined with spaces; read from stdin when omitted)
        #[arg(trailing_var_arg = true)]
        body: Vec<String>,
    },

    /// Remove a section
    #[command(alias = "remove")]
    Rm {
        project: String,
        run: String,
        name: String,
    },

    /// List a run's sections
    #[command(alias = "ls")]
    List { project: String, run: String },
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Get or set configuration
    #[command(display_order = 30)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },

    /// Initialize the store
    #[command(display_order = 31)]
    Init,

    /// Print help for seoscope or a subcommand
    #[command(display_order = 32)]
    Help {
        /// Subcommand to get help for
        command: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show or set a project's base URL (an empty URL clears it)
    BaseUrl {
        project: String,
        url: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_summarize_with_record() {
        let cli = parse(&["seoscope", "summarize", "acme", "r1", "--record"]);
        match cli.command {
            Some(Commands::Build(BuildCommands::Summarize {
                project,
                run,
                record,
            })) => {
                assert_eq!(project, "acme");
                assert_eq!(run, "r1");
                assert!(record);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_global_home_after_subcommand() {
        let cli = parse(&["seoscope", "runs", "acme", "--home", "/tmp/store", "-v"]);
        assert_eq!(cli.home, Some(PathBuf::from("/tmp/store")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_section_set_collects_body_words() {
        let cli = parse(&[
            "seoscope", "section", "set", "acme", "r1", "Intro", "Hello", "world",
        ]);
        match cli.command {
            Some(Commands::Output(OutputCommands::Section {
                action: SectionCommands::Set { name, body, .. },
            })) => {
                assert_eq!(name, "Intro");
                assert_eq!(body, vec!["Hello", "world"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_config_base_url() {
        let cli = parse(&["seoscope", "config", "base-url", "acme", "https://a.test"]);
        match cli.command {
            Some(Commands::Misc(MiscCommands::Config {
                action: Some(ConfigCommands::BaseUrl { project, url }),
            })) => {
                assert_eq!(project, "acme");
                assert_eq!(url.as_deref(), Some("https://a.test"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_import_run_flag() {
        let cli = parse(&["seoscope", "import", "acme", "./crawl", "--run", "r9"]);
        match cli.command {
            Some(Commands::Run(RunCommands::Import { source, run, .. })) => {
                assert_eq!(source, PathBuf::from("./crawl"));
                assert_eq!(run.as_deref(), Some("r9"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_grouped_help_lists_groups() {
        let help = get_grouped_help();
        for heading in ["Run Commands:", "Build Commands:", "Output Commands:"] {
            assert!(help.contains(heading));
        }
        assert!(help.contains("summarize"));
        assert!(help.contains("--home"));
    }

    #[test]
    fn test_every_command_has_a_group() {
        let cmd = Cli::command();
        for sc in cmd.get_subcommands() {
            assert!(
                CommandGroup::for_command(sc.get_name()).is_some(),
                "{} has no help group",
                sc.get_name()
            );
        }
    }
}
