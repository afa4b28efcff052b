use nicolas::{LayoutConfig, LayoutInput};
use serde::Serialize;
use std::io::Read;
use tracing::Level;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Layout(nicolas::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Layout(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<nicolas::Error> for CliError {
    fn from(value: nicolas::Error) -> Self {
        Self::Layout(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    ValidateConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
enum Verbosity {
    #[default]
    Quiet,
    Debug,
    Trace,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    pretty: bool,
    report: bool,
    verbosity: Verbosity,
}

fn usage() -> &'static str {
    "nicolas-cli\n\
\n\
USAGE:\n\
  nicolas-cli [layout] [--pretty] [--report] [--config <path>] [--verbose|-v] [--trace|-vv] [<path>|-]\n\
  nicolas-cli validate-config [--pretty] <path>\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - layout input is a JSON object: {\"nodes\": [..], \"edges\": [{\"from\", \"to\", \"kind\"}], \"selected\": [..]}.\n\
    `kind` is one of manyToOne, oneToMany, manyToMany; omitting `selected` selects every node.\n\
  - layout prints {\"positions\": {id: {x, y}}}; --report adds communities, layers and rectangles.\n\
  - --config takes a JSON object overriding any subset of the default layout constants.\n\
  - validate-config prints the effective configuration, or fails with exit code 1.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "validate-config" => args.command = Command::ValidateConfig,
            "--pretty" => args.pretty = true,
            "--report" => args.report = true,
            "--verbose" | "-v" => args.verbosity = args.verbosity.max(Verbosity::Debug),
            "--trace" | "-vv" => args.verbosity = Verbosity::Trace,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if matches!(args.command, Command::ValidateConfig)
        && args.input.as_deref().is_none_or(|p| p == "-")
        && args.config.is_none()
    {
        return Err(CliError::Usage(usage()));
    }

    Ok(args)
}

fn init_tracing(verbosity: Verbosity) {
    let level = match verbosity {
        Verbosity::Quiet => Level::WARN,
        Verbosity::Debug => Level::DEBUG,
        Verbosity::Trace => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn load_config(path: Option<&str>) -> Result<LayoutConfig, CliError> {
    let config = match path {
        None => LayoutConfig::default(),
        Some(path) => LayoutConfig::from_json(&std::fs::read_to_string(path)?)?,
    };
    config.validate()?;
    Ok(config)
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::ValidateConfig => {
            let path = args.config.as_deref().or(args.input.as_deref());
            let config = load_config(path)?;
            write_json(&config, args.pretty)
        }
        Command::Layout => {
            let config = load_config(args.config.as_deref())?;
            let text = read_input(args.input.as_deref())?;
            let input = LayoutInput::from_json(&text)?;
            tracing::debug!(
                nodes = input.nodes.len(),
                edges = input.edges.len(),
                "layout input loaded"
            );

            if args.report {
                write_json(&input.compute_detailed(&config), args.pretty)
            } else {
                write_json(&input.compute(&config), args.pretty)
            }
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_tracing(args.verbosity);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
