use log::info;
use minic::{program2listing, Config, Error};
use std::fs;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::process::ExitCode;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Source file
    #[clap(default_value = "main.c")]
    input: String,

    /// Output file [default: input with `.j` extension]
    #[clap(short, long)]
    output: Option<String>,

    /// YAML config file
    #[clap(short, long)]
    config: Option<String>,

    /// Owner class of the generated methods
    #[clap(long)]
    class: Option<String>,

    /// Dump the syntax tree
    #[clap(long)]
    ast: bool,

    /// Write the listing to stdout instead of a file
    #[clap(long)]
    stdout: bool,
}

fn main() -> ExitCode {
    use clap::Parser;

    env_logger::init();
    let args = Args::parse();

    let source = match fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(e) => {
            Error::FileOpen(args.input.clone(), e).print_diag(&args.input, "");
            return ExitCode::FAILURE;
        }
    };

    match run(&args, &source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(errors) => {
            for e in &errors {
                e.print_diag(&args.input, &source);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, source: &str) -> Result<(), Vec<Error>> {
    let mut config = match &args.config {
        Some(path) => Config::load(path).map_err(|e| vec![e])?,
        None => Config::default(),
    };
    if let Some(class) = &args.class {
        config.class_name = class.clone();
    }

    // 1. Parse
    let (program, recovered) = minic::parse(source.as_bytes(), &config).map_err(|e| vec![e])?;
    for e in &recovered {
        e.print_warn(&args.input, source);
    }
    if args.ast {
        print!("{}", program.tree());
    }

    // 2. Generate
    let listing = program2listing(&program, &config)?;

    // 3. Output
    if args.stdout {
        if io::stdout().is_terminal() {
            print!("{}", listing.cformat());
        } else {
            print!("{}", listing);
        }
        return Ok(());
    }
    let output = match &args.output {
        Some(output) => output.clone(),
        None => Path::new(&args.input)
            .with_extension("j")
            .to_string_lossy()
            .into_owned(),
    };
    fs::write(&output, listing.to_string()).map_err(|e| vec![Error::FileWrite(output.clone(), e)])?;
    info!("wrote {}", output);
    Ok(())
}
