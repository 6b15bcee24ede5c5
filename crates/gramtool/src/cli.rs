//! The `gramtool` command line.
//!
//! ```text
//! gramtool Vilniaus                      # analyses: Vilniaus [nmSg] -> Vilnius
//! gramtool medis --case accusative       # medį
//! gramtool "Šiaulių banko" --lemma       # Šiaulių bankas
//! gramtool namas -f                      # analyses plus every paradigm
//! gramtool any --rules                   # dump the compiled grammar (word ignored)
//! ```
#![allow(clippy::multiple_crate_versions)]

use std::process::ExitCode;

use facet::Facet;
use gramtool::{views, Error, GramTool};

/// Command line arguments.
#[derive(Facet)]
struct Args {
    /// A word (or with `--lemma`, a phrase) to look up.
    #[facet(positional)]
    word: String,

    /// Data directory [default: data].
    #[facet(named, short = 'd', default)]
    data_dir: Option<String>,

    /// Two letter language code [default: lt].
    #[facet(named, short = 'l', default)]
    lang: Option<String>,

    /// Print every form of every paradigm the word belongs to.
    #[facet(named, short = 'f', default)]
    forms: bool,

    /// Print the lemma of the whole argument as a phrase.
    #[facet(named, default)]
    lemma: bool,

    /// Print the compiled grammar.
    #[facet(named, default)]
    rules: bool,

    /// Change the gender of the word.
    #[facet(named, default)]
    gender: Option<String>,

    /// Change the number of the word.
    #[facet(named, default)]
    number: Option<String>,

    /// Change the case of the word.
    #[facet(named, default)]
    case: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Args = match facet_args::from_std_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(1);
        }
    };

    match run(&args) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(Error::Syntax(err)) => {
            eprintln!("{}", err.report());
            ExitCode::from(1)
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(if err.is_setup() { 2 } else { 1 })
        }
    }
}

fn run(args: &Args) -> gramtool::Result<String> {
    let tool = GramTool::new(
        args.data_dir.as_deref().unwrap_or("data"),
        args.lang.as_deref().unwrap_or("lt"),
    );

    if args.rules {
        return Ok(views::rules(tool.grammar()?.rules(), "(stem)"));
    }

    if args.lemma {
        return Ok(line(tool.lemma_of_phrase(&args.word)?));
    }

    let changes: Vec<(&str, &str)> = [
        ("gender", &args.gender),
        ("number", &args.number),
        ("case", &args.case),
    ]
    .into_iter()
    .filter_map(|(property, value)| Some((property, value.as_deref()?)))
    .collect();
    if !changes.is_empty() {
        return Ok(line(tool.change_form(&args.word, &changes)?));
    }

    let mut output = views::analyses(tool.grammar()?, &args.word);
    if args.forms {
        output.push_str(&views::paradigms(&tool.forms_of(&args.word)?));
    }
    Ok(output)
}

fn line(result: Option<String>) -> String {
    result.map(|text| text + "\n").unwrap_or_default()
}
