mod debug_report;

use affixlint::{
    AffixData, DictionaryEntry, Flag, ReduceError, ReduceOptions, Reduction, parse_dictionary, reduce_all,
    reduce_flag, rewrite_affix_file,
};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    match run(&config) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

struct CliConfig {
    aff: PathBuf,
    dic: PathBuf,
    flags: Vec<String>,
    expand: bool,
    write: Option<PathBuf>,
    options: ReduceOptions,
    color: bool,
}

/// Returns whether every requested flag reduced cleanly.
fn run(config: &CliConfig) -> Result<bool, String> {
    let aff_text = read(&config.aff)?;
    let dic_text = read(&config.dic)?;
    let affixes = AffixData::parse(&aff_text).map_err(|err| format!("error: {}: {err}", config.aff.display()))?;
    let dictionary = parse_dictionary(&dic_text, affixes.flag_type())
        .map_err(|err| format!("error: {}: {err}", config.dic.display()))?;

    if config.expand {
        print_expansions(&affixes, &dictionary);
        return Ok(true);
    }

    let results: Vec<(Flag, Result<Reduction, ReduceError>)> = if config.flags.is_empty() {
        reduce_all(&affixes, &dictionary, &config.options)
    } else {
        config
            .flags
            .iter()
            .map(|flag| (Flag::new(flag.as_str()), reduce_flag(&affixes, &dictionary, flag, &config.options)))
            .collect()
    };

    debug_report::print_run(&results, config.options.verify, config.color);

    if let Some(path) = &config.write {
        let reductions: Vec<Reduction> = results.iter().filter_map(|(_, r)| r.as_ref().ok().cloned()).collect();
        let text = rewrite_affix_file(&aff_text, &reductions);
        std::fs::write(path, text).map_err(|err| format!("error: failed to write {}: {err}", path.display()))?;
    }

    Ok(results.iter().all(|(_, r)| r.is_ok()))
}

fn print_expansions(affixes: &AffixData, dictionary: &[DictionaryEntry]) {
    for entry in dictionary {
        let forms: Vec<String> = affixes
            .expand(entry)
            .into_iter()
            .map(|p| if p.morph.is_empty() { p.word } else { format!("{} [{}]", p.word, p.morph.join(" ")) })
            .collect();
        println!("{}: {}", entry.word, forms.join(", "));
    }
}

fn read(path: &PathBuf) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|err| format!("error: failed to read {}: {err}", path.display()))
}

fn parse_args() -> Result<CliConfig, String> {
    let mut aff: Option<PathBuf> = None;
    let mut dic: Option<PathBuf> = None;
    let mut flags = Vec::new();
    let mut expand = false;
    let mut write = None;
    let mut options = ReduceOptions::default();
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        let (name, inline) = match arg.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };
        let mut value = |what: &str| -> Result<String, String> {
            inline.clone().or_else(|| args.next()).ok_or_else(|| format!("error: {what} expects a value"))
        };

        match name.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("affixlint {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--expand" => expand = true,
            "--no-verify" => options.verify = false,
            "--aff" => aff = Some(PathBuf::from(value("--aff")?)),
            "--dic" => dic = Some(PathBuf::from(value("--dic")?)),
            "--flag" | "-f" => flags.push(value("--flag")?),
            "--write" | "-w" => write = Some(PathBuf::from(value("--write")?)),
            "--budget-ms" => {
                let raw = value("--budget-ms")?;
                let ms: u64 = raw.parse().map_err(|_| format!("error: invalid --budget-ms '{raw}'"))?;
                options.time_budget = Some(Duration::from_millis(ms));
            }
            _ => return Err(format!("error: unknown option '{arg}'\n\n{}", help_text())),
        }
    }

    let (Some(aff), Some(dic)) = (aff, dic) else {
        return Err(format!("error: --aff and --dic are required\n\n{}", help_text()));
    };

    Ok(CliConfig { aff, dic, flags, expand, write, options, color })
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "affixlint {version}

Compact Hunspell SFX/PFX blocks into the fewest lines that keep every
inflection of the dictionary.

Usage:
  affixlint --aff <file> --dic <file> [OPTIONS]

Options:
  --aff <file>               Affix file to read.
  --dic <file>               Dictionary whose words drive the reduction.
  -f, --flag <flag>          Reduce only this flag. Repeatable. Default: every
                             flag carried by at least one dictionary word.
  --expand                   Print every word form of every dictionary line
                             and exit.
  -w, --write <file>         Write the affix file with reduced blocks spliced in.
  --no-verify                Skip the round-trip check of reduced blocks.
  --budget-ms <n>            Abandon a flag after <n> milliseconds.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Logging goes to stderr; set RUST_LOG (e.g. RUST_LOG=debug) to see more.

Exit codes:
  0  Success.
  1  A flag failed to reduce or verify, or a file could not be read/written.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
    )
}
