mod debug_report;

use durfmt::{Capabilities, Duration, DurationFormatter, FormatSettings, TrimPolicy, UnitType};
use std::io::{self, IsTerminal, Read};

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let formatter = if config.fallback {
        DurationFormatter::with_capabilities(Capabilities::FALLBACK_ONLY)
    } else {
        DurationFormatter::new()
    };

    if config.explain {
        for (input, duration) in config.inputs.iter().zip(&config.durations) {
            match formatter.format_verbose(duration, &config.settings) {
                Ok(details) => debug_report::print_run(input, &details, config.color),
                Err(err) => fail(&err),
            }
        }
        return;
    }

    let result = if config.durations.len() == 1 {
        formatter.format(&config.durations[0], &config.settings).map(|out| vec![out])
    } else {
        formatter.format_many(&config.durations, &config.settings)
    };

    match result {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        Err(err) => fail(&err),
    }
}

fn fail(err: &durfmt::FormatError) -> ! {
    eprintln!("error: {err}");
    std::process::exit(2);
}

struct CliConfig {
    inputs: Vec<String>,
    durations: Vec<Duration>,
    settings: FormatSettings,
    fallback: bool,
    explain: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut inputs: Vec<String> = Vec::new();
    let mut settings = FormatSettings::default();
    let mut fallback = false;
    let mut explain = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };
        let mut value = |name: &str| -> Result<String, String> {
            match inline.clone() {
                Some(v) => Ok(v),
                None => args.next().ok_or_else(|| format!("error: {name} expects a value")),
            }
        };

        match flag.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("durfmt {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--explain" => explain = true,
            "--fallback" => fallback = true,
            "--truncate" => settings.truncate = true,
            "--left-units" => settings.use_left_units = true,
            "--no-plural" => settings.use_plural = false,
            "--significant" => settings.use_significant_digits = true,
            "--no-grouping" => settings.use_grouping = false,
            "--force-length" => settings.force_length = Some(true),
            "-t" | "--template" => settings.template = Some(value("--template")?),
            "--locale" => settings.locale = value("--locale")?,
            "--trim" => {
                let raw = value("--trim")?;
                let trim = raw.parse::<TrimPolicy>().map_err(|err| format!("error: invalid --trim '{raw}': {err}"))?;
                settings.trim = Some(trim);
            }
            "--precision" => {
                let raw = value("--precision")?;
                settings.precision =
                    raw.parse().map_err(|_| format!("error: invalid --precision '{raw}' (expected an integer)"))?;
            }
            "--largest" => {
                let raw = value("--largest")?;
                let largest = raw.parse().map_err(|_| format!("error: invalid --largest '{raw}' (expected a count)"))?;
                settings.largest = Some(largest);
            }
            "--min" => settings.min_value = Some(parse_number("--min", &value("--min")?)?),
            "--max" => settings.max_value = Some(parse_number("--max", &value("--max")?)?),
            "--stop-trim" => {
                let raw = value("--stop-trim")?;
                settings.stop_trim = parse_units("--stop-trim", &raw)?;
            }
            "--output-types" => {
                let raw = value("--output-types")?;
                settings.output_types = Some(parse_units("--output-types", &raw)?);
            }
            "--" => {
                inputs.extend(args.by_ref());
                break;
            }
            _ if flag.starts_with("--") => return Err(format!("error: unknown option '{arg}'")),
            // Bare negative numbers are durations, not flags.
            _ if flag.starts_with('-') && !flag.starts_with("-P") && flag.parse::<f64>().is_err() => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => inputs.push(arg),
        }
    }

    if inputs.is_empty() {
        inputs = read_stdin_input()?;
    }
    if inputs.is_empty() {
        return Err(format!("error: no duration provided\n\n{}", help_text()));
    }

    let durations = inputs
        .iter()
        .map(|input| {
            input.parse::<Duration>().map_err(|_| {
                format!("error: invalid duration '{input}' (expected milliseconds or ISO 8601 like PT1H30M)")
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CliConfig { inputs, durations, settings, fallback, explain, color })
}

fn parse_number(flag: &str, raw: &str) -> Result<f64, String> {
    raw.parse().map_err(|_| format!("error: invalid {flag} '{raw}' (expected a number)"))
}

fn parse_units(flag: &str, raw: &str) -> Result<Vec<UnitType>, String> {
    UnitType::parse_list(raw).map_err(|err| format!("error: invalid {flag} '{raw}': {err}"))
}

fn read_stdin_input() -> Result<Vec<String>, String> {
    if io::stdin().is_terminal() {
        return Ok(Vec::new());
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string).collect())
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "durfmt {version}

Template-driven duration formatter.

Usage:
  durfmt [OPTIONS] [--] <duration...>

Durations are milliseconds (`90000`) or ISO 8601 (`PT1H30M`). With no
arguments, one duration per line is read from stdin. Several durations are
formatted together so they show the same units.

Options:
  -t, --template <tpl>       Template, e.g. \"h:mm:ss\" or \"d __, h __\".
                             Default: picked from the duration's magnitude.
  --trim <policy>            large, small, both, mid, final, all or none
                             (combine with commas).
  --precision <n>            Decimal places on the smallest unit; negative
                             rounds to tens, hundreds, ...
  --significant              Treat --precision as significant digits.
  --largest <n>              Show at most n units.
  --stop-trim <units>        Units never trimmed, e.g. \"h,m\".
  --output-types <units>     Show exactly these units.
  --min <value>              Lower bound in the smallest unit (\"< 1 minute\").
  --max <value>              Upper bound in the largest unit (\"> 5 hours\").
  --truncate                 Truncate instead of rounding.
  --force-length             Pad the first unit to its token length.
  --left-units               Attach labels before values.
  --no-plural                Keep labels as written.
  --no-grouping              Disable digit grouping.
  --locale <tag>             Locale for labels and numerals. Default: en
  --fallback                 Skip the ICU number formatter.
  --explain                  Print a per-unit report instead of the output.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Exit codes:
  0  Success.
  2  Invalid arguments, duration or settings.
",
        version = env!("CARGO_PKG_VERSION"),
    )
}
