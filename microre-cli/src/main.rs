use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use microre::{MatchLimits, RegExp, RegexError, StrMatch, replace, replace_all, split, str_match};

#[derive(Parser)]
#[command(name = "microre")]
#[command(about = "microre - a backtracking regex engine for embedded runtimes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand
#[derive(Args)]
struct PatternArgs {
    /// The regex pattern
    pattern: String,
    /// Pattern flags (`g`, `i`)
    #[arg(short, long, default_value = "")]
    flags: String,
    /// Abandon the search past this recursion depth
    #[arg(long, default_value_t = microre::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Run exec and show the match with its groups
    Exec {
        #[command(flatten)]
        pattern: PatternArgs,
        /// The input string
        input: String,
    },
    /// Check if pattern matches
    Test {
        #[command(flatten)]
        pattern: PatternArgs,
        /// The input string
        input: String,
    },
    /// List matches like String.prototype.match
    Match {
        #[command(flatten)]
        pattern: PatternArgs,
        /// The input string
        input: String,
    },
    /// Replace matches; `$1`..`$9` refer to groups
    Replace {
        #[command(flatten)]
        pattern: PatternArgs,
        /// The input string
        input: String,
        /// The replacement template
        replacement: String,
        /// Replace every match regardless of flags
        #[arg(short, long)]
        all: bool,
    },
    /// Split input on matches
    Split {
        #[command(flatten)]
        pattern: PatternArgs,
        /// The input string
        input: String,
    },
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Exec { pattern, input } => cmd_exec(&pattern, &input),
        Commands::Test { pattern, input } => cmd_test(&pattern, &input),
        Commands::Match { pattern, input } => cmd_match(&pattern, &input),
        Commands::Replace {
            pattern,
            input,
            replacement,
            all,
        } => cmd_replace(&pattern, &input, &replacement, all),
        Commands::Split { pattern, input } => cmd_split(&pattern, &input),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn build(args: &PatternArgs) -> Result<RegExp, RegexError> {
    log::debug!("pattern /{}/{}", args.pattern, args.flags);
    Ok(RegExp::new(&args.pattern, &args.flags)?
        .with_limits(MatchLimits::with_max_depth(args.max_depth)))
}

fn cmd_exec(args: &PatternArgs, input: &str) -> Result<bool, RegexError> {
    let mut regexp = build(args)?;
    println!("{}", "Running exec...".bold());
    println!("  Pattern: {}", regexp.to_string().cyan());
    println!("  Input:   {}", input.yellow());
    println!();

    let Some(result) = regexp.exec(input)? else {
        println!("{}", "✗ No match".red());
        return Ok(false);
    };

    println!("{}", "✓ Match found!".green().bold());
    println!("  Index: {}", result.index);
    println!("  Match: {}", result.matched.green());
    if !result.captures.is_empty() {
        println!();
        println!("{}", "Capture groups:".bold());
        for (idx, capture) in result.captures.iter().enumerate() {
            match capture {
                Some(text) => println!("  Group {}: {}", idx + 1, text.green()),
                None => println!("  Group {}: {}", idx + 1, "(none)".dimmed()),
            }
        }
    }
    Ok(true)
}

fn cmd_test(args: &PatternArgs, input: &str) -> Result<bool, RegexError> {
    let mut regexp = build(args)?;
    let matched = regexp.test(input)?;
    if matched {
        println!("{}", "true".green());
    } else {
        println!("{}", "false".red());
    }
    Ok(matched)
}

fn cmd_match(args: &PatternArgs, input: &str) -> Result<bool, RegexError> {
    let mut regexp = build(args)?;
    match str_match(input, &mut regexp)? {
        None => {
            println!("{}", "No matches found".red());
            Ok(false)
        }
        Some(StrMatch::First(result)) => {
            println!("  {}..{} = {}", result.index, result.end(), result.matched.green());
            Ok(true)
        }
        Some(StrMatch::All(matches)) => {
            println!(
                "{} {}",
                "Found".bold(),
                format!("{} match(es)", matches.len()).green()
            );
            println!();
            for (i, m) in matches.iter().enumerate() {
                println!("  [{}] {}", i + 1, m.green());
            }
            Ok(true)
        }
    }
}

fn cmd_replace(
    args: &PatternArgs,
    input: &str,
    replacement: &str,
    all: bool,
) -> Result<bool, RegexError> {
    let mut regexp = build(args)?;
    let output = if all {
        replace_all(input, &mut regexp, replacement)?
    } else {
        replace(input, &mut regexp, replacement)?
    };
    println!("{}", output);
    Ok(true)
}

fn cmd_split(args: &PatternArgs, input: &str) -> Result<bool, RegexError> {
    let regexp = build(args)?;
    for part in split(input, &regexp)? {
        println!("{:?}", part);
    }
    Ok(true)
}
