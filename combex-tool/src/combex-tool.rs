#![allow(clippy::uninlined_format_args)]

use combex::{Engine, Error, Flags, Pattern};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Instant,
};
use structopt::StructOpt;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// The patterns this tool knows how to build.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum PatternKind {
    /// A literal given by --text.
    Literal,
    /// A range given by --from, --to, --escape and --nested.
    Range,
    /// A double-quoted string in which a backslash protects a following quote.
    Quoted,
    /// A single-quoted string where '' stands for a quote.
    Doubled,
    /// A nestable C-style block comment.
    Comment,
    /// A letter or underscore, then word characters.
    Identifier,
    /// An optionally signed integer with an optional fraction.
    Number,
    /// A run of letters.
    Word,
}

const PATTERN_KINDS: &[(&str, PatternKind)] = &[
    ("literal", PatternKind::Literal),
    ("range", PatternKind::Range),
    ("quoted", PatternKind::Quoted),
    ("doubled", PatternKind::Doubled),
    ("comment", PatternKind::Comment),
    ("identifier", PatternKind::Identifier),
    ("number", PatternKind::Number),
    ("word", PatternKind::Word),
];

impl FromStr for PatternKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PATTERN_KINDS
            .iter()
            .find(|(name, _)| *name == s)
            .map(|&(_, kind)| kind)
            .ok_or_else(|| {
                let names: Vec<&str> = PATTERN_KINDS.iter().map(|(name, _)| *name).collect();
                format!("unknown pattern '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = PATTERN_KINDS
            .iter()
            .find(|(_, kind)| kind == self)
            .map_or("?", |(name, _)| *name);
        f.write_str(name)
    }
}

#[derive(Debug, StructOpt)]
#[structopt(name = "combex-tool")]
struct Opt {
    /// The pattern to build.
    pattern: PatternKind,

    /// The flags of the pattern.
    #[structopt(long, short, parse(from_str = Flags::from))]
    flags: Option<Flags>,

    /// Text for the literal pattern.
    #[structopt(long)]
    text: Option<String>,

    /// Opening delimiter for the range pattern.
    #[structopt(long, default_value = "\"")]
    from: String,

    /// Closing delimiter for the range pattern.
    #[structopt(long, default_value = "\"")]
    to: String,

    /// Escape sequence for the range pattern.
    #[structopt(long)]
    escape: Option<String>,

    /// Let the range pattern nest.
    #[structopt(long)]
    nested: bool,

    /// Dump the pattern tree to stdout.
    #[structopt(long)]
    dump_tree: bool,

    /// Report the one-unit complement match at the start of each input.
    #[structopt(long)]
    neglect: bool,

    /// The input values to match against.
    #[structopt(conflicts_with_all = &["bench", "file"])]
    inputs: Vec<String>,

    /// Match against the contents of a specified file.
    #[structopt(long, conflicts_with_all = &["bench", "inputs"])]
    file: Option<PathBuf>,

    /// Benchmark the matches of the specified file.
    #[structopt(long, conflicts_with_all = &["file", "inputs"])]
    bench: Option<PathBuf>,
}

fn build_pattern(args: &Opt) -> Result<Pattern, Error> {
    let pattern = match args.pattern {
        PatternKind::Literal => Pattern::literal(args.text.as_deref().unwrap_or_default())?,
        PatternKind::Range => {
            Pattern::range_with(&args.from, &args.to, args.escape.as_deref(), args.nested)?
        }
        PatternKind::Quoted => Pattern::range_escaped("\"", "\"", "\\")?,
        PatternKind::Doubled => Pattern::range_escaped("'", "'", "''")?,
        PatternKind::Comment => Pattern::range_nested("/*", "*/")?,
        PatternKind::Identifier => {
            (Pattern::letter() | '_') + Pattern::word().span()?.optional()
        }
        PatternKind::Number => {
            let digits = Pattern::digit().span()?;
            let sign = (Pattern::char('-') | '+').optional();
            let fraction = ('.' + digits.clone()).optional();
            sign + digits + fraction
        }
        PatternKind::Word => Pattern::letter().span()?,
    };
    debug!(kind = %args.pattern, matches_empty = pattern.matches_empty(), "built pattern");
    Ok(pattern)
}

fn format_match(m: &combex::Match, input: &str) -> String {
    let mut result = String::new();

    // Show the full matched range
    result.push_str(&format!(
        "\"{}\" ({}..{})",
        &input[m.range()],
        m.start(),
        m.end()
    ));

    // Show captures if any exist
    if !m.captures.is_empty() {
        result.push_str(", captures: [");
        for (i, (name, cg)) in m.named_captures().enumerate() {
            if i > 0 {
                result.push_str(", ");
            }
            match cg {
                Some(cg_range) => result.push_str(&format!(
                    "{}: \"{}\" ({}..{})",
                    name,
                    &input[cg_range.clone()],
                    cg_range.start,
                    cg_range.end
                )),
                None => result.push_str(&format!("{}: None", name)),
            }
        }
        result.push(']');
    }

    result
}

fn exec_on_string(engine: &Engine, input: &str) {
    let mut matches = engine.find_iter(input);
    if let Some(res) = matches.next() {
        let count = 1 + matches.count();
        println!("Match: {}, total: {}", format_match(&res, input), count);
    } else {
        println!("No match");
    }
}

fn neglect_on_string(engine: &Engine, input: &str) {
    match engine.neglect(input).text(input) {
        Some(text) => println!("Neglect: \"{}\"", text),
        None => println!("No neglect"),
    }
}

fn bench_on_path(engine: &Engine, path: &Path) {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            println!("{}: {}", err, path.display());
            return;
        }
    };
    let input = contents.as_str();
    // Warmup
    engine.find_iter(input).count();
    let start = Instant::now();
    for _ in 0..25 {
        engine.find_iter(input).count();
    }
    let duration = start.elapsed();
    info!(path = %path.display(), bytes = input.len(), "benchmarked");
    println!("{} ms", duration.as_millis());
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("COMBEX_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let args = Opt::from_args();

    let flags = args.flags.unwrap_or_default();
    let pattern = build_pattern(&args)?;
    if args.dump_tree {
        println!("Pattern tree:\n{}", pattern);
    }
    let engine = pattern.compile_with_flags(flags)?;

    if let Some(ref path) = args.file {
        match fs::read_to_string(path) {
            Ok(contents) => exec_on_string(&engine, contents.as_str()),
            Err(err) => println!("{}: {}", err, path.display()),
        };
    } else if let Some(ref path) = args.bench {
        bench_on_path(&engine, path);
    } else {
        for input in args.inputs.iter() {
            if args.neglect {
                neglect_on_string(&engine, input);
            } else {
                exec_on_string(&engine, input);
            }
        }
    }
    Ok(())
}
