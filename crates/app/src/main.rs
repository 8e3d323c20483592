use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use quiz_core::{Advance, Clock, QuestionBody, QuizReport};
use services::{
    AiAnswerOracle, AiClient, AiQuestionGenerator, CheckReply, GenerateRequest, QuestionGenerator,
    QuizFlow, QuizFlowError, RevealedAnswer, TypeMix,
};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingFile,
    InvalidCount { raw: String },
    InvalidMix { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingFile => write!(f, "--file is required"),
            ArgsError::InvalidCount { raw } => write!(f, "invalid --count value: {raw}"),
            ArgsError::InvalidMix { raw } => {
                write!(f, "invalid --mix value: {raw} (open|multiple|mixed)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- quiz --file <notes.txt> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --file <path>             study notes to quiz on (required)");
    eprintln!("  --title <title>           plan title (default: file name)");
    eprintln!("  --count <n>               number of questions (default: 5)");
    eprintln!("  --mix open|multiple|mixed question types (default: mixed)");
    eprintln!();
    eprintln!("During the quiz:");
    eprintln!("  type your answer (or an option letter A-D) and press enter");
    eprintln!("  :reveal  show the correct answer (forfeits the question)");
    eprintln!("  :next    move on after a correct answer or a reveal");
    eprintln!("  :quit    abandon the quiz");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  RECAP_AI_API_KEY (required), RECAP_AI_BASE_URL, RECAP_AI_MODEL");
}

struct Args {
    file: String,
    title: Option<String>,
    count: usize,
    mix: TypeMix,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut file = None;
        let mut title = None;
        let mut count = 5_usize;
        let mut mix = TypeMix::Mixed;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--file" => file = Some(require_value(args, "--file")?),
                "--title" => title = Some(require_value(args, "--title")?),
                "--count" => {
                    let value = require_value(args, "--count")?;
                    count = value
                        .parse()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or(ArgsError::InvalidCount { raw: value })?;
                }
                "--mix" => {
                    let value = require_value(args, "--mix")?;
                    mix = match value.as_str() {
                        "open" => TypeMix::OpenOnly,
                        "multiple" => TypeMix::MultipleOnly,
                        "mixed" => TypeMix::Mixed,
                        _ => return Err(ArgsError::InvalidMix { raw: value }),
                    };
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            file: file.ok_or(ArgsError::MissingFile)?,
            title,
            count,
            mix,
        })
    }
}

fn prompt_line(out: &mut impl Write, input: &mut impl BufRead) -> io::Result<Option<String>> {
    write!(out, "> ")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None); // EOF
    }
    Ok(Some(line.trim().to_string()))
}

fn print_question(flow: &QuizFlow) {
    let session = flow.session();
    let Some(question) = session.current_question() else {
        return;
    };
    println!();
    println!(
        "Question {} of {}",
        session.current_index() + 1,
        session.total_questions()
    );
    println!("{}", question.prompt());
    if let QuestionBody::Multiple { options, .. } = question.body() {
        for option in options {
            println!("  {option}");
        }
    }
}

fn print_report(report: &QuizReport) {
    println!();
    println!("Quiz finished!");
    println!("Result: {:.2} / {}", report.total(), report.out_of());
    println!("{}", report.motivation().message());
}

fn print_details(report: &QuizReport) {
    println!();
    println!("Detailed results:");
    for entry in report.breakdown() {
        println!(
            "  Q{}: {} = {:.2} / 1",
            entry.index + 1,
            entry.prompt,
            entry.awarded
        );
    }
}

async fn run_quiz(flow: &mut QuizFlow) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    print_question(flow);
    while !flow.session().is_complete() {
        let Some(line) = prompt_line(&mut out, &mut input)? else {
            println!();
            println!("Input closed, abandoning the quiz.");
            return Ok(());
        };

        match line.as_str() {
            "" => {}
            ":quit" => {
                println!("Quiz abandoned.");
                return Ok(());
            }
            ":reveal" => match flow.reveal().await {
                Ok(RevealedAnswer::Known(answer)) => {
                    println!("Correct answer: {answer}");
                    println!("Type :next to continue.");
                }
                Ok(RevealedAnswer::Unavailable) => {
                    println!("The correct answer could not be fetched.");
                    println!("Type :next to continue.");
                }
                Err(err) => println!("{err}"),
            },
            ":next" => match flow.next() {
                Ok(Advance::NextQuestion { .. }) => print_question(flow),
                Ok(Advance::Finished) => {}
                Err(err) => println!("{err}"),
            },
            answer => match flow.check(answer).await {
                Ok(CheckReply::Correct { awarded }) => {
                    println!("Correct! (+{awarded:.2}) Type :next to continue.");
                }
                Ok(CheckReply::Wrong { remaining_cap }) => {
                    println!(
                        "Wrong! Try again or type :reveal. \
                         (this question is still worth {remaining_cap:.2})"
                    );
                }
                Ok(CheckReply::Ignored) => {
                    println!("This question is settled; type :next to continue.");
                }
                Ok(CheckReply::Stale) => {}
                Err(QuizFlowError::InvalidChoice { .. }) => {
                    println!("Please answer with A, B, C or D.");
                }
                Err(QuizFlowError::Evaluation(err)) => {
                    println!("Could not check your answer ({err}); try again.");
                }
                Err(err) => println!("{err}"),
            },
        }
    }

    let report = flow.report()?;
    print_report(&report);

    write!(out, "See detailed results? [y/N] ")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    if line.trim().eq_ignore_ascii_case("y") {
        print_details(&report);
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // `quiz` is the only subcommand and the default.
    let strip_subcommand = match argv.first().map(String::as_str) {
        None => false,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some("quiz") => true,
        Some(first) if first.starts_with("--") => false,
        Some(first) => {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            return Err(Box::new(ArgsError::UnknownArg(first.to_string())));
        }
    };
    if strip_subcommand {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let args = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let text = std::fs::read_to_string(&args.file)?;
    let title = args.title.clone().unwrap_or_else(|| {
        std::path::Path::new(&args.file)
            .file_stem()
            .map_or_else(|| args.file.clone(), |s| s.to_string_lossy().into_owned())
    });

    let client = AiClient::from_env();
    if !client.enabled() {
        return Err("RECAP_AI_API_KEY is not set; the generator and oracle need it".into());
    }

    println!("Generating {} questions for \"{title}\"...", args.count);
    let generator = AiQuestionGenerator::new(client.clone());
    let questions = generator
        .generate(&GenerateRequest {
            title,
            text: text.clone(),
            count: args.count,
            mix: args.mix,
        })
        .await
        .map_err(|err| {
            // Generation failure means there is no session to start; the
            // player just runs the command again.
            log::warn!("question generation failed: {err}");
            err
        })?;

    let oracle = Arc::new(AiAnswerOracle::new(client));
    let mut flow = QuizFlow::new(questions, text, oracle, Clock::default_clock());
    run_quiz(&mut flow).await
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
