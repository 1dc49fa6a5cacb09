//! Command-line shader minifier.
//!
//! Reads a vertex/fragment pair (two files, or one combined document) and
//! prints the compiled pair as a combined document.

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use smc_ast::ParseError;
use smc_compiler::{
    document::{FRAGMENT_MARKER, VERTEX_MARKER},
    render_document, split_document, CompileError, Compiler, CompilerOptions, ShaderProgram,
    Stage,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "smc", version, about = "Minify a GLSL vertex/fragment shader pair", long_about = None)]
struct Args {
    /// Vertex shader source file
    #[arg(required_unless_present = "combined", requires = "fragment")]
    vertex: Option<PathBuf>,

    /// Fragment shader source file
    fragment: Option<PathBuf>,

    /// Read both stages from one `//! VERTEX` / `//! FRAGMENT` document
    #[arg(long, conflicts_with_all = ["vertex", "fragment"])]
    combined: Option<PathBuf>,

    /// Also rename uniforms, attributes, varyings and global in/out
    #[arg(long)]
    aggressive: bool,

    /// Keep functions unreachable from main
    #[arg(long)]
    keep_dead_code: bool,

    /// Keep redundant braces
    #[arg(long)]
    keep_braces: bool,

    /// Keep adjacent declarations separate
    #[arg(long)]
    no_merge: bool,

    /// Keep identifier names
    #[arg(long)]
    no_minify: bool,

    /// Put each top-level declaration on its own line
    #[arg(long)]
    pretty: bool,

    /// Log more (repeat for more detail); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn options(&self) -> CompilerOptions {
        CompilerOptions::default()
            .aggressive(self.aggressive)
            .remove_dead_functions(!self.keep_dead_code)
            .reduce_braces(!self.keep_braces)
            .merge_declarations(!self.no_merge)
            .minify(!self.no_minify)
            .line_separator(if self.pretty { "\n" } else { "" })
    }
}

/// Source text of one stage and where it came from.
struct StageSource {
    path: PathBuf,
    text: String,
    /// Lines preceding the text in its file
    line_offset: usize,
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_sources(args: &Args) -> Result<(StageSource, StageSource)> {
    if let Some(path) = &args.combined {
        let text = read(path)?;
        let document =
            split_document(&text).with_context(|| format!("{}: not a shader document", path.display()))?;
        let marker_line = |marker: &str| {
            text.lines()
                .position(|line| line.trim_end() == marker)
                .map_or(0, |index| index + 1)
        };
        return Ok((
            StageSource {
                path: path.clone(),
                text: document.vertex,
                line_offset: marker_line(VERTEX_MARKER),
            },
            StageSource {
                path: path.clone(),
                text: document.fragment,
                line_offset: marker_line(FRAGMENT_MARKER),
            },
        ));
    }

    let (Some(vertex), Some(fragment)) = (&args.vertex, &args.fragment) else {
        anyhow::bail!("expected VERTEX and FRAGMENT files or --combined FILE");
    };
    Ok((
        StageSource {
            path: vertex.clone(),
            text: read(vertex)?,
            line_offset: 0,
        },
        StageSource {
            path: fragment.clone(),
            text: read(fragment)?,
            line_offset: 0,
        },
    ))
}

/// `file:line:col: message` for a parse error in `source`.
fn diagnostic(source: &StageSource, error: &ParseError) -> String {
    let (line, column) = error.line_col(&source.text);
    format!(
        "{}:{}:{}: {}",
        source.path.display(),
        line + source.line_offset,
        column,
        error.message
    )
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<ExitCode> {
    let (vertex, fragment) = load_sources(args)?;
    let options = args.options();
    debug!("Compiling with {:?}", options);

    let program = match ShaderProgram::parse(&vertex.text, &fragment.text) {
        Ok(program) => program,
        Err(CompileError::Parse { stage, error }) => {
            let source = match stage {
                Stage::Vertex => &vertex,
                Stage::Fragment => &fragment,
            };
            eprintln!("{}", diagnostic(source, &error));
            return Ok(ExitCode::FAILURE);
        }
        Err(other) => return Err(other.into()),
    };

    let program = Compiler::with_options(&options).compile_program(program)?;
    let output = render_document(&program, &options.line_separator);
    info!("Wrote {} bytes", output.len());
    print!("{}", output);
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    match run(&args) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {:#}", error);
            ExitCode::FAILURE
        }
    }
}
