use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ticketarc_core::{
    ArchiveError, DEFAULT_STYLESHEET, RenderSession, Theme, convert_transcript,
    read_transcript_text, render_document, render_fragment, transcript_view_to_raw_json,
};

#[derive(Debug, Parser)]
#[command(
    name = "ticketarc",
    version,
    about = "Convert ticket transcript exports into styled HTML archives"
)]
struct Cli {
    /// Path to a transcript .txt export
    input: PathBuf,

    /// Write the document to this path instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Color theme for author names: light or dark
    #[arg(long, default_value = "dark")]
    theme: String,

    /// Path to a stylesheet replacing the built-in one
    #[arg(long)]
    stylesheet: Option<PathBuf>,

    /// Emit an embeddable fragment without the document shell
    #[arg(long)]
    fragment: bool,

    /// Output the structured transcript as raw JSON instead of HTML
    #[arg(long)]
    raw: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> ticketarc_core::Result<()> {
    if cli.raw && cli.fragment {
        return Err(ArchiveError::InvalidMode(
            "--raw cannot be combined with --fragment".to_string(),
        ));
    }
    if cli.raw && cli.stylesheet.is_some() {
        return Err(ArchiveError::InvalidMode(
            "--raw cannot be combined with --stylesheet".to_string(),
        ));
    }

    let theme = cli.theme.parse::<Theme>()?;
    let text = read_transcript_text(&cli.input)?;

    let mut session = RenderSession::new();
    let view = convert_transcript(&mut session, &text, theme);

    let output = if cli.raw {
        transcript_view_to_raw_json(&view)?
    } else if cli.fragment {
        render_fragment(&view)
    } else {
        let stylesheet = match &cli.stylesheet {
            Some(path) => fs::read_to_string(path).map_err(|source| ArchiveError::Io {
                path: path.clone(),
                source,
            })?,
            None => DEFAULT_STYLESHEET.to_string(),
        };
        render_document(&view, &stylesheet, theme)
    };

    match &cli.output {
        Some(path) => fs::write(path, output).map_err(|source| ArchiveError::Io {
            path: path.clone(),
            source,
        })?,
        None => print!("{output}"),
    }

    Ok(())
}
