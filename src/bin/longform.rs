//! Command-line front end: analyze a reference record, list ideas, assemble and export
//! a script, or score a thumbnail image.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use longform_script_builder::{
    analyze_reference, assemble_script, generate_ideas, parse_chapters, render_report,
    score_thumbnail_file, select_idea, Heuristics, ReferenceVideoInput, ScriptRequest,
    ThumbnailReport, ThumbnailSource, DEFAULT_IDEA_COUNT,
};

#[derive(Parser)]
#[command(name = "longform", about = "Reference video analysis, idea generation and script assembly")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the analysis report and the generated ideas.
    Analyze {
        input: PathBuf,
        #[arg(long, default_value_t = DEFAULT_IDEA_COUNT)]
        ideas: usize,
        /// Emit JSON instead of the text summary.
        #[arg(long)]
        json: bool,
    },
    /// Assemble a script from one of the generated ideas.
    Script {
        input: PathBuf,
        /// Zero-based index into the generated ideas.
        #[arg(long)]
        idea: usize,
        #[arg(long, default_value = "")]
        persona: String,
        #[arg(long, default_value = "")]
        style: String,
        /// Comma-separated chapter labels; empty uses the default outline.
        #[arg(long, default_value = "")]
        chapters: String,
        /// Write the script here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Score a thumbnail image.
    Salience { image: PathBuf },
    /// Write a sample input record.
    Template { path: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let h = Heuristics::from_env()?;

    match cli.command {
        Command::Analyze { input, ideas, json } => {
            let reference = ReferenceVideoInput::load_json(&input)
                .with_context(|| format!("loading {}", input.display()))?;
            let thumb = ThumbnailSource::resolve(&reference.thumbnail, h.salience.max_side);
            let report = analyze_reference(&reference, &h, &thumb)?;
            let ideas = generate_ideas(&reference, &h, ideas);
            if json {
                let out = serde_json::json!({ "report": report, "ideas": ideas });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", render_report(&report));
                println!();
                for (i, idea) in ideas.iter().enumerate() {
                    println!("{i}. {}\n   {}\n   {}", idea.idea_title, idea.concept, idea.logline);
                }
            }
        }
        Command::Script {
            input,
            idea,
            persona,
            style,
            chapters,
            out,
        } => {
            let reference = ReferenceVideoInput::load_json(&input)
                .with_context(|| format!("loading {}", input.display()))?;
            reference.validate()?;
            let ideas = generate_ideas(&reference, &h, DEFAULT_IDEA_COUNT);
            let chosen = select_idea(&ideas, idea)?;
            let req = ScriptRequest {
                persona,
                style,
                chapters: parse_chapters(&chapters),
            };
            let script = assemble_script(Some(chosen), &req, &h)?;
            match out {
                Some(path) => {
                    fs::write(&path, &script)
                        .with_context(|| format!("writing {}", path.display()))?;
                    tracing::info!(path = %path.display(), "script saved");
                }
                None => println!("{script}"),
            }
        }
        Command::Salience { image } => {
            let report = score_thumbnail_file(&image, &h)?;
            if matches!(report, ThumbnailReport::Absent) {
                tracing::warn!(path = %image.display(), "no thumbnail at path");
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Template { path } => {
            let sample = ReferenceVideoInput {
                views: 1_000_000,
                likes: 50_000,
                seconds: 600,
                title: "초보도 되는 10분 정리 루틴".into(),
                thumbnail: "놀란 표정 얼굴 클로즈업, 노랑 배경에 굵은 숫자".into(),
                script_text: "여러분, 10분이면 방 하나가 바뀝니다. 하지만 순서가 중요해요.\n\
                              챕터 1 준비물\n챕터 2 실전 정리\n챕터 3 유지 비법"
                    .into(),
            };
            sample
                .save_json(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "template written");
        }
    }
    Ok(())
}
