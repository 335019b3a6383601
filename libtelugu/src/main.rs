use anyhow::Context as _;
use clap::{Parser, Subcommand};
use libtelugu::{telugu_engine, transliterate, KeyEvent, TeluguConfig, TeluguProfile, TypewriterEngine};
use liblipi_core::export::{html_fragment, primary_font_name, to_rtf};
use liblipi_core::{Document, ExportSettings};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lipi-telugu", version, about = "Live ITRANS → Telugu typewriter")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the Telugu rendering of ITRANS text
    Transliterate { text: String },
    /// Print the RTF clipboard payload for ITRANS text
    Rtf {
        text: String,
        #[arg(long, default_value = profile_default_font())]
        font: String,
        #[arg(long, default_value_t = 12.0)]
        size: f32,
    },
    /// Print the HTML clipboard payload for ITRANS text
    Html {
        text: String,
        #[arg(long, default_value = profile_default_font())]
        font: String,
        #[arg(long, default_value_t = 12.0)]
        size: f32,
    },
    /// Type lines from stdin into a live editor
    Repl {
        /// Ask the online provider for candidates
        #[arg(long)]
        cloud: bool,
        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn profile_default_font() -> &'static str {
    libtelugu::TELUGU_FONTS[0].value
}

fn export_settings(font: String, size: f32) -> ExportSettings {
    ExportSettings {
        font_family: font,
        font_size_px: size,
        fallback_font: libtelugu::profile::FALLBACK_FONT.to_string(),
    }
}

fn init_logging() {
    let mut builder = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(log::LevelFilter::Warn);
    }
    builder.init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Transliterate { text } => {
            println!("{}", transliterate(&text));
        }
        Command::Rtf { text, font, size } => {
            let settings = export_settings(font, size);
            let font_name = primary_font_name(&settings.font_family, &settings.fallback_font);
            println!("{}", to_rtf(transliterate(&text).trim(), &font_name, settings.font_size_px));
        }
        Command::Html { text, font, size } => {
            let doc = Document::from_text(&transliterate(&text));
            println!("{}", html_fragment(&doc, &export_settings(font, size)));
        }
        Command::Repl { cloud, config } => {
            let mut config = match config {
                Some(path) => TeluguConfig::load_toml(&path)
                    .with_context(|| format!("failed to load config from {}", path.display()))?,
                None => TeluguConfig::default(),
            };
            config.cloud_enabled |= cloud;
            repl(config).await?;
        }
    }
    Ok(())
}

async fn repl(config: TeluguConfig) -> anyhow::Result<()> {
    let cloud = config.cloud_enabled;
    let mut engine = telugu_engine(config);

    println!("lipi-telugu: type ITRANS and press Enter (:export, :clear, Ctrl+D to quit)");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match line.trim() {
            ":clear" => {
                engine.clear();
                println!("  (cleared)");
                continue;
            }
            ":export" => {
                let snapshot = engine.export();
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
                continue;
            }
            _ => {}
        }

        for ch in line.chars() {
            engine.process_key(KeyEvent::Char(ch));
        }
        if cloud {
            engine.settle_suggestions().await;
            print_candidates(&engine);
        }
        // Enter picks the first candidate when one is shown; a second Enter
        // then ends the paragraph.
        let picked = engine.context().has_candidates();
        engine.process_key(KeyEvent::Enter);
        if picked {
            engine.process_key(KeyEvent::Enter);
        }
        println!("{}", engine.document().text().trim_end());
        io::stdout().flush()?;
    }
    Ok(())
}

fn print_candidates(engine: &TypewriterEngine<TeluguProfile>) {
    let ctx = engine.context();
    if !ctx.has_candidates() {
        return;
    }
    let labelled: Vec<String> = ctx
        .labelled_candidates(&engine.config().select_keys)
        .map(|(key, text)| format!("{key}. {text}"))
        .collect();
    println!("  {}", labelled.join("  "));
}
