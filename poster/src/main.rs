use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use poster_rs::controller::InteractionController;
use poster_rs::{
    Compositor, CompositorConfig, EmbeddedFont, ExportedPoster, FontConfig, GeminiConfig,
    GeminiImageGenerator, PaperSize, PosterState, TextColor, TextOverlaySpec, Vibe,
};
use std::path::{Path, PathBuf};

/// poster: compose printable anti-gambling posters
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the available paper sizes
    Sizes,

    /// Compose a poster over a local background (or the placeholder)
    Render {
        /// Background image (PNG or JPEG)
        #[arg(short, long)]
        background: Option<PathBuf>,

        #[command(flatten)]
        poster: PosterArgs,
    },

    /// Generate a background with Gemini and compose a poster over it
    Generate {
        /// Background style: truck, minimalist, bold, vibrant, illustrated, grunge or custom
        #[arg(long, default_value = "truck")]
        vibe: Vibe,

        /// Free-form style prompt, used with --vibe custom
        #[arg(long)]
        prompt: Option<String>,

        #[command(flatten)]
        poster: PosterArgs,
    },
}

#[derive(Args, Debug)]
struct PosterArgs {
    /// Output PNG file, or an existing directory to write ANTIJUDOL_<timestamp>.png into
    #[arg(short, long)]
    output: PathBuf,

    /// Paper size: a5, a4, a3, story or square
    #[arg(short, long, default_value = "a4")]
    paper: PaperSize,

    /// Overlay text. A literal \n starts a new line
    #[arg(short, long)]
    text: Option<String>,

    /// Text color: #FFFFFF, #000000, #D6001C or #FFDE59
    #[arg(short, long, default_value = "#FFDE59")]
    color: TextColor,

    /// Text size multiplier, 0.5 to 2.5
    #[arg(short, long, default_value_t = 1.0)]
    scale: f32,

    /// Horizontal text anchor as a fraction of the width
    #[arg(short, long, default_value_t = 0.5)]
    x: f32,

    /// Vertical text anchor as a fraction of the height
    #[arg(short, long, default_value_t = 0.5)]
    y: f32,

    /// Render at full print resolution instead of the 1000px preview
    #[arg(long)]
    print: bool,

    /// Additional directory to search for fonts
    #[arg(long)]
    font_dir: Vec<PathBuf>,

    /// Font file (TTF or OTF) to register before rendering
    #[arg(long)]
    font_file: Vec<PathBuf>,
}

impl PosterArgs {
    fn state(&self) -> PosterState {
        let mut overlay = TextOverlaySpec::default();
        if let Some(text) = &self.text {
            overlay.set_text(text.replace("\\n", "\n"));
        }
        overlay.set_color(self.color);
        overlay.set_scale(self.scale);
        overlay.set_position(self.x, self.y);
        PosterState::new(self.paper, overlay)
    }

    fn compositor(&self) -> anyhow::Result<Compositor> {
        let embedded = self
            .font_file
            .iter()
            .map(|path| {
                std::fs::read(path)
                    .map(EmbeddedFont::new)
                    .with_context(|| format!("Failed to read font file {}", path.display()))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Compositor::new(CompositorConfig {
            font_config: FontConfig {
                font_dirs: self.font_dir.clone(),
                embedded,
                ..FontConfig::default()
            },
            ..CompositorConfig::default()
        }))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sizes => {
            print_sizes();
            Ok(())
        }
        Commands::Render { background, poster } => {
            let mut ctl = InteractionController::with_state(poster.compositor()?, poster.state())?;
            if let Some(path) = background {
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("Failed to read background {}", path.display()))?;
                if !ctl.upload(&bytes)? {
                    bail!(
                        "{} ({})",
                        ctl.error_message().unwrap_or("Failed to read background"),
                        path.display()
                    );
                }
            }
            write_poster(&ctl, &poster)
        }
        Commands::Generate {
            vibe,
            prompt,
            poster,
        } => {
            let config = GeminiConfig::from_env()?;
            let generator = GeminiImageGenerator::new(config)?;
            let mut ctl = InteractionController::with_state(poster.compositor()?, poster.state())?;
            ctl.set_vibe(vibe);
            if let Some(prompt) = prompt {
                ctl.set_custom_prompt(prompt);
            }
            if !ctl.generate(&generator).await? {
                bail!(
                    "{}",
                    ctl.error_message().unwrap_or("Background generation failed")
                );
            }
            write_poster(&ctl, &poster)
        }
    }
}

fn print_sizes() {
    for size in PaperSize::ALL {
        let dims = size.dimensions();
        let (preview_w, preview_h) = size.preview_size();
        println!(
            "{:<7} {:<18} {:>4} x {:<4} (preview {} x {})",
            size.name(),
            dims.label,
            dims.width,
            dims.height,
            preview_w,
            preview_h
        );
    }
}

fn write_poster(ctl: &InteractionController, args: &PosterArgs) -> anyhow::Result<()> {
    let now = chrono::Utc::now();
    let poster = if args.print {
        ctl.export_print(now)?
    } else {
        ctl.export(now)?
    };
    let path = write_to(&poster, &args.output)?;
    println!("{}", path.display());
    Ok(())
}

fn write_to(poster: &ExportedPoster, output: &Path) -> anyhow::Result<PathBuf> {
    if output.is_dir() {
        Ok(poster.write_to_dir(output)?)
    } else {
        poster
            .write_to(output)
            .with_context(|| format!("Failed to write poster to {}", output.display()))?;
        Ok(output.to_path_buf())
    }
}
