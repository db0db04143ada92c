use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use theme_sync::error::SyncError;
use theme_sync::logging;
use theme_sync::orchestrator;
use theme_sync::palette::{
    self, Palette, PaletteCache, BRAND_FONT, BRAND_THEME_NAME, WAL_THEME_NAME,
};
use theme_sync::targets::gemini::GeminiTarget;
use theme_sync::targets::reload::{BordersRestart, SketchybarReload};
use theme_sync::targets::vscode::VscodeTarget;
use theme_sync::targets::wal_cache::WalCacheTarget;
use theme_sync::targets::zed::ZedTarget;
use theme_sync::targets::TargetIntegration;
use theme_sync::tokens::SemanticTokens;

#[derive(Parser)]
#[command(name = "theme-sync", about = "Synchronize one color palette across desktop tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the fixed branded theme to every installed target
    Apply,
    /// Re-sync targets from the wallpaper-extracted palette
    Reload {
        /// Extract a fresh palette from this image first
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let _guard = logging::init();
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Apply => apply_branded(),
        Commands::Reload { image } => reload(image),
    };

    if code == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Token-consuming targets shared by both entry points: theme-file
/// targets first, then patch targets, then process reloads.
fn shared_targets(theme_name: &str, font: Option<&str>) -> Vec<Box<dyn TargetIntegration>> {
    vec![
        Box::new(ZedTarget::new(theme_name, font)),
        Box::new(VscodeTarget::code()),
        Box::new(VscodeTarget::antigravity()),
        Box::new(GeminiTarget::new(theme_name)),
        Box::new(BordersRestart),
        Box::new(SketchybarReload),
    ]
}

fn apply_branded() -> i32 {
    info!(theme = BRAND_THEME_NAME, "Applying branded theme");

    let source = Palette::nothing();
    let tokens = SemanticTokens::derive(&source);

    let mut integrations: Vec<Box<dyn TargetIntegration>> = vec![Box::new(
        WalCacheTarget::new(PaletteCache::default_location(), source),
    )];
    integrations.extend(shared_targets(BRAND_THEME_NAME, Some(BRAND_FONT)));

    orchestrator::run(&integrations, &tokens).exit_code()
}

fn reload(image: Option<PathBuf>) -> i32 {
    if let Some(image) = image {
        if let Err(e) = palette::extract_palette(&image) {
            error!(error = %e, "Palette extraction failed");
            return 1;
        }
    }

    // No cache and no image means no token set can be derived at all:
    // the one fatal condition in the pipeline.
    let source = match PaletteCache::default_location().load() {
        Ok(p) => p,
        Err(e @ SyncError::PaletteUnavailable(_)) => {
            error!(error = %e, "Cannot derive tokens without a palette");
            return 1;
        }
        Err(e) => {
            error!(error = %e, "Palette load failed");
            return 1;
        }
    };

    info!(theme = WAL_THEME_NAME, "Re-syncing from extracted palette");
    let tokens = SemanticTokens::derive(&source);
    let integrations = shared_targets(WAL_THEME_NAME, None);

    orchestrator::run(&integrations, &tokens).exit_code()
}
